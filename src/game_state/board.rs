//! Fixed 8x8 grid owning the engine's working pieces.
//!
//! A square holds at most one piece and every stored piece's own index equals
//! the slot it sits in. The board is built once from a piece list and then
//! mutated in place by `Player::do_move` / `Player::undo_move`.

use crate::chess_errors::{ChessErrors, ChessResult};
use crate::game_state::chess_types::{Color, Index, PieceKind};
use crate::moves::piece::Piece;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Board {
    squares: [[Option<Piece>; 8]; 8],
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a board from copies of `pieces`, so the caller's templates stay
    /// independent of the engine's working pieces.
    pub fn from_pieces(pieces: &[Piece]) -> ChessResult<Self> {
        let mut board = Self::new();
        for piece in pieces {
            if board.get(piece.index()).is_some() {
                return Err(ChessErrors::SquareOccupied(piece.index()));
            }
            board.place(piece.clone());
        }
        Ok(board)
    }

    #[inline]
    pub fn get(&self, index: Index) -> Option<&Piece> {
        self.squares[index.file() as usize][index.rank() as usize].as_ref()
    }

    #[inline]
    pub fn color_at(&self, index: Index) -> Option<Color> {
        self.get(index).map(Piece::color)
    }

    #[inline]
    pub fn is_empty(&self, index: Index) -> bool {
        self.get(index).is_none()
    }

    /// Writes `piece` to `index`, moving the piece's own index there without
    /// touching its `has_moved` flag. Returns the previous occupant.
    pub fn set(&mut self, index: Index, mut piece: Piece) -> Option<Piece> {
        piece.set_index(index);
        self.place(piece)
    }

    /// Writes `piece` into the slot named by its own index.
    #[inline]
    pub fn place(&mut self, piece: Piece) -> Option<Piece> {
        let index = piece.index();
        self.squares[index.file() as usize][index.rank() as usize].replace(piece)
    }

    /// Empties `index`, returning whatever stood there.
    #[inline]
    pub fn clear(&mut self, index: Index) -> Option<Piece> {
        self.squares[index.file() as usize][index.rank() as usize].take()
    }

    pub fn pieces(&self) -> impl Iterator<Item = &Piece> {
        self.squares.iter().flatten().flatten()
    }

    /// Full board contents, kind included, in square order. Piece equality
    /// ignores the kind, so tests that need exact restoration compare these.
    pub fn snapshot(&self) -> Vec<(Index, PieceKind, Color, bool)> {
        let mut out = self
            .pieces()
            .map(|piece| (piece.index(), piece.kind(), piece.color(), piece.has_moved()))
            .collect::<Vec<_>>();
        out.sort_by_key(|(index, ..)| index.square());
        out
    }
}

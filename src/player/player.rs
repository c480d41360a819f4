//! One side of the game: its live piece squares, cached king square, and
//! legal move derivation.
//!
//! The index list keeps the order of the initial piece list. Moves rewrite a
//! slot in place and captures remove a slot that undo re-inserts at the same
//! position, so `undo_move(do_move(m))` restores the list exactly.

use tracing::trace;

use crate::chess_errors::{ChessErrors, ChessResult};
use crate::game_state::board::Board;
use crate::game_state::chess_types::{Color, Index, PieceKind};
use crate::moves::chess_move::{ChessMove, Promotion};
use crate::moves::piece::Piece;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    color: Color,
    indices: Vec<Index>,
    king: Index,
}

impl Player {
    /// Every piece must be `color`, and exactly one of them a king.
    pub fn new(color: Color, pieces: &[Piece]) -> ChessResult<Self> {
        let mut king = None;
        let mut indices = Vec::with_capacity(pieces.len());
        for piece in pieces {
            if piece.color() != color {
                return Err(ChessErrors::PieceColorMismatch {
                    expected: color,
                    found: piece.color(),
                    index: piece.index(),
                });
            }
            if piece.kind() == PieceKind::King {
                if king.is_some() {
                    return Err(ChessErrors::MultipleKings(color));
                }
                king = Some(piece.index());
            }
            indices.push(piece.index());
        }
        let king = king.ok_or(ChessErrors::MissingKing(color))?;
        Ok(Self {
            color,
            indices,
            king,
        })
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    #[inline]
    pub fn indices(&self) -> &[Index] {
        &self.indices
    }

    #[inline]
    pub fn king_index(&self) -> Index {
        self.king
    }

    /// The piece this player owns at `index`, or an accounting error if the
    /// board disagrees.
    pub fn piece_at<'b>(&self, board: &'b Board, index: Index) -> ChessResult<&'b Piece> {
        match board.get(index) {
            Some(piece) if piece.color() == self.color => Ok(piece),
            Some(piece) => Err(ChessErrors::accounting(
                index,
                format!("{} expected its own piece, found a {} {}", self.color, piece.color(), piece.kind()),
            )),
            None => Err(ChessErrors::accounting(
                index,
                format!("{} expected a piece on an empty square", self.color),
            )),
        }
    }

    /// Sum of static piece values; the king counts zero.
    pub fn material(&self, board: &Board) -> ChessResult<i32> {
        let mut total = 0;
        for &index in &self.indices {
            total += self.piece_at(board, index)?.value().unwrap_or(0);
        }
        Ok(total)
    }

    /// Every pseudo-legal move of every owned piece. Moves onto the
    /// opponent's king are dropped, and pawn moves onto the last rank carry a
    /// queen promotion.
    pub fn pseudo_legal_moves(&self, board: &Board, opponent: &Player) -> ChessResult<Vec<ChessMove>> {
        let mut moves = Vec::with_capacity(64);
        for &start in &self.indices {
            let piece = self.piece_at(board, start)?;
            let promotes = piece.kind() == PieceKind::Pawn;
            for end in piece.possible_moves(board, opponent)? {
                if end == opponent.king {
                    continue;
                }
                let mut mv = ChessMove::new(start, end);
                if promotes && end.rank() == self.color.promotion_rank() {
                    mv = mv.with_promotion(Promotion::Queen);
                }
                moves.push(mv);
            }
        }
        Ok(moves)
    }

    /// Legal moves: pseudo-legal moves that do not leave the own king in
    /// check.
    ///
    /// Only moves that can change the king's safety are tried on the board:
    /// all of them when the king is already in check, otherwise only those
    /// whose source lies on one of the king's eight rays (a possible
    /// discovered check). An empty result is reported as
    /// `ChessErrors::NoLegalMoves`.
    pub fn get_possible_moves_index(
        &mut self,
        board: &mut Board,
        opponent: &mut Player,
    ) -> ChessResult<Vec<ChessMove>> {
        let candidates = self.pseudo_legal_moves(board, opponent)?;
        let in_check = self.in_check(board, opponent)?;
        let exposed = self.king_rays(board);

        let mut legal = Vec::with_capacity(candidates.len());
        for mv in candidates {
            if in_check || exposed.contains(mv.start) {
                let unsafe_move =
                    self.with_move(&mv, board, opponent, |mover, board, opponent| {
                        mover.in_check(board, opponent)
                    })?;
                if unsafe_move {
                    trace!(%mv, "pruned: leaves own king in check");
                    continue;
                }
            }
            legal.push(mv);
        }

        if legal.is_empty() {
            return Err(ChessErrors::NoLegalMoves {
                color: self.color,
                in_check,
            });
        }
        Ok(legal)
    }

    pub(crate) fn slot_of(&self, index: Index) -> ChessResult<usize> {
        self.indices
            .iter()
            .position(|owned| *owned == index)
            .ok_or_else(|| {
                ChessErrors::accounting(index, format!("{} does not own this square", self.color))
            })
    }

    pub(crate) fn set_slot(&mut self, slot: usize, index: Index) {
        self.indices[slot] = index;
    }

    pub(crate) fn remove_slot(&mut self, slot: usize) -> Index {
        self.indices.remove(slot)
    }

    pub(crate) fn insert_slot(&mut self, slot: usize, index: Index) {
        self.indices.insert(slot, index);
    }

    pub(crate) fn set_king(&mut self, index: Index) {
        self.king = index;
    }
}

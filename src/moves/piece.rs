//! Piece entity and its move-capability dispatch.
//!
//! Pieces are a closed set of kinds sharing one struct. The three move
//! queries dispatch on `PieceKind` to the per-kind modules:
//!
//! - `possible_moves`: pseudo-legal destinations (check safety ignored).
//! - `attacking_moves`: squares threatened for capture; equal to
//!   `possible_moves` except for pawns (pushes never attack) and kings
//!   (no castling, no defended-square filtering).
//! - `defended_moves`: squares covered, friendly-occupied squares included.

use std::cell::OnceCell;

use crate::chess_errors::ChessResult;
use crate::game_state::board::Board;
use crate::game_state::chess_types::{Color, Index, PieceKind};
use crate::moves::{bishop_moves, king_moves, knight_moves, pawn_moves, queen_moves, rook_moves};
use crate::player::player::Player;

#[derive(Debug, Clone)]
pub struct Piece {
    kind: PieceKind,
    index: Index,
    color: Color,
    has_moved: bool,
    // Knight jump targets depend only on `index`; reset whenever it changes.
    knight_targets: OnceCell<Vec<Index>>,
}

/// Identity is the `(index, color, has_moved)` triple.
impl PartialEq for Piece {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && self.color == other.color && self.has_moved == other.has_moved
    }
}

impl Eq for Piece {}

impl Piece {
    pub fn new(kind: PieceKind, index: Index, color: Color) -> Self {
        Self {
            kind,
            index,
            color,
            has_moved: false,
            knight_targets: OnceCell::new(),
        }
    }

    /// Same piece with `has_moved` preset, for setting up mid-game positions.
    pub fn with_has_moved(mut self, has_moved: bool) -> Self {
        self.has_moved = has_moved;
        self
    }

    #[inline]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    #[inline]
    pub fn index(&self) -> Index {
        self.index
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    #[inline]
    pub fn has_moved(&self) -> bool {
        self.has_moved
    }

    #[inline]
    pub fn value(&self) -> Option<i32> {
        self.kind.value()
    }

    /// Relocates the piece as part of a move.
    pub(crate) fn move_to(&mut self, index: Index) {
        self.set_index(index);
        self.has_moved = true;
    }

    /// Puts the piece back during an undo.
    pub(crate) fn restore(&mut self, index: Index, has_moved: bool) {
        self.set_index(index);
        self.has_moved = has_moved;
    }

    pub(crate) fn set_index(&mut self, index: Index) {
        if self.index != index {
            self.index = index;
            self.knight_targets = OnceCell::new();
        }
    }

    pub(crate) fn knight_targets(&self) -> &[Index] {
        self.knight_targets
            .get_or_init(|| knight_moves::knight_targets(self.index))
    }

    pub fn possible_moves(&self, board: &Board, opponent: &Player) -> ChessResult<Vec<Index>> {
        Ok(match self.kind {
            PieceKind::Pawn => pawn_moves::pawn_moves(self, board),
            PieceKind::Knight => knight_moves::knight_moves(self, board),
            PieceKind::Bishop => bishop_moves::bishop_moves(self, board),
            PieceKind::Rook => rook_moves::rook_moves(self, board),
            PieceKind::Queen => queen_moves::queen_moves(self, board),
            PieceKind::King => king_moves::king_moves(self, board, opponent)?,
        })
    }

    pub fn attacking_moves(&self, board: &Board) -> Vec<Index> {
        match self.kind {
            PieceKind::Pawn => pawn_moves::pawn_attacks(self),
            PieceKind::Knight => knight_moves::knight_moves(self, board),
            PieceKind::Bishop => bishop_moves::bishop_moves(self, board),
            PieceKind::Rook => rook_moves::rook_moves(self, board),
            PieceKind::Queen => queen_moves::queen_moves(self, board),
            PieceKind::King => king_moves::king_attacks(self, board),
        }
    }

    pub fn defended_moves(&self, board: &Board) -> Vec<Index> {
        match self.kind {
            PieceKind::Pawn => pawn_moves::pawn_attacks(self),
            PieceKind::Knight => self.knight_targets().to_vec(),
            PieceKind::Bishop => bishop_moves::bishop_defends(self, board),
            PieceKind::Rook => rook_moves::rook_defends(self, board),
            PieceKind::Queen => queen_moves::queen_defends(self, board),
            PieceKind::King => king_moves::king_defends(self, board),
        }
    }
}

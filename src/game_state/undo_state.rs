//! Undo records produced by `Player::do_move` and consumed by `Player::undo_move`.

use crate::moves::piece::Piece;

/// Everything `Player::undo_move` needs to invert one `do_move`.
///
/// Produced by `do_move` and consumed exactly once by the matching
/// `undo_move`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndoState {
    /// `has_moved` of the moving piece before this ply.
    pub had_moved: bool,
    pub captured: Option<CapturedPiece>,
    /// The moving pawn was replaced by its promotion piece.
    pub promoted: bool,
    /// Paired rook relocation of a castling king move.
    pub castling_rook: Option<Box<UndoState>>,
}

/// A captured piece (still carrying its original index) and the slot it held
/// in the opponent's index list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedPiece {
    pub piece: Piece,
    pub slot: usize,
}

//! Errors used throughout the engine.
//!
//! `ChessErrors` is the single error type shared by board setup, move
//! application, legal move derivation and search. Variants fall in three
//! groups:
//!
//! - Recoverable input problems (`IllegalMove`, the parse variants). The UCI
//!   layer reports these and keeps running.
//! - Invariant violations (`InvalidColorPairing`, `AccountingError`). These
//!   mean a caller or the do/undo protocol is broken; callers must surface
//!   them and never swallow them.
//! - `NoLegalMoves`, raised when check pruning leaves nothing to play. The
//!   `in_check` payload lets higher layers tell the two end states apart.

use thiserror::Error;

use crate::game_state::chess_types::{Color, Index, PieceKind};

pub type ChessResult<T> = Result<T, ChessErrors>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChessErrors {
    /// An externally supplied move was rejected.
    #[error("illegal move {mv}: {reason}")]
    IllegalMove {
        mv: String,
        reason: IllegalMoveReason,
    },

    /// A check or attack query was given an "opponent" of the same color.
    #[error("invalid color pairing: both sides are {0}")]
    InvalidColorPairing(Color),

    /// A player's index list disagrees with the board.
    #[error("accounting error at {index}: {detail}")]
    AccountingError { index: Index, detail: String },

    /// Check pruning left zero legal moves for `color`.
    #[error("no legal moves for {color} (king in check: {in_check})")]
    NoLegalMoves { color: Color, in_check: bool },

    /// File or rank outside `0..8`.
    #[error("invalid file or rank ({0}, {1})")]
    InvalidFileOrRank(i16, i16),

    #[error("invalid algebraic string: {0:?}")]
    InvalidAlgebraicString(String),

    /// Board setup placed two pieces on one square.
    #[error("square {0} is already occupied")]
    SquareOccupied(Index),

    /// A player's initial piece list contains a piece of the other color.
    #[error("{expected} piece list contains a {found} piece at {index}")]
    PieceColorMismatch {
        expected: Color,
        found: Color,
        index: Index,
    },

    #[error("{0} has no king")]
    MissingKing(Color),

    #[error("{0} has more than one king")]
    MultipleKings(Color),
}

/// Why an externally supplied move was refused by verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IllegalMoveReason {
    #[error("no piece on the source square")]
    NoPieceAtSource,
    #[error("the source square holds an opponent piece")]
    OpponentPiece,
    #[error("declared {declared} but the source square holds a {found}")]
    WrongPieceKind { declared: PieceKind, found: PieceKind },
    #[error("the destination holds a piece of the mover's color")]
    OwnPieceAtDestination,
    #[error("a pawn reaching the last rank must name a promotion piece")]
    MissingPromotion,
    #[error("only a pawn reaching the last rank may promote")]
    UnexpectedPromotion,
    #[error("the destination is not among the piece's legal moves")]
    NotInLegalSet,
}

impl ChessErrors {
    pub(crate) fn illegal(mv: impl ToString, reason: IllegalMoveReason) -> Self {
        ChessErrors::IllegalMove {
            mv: mv.to_string(),
            reason,
        }
    }

    pub(crate) fn accounting(index: Index, detail: impl Into<String>) -> Self {
        ChessErrors::AccountingError {
            index,
            detail: detail.into(),
        }
    }

    /// True for errors that indicate a broken invariant rather than bad input.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ChessErrors::InvalidColorPairing(_) | ChessErrors::AccountingError { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{ChessErrors, IllegalMoveReason};
    use crate::game_state::chess_types::{Color, Index};

    #[test]
    fn illegal_move_message_names_move_and_reason() {
        let err = ChessErrors::illegal("e2e5", IllegalMoveReason::NotInLegalSet);
        assert_eq!(
            err.to_string(),
            "illegal move e2e5: the destination is not among the piece's legal moves"
        );
        assert!(!err.is_fatal());
    }

    #[test]
    fn accounting_and_pairing_errors_are_fatal() {
        let index = Index::new(4, 3).expect("e4 should be valid");
        assert!(ChessErrors::accounting(index, "empty square").is_fatal());
        assert!(ChessErrors::InvalidColorPairing(Color::White).is_fatal());
        assert!(!ChessErrors::NoLegalMoves {
            color: Color::Black,
            in_check: true
        }
        .is_fatal());
    }
}

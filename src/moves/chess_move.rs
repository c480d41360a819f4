//! Forward move command consumed by `Player::do_move`.
//!
//! A move names its source and destination squares, an optional promotion
//! piece and, for moves typed with a leading piece letter, the piece kind
//! the caller expects to find on the source square.

use std::fmt;

use crate::game_state::chess_types::{Index, PieceKind, Position};

/// Pieces a pawn may promote to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Promotion {
    Queen,
    Rook,
    Bishop,
    Knight,
}

impl Promotion {
    #[inline]
    pub const fn kind(self) -> PieceKind {
        match self {
            Promotion::Queen => PieceKind::Queen,
            Promotion::Rook => PieceKind::Rook,
            Promotion::Bishop => PieceKind::Bishop,
            Promotion::Knight => PieceKind::Knight,
        }
    }

    pub fn from_char(ch: char) -> Option<Self> {
        match ch.to_ascii_lowercase() {
            'q' => Some(Promotion::Queen),
            'r' => Some(Promotion::Rook),
            'b' => Some(Promotion::Bishop),
            'n' => Some(Promotion::Knight),
            _ => None,
        }
    }

    #[inline]
    pub const fn to_char(self) -> char {
        match self {
            Promotion::Queen => 'q',
            Promotion::Rook => 'r',
            Promotion::Bishop => 'b',
            Promotion::Knight => 'n',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChessMove {
    pub start: Index,
    pub end: Index,
    pub promote: Option<Promotion>,
    /// Declared kind of the moving piece, checked during verification.
    pub piece: Option<PieceKind>,
}

impl ChessMove {
    #[inline]
    pub const fn new(start: Index, end: Index) -> Self {
        Self {
            start,
            end,
            promote: None,
            piece: None,
        }
    }

    #[inline]
    pub const fn with_promotion(mut self, promote: Promotion) -> Self {
        self.promote = Some(promote);
        self
    }

    #[inline]
    pub const fn with_piece(mut self, piece: PieceKind) -> Self {
        self.piece = Some(piece);
        self
    }

    pub fn start_position(&self) -> Position {
        Position::from(self.start)
    }

    pub fn end_position(&self) -> Position {
        Position::from(self.end)
    }

    /// Same squares, ignoring promotion and declared piece.
    #[inline]
    pub fn same_squares(&self, other: &ChessMove) -> bool {
        self.start == other.start && self.end == other.end
    }
}

/// Compact coordinate text: `e2e4`, `e7e8q`.
impl fmt::Display for ChessMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.start, self.end)?;
        if let Some(promote) = self.promote {
            write!(f, "{}", promote.to_char())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{ChessMove, Promotion};
    use crate::game_state::chess_types::Index;

    #[test]
    fn display_uses_coordinate_text() {
        let e7 = Index::new(4, 6).expect("e7 should be valid");
        let e8 = Index::new(4, 7).expect("e8 should be valid");
        assert_eq!(ChessMove::new(e7, e8).to_string(), "e7e8");
        assert_eq!(
            ChessMove::new(e7, e8)
                .with_promotion(Promotion::Queen)
                .to_string(),
            "e7e8q"
        );
    }
}

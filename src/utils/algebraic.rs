//! Square conversions for algebraic coordinates (for example `e4`).

use crate::chess_errors::{ChessErrors, ChessResult};
use crate::game_state::chess_types::{File, Index};

/// Convert algebraic notation (for example: "e4") to a board index.
#[inline]
pub fn algebraic_to_index(square: &str) -> ChessResult<Index> {
    let mut chars = square.chars();
    let (Some(file), Some(rank), None) = (chars.next(), chars.next(), chars.next()) else {
        return Err(ChessErrors::InvalidAlgebraicString(square.to_owned()));
    };

    let file = File::from_char(file)
        .ok_or_else(|| ChessErrors::InvalidAlgebraicString(square.to_owned()))?;
    let rank = rank
        .to_digit(10)
        .filter(|rank| (1..=8).contains(rank))
        .ok_or_else(|| ChessErrors::InvalidAlgebraicString(square.to_owned()))?;

    Index::new(file.index(), rank as u8 - 1)
}

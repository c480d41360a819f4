//! Knight jumps.
//!
//! The eight L-shaped targets depend only on the knight's square, so the
//! piece caches them (`Piece::knight_targets`). Blocking never applies; only
//! friendly-occupied targets are removed from the move list.

use crate::game_state::board::Board;
use crate::game_state::chess_types::Index;
use crate::moves::piece::Piece;

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

pub fn knight_targets(from: Index) -> Vec<Index> {
    KNIGHT_OFFSETS
        .iter()
        .filter_map(|&(d_file, d_rank)| from.offset(d_file, d_rank))
        .collect()
}

pub fn knight_moves(knight: &Piece, board: &Board) -> Vec<Index> {
    knight
        .knight_targets()
        .iter()
        .copied()
        .filter(|target| board.color_at(*target) != Some(knight.color()))
        .collect()
}

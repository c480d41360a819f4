//! Bishop moves: full-length diagonal rays.

use crate::game_state::board::Board;
use crate::game_state::chess_types::Index;
use crate::moves::piece::Piece;
use crate::moves::ray_cast::{ray_cast, RayMode, DIAGONAL, FULL_RAY};

pub fn bishop_moves(bishop: &Piece, board: &Board) -> Vec<Index> {
    ray_cast(board, bishop.index(), bishop.color(), &DIAGONAL, FULL_RAY, RayMode::Attacked)
}

pub fn bishop_defends(bishop: &Piece, board: &Board) -> Vec<Index> {
    ray_cast(board, bishop.index(), bishop.color(), &DIAGONAL, FULL_RAY, RayMode::Defended)
}

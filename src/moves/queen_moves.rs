//! Queen moves: orthogonal and diagonal rays.

use crate::game_state::board::Board;
use crate::game_state::chess_types::Index;
use crate::moves::piece::Piece;
use crate::moves::ray_cast::{ray_cast, RayMode, ALL_DIRECTIONS, FULL_RAY};

pub fn queen_moves(queen: &Piece, board: &Board) -> Vec<Index> {
    ray_cast(board, queen.index(), queen.color(), &ALL_DIRECTIONS, FULL_RAY, RayMode::Attacked)
}

pub fn queen_defends(queen: &Piece, board: &Board) -> Vec<Index> {
    ray_cast(board, queen.index(), queen.color(), &ALL_DIRECTIONS, FULL_RAY, RayMode::Defended)
}

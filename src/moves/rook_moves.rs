//! Rook moves: full-length orthogonal rays.

use crate::game_state::board::Board;
use crate::game_state::chess_types::Index;
use crate::moves::piece::Piece;
use crate::moves::ray_cast::{ray_cast, RayMode, FULL_RAY, ORTHOGONAL};

pub fn rook_moves(rook: &Piece, board: &Board) -> Vec<Index> {
    ray_cast(board, rook.index(), rook.color(), &ORTHOGONAL, FULL_RAY, RayMode::Attacked)
}

pub fn rook_defends(rook: &Piece, board: &Board) -> Vec<Index> {
    ray_cast(board, rook.index(), rook.color(), &ORTHOGONAL, FULL_RAY, RayMode::Defended)
}

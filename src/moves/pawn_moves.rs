//! Pawn pushes and captures.
//!
//! A push needs an empty target; the double push also needs the pawn on its
//! starting rank with both squares ahead empty. Diagonal steps are moves only
//! onto an enemy piece, but are attacked/defended squares whether occupied or
//! not. En passant is not generated.

use crate::game_state::board::Board;
use crate::game_state::chess_types::Index;
use crate::moves::piece::Piece;

pub fn pawn_moves(pawn: &Piece, board: &Board) -> Vec<Index> {
    let color = pawn.color();
    let forward = color.forward();
    let mut moves = Vec::with_capacity(4);

    if let Some(one_step) = pawn.index().offset(0, forward) {
        if board.is_empty(one_step) {
            moves.push(one_step);

            if pawn.index().rank() == color.pawn_rank() {
                if let Some(two_step) = one_step.offset(0, forward) {
                    if board.is_empty(two_step) {
                        moves.push(two_step);
                    }
                }
            }
        }
    }

    for target in pawn_attacks(pawn) {
        if matches!(board.color_at(target), Some(occupant) if occupant != color) {
            moves.push(target);
        }
    }

    moves
}

/// Both forward diagonals that exist on the board.
pub fn pawn_attacks(pawn: &Piece) -> Vec<Index> {
    let forward = pawn.color().forward();
    [-1, 1]
        .into_iter()
        .filter_map(|d_file| pawn.index().offset(d_file, forward))
        .collect()
}

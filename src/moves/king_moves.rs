//! King steps and castling.
//!
//! A king's pseudo-legal moves are its one-square rays minus every square the
//! opponent defends, so it can neither walk next to the other king nor take a
//! protected piece. Castling is appended per side when the king and that
//! rook are unmoved, the king is not in check, the squares between them are
//! empty and the king's path is not defended by the opponent.

use crate::chess_errors::ChessResult;
use crate::game_state::board::Board;
use crate::game_state::chess_rules::{king_home, CastleSide};
use crate::game_state::chess_types::{Index, PieceKind, SquareSet};
use crate::moves::piece::Piece;
use crate::moves::ray_cast::{ray_cast, RayMode, ALL_DIRECTIONS};
use crate::player::legal_move_checks::ensure_opponent;
use crate::player::player::Player;

pub fn king_moves(king: &Piece, board: &Board, opponent: &Player) -> ChessResult<Vec<Index>> {
    ensure_opponent(king.color(), opponent)?;
    let defended = opponent.defended_squares(board)?;

    let mut moves = king_attacks(king, board)
        .into_iter()
        .filter(|target| !defended.contains(*target))
        .collect::<Vec<_>>();
    moves.extend(castling_moves(king, board, defended));
    Ok(moves)
}

/// One step in every direction, stopping short of friendly pieces.
pub fn king_attacks(king: &Piece, board: &Board) -> Vec<Index> {
    ray_cast(board, king.index(), king.color(), &ALL_DIRECTIONS, 1, RayMode::Attacked)
}

pub fn king_defends(king: &Piece, board: &Board) -> Vec<Index> {
    ray_cast(board, king.index(), king.color(), &ALL_DIRECTIONS, 1, RayMode::Defended)
}

fn castling_moves(king: &Piece, board: &Board, defended: SquareSet) -> Vec<Index> {
    let color = king.color();
    if king.has_moved() || king.index() != king_home(color) || defended.contains(king.index()) {
        return Vec::new();
    }

    CastleSide::BOTH
        .into_iter()
        .filter(|side| {
            let rook_ready = board.get(side.rook_start(color)).is_some_and(|rook| {
                rook.kind() == PieceKind::Rook && rook.color() == color && !rook.has_moved()
            });
            rook_ready
                && side.between(color).into_iter().all(|square| board.is_empty(square))
                && side
                    .king_path(color)
                    .into_iter()
                    .all(|square| !defended.contains(square))
        })
        .map(|side| side.king_destination(color))
        .collect()
}

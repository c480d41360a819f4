//! Shared ray walker for sliding pieces and the king.
//!
//! Each direction is walked square by square until the board edge or the
//! first occupied square. An enemy blocker is always included. A friendly
//! blocker is included only in `RayMode::Defended`; nothing behind any
//! blocker is reached.

use crate::game_state::board::Board;
use crate::game_state::chess_types::{Color, Index, SquareSet};

pub const ORTHOGONAL: [(i8, i8); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];
pub const DIAGONAL: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
pub const ALL_DIRECTIONS: [(i8, i8); 8] = [
    (0, 1),
    (0, -1),
    (1, 0),
    (-1, 0),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

/// Longest possible ray on an 8x8 board.
pub const FULL_RAY: u8 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RayMode {
    /// Stop at a friendly blocker without including it.
    Attacked,
    /// Include the first blocker whatever its color.
    Defended,
}

pub fn ray_cast(
    board: &Board,
    from: Index,
    color: Color,
    directions: &[(i8, i8)],
    max_depth: u8,
    mode: RayMode,
) -> Vec<Index> {
    let mut out = Vec::with_capacity(directions.len() * max_depth as usize);
    for &(d_file, d_rank) in directions {
        let mut current = from;
        for _ in 0..max_depth {
            let Some(next) = current.offset(d_file, d_rank) else {
                break;
            };
            match board.color_at(next) {
                None => out.push(next),
                Some(blocker) => {
                    if mode == RayMode::Defended || blocker != color {
                        out.push(next);
                    }
                    break;
                }
            }
            current = next;
        }
    }
    out
}

/// `ray_cast` collected straight into a `SquareSet`.
pub fn ray_set(
    board: &Board,
    from: Index,
    color: Color,
    directions: &[(i8, i8)],
    max_depth: u8,
    mode: RayMode,
) -> SquareSet {
    ray_cast(board, from, color, directions, max_depth, mode)
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{ray_cast, RayMode, FULL_RAY, ORTHOGONAL};
    use crate::game_state::board::Board;
    use crate::game_state::chess_types::{Color, PieceKind};
    use crate::moves::piece::Piece;
    use crate::utils::algebraic::algebraic_to_index as sq;

    #[test]
    fn friendly_blocker_is_included_only_when_defended() {
        let board = Board::from_pieces(&[
            Piece::new(PieceKind::Rook, sq("a1").expect("a1"), Color::White),
            Piece::new(PieceKind::Pawn, sq("a3").expect("a3"), Color::White),
            Piece::new(PieceKind::Pawn, sq("a4").expect("a4"), Color::Black),
        ])
        .expect("board should build");
        let a1 = sq("a1").expect("a1");

        let attacked = ray_cast(&board, a1, Color::White, &[(0, 1)], FULL_RAY, RayMode::Attacked);
        assert_eq!(attacked, vec![sq("a2").expect("a2")]);

        let defended = ray_cast(&board, a1, Color::White, &[(0, 1)], FULL_RAY, RayMode::Defended);
        assert_eq!(defended, vec![sq("a2").expect("a2"), sq("a3").expect("a3")]);
    }

    #[test]
    fn depth_one_limits_each_direction_to_one_step() {
        let board = Board::new();
        let e4 = sq("e4").expect("e4");
        let moves = ray_cast(&board, e4, Color::Black, &ORTHOGONAL, 1, RayMode::Attacked);
        assert_eq!(moves.len(), 4);
    }
}

//! King-safety queries: defended squares, check detection and the king rays
//! used to decide which candidate moves need a full do/undo verification.

use crate::chess_errors::{ChessErrors, ChessResult};
use crate::game_state::board::Board;
use crate::game_state::chess_types::{Color, SquareSet};
use crate::moves::ray_cast::{ray_set, RayMode, ALL_DIRECTIONS, FULL_RAY};
use crate::player::player::Player;

/// Rejects an "opponent" of the same color as `color`.
#[inline]
pub fn ensure_opponent(color: Color, opponent: &Player) -> ChessResult<()> {
    if opponent.color() == color {
        Err(ChessErrors::InvalidColorPairing(color))
    } else {
        Ok(())
    }
}

impl Player {
    /// Union of the defended squares of every piece this player owns.
    pub fn defended_squares(&self, board: &Board) -> ChessResult<SquareSet> {
        let mut defended = SquareSet::EMPTY;
        for &index in self.indices() {
            defended.extend(self.piece_at(board, index)?.defended_moves(board));
        }
        Ok(defended)
    }

    /// The opponent defends this player's king square.
    pub fn in_check(&self, board: &Board, opponent: &Player) -> ChessResult<bool> {
        ensure_opponent(self.color(), opponent)?;
        Ok(opponent.defended_squares(board)?.contains(self.king_index()))
    }

    /// Squares on the eight rays from the own king up to and including the
    /// first piece on each. Only a piece standing on one of these can uncover
    /// a check by moving.
    pub fn king_rays(&self, board: &Board) -> SquareSet {
        ray_set(
            board,
            self.king_index(),
            self.color(),
            &ALL_DIRECTIONS,
            FULL_RAY,
            RayMode::Defended,
        )
    }
}

#[cfg(test)]
mod tests {
    use crate::chess_errors::ChessErrors;
    use crate::game_state::board::Board;
    use crate::game_state::chess_types::{Color, Index, PieceKind};
    use crate::moves::piece::Piece;
    use crate::player::player::Player;
    use crate::utils::algebraic::algebraic_to_index;

    fn sq(text: &str) -> Index {
        algebraic_to_index(text).expect("test square should parse")
    }

    fn setup(pieces: &[(PieceKind, &str, Color)]) -> (Board, Player, Player) {
        let pieces = pieces
            .iter()
            .map(|(kind, square, color)| Piece::new(*kind, sq(square), *color))
            .collect::<Vec<_>>();
        let board = Board::from_pieces(&pieces).expect("board should build");
        let own = |color| pieces.iter().filter(|p| p.color() == color).cloned().collect::<Vec<_>>();
        (
            board,
            Player::new(Color::White, &own(Color::White)).expect("white should build"),
            Player::new(Color::Black, &own(Color::Black)).expect("black should build"),
        )
    }

    #[test]
    fn rook_on_open_file_gives_check() {
        let (board, white, black) = setup(&[
            (PieceKind::King, "e1", Color::White),
            (PieceKind::Rook, "e8", Color::Black),
            (PieceKind::King, "a8", Color::Black),
        ]);
        assert!(white.in_check(&board, &black).expect("check query"));
        assert!(!black.in_check(&board, &white).expect("check query"));
    }

    #[test]
    fn blocker_shields_the_king() {
        let (board, white, black) = setup(&[
            (PieceKind::King, "e1", Color::White),
            (PieceKind::Bishop, "e2", Color::White),
            (PieceKind::Rook, "e8", Color::Black),
            (PieceKind::King, "a8", Color::Black),
        ]);
        assert!(!white.in_check(&board, &black).expect("check query"));
    }

    #[test]
    fn same_color_opponent_is_rejected() {
        let (board, white, _black) = setup(&[
            (PieceKind::King, "e1", Color::White),
            (PieceKind::King, "e8", Color::Black),
        ]);
        assert_eq!(
            white.in_check(&board, &white),
            Err(ChessErrors::InvalidColorPairing(Color::White))
        );
    }

    #[test]
    fn king_rays_include_first_blocker_of_either_color() {
        let (board, white, _black) = setup(&[
            (PieceKind::King, "a1", Color::White),
            (PieceKind::Pawn, "a2", Color::White),
            (PieceKind::Pawn, "c3", Color::Black),
            (PieceKind::King, "h8", Color::Black),
        ]);
        let rays = white.king_rays(&board);
        assert!(rays.contains(sq("a2")));
        assert!(!rays.contains(sq("a3")));
        assert!(rays.contains(sq("b2")));
        assert!(rays.contains(sq("c3")));
        assert!(!rays.contains(sq("d4")));
        assert!(rays.contains(sq("h1")));
    }
}

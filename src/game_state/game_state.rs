//! Whole-game container.
//!
//! `GameState` owns the board, both players and the side to move, and keeps a
//! history of applied moves with their undo records so a line can be taken
//! back. Search and perft borrow its parts through `split_mut`.

use rand::Rng;

use crate::chess_errors::{ChessErrors, ChessResult};
use crate::game_state::board::Board;
use crate::game_state::chess_rules::standard_pieces;
use crate::game_state::chess_types::Color;
use crate::game_state::undo_state::UndoState;
use crate::moves::chess_move::ChessMove;
use crate::moves::piece::Piece;
use crate::player::player::Player;
use crate::search::minimax::BestMove;

/// Terminal state of the side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    /// `side` has no legal move; `in_check` tells whether its king is
    /// attacked.
    NoLegalMoves { side: Color, in_check: bool },
}

#[derive(Debug, Clone)]
pub struct GameState {
    board: Board,
    white: Player,
    black: Player,
    side_to_move: Color,
    history: Vec<(ChessMove, UndoState)>,
}

impl GameState {
    #[inline]
    pub fn new_game() -> Self {
        Self::from_pieces(&standard_pieces(), Color::White)
            .expect("standard piece list should always build")
    }

    /// Builds a position from an ordered piece list. Each player's index list
    /// keeps the relative order of its pieces in `pieces`.
    pub fn from_pieces(pieces: &[Piece], side_to_move: Color) -> ChessResult<Self> {
        let board = Board::from_pieces(pieces)?;
        let owned = |color: Color| {
            pieces
                .iter()
                .filter(|piece| piece.color() == color)
                .cloned()
                .collect::<Vec<_>>()
        };
        Ok(Self {
            board,
            white: Player::new(Color::White, &owned(Color::White))?,
            black: Player::new(Color::Black, &owned(Color::Black))?,
            side_to_move,
            history: Vec::new(),
        })
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    pub fn player(&self, color: Color) -> &Player {
        match color {
            Color::White => &self.white,
            Color::Black => &self.black,
        }
    }

    /// Moves applied since construction, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &ChessMove> {
        self.history.iter().map(|(mv, _)| mv)
    }

    /// Board, side to move, and its opponent, borrowed together.
    pub fn split_mut(&mut self) -> (&mut Board, &mut Player, &mut Player) {
        match self.side_to_move {
            Color::White => (&mut self.board, &mut self.white, &mut self.black),
            Color::Black => (&mut self.board, &mut self.black, &mut self.white),
        }
    }

    pub fn legal_moves(&mut self) -> ChessResult<Vec<ChessMove>> {
        let (board, mover, opponent) = self.split_mut();
        mover.get_possible_moves_index(board, opponent)
    }

    /// Verifies and applies `mv` for the side to move, then passes the turn.
    pub fn apply_move(&mut self, mv: &ChessMove) -> ChessResult<()> {
        let (board, mover, opponent) = self.split_mut();
        let record = mover.do_move(mv, board, opponent, true)?;
        self.history.push((*mv, record));
        self.side_to_move = self.side_to_move.opposite();
        Ok(())
    }

    /// Takes back the most recent move, returning it.
    pub fn undo_last(&mut self) -> ChessResult<Option<ChessMove>> {
        let Some((mv, record)) = self.history.pop() else {
            return Ok(None);
        };
        self.side_to_move = self.side_to_move.opposite();
        let (board, mover, opponent) = self.split_mut();
        mover.undo_move(&mv, board, opponent, record)?;
        Ok(Some(mv))
    }

    pub fn best_move<R: Rng + ?Sized>(&mut self, depth: u8, rng: &mut R) -> ChessResult<BestMove> {
        let (board, mover, opponent) = self.split_mut();
        mover.get_best_move(board, opponent, depth, rng)
    }

    /// `None` while the side to move has a legal move.
    pub fn outcome(&mut self) -> ChessResult<Option<GameOutcome>> {
        match self.legal_moves() {
            Ok(_) => Ok(None),
            Err(ChessErrors::NoLegalMoves { color, in_check }) => {
                Ok(Some(GameOutcome::NoLegalMoves {
                    side: color,
                    in_check,
                }))
            }
            Err(err) => Err(err),
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new_game()
    }
}

#[cfg(test)]
mod tests {
    use super::{GameOutcome, GameState};
    use crate::chess_errors::ChessErrors;
    use crate::game_state::chess_types::{Color, PieceKind};
    use crate::moves::piece::Piece;
    use crate::utils::algebraic::algebraic_to_index;
    use crate::utils::long_algebraic::parse_long_algebraic;

    fn piece(kind: PieceKind, text: &str, color: Color) -> Piece {
        Piece::new(kind, algebraic_to_index(text).expect("square"), color)
    }

    #[test]
    fn apply_and_undo_alternate_the_side_to_move() {
        let mut game = GameState::new_game();
        let before = game.board().snapshot();

        for text in ["e2e4", "e7e5", "g1f3"] {
            let mv = parse_long_algebraic(text).expect("move should parse");
            game.apply_move(&mv).expect("move should be legal");
        }
        assert_eq!(game.side_to_move(), Color::Black);
        assert_eq!(game.history().count(), 3);

        while game.undo_last().expect("undo should succeed").is_some() {}
        assert_eq!(game.side_to_move(), Color::White);
        assert_eq!(game.board().snapshot(), before);
    }

    #[test]
    fn moving_out_of_turn_is_rejected() {
        let mut game = GameState::new_game();
        let mv = parse_long_algebraic("e7e5").expect("move should parse");
        assert!(matches!(
            game.apply_move(&mv),
            Err(ChessErrors::IllegalMove { .. })
        ));
        assert_eq!(game.side_to_move(), Color::White);
    }

    #[test]
    fn fools_mate_reports_no_moves_in_check() {
        let mut game = GameState::new_game();
        for text in ["f2f3", "e7e5", "g2g4", "d8h4"] {
            let mv = parse_long_algebraic(text).expect("move should parse");
            game.apply_move(&mv).expect("move should be legal");
        }
        assert_eq!(
            game.outcome().expect("outcome query"),
            Some(GameOutcome::NoLegalMoves {
                side: Color::White,
                in_check: true
            })
        );
    }

    #[test]
    fn boxed_king_reports_no_moves_without_check() {
        let mut game = GameState::from_pieces(
            &[
                piece(PieceKind::King, "a1", Color::White),
                piece(PieceKind::Queen, "g6", Color::White),
                piece(PieceKind::King, "h8", Color::Black),
            ],
            Color::Black,
        )
        .expect("position should build");
        assert_eq!(
            game.outcome().expect("outcome query"),
            Some(GameOutcome::NoLegalMoves {
                side: Color::Black,
                in_check: false
            })
        );
        assert_eq!(GameState::new_game().outcome().expect("outcome query"), None);
    }
}

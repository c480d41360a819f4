//! Human-versus-engine game on a text terminal.
//!
//! The human types moves in the forgiving prompt notation accepted by
//! `parse_piece_prefixed`; the engine answers with a fixed-depth search. The
//! board is printed after every ply and the game stops when the side to move
//! has no legal move, the human resigns or input runs out.

use std::io::{self, BufRead, Write};

use tracing::{debug, info};

use crate::chess_errors::ChessErrors;
use crate::game_state::chess_types::Color;
use crate::game_state::game_state::{GameOutcome, GameState};
use crate::search::search_params::SearchParams;
use crate::utils::long_algebraic::parse_piece_prefixed;
use crate::utils::render_game_state::render_board;

/// Plays `game` to its end with `human` moving through `input`. Returns the
/// final position.
///
/// Unparseable or illegal moves are explained and the human is asked again.
/// Errors other than `IllegalMove` are returned as `io::Error`s wrapping the
/// `ChessErrors`.
pub fn run_prompt_game<R: BufRead, W: Write>(
    mut game: GameState,
    input: R,
    out: &mut W,
    human: Color,
    params: SearchParams,
) -> io::Result<GameState> {
    let mut rng = params.rng();
    let mut lines = input.lines();
    writeln!(out, "{}", render_board(game.board()))?;

    loop {
        if let Some(GameOutcome::NoLegalMoves { side, in_check }) =
            game.outcome().map_err(io::Error::other)?
        {
            let verdict = if in_check {
                "is in check: checkmate"
            } else {
                "is not in check: stalemate"
            };
            info!(%side, in_check, plies = game.history().count(), "game over");
            writeln!(out, "{side} has no legal moves and {verdict}")?;
            return Ok(game);
        }

        let side = game.side_to_move();
        if side == human {
            write!(out, "{side} to move> ")?;
            out.flush()?;
            let Some(line) = lines.next() else {
                writeln!(out)?;
                return Ok(game);
            };
            let line = line?;
            let text = line.trim();
            match text {
                "" => continue,
                "quit" | "resign" => {
                    writeln!(out, "{side} resigns")?;
                    return Ok(game);
                }
                _ => {}
            }

            let mv = match parse_piece_prefixed(text, side) {
                Ok(mv) => mv,
                Err(err) => {
                    writeln!(out, "{err}; try again")?;
                    continue;
                }
            };
            match game.apply_move(&mv) {
                Ok(()) => debug!(%side, %mv, "human move"),
                Err(err @ ChessErrors::IllegalMove { .. }) => {
                    writeln!(out, "{err}; try again")?;
                    continue;
                }
                Err(err) => return Err(io::Error::other(err)),
            }
        } else {
            let best = game
                .best_move(params.depth, &mut rng)
                .map_err(io::Error::other)?;
            let mover = game.board().get(best.mv.start).map(|piece| piece.kind());
            game.apply_move(&best.mv).map_err(io::Error::other)?;
            debug!(%side, mv = %best, value = best.value, nodes = best.nodes, "engine move");
            match mover {
                Some(kind) => writeln!(
                    out,
                    "{side} plays {kind} {} to {}",
                    best.mv.start_position(),
                    best.mv.end_position()
                )?,
                None => writeln!(out, "{side} plays {best}")?,
            }
        }

        writeln!(out, "{}", render_board(game.board()))?;
    }
}

//! Leaf counting over the legal move tree, used to cross-check the move
//! generator and the do/undo protocol.

use crate::chess_errors::{ChessErrors, ChessResult};
use crate::game_state::board::Board;
use crate::game_state::game_state::GameState;
use crate::player::player::Player;

/// Number of leaf positions `depth` plies below the current position. A
/// side without legal moves contributes no leaves.
pub fn perft(game_state: &mut GameState, depth: u8) -> ChessResult<u64> {
    let (board, mover, opponent) = game_state.split_mut();
    perft_recurse(mover, board, opponent, depth)
}

fn perft_recurse(mover: &mut Player, board: &mut Board, opponent: &mut Player, depth: u8) -> ChessResult<u64> {
    if depth == 0 {
        return Ok(1);
    }

    let moves = match mover.get_possible_moves_index(board, opponent) {
        Ok(moves) => moves,
        Err(ChessErrors::NoLegalMoves { .. }) => return Ok(0),
        Err(err) => return Err(err),
    };
    if depth == 1 {
        return Ok(moves.len() as u64);
    }

    let mut nodes = 0;
    for mv in &moves {
        nodes += mover.with_move(mv, board, opponent, |me, board, them| {
            perft_recurse(them, board, me, depth - 1)
        })?;
    }
    Ok(nodes)
}

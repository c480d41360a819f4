//! Plain fixed-depth minimax over material, with node counting.
//!
//! Values are always from the maximizing (root) player's point of view. The
//! tree is walked in place through `Player::with_move`, so the board and
//! both players are back in their original state after every call, even
//! when the search fails.

use std::fmt;

use rand::seq::IndexedRandom;
use rand::Rng;
use tracing::debug;

use crate::chess_errors::{ChessErrors, ChessResult};
use crate::game_state::board::Board;
use crate::moves::chess_move::ChessMove;
use crate::player::player::Player;

/// Base magnitude of a checkmate value. Mates found with more depth left
/// (closer to the root) score further from zero.
pub const MATE_SCORE: i32 = 30_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchResult {
    pub value: i32,
    pub nodes: u64,
}

/// Root move chosen by `Player::get_best_move`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BestMove {
    pub mv: ChessMove,
    pub value: i32,
    pub nodes: u64,
    /// Root moves that tied on `value`; `mv` is one of them.
    pub candidates: usize,
}

impl fmt::Display for BestMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.mv)
    }
}

impl Player {
    /// Material balance as seen by the maximizing player.
    fn leaf_value(&self, board: &Board, opponent: &Player, maximizing: bool) -> ChessResult<i32> {
        let own = self.material(board)?;
        let theirs = opponent.material(board)?;
        Ok(if maximizing { own - theirs } else { theirs - own })
    }

    /// Searches `depth` plies with this player to move.
    ///
    /// Depth 0 is a leaf: the material difference and one node. Otherwise
    /// every legal move is tried and the children's values are folded into a
    /// max (`maximizing`) or min; nodes are one plus the children's total.
    /// A ply with no legal moves below the leaves is terminal: 0 for
    /// stalemate, `MATE_SCORE + depth` against the mated side for checkmate.
    pub fn minimax(
        &mut self,
        board: &mut Board,
        opponent: &mut Player,
        depth: u8,
        maximizing: bool,
    ) -> ChessResult<SearchResult> {
        if depth == 0 {
            return Ok(SearchResult {
                value: self.leaf_value(board, opponent, maximizing)?,
                nodes: 1,
            });
        }

        let moves = match self.get_possible_moves_index(board, opponent) {
            Ok(moves) => moves,
            Err(ChessErrors::NoLegalMoves { in_check, .. }) => {
                let mated = MATE_SCORE + i32::from(depth);
                let value = match (in_check, maximizing) {
                    (false, _) => 0,
                    (true, true) => -mated,
                    (true, false) => mated,
                };
                return Ok(SearchResult { value, nodes: 1 });
            }
            Err(err) => return Err(err),
        };
        let mut best = if maximizing { i32::MIN } else { i32::MAX };
        let mut nodes = 1;
        for mv in &moves {
            let child = self.with_move(mv, board, opponent, |me, board, them| {
                them.minimax(board, me, depth - 1, !maximizing)
            })?;
            nodes += child.nodes;
            best = if maximizing {
                best.max(child.value)
            } else {
                best.min(child.value)
            };
        }
        Ok(SearchResult { value: best, nodes })
    }

    /// Scores every legal root move with a `depth`-ply search (the root move
    /// counts as the first ply; depth 0 is treated as 1) and picks uniformly
    /// at random among the moves that share the best value exactly.
    pub fn get_best_move<R: Rng + ?Sized>(
        &mut self,
        board: &mut Board,
        opponent: &mut Player,
        depth: u8,
        rng: &mut R,
    ) -> ChessResult<BestMove> {
        let remaining = depth.max(1) - 1;
        let moves = self.get_possible_moves_index(board, opponent)?;

        let mut best_value = i32::MIN;
        let mut ties: Vec<ChessMove> = Vec::new();
        let mut nodes = 1;
        for mv in moves {
            let child = self.with_move(&mv, board, opponent, |me, board, them| {
                them.minimax(board, me, remaining, false)
            })?;
            nodes += child.nodes;
            if child.value > best_value {
                best_value = child.value;
                ties.clear();
                ties.push(mv);
            } else if child.value == best_value {
                ties.push(mv);
            }
        }

        let mv = *ties.choose(rng).ok_or(ChessErrors::NoLegalMoves {
            color: self.color(),
            in_check: false,
        })?;
        debug!(
            color = %self.color(),
            depth,
            nodes,
            value = best_value,
            candidates = ties.len(),
            best = %mv,
            "search complete"
        );
        Ok(BestMove {
            mv,
            value: best_value,
            nodes,
            candidates: ties.len(),
        })
    }
}

//! Crate root module declarations for the Ply Chess engine.
//!
//! Exposes the rules engine (board, pieces, players and the reversible move
//! protocol), the fixed-depth minimax search, notation helpers and the UCI
//! front-end so the binary, benches and integration tests share one set of
//! module paths.

pub mod chess_errors;

pub mod game_state {
    pub mod board;
    pub mod chess_rules;
    pub mod chess_types;
    pub mod game_state;
    pub mod undo_state;
}

pub mod moves {
    pub mod bishop_moves;
    pub mod chess_move;
    pub mod king_moves;
    pub mod knight_moves;
    pub mod pawn_moves;
    pub mod piece;
    pub mod queen_moves;
    pub mod ray_cast;
    pub mod rook_moves;
}

pub mod player {
    pub mod legal_move_apply;
    pub mod legal_move_checks;
    pub mod player;
}

pub mod search {
    pub mod minimax;
    pub mod perft;
    pub mod search_params;
}

pub mod uci {
    pub mod uci_top;
}

pub mod utils {
    pub mod algebraic;
    pub mod long_algebraic;
    pub mod prompt_game;
    pub mod render_game_state;
}

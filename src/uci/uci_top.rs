//! UCI protocol front-end and command loop.
//!
//! Parses UCI commands, maintains the current position, runs fixed-depth
//! minimax on `go` and emits protocol-compliant output. Bad input is reported
//! as an `info string` line and the session goes on; a fatal engine error
//! (see `ChessErrors::is_fatal`) is reported the same way and then ends the
//! loop with an `io::Error` wrapping it.

use std::io::{self, BufRead, Write};

use rand::rngs::StdRng;
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::chess_errors::ChessErrors;
use crate::game_state::game_state::GameState;
use crate::search::minimax::MATE_SCORE;
use crate::search::search_params::{SearchParams, MAX_DEPTH, MIN_DEPTH};
use crate::utils::long_algebraic::parse_long_algebraic;

const UCI_ENGINE_NAME: &str = "Ply Chess";
const UCI_ENGINE_AUTHOR: &str = "the ply_chess authors";
const CENTIPAWNS_PER_POINT: i32 = 100;

pub fn run_stdio_loop(params: SearchParams) -> io::Result<()> {
    let stdin = io::stdin();
    run_uci_loop(stdin.lock(), &mut io::stdout(), params)
}

/// Feeds `input` line by line to a fresh session until `quit`, end of input
/// or a fatal error.
pub fn run_uci_loop<R: BufRead, W: Write>(
    input: R,
    out: &mut W,
    params: SearchParams,
) -> io::Result<()> {
    UciState::new(params).run(input, out)
}

#[derive(Debug, Error)]
enum PositionError {
    #[error("{0}")]
    Unsupported(String),
    #[error(transparent)]
    Chess(#[from] ChessErrors),
}

/// Fields of a `go` command. Only `depth` bounds the search; the clock
/// fields are kept for logging.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoParams {
    pub depth: Option<u8>,
    pub wtime_ms: Option<u64>,
    pub btime_ms: Option<u64>,
    pub winc_ms: Option<u64>,
    pub binc_ms: Option<u64>,
    pub movestogo: Option<u16>,
    pub movetime_ms: Option<u64>,
    pub ponder: bool,
    pub infinite: bool,
}

struct UciState {
    game_state: GameState,
    params: SearchParams,
    rng: StdRng,
    /// A `go ponder` or `go infinite` waiting for `ponderhit` or `stop`.
    pending_go: Option<GoParams>,
    last_command: Option<String>,
    debug_mode: bool,
}

impl UciState {
    fn new(params: SearchParams) -> Self {
        Self {
            game_state: GameState::new_game(),
            rng: params.rng(),
            params,
            pending_go: None,
            last_command: None,
            debug_mode: false,
        }
    }

    fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> io::Result<()> {
        for line in input.lines() {
            let line = line?;
            let handled = self.handle_command(&line, out);
            out.flush()?;
            if handled? {
                break;
            }
        }
        Ok(())
    }

    fn handle_command(&mut self, line: &str, out: &mut impl Write) -> io::Result<bool> {
        let trimmed = line.trim();
        let mut parts = trimmed.split_whitespace();
        let Some(cmd) = parts.next() else {
            return Ok(false);
        };
        debug!(command = trimmed, previous = ?self.last_command, "uci command");

        match cmd {
            "uci" => {
                writeln!(out, "id name {}", UCI_ENGINE_NAME)?;
                writeln!(out, "id author {}", UCI_ENGINE_AUTHOR)?;
                writeln!(
                    out,
                    "option name Depth type spin default {} min {} max {}",
                    self.params.depth, MIN_DEPTH, MAX_DEPTH
                )?;
                writeln!(
                    out,
                    "option name Seed type spin default {} min 0 max {}",
                    self.params.seed.unwrap_or(0),
                    i64::MAX
                )?;
                writeln!(out, "uciok")?;
            }
            "isready" => {
                writeln!(out, "readyok")?;
            }
            "setoption" => {
                if let Err(err) = self.handle_setoption(trimmed) {
                    writeln!(out, "info string setoption error: {}", err)?;
                }
            }
            "ucinewgame" => {
                self.game_state = GameState::new_game();
                self.rng = self.params.rng();
                self.pending_go = None;
            }
            "position" => match self.handle_position(trimmed) {
                Ok(()) => {}
                Err(PositionError::Chess(err)) if err.is_fatal() => {
                    writeln!(out, "info string position error: {}", err)?;
                    return Err(fatal(err));
                }
                Err(err) => writeln!(out, "info string position error: {}", err)?,
            },
            "go" => {
                let go = parse_go_params(trimmed);
                debug!(?go, "go received");
                if go.ponder || go.infinite {
                    self.pending_go = Some(go);
                } else {
                    self.search_and_report(&go, out)?;
                }
            }
            "stop" | "ponderhit" => {
                if let Some(go) = self.pending_go.take() {
                    self.search_and_report(&go, out)?;
                }
            }
            "debug" => {
                let mode = parts.next().unwrap_or_default();
                self.debug_mode = mode.eq_ignore_ascii_case("on");
            }
            "register" => {
                // Registration is not required by this engine.
            }
            "quit" => {
                return Ok(true);
            }
            other => {
                warn!(command = other, "ignoring unknown uci command");
            }
        }

        self.last_command = Some(cmd.to_owned());
        Ok(false)
    }

    fn handle_setoption(&mut self, line: &str) -> Result<(), String> {
        let mut name_tokens = Vec::<&str>::new();
        let mut value_tokens = Vec::<&str>::new();
        let mut mode = "";

        for tok in line.split_whitespace().skip(1) {
            match tok {
                "name" => mode = "name",
                "value" => mode = "value",
                _ if mode == "name" => name_tokens.push(tok),
                _ if mode == "value" => value_tokens.push(tok),
                _ => {}
            }
        }

        let name = name_tokens.join(" ");
        let value = value_tokens.join(" ");

        if name.eq_ignore_ascii_case("Depth") {
            let parsed = value
                .parse::<u8>()
                .map_err(|_| format!("invalid Depth value '{}'", value))?;
            self.params = self.params.with_depth(parsed);
        } else if name.eq_ignore_ascii_case("Seed") {
            let parsed = value
                .parse::<u64>()
                .map_err(|_| format!("invalid Seed value '{}'", value))?;
            self.params = self.params.with_seed((parsed != 0).then_some(parsed));
            self.rng = self.params.rng();
        } else {
            return Err(format!("unknown option '{}'", name));
        }

        Ok(())
    }

    fn handle_position(&mut self, line: &str) -> Result<(), PositionError> {
        let mut tokens = line.split_whitespace().skip(1).peekable();
        let unsupported = |msg: &str| PositionError::Unsupported(msg.to_owned());

        let mut base_state = match tokens.next() {
            Some("startpos") => GameState::new_game(),
            Some("fen") => {
                return Err(unsupported("FEN setup is not supported; use 'position startpos'"))
            }
            Some(other) => {
                return Err(unsupported(&format!("unsupported position token '{}'", other)))
            }
            None => return Err(unsupported("incomplete position command")),
        };

        if tokens.peek().copied() == Some("moves") {
            let _ = tokens.next();
            for lan in tokens {
                let mv = parse_long_algebraic(lan)?;
                base_state.apply_move(&mv)?;
            }
        }

        self.game_state = base_state;
        Ok(())
    }

    fn search_and_report(&mut self, go: &GoParams, out: &mut impl Write) -> io::Result<()> {
        let depth = go
            .depth
            .unwrap_or(self.params.depth)
            .clamp(MIN_DEPTH, MAX_DEPTH);

        match self.game_state.best_move(depth, &mut self.rng) {
            Ok(best) => {
                writeln!(
                    out,
                    "info depth {} nodes {} score {}",
                    depth,
                    best.nodes,
                    uci_score(best.value, depth)
                )?;
                if self.debug_mode {
                    writeln!(out, "info string tied candidates {}", best.candidates)?;
                }
                writeln!(out, "bestmove {}", best)?;
            }
            Err(ChessErrors::NoLegalMoves { in_check, .. }) => {
                debug!(in_check, "no legal root move");
                writeln!(out, "bestmove 0000")?;
            }
            Err(err) if err.is_fatal() => {
                error!(%err, "search hit a broken invariant");
                writeln!(out, "info string go error: {}", err)?;
                return Err(fatal(err));
            }
            Err(err) => {
                warn!(%err, "search failed");
                writeln!(out, "info string go error: {}", err)?;
                writeln!(out, "bestmove 0000")?;
            }
        }
        Ok(())
    }
}

fn fatal(err: ChessErrors) -> io::Error {
    io::Error::other(err)
}

/// `cp <centipawns>`, or `mate <moves>` for a forced mate found within
/// `depth` plies (negative when the engine is the side being mated).
fn uci_score(value: i32, depth: u8) -> String {
    if value.abs() <= MATE_SCORE {
        return format!("cp {}", value * CENTIPAWNS_PER_POINT);
    }
    let left = value.abs() - MATE_SCORE;
    let plies = i32::from(depth) - left;
    let moves = (plies + 1) / 2;
    format!("mate {}", if value > 0 { moves } else { -moves })
}

fn parse_go_params(line: &str) -> GoParams {
    let mut params = GoParams::default();
    let tokens = line.split_whitespace().collect::<Vec<_>>();
    let mut i = 0usize;
    while i < tokens.len() {
        match tokens[i] {
            "depth" => {
                i += 1;
                params.depth = tokens.get(i).and_then(|x| x.parse::<u8>().ok());
            }
            "movetime" => {
                i += 1;
                params.movetime_ms = tokens.get(i).and_then(|x| x.parse::<u64>().ok());
            }
            "ponder" => {
                params.ponder = true;
            }
            "infinite" => {
                params.infinite = true;
            }
            "wtime" => {
                i += 1;
                params.wtime_ms = tokens.get(i).and_then(|x| x.parse::<u64>().ok());
            }
            "btime" => {
                i += 1;
                params.btime_ms = tokens.get(i).and_then(|x| x.parse::<u64>().ok());
            }
            "winc" => {
                i += 1;
                params.winc_ms = tokens.get(i).and_then(|x| x.parse::<u64>().ok());
            }
            "binc" => {
                i += 1;
                params.binc_ms = tokens.get(i).and_then(|x| x.parse::<u64>().ok());
            }
            "movestogo" => {
                i += 1;
                params.movestogo = tokens.get(i).and_then(|x| x.parse::<u16>().ok());
            }
            _ => {}
        }
        i += 1;
    }
    params
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::{parse_go_params, run_uci_loop, uci_score, UciState};
    use crate::chess_errors::ChessErrors;
    use crate::game_state::chess_types::{Color, PieceKind};
    use crate::game_state::game_state::GameState;
    use crate::moves::piece::Piece;
    use crate::search::search_params::SearchParams;
    use crate::utils::algebraic::algebraic_to_index;

    fn seeded() -> UciState {
        UciState::new(SearchParams::default().with_seed(Some(3)))
    }

    fn run(state: &mut UciState, lines: &[&str]) -> String {
        let mut out = Vec::new();
        for line in lines {
            state
                .handle_command(line, &mut out)
                .expect("writing to a Vec should not fail");
        }
        String::from_utf8(out).expect("output should be utf-8")
    }

    fn piece(kind: PieceKind, text: &str, color: Color) -> Piece {
        Piece::new(kind, algebraic_to_index(text).expect("square"), color)
    }

    #[test]
    fn handshake_lists_options() {
        let mut state = seeded();
        let out = run(&mut state, &["uci", "isready"]);
        assert!(out.starts_with("id name Ply Chess\n"));
        assert!(out.contains("option name Depth type spin default 2 min 1 max 6"));
        assert!(out.contains("uciok\nreadyok\n"));
    }

    #[test]
    fn position_startpos_with_moves_updates_state() {
        let mut state = seeded();
        state
            .handle_position("position startpos moves e2e4 e7e5 g1f3")
            .expect("position command should parse");
        assert_eq!(state.game_state.side_to_move(), Color::Black);
        assert_eq!(state.game_state.history().count(), 3);
    }

    #[test]
    fn bad_position_commands_report_and_keep_state() {
        let mut state = seeded();
        let out = run(
            &mut state,
            &[
                "position startpos moves e2e4",
                "position startpos moves e2e5",
                "position fen 8/8/8/8/8/8/4P3/4K3 w - - 0 1",
            ],
        );
        assert_eq!(out.matches("info string position error").count(), 2);
        assert_eq!(state.game_state.side_to_move(), Color::Black);
    }

    #[test]
    fn go_reports_info_then_bestmove() {
        let mut state = seeded();
        let out = run(&mut state, &["position startpos", "go depth 1"]);
        let lines = out.lines().collect::<Vec<_>>();
        assert_eq!(lines[0], "info depth 1 nodes 21 score cp 0");
        assert!(lines[1].starts_with("bestmove "));
        assert_eq!(lines[1].len(), "bestmove e2e4".len());
    }

    #[test]
    fn ponder_defers_bestmove_until_ponderhit() {
        let mut state = seeded();
        let out = run(&mut state, &["go ponder depth 1"]);
        assert!(out.is_empty());
        assert!(state.pending_go.is_some());

        let out = run(&mut state, &["ponderhit"]);
        assert!(out.contains("bestmove "));
        assert!(state.pending_go.is_none());

        let out = run(&mut state, &["stop"]);
        assert!(out.is_empty());
    }

    #[test]
    fn setoption_depth_and_seed() {
        let mut state = seeded();
        state
            .handle_setoption("setoption name Depth value 4")
            .expect("depth should parse");
        assert_eq!(state.params.depth, 4);

        state
            .handle_setoption("setoption name Seed value 0")
            .expect("seed should parse");
        assert_eq!(state.params.seed, None);

        assert!(state.handle_setoption("setoption name Depth value deep").is_err());
        assert!(state.handle_setoption("setoption name Hash value 64").is_err());
    }

    #[test]
    fn root_without_moves_answers_null_move() {
        let mut state = seeded();
        state.game_state = GameState::from_pieces(
            &[
                piece(PieceKind::King, "a1", Color::White),
                piece(PieceKind::Queen, "g6", Color::White),
                piece(PieceKind::King, "h8", Color::Black),
            ],
            Color::Black,
        )
        .expect("position should build");
        let out = run(&mut state, &["go depth 2"]);
        assert_eq!(out, "bestmove 0000\n");
    }

    #[test]
    fn mate_in_one_is_found_and_reported_as_mate() {
        for seed in [1, 3, 7, 19, 42] {
            let mut state = UciState::new(SearchParams::default().with_seed(Some(seed)));
            state.game_state = GameState::from_pieces(
                &[
                    piece(PieceKind::King, "g1", Color::White),
                    piece(PieceKind::Rook, "a1", Color::White),
                    piece(PieceKind::King, "g8", Color::Black),
                    piece(PieceKind::Pawn, "f7", Color::Black),
                    piece(PieceKind::Pawn, "g7", Color::Black),
                    piece(PieceKind::Pawn, "h7", Color::Black),
                ],
                Color::White,
            )
            .expect("position should build");
            let out = run(&mut state, &["go depth 2"]);
            assert!(out.contains(" score mate 1\n"), "seed {seed}: {out}");
            assert!(out.ends_with("bestmove a1a8\n"), "seed {seed}: {out}");
        }
    }

    #[test]
    fn stalemating_line_is_scored_not_abandoned() {
        // Qf5-g6 stalemates black; the search must still pick a real move.
        let mut state = seeded();
        state.game_state = GameState::from_pieces(
            &[
                piece(PieceKind::King, "a1", Color::White),
                piece(PieceKind::Queen, "f5", Color::White),
                piece(PieceKind::King, "h8", Color::Black),
            ],
            Color::White,
        )
        .expect("position should build");
        let out = run(&mut state, &["go depth 2"]);
        assert!(!out.contains("info string"));
        assert!(out.contains("score cp 900"));
        assert!(!out.contains("bestmove 0000"));
    }

    #[test]
    fn mate_scores_count_moves_from_the_root() {
        assert_eq!(uci_score(3, 4), "cp 300");
        assert_eq!(uci_score(30_001, 2), "mate 1");
        assert_eq!(uci_score(30_001, 4), "mate 2");
        assert_eq!(uci_score(-30_002, 4), "mate -1");
    }

    #[test]
    fn corrupted_board_stops_the_loop() {
        let mut state = seeded();
        let (board, _, _) = state.game_state.split_mut();
        board
            .clear(algebraic_to_index("b1").expect("square"))
            .expect("b1 holds a knight");

        let mut out = Vec::new();
        let err = state
            .run(Cursor::new("go depth 1\nisready\n"), &mut out)
            .expect_err("accounting error must surface");
        let inner = err
            .get_ref()
            .and_then(|inner| inner.downcast_ref::<ChessErrors>())
            .expect("io error should wrap the chess error");
        assert!(inner.is_fatal());
        assert!(matches!(inner, ChessErrors::AccountingError { .. }));
        let out = String::from_utf8(out).expect("output should be utf-8");
        assert!(out.starts_with("info string go error: "));
        assert!(!out.contains("bestmove"));
        assert!(!out.contains("readyok"));
    }

    #[test]
    fn loop_ends_on_quit_and_keeps_going_after_bad_input() {
        let input = Cursor::new("position startpos moves e2e5\nisready\nquit\nisready\n");
        let mut out = Vec::new();
        run_uci_loop(input, &mut out, SearchParams::default().with_seed(Some(3)))
            .expect("loop should finish cleanly");
        let out = String::from_utf8(out).expect("output should be utf-8");
        assert!(out.starts_with("info string position error"));
        assert_eq!(out.matches("readyok").count(), 1);
    }

    #[test]
    fn parse_go_params_keeps_clock_fields() {
        let params = parse_go_params("go wtime 120000 btime 60000 winc 1000 binc 1000 movestogo 24");
        assert_eq!(params.depth, None);
        assert_eq!(params.movetime_ms, None);
        assert_eq!(params.wtime_ms, Some(120_000));
        assert_eq!(params.btime_ms, Some(60_000));
        assert_eq!(params.winc_ms, Some(1_000));
        assert_eq!(params.binc_ms, Some(1_000));
        assert_eq!(params.movestogo, Some(24));
    }

    #[test]
    fn unknown_commands_are_ignored() {
        let mut state = seeded();
        let out = run(&mut state, &["xyzzy", "isready"]);
        assert_eq!(out, "readyok\n");
        assert_eq!(state.last_command.as_deref(), Some("isready"));
    }
}

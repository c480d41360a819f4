//! Ply Chess: a chess rules engine with a fixed-depth minimax player.
//!
//! ## Usage
//!
//! - `ply_chess` or `ply_chess uci` - speak UCI on stdin/stdout
//! - `ply_chess play [--black]` - play against the engine in the terminal
//! - `ply_chess board` - print the starting position
//! - `ply_chess bench --depth 3` - time one search from the starting position

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use ply_chess::game_state::chess_types::Color;
use ply_chess::game_state::game_state::GameState;
use ply_chess::search::search_params::{SearchParams, DEFAULT_DEPTH, MAX_DEPTH, MIN_DEPTH};
use ply_chess::uci::uci_top::run_stdio_loop;
use ply_chess::utils::prompt_game::run_prompt_game;
use ply_chess::utils::render_game_state::render_board;

/// Ply Chess: fixed-depth minimax chess engine
#[derive(Parser)]
#[command(name = "ply_chess")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Search depth in plies
    #[arg(long, default_value_t = DEFAULT_DEPTH,
          value_parser = clap::value_parser!(u8).range(MIN_DEPTH as i64..=MAX_DEPTH as i64))]
    depth: u8,

    /// Seed for tie-breaking between equal moves (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Default log filter, overridden by RUST_LOG
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the UCI protocol loop for use with chess GUIs
    Uci,
    /// Play a game against the engine, typing moves like `e2e4`, `Ng1f3` or `0-0`
    Play {
        /// Take the black pieces
        #[arg(long)]
        black: bool,
    },
    /// Print the starting position
    Board,
    /// Run one search from the starting position and report nodes and time
    Bench {
        #[arg(long, default_value_t = 3,
              value_parser = clap::value_parser!(u8).range(MIN_DEPTH as i64..=MAX_DEPTH as i64))]
        depth: u8,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level, cli.log_file.as_deref())?;

    let params = SearchParams::default()
        .with_depth(cli.depth)
        .with_seed(cli.seed);

    match cli.command {
        Some(Commands::Uci) | None => {
            run_stdio_loop(params).context("UCI loop failed")?;
        }
        Some(Commands::Play { black }) => {
            let human = if black { Color::Black } else { Color::White };
            let stdin = io::stdin();
            run_prompt_game(GameState::new_game(), stdin.lock(), &mut io::stdout(), human, params)
                .context("prompt game failed")?;
        }
        Some(Commands::Board) => {
            println!("{}", render_board(GameState::new_game().board()));
        }
        Some(Commands::Bench { depth }) => run_bench(params.with_depth(depth))?,
    }
    Ok(())
}

fn init_logging(level: &str, log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .with_context(|| format!("invalid log filter '{level}'"))?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("cannot create log file {}", path.display()))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        None => builder.with_writer(io::stderr).init(),
    }
    Ok(())
}

fn run_bench(params: SearchParams) -> Result<()> {
    let mut game = GameState::new_game();
    let mut rng = params.rng();

    let started = Instant::now();
    let best = game
        .best_move(params.depth, &mut rng)
        .context("bench search failed")?;
    let elapsed = started.elapsed();

    info!(depth = params.depth, nodes = best.nodes, ?elapsed, "bench finished");
    println!(
        "depth {} nodes {} time {} ms bestmove {}",
        params.depth,
        best.nodes,
        elapsed.as_millis(),
        best
    );
    Ok(())
}

//! Command-line configuration
//!
//! [`Cli`] is the raw `clap` surface; [`SessionConfig`] is the validated,
//! immutable view a session is built from.
//!
//! # Flags
//!
//! | flag | meaning | default |
//! |------|---------|---------|
//! | `-l, --load <FEN>` | start from this position | autosave or fresh |
//! | `-b, --board` | print the board before each human move | off |
//! | `-t, --time <SECONDS>` | engine time ceiling per move | 1 |
//! | `-d, --depth <PLIES>` | engine depth ceiling per move | 20 |
//! | `-p, --play <0\|1\|2>` | 0 random, 1 white, 2 black | 0 |
//! | `-e, --engine <PATH>` | UCI engine binary | `./stockfish` |

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use uci_engine::SearchLimit;

use crate::game::roles::PlayAs;

/// Longest accepted per-move time ceiling
const MAX_SECONDS: f64 = 24.0 * 60.0 * 60.0;

/// A cli chess game to play against stockfish
#[derive(Parser, Debug, Clone)]
#[command(name = "clichess", version, about)]
pub struct Cli {
    /// Load a chess board from a FEN string; copy one in game with the `save` command
    #[arg(short, long, value_name = "FEN")]
    pub load: Option<String>,

    /// Display the board before each of your moves; alternatively use the `board` command in game
    #[arg(short, long)]
    pub board: bool,

    /// Time limit in seconds for each engine move
    #[arg(short, long, value_name = "SECONDS", default_value = "1", value_parser = parse_seconds)]
    pub time: Duration,

    /// Depth limit for each engine move
    #[arg(
        short,
        long,
        value_name = "PLIES",
        default_value_t = SearchLimit::DEFAULT_DEPTH,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub depth: u32,

    /// Colour to play as. 0: random, 1: white, 2: black
    #[arg(short, long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=2))]
    pub play: u8,

    /// Path to the UCI engine binary
    #[arg(short, long, value_name = "PATH", default_value = "./stockfish")]
    pub engine: PathBuf,
}

impl Cli {
    /// Validated per-session settings
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            load: self.load.clone(),
            show_board: self.board,
            limit: SearchLimit::new(self.time, self.depth),
            play_as: PlayAs::try_from(self.play).unwrap_or_default(),
        }
    }
}

/// Settings fixed for the lifetime of one session
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionConfig {
    /// FEN to start from instead of the autosave or the initial position
    pub load: Option<String>,
    /// Print the board before every human move
    pub show_board: bool,
    /// Bounds for every engine query
    pub limit: SearchLimit,
    /// Colour preference for a fresh game
    pub play_as: PlayAs,
}

fn parse_seconds(text: &str) -> Result<Duration, String> {
    let seconds: f64 = text
        .trim()
        .parse()
        .map_err(|_| format!("`{text}` is not a number of seconds"))?;
    if !seconds.is_finite() || seconds <= 0.0 {
        return Err("time limit must be a positive number of seconds".to_string());
    }
    if seconds > MAX_SECONDS {
        return Err(format!("time limit must be at most {MAX_SECONDS} seconds"));
    }
    Duration::try_from_secs_f64(seconds).map_err(|e| e.to_string())
}

//! Error types for game module
//!
//! The only error that ends a game early is an [`Interrupt`]. It is a plain
//! value returned with `?` from any point of the turn loop and handled in
//! one place by the session, which autosaves and shuts the engine down.
//! Invalid or illegal human moves never become errors here; they are
//! reported inline and the prompt repeats.

use uci_engine::EngineError;

use super::position::PositionError;

/// Reasons a session stops before the game is over
#[derive(Debug, thiserror::Error)]
pub enum Interrupt {
    /// The player typed `quit`
    #[error("quit requested")]
    Quit,

    /// Standard input was closed
    #[error("input stream closed")]
    EndOfInput,

    /// A termination signal (Ctrl-C) arrived
    #[error("termination signal received")]
    Signal,

    /// A board string given to `load`, `--load` or the recovery file did not parse
    #[error("bad board string: {0}")]
    BadBoardString(#[source] PositionError),

    /// The engine crashed or broke protocol
    #[error("engine failure: {0}")]
    Engine(#[from] EngineError),
}

/// Result type alias for anything the turn loop can be interrupted out of
pub type GameResult<T> = Result<T, Interrupt>;

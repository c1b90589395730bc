//! Error types for the engine client

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while launching or talking to a UCI engine
#[derive(Debug, Error)]
pub enum EngineError {
    /// The engine binary does not exist at the configured path
    #[error("engine binary not found at {}", path.display())]
    NotFound { path: PathBuf },

    /// The engine binary exists but could not be started
    #[error("failed to launch engine at {}: {source}", path.display())]
    Launch {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Reading from or writing to the engine pipes failed
    #[error("engine I/O error: {0}")]
    Io(#[from] io::Error),

    /// The engine process closed its output (crashed or exited)
    #[error("engine exited unexpectedly")]
    Disconnected,

    /// The engine did not answer a command before its deadline
    #[error("engine did not answer `{command}` in time")]
    Timeout { command: String },

    /// The engine answered with something that is not valid UCI
    #[error("engine protocol error: {message}")]
    Protocol { message: String },

    /// The client was used after [`crate::UciEngine::shutdown`]
    #[error("engine has already been shut down")]
    ShutDown,
}

impl EngineError {
    /// Whether this error means the engine could never be started
    ///
    /// Launch failures abort the program before any game state exists;
    /// every other variant happens mid-game.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, EngineError::NotFound { .. } | EngineError::Launch { .. })
    }
}

/// Result type alias for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

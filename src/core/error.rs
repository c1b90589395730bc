//! Error types for core module
//!
//! Provides custom error types for application infrastructure: launching the
//! engine, setting up the console, and reading or writing the recovery file.

use std::path::PathBuf;

use thiserror::Error;
use uci_engine::EngineError;

/// Errors that can occur in the core module
#[derive(Error, Debug)]
pub enum CoreError {
    /// The engine binary is missing or failed to start
    #[error("Engine unavailable at {}: {source}", path.display())]
    EngineUnavailable {
        path: PathBuf,
        #[source]
        source: EngineError,
    },

    /// The engine started but failed the UCI handshake
    #[error("Engine at {} failed to start: {source}", path.display())]
    EngineHandshake {
        path: PathBuf,
        #[source]
        source: EngineError,
    },

    /// Recovery file I/O error
    #[error("Autosave I/O error: {0}")]
    AutosaveIo(#[from] std::io::Error),

    /// Console threads could not be started
    #[error("Console setup failed: {message}")]
    ConsoleSetup { message: String },
}

impl CoreError {
    /// Classify an error from launching the engine at `path`
    ///
    /// A missing or unlaunchable binary is [`CoreError::EngineUnavailable`];
    /// anything that went wrong after the process started is
    /// [`CoreError::EngineHandshake`].
    pub fn engine_launch(path: impl Into<PathBuf>, source: EngineError) -> Self {
        let path = path.into();
        if source.is_unavailable() {
            CoreError::EngineUnavailable { path, source }
        } else {
            CoreError::EngineHandshake { path, source }
        }
    }
}

/// Result type alias for core operations
pub type CoreResult<T> = Result<T, CoreError>;

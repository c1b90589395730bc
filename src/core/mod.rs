//! Core module - Application infrastructure around a chess session
//!
//! Everything a session needs from the outside world, kept apart from the
//! game logic in [`crate::game`].
//!
//! # Modules
//!
//! - [`config`] - `clap` command line and the validated [`SessionConfig`]
//! - [`console`] - line input, prompts and Ctrl-C as channel events
//! - [`autosave`] - the single-record recovery file
//! - [`error`] - [`CoreError`] for setup and persistence failures
//!
//! # Usage Example
//!
//! ```rust,ignore
//! use clichess::core::{Autosave, Cli, Console};
//!
//! let config = Cli::parse().session_config();
//! let console = Console::stdio()?;
//! let autosave = Autosave::default_location();
//! ```

pub mod autosave;
pub mod config;
pub mod console;
pub mod error;

// Re-export commonly used items
pub use autosave::{Autosave, RecoveryStore, AUTOSAVE_FILE};
pub use config::{Cli, SessionConfig};
pub use console::Console;
pub use error::{CoreError, CoreResult};

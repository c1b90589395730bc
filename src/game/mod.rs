//! Chess game logic module
//!
//! One human against one engine, turn by turn, on a single authoritative
//! position.
//!
//! # Module Organization
//!
//! - `position` - shakmaty-backed position: FEN, move parsing, outcome, rendering
//! - `roles` - which colour the human and the engine play
//! - `commands` - the `board` / `save` / `load` / `quit` vocabulary
//! - `engine` - [`SearchEngine`], the seam over the UCI process
//! - `session` - [`Session`], the turn loop with its single exit point
//! - `error` - [`Interrupt`], the value that ends a session early
//!
//! # Ownership
//!
//! The [`Session`] owns the position and passes it explicitly to the
//! command interpreter, the engine and the autosave. Nothing is global.

pub mod commands;
pub mod engine;
pub mod error;
pub mod position;
pub mod roles;
pub mod session;

// Re-export the session and its collaborators (main entry points)
pub use engine::SearchEngine;
pub use error::{GameResult, Interrupt};
pub use position::{GamePosition, Outcome, PositionError, START_FEN};
pub use roles::{PlayAs, Role, Roles};
pub use session::{Session, SessionOutcome};

//! clichess - a command-line chess session against a UCI search engine
//!
//! - [`core`] - infrastructure: CLI configuration, console, autosave, errors
//! - [`game`] - the game itself: position, roles, commands, engine seam, session

pub mod core;
pub mod game;

//! UCI engine client - lifecycle and protocol of one external search engine
//!
//! Launches a UCI-speaking engine binary (Stockfish by default) as a child
//! process and exposes a single blocking search request bounded by a
//! [`SearchLimit`]. The game side never talks to the process directly.
//!
//! # Lifecycle
//!
//! ```text
//! spawn ──► handshake (uci/uciok, isready/readyok, ucinewgame)
//!   │
//!   ├──► go (position fen … / go movetime … depth …) ──► bestmove   (repeat)
//!   │
//!   └──► shutdown (quit, grace period, kill) ── exactly once, Drop included
//! ```
//!
//! # Threading
//!
//! The engine's stdout is drained by a dedicated reader thread into a
//! `crossbeam-channel` channel, so every read carries a deadline and a
//! hung engine surfaces as [`EngineError::Timeout`] instead of blocking
//! the caller forever.
//!
//! # Usage
//!
//! ```rust,ignore
//! use uci_engine::{SearchLimit, UciEngine};
//!
//! let mut engine = UciEngine::spawn("./stockfish")?;
//! let best = engine.go(
//!     "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
//!     SearchLimit::default(),
//! )?;
//! println!("engine plays {best}");
//! engine.shutdown();
//! ```

mod error;
mod limit;
mod process;

pub use error::{EngineError, EngineResult};
pub use limit::SearchLimit;
pub use process::UciEngine;

//! Engine seam between the session and the move-search process
//!
//! The session only needs "best move for this position within this limit"
//! and "stop for good". [`SearchEngine`] captures exactly that, so tests can
//! drive whole games with a scripted engine while the binary plugs in
//! [`UciEngine`].

use shakmaty::Move;
use tracing::debug;
use uci_engine::{EngineError, SearchLimit, UciEngine};

use super::position::GamePosition;

/// A move-search collaborator owned by one session
pub trait SearchEngine {
    /// Best move for the side to move in `position`, bounded by `limit`
    ///
    /// Blocks until exactly one move is available or the engine fails.
    fn query(&mut self, position: &GamePosition, limit: SearchLimit) -> Result<Move, EngineError>;

    /// Terminate the engine; further calls are no-ops
    fn shutdown(&mut self);
}

impl SearchEngine for UciEngine {
    fn query(&mut self, position: &GamePosition, limit: SearchLimit) -> Result<Move, EngineError> {
        let best = self.go(&position.to_fen(), limit)?;
        debug!("[ENGINE] bestmove {best}");
        position
            .resolve(&best)
            .map_err(|err| EngineError::Protocol {
                message: format!("engine suggested an unplayable move: {err}"),
            })
    }

    fn shutdown(&mut self) {
        if UciEngine::shutdown(self) {
            debug!("[ENGINE] stopped {}", self.path().display());
        }
    }
}

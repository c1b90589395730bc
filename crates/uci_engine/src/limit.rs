//! Per-query search bounds

use std::time::Duration;

/// Time and depth ceiling for one engine query
///
/// Both bounds are sent together (`go movetime … depth …`); the engine
/// stops at whichever it reaches first. Configured once per session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchLimit {
    /// Wall-clock ceiling for the search
    pub time: Duration,
    /// Maximum search depth in plies
    pub depth: u32,
}

impl SearchLimit {
    /// Default per-move time ceiling (one second)
    pub const DEFAULT_TIME: Duration = Duration::from_secs(1);

    /// Default per-move depth ceiling
    pub const DEFAULT_DEPTH: u32 = 20;

    pub fn new(time: Duration, depth: u32) -> Self {
        Self { time, depth }
    }

    /// Time ceiling in whole milliseconds, never below one
    pub fn movetime_millis(&self) -> u64 {
        u64::try_from(self.time.as_millis())
            .unwrap_or(u64::MAX)
            .max(1)
    }

    /// The UCI `go` command for this limit
    pub fn go_command(&self) -> String {
        format!("go movetime {} depth {}", self.movetime_millis(), self.depth)
    }
}

impl Default for SearchLimit {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TIME, Self::DEFAULT_DEPTH)
    }
}

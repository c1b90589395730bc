//! Shared helpers for session integration tests

#![allow(dead_code)]

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use clichess::core::{Autosave, Console, SessionConfig};
use clichess::game::{GamePosition, PlayAs, SearchEngine, Session};
use shakmaty::Move;
use uci_engine::{EngineError, SearchLimit};

/// Engine that answers from a fixed list of UCI moves
///
/// Once the list is exhausted every query fails with
/// [`EngineError::Disconnected`], like a crashed process.
#[derive(Debug, Default)]
pub struct ScriptedEngine {
    replies: VecDeque<String>,
    /// FEN of every position the engine was asked about
    pub queried: Vec<String>,
    /// Limits passed with every query
    pub limits: Vec<SearchLimit>,
    /// Number of `shutdown` calls
    pub shutdowns: usize,
}

impl ScriptedEngine {
    pub fn new(replies: &[&str]) -> Self {
        Self {
            replies: replies.iter().map(|r| r.to_string()).collect(),
            ..Self::default()
        }
    }
}

impl SearchEngine for ScriptedEngine {
    fn query(&mut self, position: &GamePosition, limit: SearchLimit) -> Result<Move, EngineError> {
        self.queried.push(position.to_fen());
        self.limits.push(limit);
        let reply = self.replies.pop_front().ok_or(EngineError::Disconnected)?;
        position
            .parse_move(&reply)
            .map_err(|err| EngineError::Protocol {
                message: err.to_string(),
            })
    }

    fn shutdown(&mut self) {
        self.shutdowns += 1;
    }
}

pub type TestSession = Session<ScriptedEngine, Vec<u8>>;

/// Recovery file path unique to this test process and call
pub fn temp_autosave(tag: &str) -> Autosave {
    static COUNTER: AtomicUsize = AtomicUsize::new(0);
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    let path: PathBuf = std::env::temp_dir().join(format!(
        "clichess-it-{tag}-{}-{n}.chess",
        std::process::id()
    ));
    let _ = std::fs::remove_file(&path);
    Autosave::at(path)
}

pub fn config(play_as: PlayAs) -> SessionConfig {
    SessionConfig {
        play_as,
        ..SessionConfig::default()
    }
}

pub fn session(
    config: SessionConfig,
    input: &[&str],
    replies: &[&str],
    autosave: Autosave,
) -> TestSession {
    let console = Console::scripted(input.iter().copied(), Vec::new());
    Session::new(config, ScriptedEngine::new(replies), console, autosave)
}

/// Everything the session printed so far
pub fn output(session: &TestSession) -> String {
    String::from_utf8_lossy(session.console().output()).into_owned()
}

/// Trimmed contents of the recovery file, if any
pub fn saved_fen(autosave: &Autosave) -> Option<String> {
    autosave
        .store()
        .read()
        .unwrap()
        .map(|text| text.trim().to_string())
}

pub fn position_after(moves: &[&str]) -> GamePosition {
    let mut position = GamePosition::new();
    for text in moves {
        let mv = position.parse_move(text).unwrap();
        position.play(&mv).unwrap();
    }
    position
}

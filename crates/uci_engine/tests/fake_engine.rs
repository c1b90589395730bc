//! Integration tests for the UCI client against scripted engines
//!
//! Each test writes a tiny POSIX shell engine into a scratch directory and
//! drives it through the real subprocess path: spawn, handshake, search,
//! shutdown. A real Stockfish run is available behind `--ignored`.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use uci_engine::{EngineError, SearchLimit, UciEngine};

const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Engine that only answers the default `go` line with a move
const WELL_BEHAVED: &str = r#"#!/bin/sh
while IFS= read -r line; do
  case "$line" in
    uci) echo "id name FakeFish 1.0"; echo "option name Hash type spin default 16 min 1 max 1024"; echo "uciok" ;;
    isready) echo "readyok" ;;
    "go movetime 1000 depth 20") echo "info depth 1 score cp 30 pv e2e4"; echo "bestmove e2e4 ponder e7e5" ;;
    go*) echo "bestmove (none)" ;;
    quit) exit 0 ;;
  esac
done
"#;

/// Engine that crashes as soon as it is asked to search
const CRASHES_ON_GO: &str = r#"#!/bin/sh
while IFS= read -r line; do
  case "$line" in
    uci) echo "uciok" ;;
    isready) echo "readyok" ;;
    go*) exit 3 ;;
  esac
done
"#;

/// Write `script` as an executable file in a per-test scratch directory
fn write_engine(test_name: &str, script: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "uci-engine-test-{}-{}",
        std::process::id(),
        test_name
    ));
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join("engine.sh");
    fs::write(&path, script).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// Spawn, retrying while the freshly written script is still "text file busy"
///
/// Another test thread forking between our write and exec can briefly hold
/// the file open for writing (ETXTBSY).
fn spawn_engine(path: &Path) -> Result<UciEngine, EngineError> {
    for _ in 0..20 {
        match UciEngine::spawn(path) {
            Err(EngineError::Launch { source, .. }) if source.raw_os_error() == Some(26) => {
                std::thread::sleep(Duration::from_millis(25));
            }
            other => return other,
        }
    }
    UciEngine::spawn(path)
}

#[test]
fn test_handshake_reads_engine_name() {
    let path = write_engine("handshake", WELL_BEHAVED);
    let mut engine = spawn_engine(&path).unwrap();

    assert_eq!(engine.name(), Some("FakeFish 1.0"));
    assert!(engine.is_running());
    assert!(engine.shutdown());
}

#[test]
fn test_go_sends_time_and_depth_bounds() {
    //! The fake engine only produces a move for the exact
    //! `go movetime 1000 depth 20` line, so a move coming back proves the
    //! bounds went out as one request.
    let path = write_engine("go-bounds", WELL_BEHAVED);
    let mut engine = spawn_engine(&path).unwrap();

    let best = engine.go(START_FEN, SearchLimit::default()).unwrap();
    assert_eq!(best.to_string(), "e2e4");

    // A different limit gets `bestmove (none)` from the fake engine.
    let other = engine.go(START_FEN, SearchLimit::new(Duration::from_millis(300), 4));
    assert!(matches!(other, Err(EngineError::Protocol { .. })));

    engine.shutdown();
}

#[test]
fn test_shutdown_is_idempotent() {
    let path = write_engine("shutdown", WELL_BEHAVED);
    let mut engine = spawn_engine(&path).unwrap();

    assert!(engine.shutdown());
    assert!(!engine.shutdown());
    assert!(!engine.is_running());
    assert!(matches!(
        engine.go(START_FEN, SearchLimit::default()),
        Err(EngineError::ShutDown)
    ));
}

#[test]
fn test_engine_crash_is_reported() {
    let path = write_engine("crash", CRASHES_ON_GO);
    let mut engine = spawn_engine(&path).unwrap();

    let result = engine.go(START_FEN, SearchLimit::default());
    assert!(matches!(result, Err(EngineError::Disconnected)));

    // The process is gone, but the handle still needs reaping exactly once.
    assert!(engine.shutdown());
    assert!(!engine.shutdown());
}

#[test]
fn test_non_uci_binary_fails_handshake() {
    let result = UciEngine::spawn("true");
    assert!(matches!(result, Err(EngineError::Disconnected)));
}

#[test]
#[ignore = "needs a Stockfish binary; set STOCKFISH_PATH"]
fn test_real_stockfish_opening_move() {
    let path = std::env::var("STOCKFISH_PATH").unwrap_or_else(|_| "./stockfish".to_string());
    let mut engine = UciEngine::spawn(&path).unwrap();

    let best = engine.go(START_FEN, SearchLimit::default()).unwrap();
    let text = best.to_string();
    assert_eq!(text.len(), 4, "opening move should be a plain from-to move: {text}");
    assert!(text.ends_with('3') || text.ends_with('4'), "unexpected opening move {text}");

    engine.shutdown();
}

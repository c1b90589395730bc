//! Engine subprocess handle and UCI conversation

use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError};
use log::{debug, info, trace, warn};
use shakmaty::uci::UciMove;

use crate::error::{EngineError, EngineResult};
use crate::limit::SearchLimit;

/// How long the engine may take to finish the `uci`/`isready` handshake
const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);

/// Slack granted on top of the search time ceiling before `stop` is sent,
/// and again after `stop` before the query fails
const SEARCH_GRACE: Duration = Duration::from_secs(5);

/// How long `quit` is given to end the process before it is killed
const QUIT_GRACE: Duration = Duration::from_millis(500);

/// Live pipes and process of a started engine
struct EngineProcess {
    child: Child,
    stdin: BufWriter<ChildStdin>,
    lines: Receiver<String>,
}

/// Client for one external UCI engine process
///
/// Owns the child process for its whole life. [`UciEngine::shutdown`]
/// terminates it; calling it again (or dropping the client afterwards) is
/// a no-op, so the process is stopped exactly once.
///
/// # Example
///
/// ```rust,ignore
/// let mut engine = UciEngine::spawn("./stockfish")?;
/// let reply = engine.go(fen, SearchLimit::new(Duration::from_secs(1), 20))?;
/// assert!(engine.shutdown());
/// assert!(!engine.shutdown());
/// ```
pub struct UciEngine {
    path: PathBuf,
    name: Option<String>,
    process: Option<EngineProcess>,
}

impl UciEngine {
    /// Launch the engine at `path` and complete the UCI handshake
    ///
    /// A missing binary is reported as [`EngineError::NotFound`] so callers
    /// can tell "not installed" apart from a broken engine.
    pub fn spawn(path: impl AsRef<Path>) -> EngineResult<Self> {
        let path = path.as_ref().to_path_buf();
        info!("[ENGINE] launching {}", path.display());

        let mut child = Command::new(&path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| match source.kind() {
                io::ErrorKind::NotFound => EngineError::NotFound { path: path.clone() },
                _ => EngineError::Launch {
                    path: path.clone(),
                    source,
                },
            })?;

        let (Some(stdin), Some(stdout)) = (child.stdin.take(), child.stdout.take()) else {
            reap(&mut child);
            return Err(EngineError::Protocol {
                message: "engine pipes were not captured".to_string(),
            });
        };

        let (tx, lines) = crossbeam_channel::unbounded();
        let reader = thread::Builder::new()
            .name("uci-engine-reader".to_string())
            .spawn(move || {
                for line in BufReader::new(stdout).lines() {
                    let Ok(line) = line else { break };
                    if tx.send(line).is_err() {
                        break;
                    }
                }
            });
        if let Err(err) = reader {
            reap(&mut child);
            return Err(err.into());
        }

        // From here on Drop owns cleanup if the handshake fails.
        let mut engine = Self {
            path,
            name: None,
            process: Some(EngineProcess {
                child,
                stdin: BufWriter::new(stdin),
                lines,
            }),
        };
        engine.handshake()?;
        info!(
            "[ENGINE] ready: {}",
            engine.name.as_deref().unwrap_or("unnamed engine")
        );
        Ok(engine)
    }

    /// Path the engine was launched from
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Name reported by the engine in its `id name` line, if any
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Whether the process is still owned by this client
    pub fn is_running(&self) -> bool {
        self.process.is_some()
    }

    /// Search `fen` within `limit` and return the engine's best move
    ///
    /// Blocks until exactly one `bestmove` arrives. The move is parsed as
    /// UCI text only; checking it against the position is the caller's job.
    pub fn go(&mut self, fen: &str, limit: SearchLimit) -> EngineResult<UciMove> {
        self.sync_ready()?;
        self.send(&format!("position fen {fen}"))?;

        let go = limit.go_command();
        self.send(&go)?;

        let mut deadline = Instant::now() + limit.time + SEARCH_GRACE;
        let mut stop_sent = false;
        loop {
            match self.recv_until(&go, deadline) {
                Ok(line) => {
                    let mut tokens = line.split_whitespace();
                    if tokens.next() == Some("bestmove") {
                        return parse_best_move(tokens.next());
                    }
                }
                Err(EngineError::Timeout { .. }) if !stop_sent => {
                    warn!("[ENGINE] search overran {:?}, sending stop", limit.time);
                    self.send("stop")?;
                    stop_sent = true;
                    deadline = Instant::now() + SEARCH_GRACE;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Terminate the engine process
    ///
    /// Sends `quit`, waits briefly, then kills whatever is left. Returns
    /// `true` if this call stopped a process and `false` if there was none
    /// (already shut down).
    pub fn shutdown(&mut self) -> bool {
        let Some(mut process) = self.process.take() else {
            return false;
        };

        let pid = process.child.id();
        if let Err(err) = writeln!(process.stdin, "quit").and_then(|()| process.stdin.flush()) {
            debug!("[ENGINE] could not send quit to {pid}: {err}");
        }

        let deadline = Instant::now() + QUIT_GRACE;
        while Instant::now() < deadline {
            match process.child.try_wait() {
                Ok(Some(status)) => {
                    info!("[ENGINE] process {pid} exited with {status}");
                    return true;
                }
                Ok(None) => thread::sleep(Duration::from_millis(10)),
                Err(err) => {
                    warn!("[ENGINE] could not poll process {pid}: {err}");
                    break;
                }
            }
        }

        warn!("[ENGINE] process {pid} ignored quit, killing it");
        reap(&mut process.child);
        true
    }

    fn handshake(&mut self) -> EngineResult<()> {
        self.send("uci")?;
        let deadline = Instant::now() + HANDSHAKE_TIMEOUT;
        loop {
            let line = self.recv_until("uci", deadline)?;
            let line = line.trim();
            if let Some(name) = line.strip_prefix("id name ") {
                self.name = Some(name.to_string());
            } else if line == "uciok" {
                break;
            }
        }
        self.sync_ready()?;
        self.send("ucinewgame")?;
        self.sync_ready()
    }

    fn sync_ready(&mut self) -> EngineResult<()> {
        self.send("isready")?;
        let deadline = Instant::now() + HANDSHAKE_TIMEOUT;
        while self.recv_until("isready", deadline)?.trim() != "readyok" {}
        Ok(())
    }

    fn send(&mut self, command: &str) -> EngineResult<()> {
        let process = self.process.as_mut().ok_or(EngineError::ShutDown)?;
        debug!("[ENGINE] > {command}");
        writeln!(process.stdin, "{command}")
            .and_then(|()| process.stdin.flush())
            .map_err(|err| match err.kind() {
                io::ErrorKind::BrokenPipe => EngineError::Disconnected,
                _ => EngineError::Io(err),
            })
    }

    fn recv_until(&self, command: &str, deadline: Instant) -> EngineResult<String> {
        let process = self.process.as_ref().ok_or(EngineError::ShutDown)?;
        let remaining = deadline.saturating_duration_since(Instant::now());
        match process.lines.recv_timeout(remaining) {
            Ok(line) => {
                trace!("[ENGINE] < {line}");
                Ok(line)
            }
            Err(RecvTimeoutError::Timeout) => Err(EngineError::Timeout {
                command: command.to_string(),
            }),
            Err(RecvTimeoutError::Disconnected) => Err(EngineError::Disconnected),
        }
    }
}

impl Drop for UciEngine {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn reap(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

/// Interpret the token after `bestmove`
fn parse_best_move(token: Option<&str>) -> EngineResult<UciMove> {
    let text = token.ok_or_else(|| EngineError::Protocol {
        message: "bestmove without a move".to_string(),
    })?;
    if text == "(none)" || text == "0000" {
        return Err(EngineError::Protocol {
            message: "engine reported no move to play".to_string(),
        });
    }
    text.parse::<UciMove>().map_err(|_| EngineError::Protocol {
        message: format!("unparseable bestmove `{text}`"),
    })
}

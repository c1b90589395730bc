//! Crash-safe autosave
//!
//! When a session is interrupted the current position is written to a
//! small recovery file as a single FEN line. On the next start the file is
//! read and removed right away, so a position is offered for resumption at
//! most once no matter what happens afterwards.
//!
//! # File format
//!
//! Plain text, one FEN string, optionally followed by a newline. A record
//! equal to the initial position is not worth offering and is discarded
//! silently.
//!
//! # Usage
//!
//! ```ignore
//! let autosave = Autosave::default_location();
//! autosave.save(&position)?;
//! // ...next run
//! if let Some(position) = autosave.maybe_load(&mut console)? { /* resume */ }
//! ```

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::core::console::Console;
use crate::core::error::CoreResult;
use crate::game::commands::load_board;
use crate::game::error::GameResult;
use crate::game::position::{GamePosition, START_FEN};

/// Recovery file name, relative to the working directory
pub const AUTOSAVE_FILE: &str = "autosave.chess";

/// Question asked when a recovery record is found
pub const LOAD_PROMPT: &str = "Do you want to load the last game? (y/N) ";

/// Raw storage for the recovery record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecoveryStore {
    path: PathBuf,
}

impl RecoveryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Contents of the record, `None` when there is no record
    pub fn read(&self) -> io::Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(Some(text)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Replace the record with `text`
    ///
    /// The text goes to a sibling temp file first and is renamed over the
    /// record, so a crash mid-write never leaves a truncated FEN behind.
    pub fn write(&self, text: &str) -> io::Result<()> {
        let tmp = self.path.with_extension("chess.tmp");
        {
            let mut file = fs::File::create(&tmp)?;
            file.write_all(text.as_bytes())?;
            file.write_all(b"\n")?;
            file.sync_all()?;
        }
        fs::rename(&tmp, &self.path)
    }

    /// Delete the record; a missing record is not an error
    pub fn remove(&self) -> io::Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err),
        }
    }
}

/// Save and offer-to-resume logic on top of a [`RecoveryStore`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Autosave {
    store: RecoveryStore,
}

impl Autosave {
    pub fn new(store: RecoveryStore) -> Self {
        Self { store }
    }

    /// Autosave backed by the file at `path`
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self::new(RecoveryStore::new(path))
    }

    /// Autosave backed by [`AUTOSAVE_FILE`] in the working directory
    pub fn default_location() -> Self {
        Self::at(AUTOSAVE_FILE)
    }

    pub fn store(&self) -> &RecoveryStore {
        &self.store
    }

    /// Overwrite the recovery record with `position`
    pub fn save(&self, position: &GamePosition) -> CoreResult<()> {
        let fen = position.to_fen();
        self.store.write(&fen)?;
        debug!("[AUTOSAVE] saved {fen} to {}", self.store.path().display());
        Ok(())
    }

    /// Consume the recovery record and offer it to the player
    ///
    /// Returns the recovered position when the player accepts, `None` when
    /// there is nothing to offer or they decline. Shorthand for
    /// [`Autosave::take`] followed by [`Autosave::offer`].
    pub fn maybe_load<W: Write>(
        &self,
        console: &mut Console<W>,
    ) -> GameResult<Option<GamePosition>> {
        match self.take(console) {
            Some(record) => self.offer(&record, console),
            None => Ok(None),
        }
    }

    /// Read and delete the recovery record
    ///
    /// Returns the trimmed FEN worth offering, if any. A record holding the
    /// initial position is dropped silently. An unreadable record is
    /// reported and treated as absent.
    pub fn take<W: Write>(&self, console: &mut Console<W>) -> Option<String> {
        let record = match self.store.read() {
            Ok(record) => record?,
            Err(err) => {
                warn!(
                    "[AUTOSAVE] cannot read {}: {err}",
                    self.store.path().display()
                );
                console.say(format_args!(
                    "Could not read the last game from {}: {err}",
                    self.store.path().display()
                ));
                return None;
            }
        };

        if let Err(err) = self.store.remove() {
            warn!(
                "[AUTOSAVE] cannot remove {}: {err}",
                self.store.path().display()
            );
        }

        let fen = record.trim();
        if fen.is_empty() || fen == START_FEN {
            debug!("[AUTOSAVE] discarded record of a fresh game");
            return None;
        }
        Some(fen.to_string())
    }

    /// Ask whether to resume `record`
    ///
    /// Any answer starting with `y` accepts. An accepted record that does
    /// not parse is a [`crate::game::Interrupt::BadBoardString`].
    pub fn offer<W: Write>(
        &self,
        record: &str,
        console: &mut Console<W>,
    ) -> GameResult<Option<GamePosition>> {
        let answer = console.read_line(LOAD_PROMPT)?;
        if !answer.trim().to_ascii_lowercase().starts_with('y') {
            info!("[AUTOSAVE] player declined to resume");
            return Ok(None);
        }

        let position = load_board(record, console)?;
        info!("[AUTOSAVE] resumed {record}");
        Ok(Some(position))
    }
}

impl Default for Autosave {
    fn default() -> Self {
        Self::default_location()
    }
}

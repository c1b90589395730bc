//! Session orchestrator
//!
//! A [`Session`] owns everything one game needs: the position, the engine,
//! the console and the autosave. [`Session::run`] plays the game to its end
//! and always leaves through a single exit point.
//!
//! # Flow
//!
//! ```text
//! startup:  --load FEN ─┐
//!           autosave ───┴─> position + roles ──> "Playing as <colour>"
//! loop:     outcome? ──yes──> print result ──────────────┐
//!             │ no                                      │
//!             ├─ Human:  prompt → command | move         │
//!             └─ Engine: query → "engine: <uci>" → play  │
//! exit:     Err(Interrupt) ──> report + autosave ────────┤
//!                                                       v
//!                                          engine.shutdown() (once)
//! ```
//!
//! Interruptions (`quit`, end of input, Ctrl-C, a bad board string, an
//! engine failure) are [`Interrupt`] values returned with `?` from wherever
//! they happen. Only [`Session::run`] handles them, and it always saves the
//! current position. While the resume question is open, that position is
//! the recovered game.

use std::io::Write;

use rand::Rng;
use shakmaty::Move;
use tracing::{info, warn};
use uci_engine::EngineError;

use crate::core::autosave::Autosave;
use crate::core::config::SessionConfig;
use crate::core::console::Console;

use super::commands::{interpret, load_board, Command, Interpretation};
use super::engine::SearchEngine;
use super::error::{GameResult, Interrupt};
use super::position::{GamePosition, Outcome, PositionError};
use super::roles::{Role, Roles};

/// Prompt shown on every human turn
pub const MOVE_PROMPT: &str = ">";

/// Exit status of an interrupted session (128 + SIGINT)
pub const INTERRUPTED_EXIT_CODE: u8 = 130;

/// How a session ended
#[derive(Debug)]
pub enum SessionOutcome {
    /// The game reached checkmate or a draw
    Finished(Outcome),
    /// The session stopped early; the position was autosaved
    Interrupted(Interrupt),
}

impl SessionOutcome {
    pub fn is_finished(&self) -> bool {
        matches!(self, SessionOutcome::Finished(_))
    }

    /// Process exit status: 0 for a finished game, 130 when interrupted
    pub fn exit_code(&self) -> u8 {
        if self.is_finished() {
            0
        } else {
            INTERRUPTED_EXIT_CODE
        }
    }
}

/// One game between a human at the console and a search engine
pub struct Session<E: SearchEngine, W: Write> {
    config: SessionConfig,
    engine: E,
    console: Console<W>,
    autosave: Autosave,
    position: GamePosition,
    roles: Option<Roles>,
}

impl<E: SearchEngine, W: Write> Session<E, W> {
    pub fn new(config: SessionConfig, engine: E, console: Console<W>, autosave: Autosave) -> Self {
        Self {
            config,
            engine,
            console,
            autosave,
            position: GamePosition::new(),
            roles: None,
        }
    }

    /// Play the game to its end
    ///
    /// Shuts the engine down before returning, whatever the outcome. Meant
    /// to be called once per session.
    pub fn run(&mut self) -> SessionOutcome {
        self.run_with_rng(&mut rand::rng())
    }

    /// [`Session::run`] with an explicit source for the random colour choice
    pub fn run_with_rng<R: Rng + ?Sized>(&mut self, rng: &mut R) -> SessionOutcome {
        let outcome = match self.play(rng) {
            Ok(result) => {
                self.announce(result);
                SessionOutcome::Finished(result)
            }
            Err(interrupt) => {
                self.report(&interrupt);
                SessionOutcome::Interrupted(interrupt)
            }
        };
        self.engine.shutdown();
        info!("[SESSION] ended: {outcome:?}");
        outcome
    }

    pub fn position(&self) -> &GamePosition {
        &self.position
    }

    /// Roles of the game, `None` until startup has completed
    pub fn roles(&self) -> Option<Roles> {
        self.roles
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn console(&self) -> &Console<W> {
        &self.console
    }

    pub fn into_console(self) -> Console<W> {
        self.console
    }

    fn play<R: Rng + ?Sized>(&mut self, rng: &mut R) -> GameResult<Outcome> {
        let roles = self.start(rng)?;

        loop {
            if let Some(outcome) = self.position.outcome() {
                return Ok(outcome);
            }

            match roles.role(self.position.turn()) {
                Role::Human => {
                    if self.config.show_board {
                        self.console.say(&self.position);
                    }
                    // `None` means the position was replaced; dispatch again.
                    if let Some(mv) = self.human_move()? {
                        if let Err(err) = self.position.play(&mv) {
                            warn!("[SESSION] rejected human move: {err}");
                            self.console.say("Illegal move");
                        }
                    }
                }
                Role::Engine => {
                    let mv = self.engine_move()?;
                    self.position
                        .play(&mv)
                        .map_err(|err| EngineError::Protocol {
                            message: format!("engine move could not be applied: {err}"),
                        })?;
                }
            }
        }
    }

    /// Decide the starting position and the roles
    fn start<R: Rng + ?Sized>(&mut self, rng: &mut R) -> GameResult<Roles> {
        let loaded = match self.config.load.as_deref() {
            Some(fen) => Some(load_board(fen, &mut self.console)?),
            None => self.resume_from_autosave()?,
        };

        let roles = match loaded {
            Some(position) => {
                self.position = position;
                Roles::resume(self.position.turn())
            }
            None => Roles::assign(self.config.play_as, rng),
        };
        self.roles = Some(roles);

        info!(
            "[SESSION] starting from {} as {roles}",
            self.position.to_fen()
        );
        self.console.say(format_args!("Playing as {roles}"));
        Ok(roles)
    }

    /// Offer the recovery record, keeping it as the position to save until
    /// the player has answered
    fn resume_from_autosave(&mut self) -> GameResult<Option<GamePosition>> {
        let Some(record) = self.autosave.take(&mut self.console) else {
            return Ok(None);
        };

        let recovered = GamePosition::from_fen(&record).unwrap_or_default();
        let fresh = std::mem::replace(&mut self.position, recovered);
        let offered = self.autosave.offer(&record, &mut self.console)?;
        if offered.is_none() {
            self.position = fresh;
        }
        Ok(offered)
    }

    /// Read lines until one is a legal move
    fn human_move(&mut self) -> GameResult<Option<Move>> {
        loop {
            let line = self.console.read_line(MOVE_PROMPT)?;
            match interpret(&line, &mut self.position, &mut self.console)? {
                Interpretation::Handled(Command::Load) => return Ok(None),
                Interpretation::Handled(_) => continue,
                Interpretation::NotACommand => {}
            }

            match self.position.parse_move(&line.trim().to_ascii_lowercase()) {
                Ok(mv) => return Ok(Some(mv)),
                Err(PositionError::IllegalMove(_)) => self.console.say("Illegal move"),
                Err(_) => self.console.say("Invalid move or command"),
            }
        }
    }

    fn engine_move(&mut self) -> GameResult<Move> {
        self.console.poll_signal()?;
        match self.engine.query(&self.position, self.config.limit) {
            Ok(mv) => {
                self.console
                    .say(format_args!("engine: {}", self.position.uci(&mv)));
                Ok(mv)
            }
            Err(err) => {
                // Ctrl-C also reaches the engine's process group; prefer the signal.
                self.console.poll_signal()?;
                Err(err.into())
            }
        }
    }

    fn announce(&mut self, outcome: Outcome) {
        info!("[SESSION] game over: {outcome:?}");
        self.console.say(outcome.message());
        let (Some(winner), Some(roles)) = (outcome.winner(), self.roles) else {
            return;
        };
        match roles.role(winner) {
            Role::Human => self.console.say("You win!"),
            Role::Engine => self.console.say("The engine wins."),
        }
    }

    fn report(&mut self, interrupt: &Interrupt) {
        info!("[SESSION] interrupted: {interrupt}");
        if let Interrupt::Engine(err) = interrupt {
            warn!("[SESSION] engine failure: {err}");
            self.console.say(format_args!("Engine error: {err}"));
        }

        match self.autosave.save(&self.position) {
            Ok(()) => self.console.say(format_args!(
                "Game saved to {}",
                self.autosave.store().path().display()
            )),
            Err(err) => {
                warn!("[SESSION] autosave failed: {err}");
                self.console
                    .say(format_args!("Could not save the game: {err}"));
            }
        }
    }
}

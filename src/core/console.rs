//! Line-oriented console for the human player
//!
//! All user-facing text goes through a [`Console`]: prompts, board
//! renderings, engine move echoes, and the outcome line. Input arrives as
//! whole lines on a channel, alongside a second channel that carries the
//! termination signal, so a Ctrl-C while waiting for a move surfaces as an
//! ordinary [`Interrupt::Signal`] value instead of killing the process.
//!
//! # Threads
//!
//! [`Console::stdio`] starts two helpers:
//! - `console-stdin` reads standard input line by line; end of input
//!   disconnects the line channel.
//! - `console-signals` runs a single-threaded Tokio runtime waiting on
//!   `tokio::signal::ctrl_c`.
//!
//! Tests build a console with [`Console::scripted`] instead: the lines are
//! queued up front, end of input follows the last one, and output lands in
//! any `Write` sink such as a `Vec<u8>`.

use std::fmt::Display;
use std::io::{self, BufRead, Write};
use std::thread;

use crossbeam_channel::{Receiver, TryRecvError, TrySendError};
use tracing::{debug, info, warn};

use crate::core::error::{CoreError, CoreResult};
use crate::game::error::{GameResult, Interrupt};

/// Text console over an input line channel and an output sink
pub struct Console<W: Write> {
    lines: Receiver<String>,
    signals: Receiver<()>,
    out: W,
}

impl Console<io::Stdout> {
    /// Console on the process's standard streams, with Ctrl-C handling
    pub fn stdio() -> CoreResult<Self> {
        let lines = spawn_stdin_reader()?;
        let signals = spawn_signal_watcher()?;
        Ok(Self::new(lines, signals, io::stdout()))
    }
}

impl<W: Write> Console<W> {
    /// Console over existing channels
    pub fn new(lines: Receiver<String>, signals: Receiver<()>, out: W) -> Self {
        Self {
            lines,
            signals,
            out,
        }
    }

    /// Console that replays `lines` and then reports end of input
    pub fn scripted<I, S>(lines: I, out: W) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let (tx, rx) = crossbeam_channel::unbounded();
        for line in lines {
            if tx.send(line.into()).is_err() {
                break;
            }
        }
        Self::new(rx, crossbeam_channel::never(), out)
    }

    /// Print `prompt` and wait for one line of input
    ///
    /// The returned line has its line terminator removed but is otherwise
    /// untouched. Closed input yields [`Interrupt::EndOfInput`], a pending
    /// or arriving signal [`Interrupt::Signal`].
    pub fn read_line(&mut self, prompt: &str) -> GameResult<String> {
        self.poll_signal()?;
        self.write_raw(prompt);

        loop {
            let (lines, signals) = (self.lines.clone(), self.signals.clone());
            crossbeam_channel::select! {
                recv(lines) -> line => return match line {
                    Ok(line) => Ok(line.trim_end_matches(['\r', '\n']).to_string()),
                    Err(_) => {
                        debug!("[CONSOLE] input closed");
                        self.write_raw("\n");
                        Err(Interrupt::EndOfInput)
                    }
                },
                recv(signals) -> signal => match signal {
                    Ok(()) => {
                        self.write_raw("\n");
                        return Err(Interrupt::Signal);
                    }
                    Err(_) => {
                        warn!("[CONSOLE] signal watcher stopped; Ctrl-C will no longer be caught");
                        self.signals = crossbeam_channel::never();
                    }
                },
            }
        }
    }

    /// Fail with [`Interrupt::Signal`] if a termination signal is pending
    pub fn poll_signal(&mut self) -> GameResult<()> {
        match self.signals.try_recv() {
            Ok(()) => Err(Interrupt::Signal),
            Err(TryRecvError::Empty) => Ok(()),
            Err(TryRecvError::Disconnected) => {
                self.signals = crossbeam_channel::never();
                Ok(())
            }
        }
    }

    /// Print one line of output
    pub fn say(&mut self, text: impl Display) {
        if let Err(err) = writeln!(self.out, "{text}").and_then(|()| self.out.flush()) {
            warn!("[CONSOLE] could not write output: {err}");
        }
    }

    /// Output sink, e.g. the captured text of a scripted console
    pub fn output(&self) -> &W {
        &self.out
    }

    pub fn into_output(self) -> W {
        self.out
    }

    fn write_raw(&mut self, text: &str) {
        if let Err(err) = self
            .out
            .write_all(text.as_bytes())
            .and_then(|()| self.out.flush())
        {
            warn!("[CONSOLE] could not write output: {err}");
        }
    }
}

fn spawn_stdin_reader() -> CoreResult<Receiver<String>> {
    let (tx, rx) = crossbeam_channel::unbounded();
    thread::Builder::new()
        .name("console-stdin".to_string())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                match line {
                    Ok(line) => {
                        if tx.send(line).is_err() {
                            break;
                        }
                    }
                    Err(err) => {
                        warn!("[CONSOLE] failed to read stdin: {err}");
                        break;
                    }
                }
            }
        })
        .map_err(|e| CoreError::ConsoleSetup {
            message: format!("stdin reader thread: {e}"),
        })?;
    Ok(rx)
}

fn spawn_signal_watcher() -> CoreResult<Receiver<()>> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| CoreError::ConsoleSetup {
            message: format!("signal runtime: {e}"),
        })?;

    // One pending signal is enough; repeated Ctrl-C presses coalesce.
    let (tx, rx) = crossbeam_channel::bounded(1);
    thread::Builder::new()
        .name("console-signals".to_string())
        .spawn(move || {
            runtime.block_on(async move {
                loop {
                    if let Err(err) = tokio::signal::ctrl_c().await {
                        warn!("[CONSOLE] cannot listen for Ctrl-C: {err}");
                        return;
                    }
                    info!("[CONSOLE] termination signal received");
                    match tx.try_send(()) {
                        Ok(()) | Err(TrySendError::Full(())) => {}
                        Err(TrySendError::Disconnected(())) => return,
                    }
                }
            });
        })
        .map_err(|e| CoreError::ConsoleSetup {
            message: format!("signal watcher thread: {e}"),
        })?;
    Ok(rx)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output_of(console: &Console<Vec<u8>>) -> String {
        String::from_utf8_lossy(console.output()).into_owned()
    }

    #[test]
    fn test_scripted_lines_then_end_of_input() {
        let mut console = Console::scripted(["e2e4", "quit\r"], Vec::new());
        assert_eq!(console.read_line(">").unwrap(), "e2e4");
        assert_eq!(console.read_line(">").unwrap(), "quit");
        assert!(matches!(console.read_line(">"), Err(Interrupt::EndOfInput)));
        assert_eq!(output_of(&console), ">>>\n");
    }

    #[test]
    fn test_signal_interrupts_read() {
        let (line_tx, lines) = crossbeam_channel::unbounded::<String>();
        let (signal_tx, signals) = crossbeam_channel::bounded(1);
        let mut console = Console::new(lines, signals, Vec::new());

        signal_tx.send(()).unwrap();
        // A queued line does not win over a pending signal.
        line_tx.send("e2e4".to_string()).unwrap();
        assert!(matches!(console.read_line(">"), Err(Interrupt::Signal)));
        assert_eq!(console.read_line(">").unwrap(), "e2e4");
    }

    #[test]
    fn test_poll_signal() {
        let (_line_tx, lines) = crossbeam_channel::unbounded::<String>();
        let (signal_tx, signals) = crossbeam_channel::bounded(1);
        let mut console = Console::new(lines, signals, Vec::new());

        assert!(console.poll_signal().is_ok());
        signal_tx.send(()).unwrap();
        assert!(matches!(console.poll_signal(), Err(Interrupt::Signal)));
        assert!(console.poll_signal().is_ok());

        // A dead watcher is not an interrupt.
        drop(signal_tx);
        assert!(console.poll_signal().is_ok());
    }

    #[test]
    fn test_say_writes_lines() {
        let mut console = Console::scripted(Vec::<String>::new(), Vec::new());
        console.say("Playing as white");
        console.say(format_args!("engine: {}", "e7e5"));
        assert_eq!(output_of(&console), "Playing as white\nengine: e7e5\n");
    }
}

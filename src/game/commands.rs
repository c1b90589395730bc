//! In-game command interpreter
//!
//! On the human's turn every input line is first offered to [`interpret`].
//! Only when it is not one of the fixed command words does the session try
//! to read it as a move.
//!
//! | command | effect |
//! |---------|--------|
//! | `board` | print the board |
//! | `save`  | print the current FEN for a later `--load` or `load` |
//! | `load`  | ask for a FEN and replace the current position with it |
//! | `quit`  | stop the session (autosaved like any interrupt) |
//!
//! Matching is case-insensitive and ignores surrounding whitespace.

use std::io::Write;

use tracing::{debug, info};

use crate::core::console::Console;

use super::error::{GameResult, Interrupt};
use super::position::GamePosition;

/// Prompt for the board string of the `load` command
pub const PASTE_PROMPT: &str = "Paste board string here: ";

/// Text printed ahead of the FEN by the `save` command
pub const SAVE_HINT: &str =
    "To load this later, pass this string with the --load argument or the in-game load command";

/// Fixed command words
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Board,
    Save,
    Load,
    Quit,
}

impl Command {
    /// Recognize a command word
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "board" => Some(Command::Board),
            "save" => Some(Command::Save),
            "load" => Some(Command::Load),
            "quit" => Some(Command::Quit),
            _ => None,
        }
    }
}

/// What [`interpret`] did with a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interpretation {
    /// The line was a command and has been carried out
    Handled(Command),
    /// Not a command; the caller should try it as a move
    NotACommand,
}

/// Carry out `input` if it is a command
///
/// `quit` returns [`Interrupt::Quit`]. A `load` whose board string does
/// not parse returns [`Interrupt::BadBoardString`] after telling the
/// player, and leaves `position` untouched.
pub fn interpret<W: Write>(
    input: &str,
    position: &mut GamePosition,
    console: &mut Console<W>,
) -> GameResult<Interpretation> {
    let Some(command) = Command::parse(input) else {
        return Ok(Interpretation::NotACommand);
    };
    debug!("[COMMAND] {command:?}");

    match command {
        Command::Board => console.say(&*position),
        Command::Save => {
            console.say(SAVE_HINT);
            console.say(format_args!("\"{}\"", position.to_fen()));
        }
        Command::Load => {
            let text = console.read_line(PASTE_PROMPT)?;
            *position = load_board(&text, console)?;
            info!("[COMMAND] loaded {}", position.to_fen());
        }
        Command::Quit => return Err(Interrupt::Quit),
    }
    Ok(Interpretation::Handled(command))
}

/// Parse a pasted board string, telling the player when it is bad
///
/// Surrounding whitespace and one pair of surrounding double quotes (as
/// printed by `save`) are ignored.
pub fn load_board<W: Write>(text: &str, console: &mut Console<W>) -> GameResult<GamePosition> {
    let text = text.trim();
    let text = text
        .strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .unwrap_or(text);
    GamePosition::from_fen(text).map_err(|err| {
        console.say("Bad board string");
        Interrupt::BadBoardString(err)
    })
}

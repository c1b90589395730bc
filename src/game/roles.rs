//! Who moves for which colour
//!
//! A session pairs one human with one engine. [`Roles`] is decided once at
//! startup, either from `--play` or, when a saved game is resumed, from
//! whose turn it was, and never changes afterwards.

use std::fmt;

use rand::Rng;
use shakmaty::Color;

/// Who supplies the moves for one side
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Moves are typed at the console
    Human,
    /// Moves come from the search engine
    Engine,
}

/// Colour preference from the `--play` flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayAs {
    /// `--play 0`: coin flip
    #[default]
    Random,
    /// `--play 1`: human plays White
    White,
    /// `--play 2`: human plays Black
    Black,
}

impl TryFrom<u8> for PlayAs {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(PlayAs::Random),
            1 => Ok(PlayAs::White),
            2 => Ok(PlayAs::Black),
            other => Err(other),
        }
    }
}

/// Role assignment for both colours
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Roles {
    pub white: Role,
    pub black: Role,
}

impl Roles {
    /// Human plays `color`, the engine plays the other side
    pub fn human_plays(color: Color) -> Self {
        match color {
            Color::White => Self {
                white: Role::Human,
                black: Role::Engine,
            },
            Color::Black => Self {
                white: Role::Engine,
                black: Role::Human,
            },
        }
    }

    /// Assign roles for a new game
    pub fn assign<R: Rng + ?Sized>(play_as: PlayAs, rng: &mut R) -> Self {
        match play_as {
            PlayAs::White => Self::human_plays(Color::White),
            PlayAs::Black => Self::human_plays(Color::Black),
            PlayAs::Random => {
                if rng.random_bool(0.5) {
                    Self::human_plays(Color::White)
                } else {
                    Self::human_plays(Color::Black)
                }
            }
        }
    }

    /// Assign roles for a resumed game
    ///
    /// The human was the one to move when the game was saved, so they take
    /// the side to move again.
    pub fn resume(side_to_move: Color) -> Self {
        Self::human_plays(side_to_move)
    }

    /// Role for `color`
    pub fn role(&self, color: Color) -> Role {
        match color {
            Color::White => self.white,
            Color::Black => self.black,
        }
    }

    /// Colour the human plays
    pub fn human_color(&self) -> Color {
        if self.white == Role::Human {
            Color::White
        } else {
            Color::Black
        }
    }
}

impl fmt::Display for Roles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.human_color() {
            Color::White => f.write_str("white"),
            Color::Black => f.write_str("black"),
        }
    }
}

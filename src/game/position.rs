//! Position adapter over the shakmaty rules oracle
//!
//! [`GamePosition`] is the single authoritative game state of a session.
//! Legality, side to move, and termination all come from shakmaty; this
//! module only adds FEN round-tripping, UCI move parsing with a clear
//! invalid/illegal split, and a plain-text board rendering.
//!
//! # Invariants
//!
//! - Every move applied is a member of the current legal-move set.
//! - A rejected move leaves the position untouched.
//! - The position is always fully specified (FEN round-trips).
//! - Every position reached since construction is remembered, so fivefold
//!   repetition ends the game.

use std::fmt;

use shakmaty::fen::Fen;
use shakmaty::uci::UciMove;
use shakmaty::{CastlingMode, Chess, Color, EnPassantMode, File, Move, Position, Rank, Square};
use thiserror::Error;

/// Half-moves without a capture or pawn move that end the game (75-move rule)
const SEVENTY_FIVE_MOVE_HALFMOVES: u32 = 150;

/// Occurrences of one position that end the game
const FIVEFOLD: usize = 5;

/// FEN of the standard starting position
pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Errors that can occur when building or changing a position
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PositionError {
    /// The board string is not a valid, legal FEN position
    #[error("invalid FEN `{fen}`: {reason}")]
    InvalidFen { fen: String, reason: String },

    /// The move text is not UCI notation
    #[error("invalid move `{0}`")]
    InvalidMove(String),

    /// The move is well-formed but not legal here
    #[error("illegal move `{0}`")]
    IllegalMove(String),
}

/// How a finished game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// White delivered checkmate
    WhiteWon,
    /// Black delivered checkmate
    BlackWon,
    /// Stalemate, insufficient material, the 75-move rule or fivefold repetition
    Draw,
}

impl Outcome {
    /// Winning colour, `None` for a draw
    pub fn winner(self) -> Option<Color> {
        match self {
            Outcome::WhiteWon => Some(Color::White),
            Outcome::BlackWon => Some(Color::Black),
            Outcome::Draw => None,
        }
    }

    /// Outcome line printed at the end of a game
    pub fn message(self) -> &'static str {
        match self {
            Outcome::WhiteWon => "White won!",
            Outcome::BlackWon => "Black won!",
            Outcome::Draw => "Draw!",
        }
    }
}

/// The authoritative chess position of one game
#[derive(Debug, Clone)]
pub struct GamePosition {
    position: Chess,
    /// Repetition keys of every position reached, current one last
    seen: Vec<String>,
}

impl GamePosition {
    /// Standard starting position
    pub fn new() -> Self {
        Self::from_chess(Chess::default())
    }

    fn from_chess(position: Chess) -> Self {
        let mut state = Self {
            position,
            seen: Vec::new(),
        };
        state.seen.push(state.repetition_key());
        state
    }

    /// Build a position from a FEN string
    ///
    /// Fails with [`PositionError::InvalidFen`] both for text that is not
    /// FEN and for FEN describing an impossible position.
    pub fn from_fen(fen: &str) -> Result<Self, PositionError> {
        let fen = fen.trim();
        let invalid = |reason: String| PositionError::InvalidFen {
            fen: fen.to_string(),
            reason,
        };
        let parsed: Fen = fen.parse().map_err(|e| invalid(format!("{e}")))?;
        let position: Chess = parsed
            .into_position(CastlingMode::Standard)
            .map_err(|e| invalid(format!("{e}")))?;
        Ok(Self::from_chess(position))
    }

    /// Serialize the position as FEN
    pub fn to_fen(&self) -> String {
        Fen::from_position(self.position.clone(), EnPassantMode::Legal).to_string()
    }

    /// Side to move
    pub fn turn(&self) -> Color {
        self.position.turn()
    }

    /// Half-moves played since the start of the game, per the FEN counters
    pub fn ply(&self) -> u32 {
        let full_moves = self.position.fullmoves().get();
        (full_moves - 1)
            .saturating_mul(2)
            .saturating_add(u32::from(self.turn() == Color::Black))
    }

    /// Number of legal moves for the side to move
    pub fn legal_move_count(&self) -> usize {
        self.position.legal_moves().len()
    }

    /// Whether `mv` is in the current legal-move set
    pub fn is_legal(&self, mv: &Move) -> bool {
        self.position.is_legal(mv)
    }

    /// Parse UCI move text against this position
    ///
    /// Returns [`PositionError::InvalidMove`] for text that is not UCI and
    /// [`PositionError::IllegalMove`] for a well-formed move that cannot be
    /// played here.
    pub fn parse_move(&self, text: &str) -> Result<Move, PositionError> {
        let uci: UciMove = text
            .parse()
            .map_err(|_| PositionError::InvalidMove(text.to_string()))?;
        self.resolve(&uci)
    }

    /// Resolve an already-parsed UCI move against this position
    pub fn resolve(&self, uci: &UciMove) -> Result<Move, PositionError> {
        let mv = uci
            .to_move(&self.position)
            .map_err(|_| PositionError::IllegalMove(uci.to_string()))?;
        if !self.position.is_legal(&mv) {
            return Err(PositionError::IllegalMove(uci.to_string()));
        }
        Ok(mv)
    }

    /// UCI text of a move in this position
    pub fn uci(&self, mv: &Move) -> String {
        UciMove::from_move(mv, CastlingMode::Standard).to_string()
    }

    /// Apply a legal move
    ///
    /// Moves outside the legal-move set are rejected and the position is
    /// left exactly as it was.
    pub fn play(&mut self, mv: &Move) -> Result<(), PositionError> {
        if !self.position.is_legal(mv) {
            return Err(PositionError::IllegalMove(self.uci(mv)));
        }
        self.position.play_unchecked(mv);
        self.seen.push(self.repetition_key());
        Ok(())
    }

    /// Whether the game has ended
    pub fn is_game_over(&self) -> bool {
        self.outcome().is_some()
    }

    /// Outcome of the game, `None` while it is still in progress
    pub fn outcome(&self) -> Option<Outcome> {
        if self.position.is_checkmate() {
            // The side to move is mated.
            Some(match self.turn() {
                Color::White => Outcome::BlackWon,
                Color::Black => Outcome::WhiteWon,
            })
        } else if self.position.is_stalemate()
            || self.position.is_insufficient_material()
            || self.position.halfmoves() >= SEVENTY_FIVE_MOVE_HALFMOVES
            || self.repetitions() >= FIVEFOLD
        {
            Some(Outcome::Draw)
        } else {
            None
        }
    }

    /// How often the current position has occurred, itself included
    pub fn repetitions(&self) -> usize {
        match self.seen.last() {
            Some(current) => self.seen.iter().filter(|key| *key == current).count(),
            None => 0,
        }
    }

    /// Placement, side to move, castling rights and en passant square
    fn repetition_key(&self) -> String {
        self.to_fen()
            .split_whitespace()
            .take(4)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Plain-text board, rank 8 at the top, `.` for empty squares
    pub fn render(&self) -> String {
        let board = self.position.board();
        let mut rows = Vec::with_capacity(8);
        for &rank in Rank::ALL.iter().rev() {
            let row: Vec<String> = File::ALL
                .iter()
                .map(|&file| {
                    board
                        .piece_at(Square::from_coords(file, rank))
                        .map_or('.', |piece| piece.char())
                        .to_string()
                })
                .collect();
            rows.push(row.join(" "));
        }
        rows.join("\n")
    }
}

impl Default for GamePosition {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for GamePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

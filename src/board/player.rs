//! Players and AI quality tiers.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::piece::Piece;

/// AI strength setting. Controls search depth and how aggressively
/// candidate moves are filtered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Easy,
    #[default]
    Normal,
    Hard,
    /// Self-sufficient search used once all of a player's pieces are close
    /// to its end zone. Opponent replies are not modelled.
    Endgame,
}

impl Mode {
    /// Search depth in plies.
    pub const fn depth(self) -> u32 {
        match self {
            Mode::Easy => 1,
            Mode::Normal => 2,
            Mode::Hard => 3,
            Mode::Endgame => 3,
        }
    }

    /// Maximum number of candidate moves expanded per node.
    pub const fn move_cap(self) -> usize {
        match self {
            Mode::Easy => 4,
            Mode::Normal => 2,
            Mode::Hard => 8,
            Mode::Endgame => 12,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Mode::Easy => "easy",
            Mode::Normal => "normal",
            Mode::Hard => "hard",
            Mode::Endgame => "endgame",
        }
    }

    pub fn from_name(s: &str) -> Option<Mode> {
        match s {
            "easy" => Some(Mode::Easy),
            "normal" => Some(Mode::Normal),
            "hard" => Some(Mode::Hard),
            "endgame" => Some(Mode::Endgame),
            _ => None,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A seat at the table. Identity is the piece colour; the human flag and
/// quality tier can change between moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Player {
    pub piece: Piece,
    pub human: bool,
    /// Only meaningful when the player is AI controlled.
    pub mode: Mode,
}

impl Player {
    /// Creates an AI player at the default tier.
    pub const fn ai(piece: Piece) -> Self {
        Player { piece, human: false, mode: Mode::Normal }
    }

    pub const fn human(piece: Piece) -> Self {
        Player { piece, human: true, mode: Mode::Normal }
    }

    pub const fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub const fn is_ai(&self) -> bool {
        !self.human
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.piece, f)
    }
}

//! Piece colours.
//!
//! A piece is either one of the six player colours or the neutral empty
//! marker. Per-piece tables throughout the crate are fixed-size arrays
//! indexed by `Piece as usize`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of piece tags including `Empty`.
pub const PIECE_COUNT: usize = 7;

/// A player colour or the empty marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Piece {
    Empty = 0,
    White = 1,
    Black = 2,
    Yellow = 3,
    Blue = 4,
    Green = 5,
    Red = 6,
}

/// All colours a player can own, in declaration order.
pub const PLAYER_PIECES: [Piece; 6] = [
    Piece::White,
    Piece::Black,
    Piece::Yellow,
    Piece::Blue,
    Piece::Green,
    Piece::Red,
];

impl Piece {
    pub const fn is_empty(self) -> bool {
        matches!(self, Piece::Empty)
    }

    /// The colour whose starting corner faces this one.
    pub const fn opposite(self) -> Piece {
        match self {
            Piece::Empty => Piece::Empty,
            Piece::White => Piece::Black,
            Piece::Black => Piece::White,
            Piece::Yellow => Piece::Blue,
            Piece::Blue => Piece::Yellow,
            Piece::Green => Piece::Red,
            Piece::Red => Piece::Green,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Piece::Empty => "empty",
            Piece::White => "white",
            Piece::Black => "black",
            Piece::Yellow => "yellow",
            Piece::Blue => "blue",
            Piece::Green => "green",
            Piece::Red => "red",
        }
    }

    /// Parses a lowercase colour name.
    pub fn from_name(s: &str) -> Option<Piece> {
        match s {
            "empty" => Some(Piece::Empty),
            "white" => Some(Piece::White),
            "black" => Some(Piece::Black),
            "yellow" => Some(Piece::Yellow),
            "blue" => Some(Piece::Blue),
            "green" => Some(Piece::Green),
            "red" => Some(Piece::Red),
            _ => None,
        }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_is_an_involution() {
        for p in PLAYER_PIECES {
            assert_ne!(p.opposite(), p);
            assert_eq!(p.opposite().opposite(), p);
        }
        assert_eq!(Piece::Empty.opposite(), Piece::Empty);
    }

    #[test]
    fn name_roundtrip() {
        for p in PLAYER_PIECES.iter().copied().chain([Piece::Empty]) {
            assert_eq!(Piece::from_name(p.name()), Some(p));
        }
        assert_eq!(Piece::from_name("purple"), None);
    }

    #[test]
    fn indices_fit_tables() {
        assert!(PLAYER_PIECES.iter().all(|p| (*p as usize) < PIECE_COUNT));
        assert_eq!(Piece::Empty as usize, 0);
    }
}

//! Move type.
//!
//! A move relocates one piece from its origin to a destination. Moves
//! produced by move generation also carry the full path so the
//! presentation layer can replay each intermediate hop.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::coordinate::Coordinate;
use super::piece::Piece;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub origin: Coordinate,
    pub destination: Coordinate,
    pub piece: Piece,
    /// Ordered cells from origin to destination, both inclusive.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<Coordinate>>,
}

impl Move {
    /// Creates a move without path information.
    pub fn new(origin: Coordinate, destination: Coordinate, piece: Piece) -> Self {
        Move { origin, destination, piece, path: None }
    }

    /// Creates a move carrying its full path, or `None` if `path` is empty.
    pub fn with_path(piece: Piece, path: Vec<Coordinate>) -> Option<Self> {
        let origin = *path.first()?;
        let destination = *path.last()?;
        Some(Move { origin, destination, piece, path: Some(path) })
    }

    /// The move that undoes this one, with the path reversed.
    pub fn inverse(&self) -> Move {
        Move {
            origin: self.destination,
            destination: self.origin,
            piece: self.piece,
            path: self.path.as_ref().map(|p| p.iter().rev().copied().collect()),
        }
    }

    /// Number of segments in the path (1 for a single step or hop).
    pub fn segments(&self) -> usize {
        self.path.as_ref().map_or(1, |p| p.len().saturating_sub(1))
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.origin, self.destination)
    }
}

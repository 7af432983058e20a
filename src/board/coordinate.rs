//! Lattice coordinates and direction vectors.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A step on the lattice as `(row delta, col delta)`.
pub type Direction = (i32, i32);

/// An integer (row, col) lattice address.
///
/// Ordering is row-major, which is also the order in which boards
/// enumerate their cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coordinate {
    pub row: i32,
    pub col: i32,
}

impl Coordinate {
    pub const fn new(row: i32, col: i32) -> Self {
        Coordinate { row, col }
    }

    /// Returns the coordinate `times` steps away along `direction`.
    pub const fn step(self, direction: Direction, times: i32) -> Self {
        Coordinate {
            row: self.row + direction.0 * times,
            col: self.col + direction.1 * times,
        }
    }

    /// Manhattan offset between two coordinates.
    pub fn manhattan(self, other: Coordinate) -> i32 {
        (self.row - other.row).abs() + (self.col - other.col).abs()
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

impl From<(i32, i32)> for Coordinate {
    fn from((row, col): (i32, i32)) -> Self {
        Coordinate { row, col }
    }
}

/// Walks greedily from `from` towards `to` and returns the step count.
///
/// Each step takes the first direction that minimizes the remaining
/// Manhattan offset. This is a heuristic metric, not a shortest path: it
/// ignores occupancy and board edges. When no direction strictly reduces
/// the offset the walk stops and the leftover offset is added, so the walk
/// always terminates.
pub fn greedy_distance(directions: &[Direction], from: Coordinate, to: Coordinate) -> i32 {
    let mut current = from;
    let mut remaining = current.manhattan(to);
    let mut steps = 0;

    while remaining > 0 {
        let mut best: Option<(Coordinate, i32)> = None;
        for &dir in directions {
            let next = current.step(dir, 1);
            let left = next.manhattan(to);
            if best.map_or(true, |(_, b)| left < b) {
                best = Some((next, left));
            }
        }
        match best {
            Some((next, left)) if left < remaining => {
                current = next;
                remaining = left;
                steps += 1;
            }
            _ => {
                log::trace!("greedy walk {} -> {} stalled at {}", from, to, current);
                return steps + remaining;
            }
        }
    }

    steps
}

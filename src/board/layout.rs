//! Immutable board geometry shared by every clone of a game state.
//!
//! Cells are addressed internally by their index in row-major order. The
//! layout precomputes the step table (one and two steps along every
//! direction) and the all-pairs greedy distance matrix once per game, so
//! the search never re-walks the lattice.

use std::collections::HashMap;

use super::coordinate::{greedy_distance, Coordinate, Direction};
use super::piece::{Piece, PIECE_COUNT};

/// Geometry fixed at game setup.
#[derive(Debug)]
pub(crate) struct BoardLayout {
    cells: Vec<Coordinate>,
    index: HashMap<Coordinate, usize>,
    directions: Vec<Direction>,
    /// `steps[(cell * dirs + dir) * 2 + (times - 1)]` for times in 1..=2.
    steps: Vec<Option<usize>>,
    /// Row-major `cells x cells` greedy distances.
    dist: Vec<i32>,
    end_zones: [Vec<usize>; PIECE_COUNT],
    end_zone_owner: Vec<Option<Piece>>,
    max_distance: i32,
    pub(crate) center: usize,
    pub(crate) farthest: [Option<usize>; PIECE_COUNT],
}

impl BoardLayout {
    /// Builds the layout from sorted, deduplicated cells. `center` and
    /// `farthest` are filled in by the caller once pieces are placed.
    pub(crate) fn new(
        cells: Vec<Coordinate>,
        directions: Vec<Direction>,
        end_zone_owner: Vec<Option<Piece>>,
        max_distance: i32,
    ) -> Self {
        let n = cells.len();
        let index: HashMap<Coordinate, usize> =
            cells.iter().enumerate().map(|(i, &c)| (c, i)).collect();

        let mut steps = Vec::with_capacity(n * directions.len() * 2);
        for &cell in &cells {
            for &dir in &directions {
                steps.push(index.get(&cell.step(dir, 1)).copied());
                steps.push(index.get(&cell.step(dir, 2)).copied());
            }
        }

        let mut dist = vec![0i32; n * n];
        for (i, &from) in cells.iter().enumerate() {
            for (j, &to) in cells.iter().enumerate() {
                if i != j {
                    dist[i * n + j] = greedy_distance(&directions, from, to);
                }
            }
        }

        let mut end_zones: [Vec<usize>; PIECE_COUNT] = std::array::from_fn(|_| Vec::new());
        for (i, owner) in end_zone_owner.iter().enumerate() {
            if let Some(piece) = owner {
                end_zones[*piece as usize].push(i);
            }
        }

        BoardLayout {
            cells,
            index,
            directions,
            steps,
            dist,
            end_zones,
            end_zone_owner,
            max_distance,
            center: 0,
            farthest: [None; PIECE_COUNT],
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub(crate) fn cells(&self) -> &[Coordinate] {
        &self.cells
    }

    #[inline]
    pub(crate) fn cell(&self, idx: usize) -> Coordinate {
        self.cells[idx]
    }

    #[inline]
    pub(crate) fn index_of(&self, c: Coordinate) -> Option<usize> {
        self.index.get(&c).copied()
    }

    #[inline]
    pub(crate) fn directions(&self) -> &[Direction] {
        &self.directions
    }

    /// The cell `times` (1 or 2) steps from `cell` along direction number `dir`.
    #[inline]
    pub(crate) fn step(&self, cell: usize, dir: usize, times: usize) -> Option<usize> {
        debug_assert!(times == 1 || times == 2);
        self.steps[(cell * self.directions.len() + dir) * 2 + (times - 1)]
    }

    #[inline]
    pub(crate) fn distance(&self, from: usize, to: usize) -> i32 {
        self.dist[from * self.cells.len() + to]
    }

    #[inline]
    pub(crate) fn end_zone(&self, piece: Piece) -> &[usize] {
        &self.end_zones[piece as usize]
    }

    #[inline]
    pub(crate) fn end_zone_owner(&self, cell: usize) -> Option<Piece> {
        self.end_zone_owner[cell]
    }

    #[inline]
    pub(crate) fn max_distance(&self) -> i32 {
        self.max_distance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(n: i32) -> BoardLayout {
        let cells: Vec<Coordinate> = (0..n).map(|c| Coordinate::new(0, c)).collect();
        let owners = (0..n).map(|c| if c == n - 1 { Some(Piece::White) } else { None }).collect();
        BoardLayout::new(cells, vec![(0, 1), (0, -1)], owners, n)
    }

    #[test]
    fn step_table_respects_edges() {
        let layout = line(4);
        assert_eq!(layout.step(0, 0, 1), Some(1));
        assert_eq!(layout.step(0, 0, 2), Some(2));
        assert_eq!(layout.step(0, 1, 1), None);
        assert_eq!(layout.step(3, 0, 1), None);
        assert_eq!(layout.step(3, 1, 2), Some(1));
    }

    #[test]
    fn distance_matrix_matches_walk() {
        let layout = line(5);
        for i in 0..5 {
            for j in 0..5 {
                assert_eq!(layout.distance(i, j), (i as i32 - j as i32).abs());
            }
        }
    }

    #[test]
    fn end_zones_grouped_by_owner() {
        let layout = line(5);
        assert_eq!(layout.end_zone(Piece::White), &[4]);
        assert!(layout.end_zone(Piece::Black).is_empty());
        assert_eq!(layout.end_zone_owner(4), Some(Piece::White));
        assert_eq!(layout.index_of(Coordinate::new(0, 2)), Some(2));
        assert_eq!(layout.index_of(Coordinate::new(1, 2)), None);
    }
}

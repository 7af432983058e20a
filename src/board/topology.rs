//! Board topologies.
//!
//! A topology supplies the fixed geometry of a game: the cells, the
//! direction vectors a piece may move along, which colour starts on each
//! cell, and which colour's end zone each cell belongs to. The engine
//! consumes topologies once at setup.
//!
//! Two standard layouts are provided (a 10x10 square board for 2 or 4
//! players and the 121-cell star for 2, 4 or 6 players) plus
//! `CustomBoard` for arbitrary hand-built positions.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::coordinate::{Coordinate, Direction};
use super::piece::Piece;
use crate::error::EngineError;

/// Fixed board geometry consumed by `GameState::new`.
pub trait Topology {
    /// Every cell of the board.
    fn cells(&self) -> Vec<Coordinate>;

    /// Direction vectors a piece can step or hop along.
    fn directions(&self) -> &[Direction];

    /// The piece occupying `cell` at the start of the game.
    fn initial_piece(&self, cell: Coordinate) -> Piece;

    /// The colour whose end zone contains `cell`, if any.
    ///
    /// By default a starting corner is the end zone of the opposite colour.
    fn end_zone_owner(&self, cell: Coordinate) -> Option<Piece> {
        let piece = self.initial_piece(cell);
        if piece.is_empty() {
            None
        } else {
            Some(piece.opposite())
        }
    }

    /// Upper bound on the distance between a cell and an end-zone cell.
    fn max_distance(&self) -> i32;

    /// Colours in play, in turn order.
    fn turn_order(&self) -> Vec<Piece>;
}

/// Which standard layout to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoardKind {
    #[default]
    Square,
    Star,
}

impl BoardKind {
    /// Builds the topology of this kind for `players` players.
    pub fn topology(self, players: usize) -> Result<Box<dyn Topology + Send + Sync>, EngineError> {
        match self {
            BoardKind::Square => Ok(Box::new(SquareBoard::new(players)?)),
            BoardKind::Star => Ok(Box::new(StarBoard::new(players)?)),
        }
    }
}

// ====================================================================
// Square board
// ====================================================================

const SQUARE_SIDE: i32 = 10;
const SQUARE_CORNER: i32 = 4;
const SQUARE_MAX_DISTANCE: i32 = 10;

static SQUARE_DIRECTIONS: [Direction; 8] =
    [(0, 1), (1, 0), (1, 1), (0, -1), (-1, 0), (-1, -1), (-1, 1), (1, -1)];

/// A 10x10 grid with 10-cell triangular corners, for 2 or 4 players.
///
/// White starts top-left and Black bottom-right; with four players Blue
/// takes the top-right corner and Yellow the bottom-left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SquareBoard {
    players: usize,
}

impl SquareBoard {
    pub fn new(players: usize) -> Result<Self, EngineError> {
        match players {
            2 | 4 => Ok(SquareBoard { players }),
            n => Err(EngineError::UnsupportedPlayerCount(n)),
        }
    }
}

impl Topology for SquareBoard {
    fn cells(&self) -> Vec<Coordinate> {
        let mut cells = Vec::with_capacity((SQUARE_SIDE * SQUARE_SIDE) as usize);
        for row in 0..SQUARE_SIDE {
            for col in 0..SQUARE_SIDE {
                cells.push(Coordinate::new(row, col));
            }
        }
        cells
    }

    fn directions(&self) -> &[Direction] {
        &SQUARE_DIRECTIONS
    }

    fn initial_piece(&self, cell: Coordinate) -> Piece {
        let Coordinate { row, col } = cell;
        if !(0..SQUARE_SIDE).contains(&row) || !(0..SQUARE_SIDE).contains(&col) {
            return Piece::Empty;
        }
        if row + col < SQUARE_CORNER {
            return Piece::White;
        }
        if row + col > (SQUARE_MAX_DISTANCE - SQUARE_CORNER + 1) * 2 {
            return Piece::Black;
        }
        if self.players == 4 && col - row >= SQUARE_SIDE - SQUARE_CORNER {
            return Piece::Blue;
        }
        if self.players == 4 && row - col >= SQUARE_SIDE - SQUARE_CORNER {
            return Piece::Yellow;
        }
        Piece::Empty
    }

    fn max_distance(&self) -> i32 {
        SQUARE_MAX_DISTANCE
    }

    fn turn_order(&self) -> Vec<Piece> {
        if self.players == 4 {
            vec![Piece::White, Piece::Yellow, Piece::Black, Piece::Blue]
        } else {
            vec![Piece::White, Piece::Black]
        }
    }
}

// ====================================================================
// Star board
// ====================================================================

const STAR_CORNER: i32 = 4;
const STAR_HALF_WIDTH: i32 = 13;
const STAR_MAX_DISTANCE: i32 = 17;

static STAR_DIRECTIONS: [Direction; 6] = [(-2, -1), (-2, 1), (0, -2), (0, 2), (2, -1), (2, 1)];

/// The six-pointed star: six 10-cell corners around a 61-cell hexagon,
/// on a lattice where each row step of 2 shifts columns by 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StarBoard {
    players: usize,
    /// Corner colour of every cell (`Empty` for the hexagon).
    corners: HashMap<Coordinate, Piece>,
}

impl StarBoard {
    pub fn new(players: usize) -> Result<Self, EngineError> {
        if !matches!(players, 2 | 4 | 6) {
            return Err(EngineError::UnsupportedPlayerCount(players));
        }

        let mut corners = HashMap::with_capacity(121);
        let c = STAR_CORNER;
        let w = STAR_HALF_WIDTH;
        let triangles = [
            (Piece::Black, Coordinate::new(4 * c - 2, 2 * w - c - 1), -1),
            (Piece::White, Coordinate::new(4 * c + 2, c - 1), 1),
            (Piece::Yellow, Coordinate::new(4 * c - 2, c - 1), -1),
            (Piece::Blue, Coordinate::new(4 * c + 2, 2 * w - c - 1), 1),
            (Piece::Green, Coordinate::new(8 * c, w - 1), -1),
            (Piece::Red, Coordinate::new(0, w - 1), 1),
        ];
        for (piece, peak, sign) in triangles {
            for cell in triangle(peak, c, sign) {
                corners.insert(cell, piece);
            }
        }
        for cell in hexagon(Coordinate::new(2 * c, 2 * c), w - 2 * c) {
            corners.insert(cell, Piece::Empty);
        }

        Ok(StarBoard { players, corners })
    }

    fn in_play(&self, piece: Piece) -> bool {
        match piece {
            Piece::White | Piece::Black => true,
            Piece::Yellow | Piece::Blue => self.players >= 4,
            Piece::Green | Piece::Red => self.players >= 6,
            Piece::Empty => false,
        }
    }
}

/// Cells of a triangle with `size` rows growing away from `peak`;
/// `sign` is +1 when the triangle grows downwards.
fn triangle(peak: Coordinate, size: i32, sign: i32) -> Vec<Coordinate> {
    let mut cells = Vec::new();
    for k in 0..size {
        let row = peak.row + sign * 2 * k;
        let mut col = peak.col - k;
        while col <= peak.col + k {
            cells.push(Coordinate::new(row, col));
            col += 2;
        }
    }
    cells
}

/// Cells of a regular hexagon of side `size` whose top-left cell is `top_left`.
fn hexagon(top_left: Coordinate, size: i32) -> Vec<Coordinate> {
    let mut cells = Vec::new();
    let (mut left, mut right) = (top_left.col, top_left.col + 2 * (size - 1));
    for k in 0..(2 * size - 1) {
        let row = top_left.row + 2 * k;
        let mut col = left;
        while col <= right {
            cells.push(Coordinate::new(row, col));
            col += 2;
        }
        if k < size - 1 {
            left -= 1;
            right += 1;
        } else {
            left += 1;
            right -= 1;
        }
    }
    cells
}

impl Topology for StarBoard {
    fn cells(&self) -> Vec<Coordinate> {
        let mut cells: Vec<Coordinate> = self.corners.keys().copied().collect();
        cells.sort();
        cells
    }

    fn directions(&self) -> &[Direction] {
        &STAR_DIRECTIONS
    }

    fn initial_piece(&self, cell: Coordinate) -> Piece {
        match self.corners.get(&cell) {
            Some(&piece) if self.in_play(piece) => piece,
            _ => Piece::Empty,
        }
    }

    fn max_distance(&self) -> i32 {
        STAR_MAX_DISTANCE
    }

    fn turn_order(&self) -> Vec<Piece> {
        match self.players {
            6 => vec![Piece::White, Piece::Yellow, Piece::Red, Piece::Black, Piece::Blue, Piece::Green],
            4 => vec![Piece::White, Piece::Yellow, Piece::Black, Piece::Blue],
            _ => vec![Piece::White, Piece::Black],
        }
    }
}

// ====================================================================
// Custom board
// ====================================================================

/// A hand-built topology with explicit cells, pieces and end zones.
///
/// Cells not listed in `pieces` start empty; cells not listed in
/// `end_zones` belong to no end zone.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CustomBoard {
    pub cells: Vec<Coordinate>,
    pub directions: Vec<Direction>,
    pub pieces: HashMap<Coordinate, Piece>,
    pub end_zones: HashMap<Coordinate, Piece>,
    pub turn_order: Vec<Piece>,
    pub max_distance: i32,
}

impl CustomBoard {
    /// A `rows` x `cols` rectangle using the square board's eight directions.
    pub fn grid(rows: i32, cols: i32) -> Self {
        let mut cells = Vec::with_capacity((rows * cols).max(0) as usize);
        for row in 0..rows {
            for col in 0..cols {
                cells.push(Coordinate::new(row, col));
            }
        }
        CustomBoard {
            cells,
            directions: SQUARE_DIRECTIONS.to_vec(),
            max_distance: rows.max(cols),
            ..CustomBoard::default()
        }
    }

    pub fn with_directions(mut self, directions: &[Direction]) -> Self {
        self.directions = directions.to_vec();
        self
    }

    /// Places `piece` on each of `cells`.
    pub fn place(mut self, piece: Piece, cells: &[(i32, i32)]) -> Self {
        for &c in cells {
            self.pieces.insert(c.into(), piece);
        }
        self
    }

    /// Assigns each of `cells` to `piece`'s end zone.
    pub fn end_zone(mut self, piece: Piece, cells: &[(i32, i32)]) -> Self {
        for &c in cells {
            self.end_zones.insert(c.into(), piece);
        }
        self
    }

    pub fn players(mut self, turn_order: &[Piece]) -> Self {
        self.turn_order = turn_order.to_vec();
        self
    }
}

impl Topology for CustomBoard {
    fn cells(&self) -> Vec<Coordinate> {
        self.cells.clone()
    }

    fn directions(&self) -> &[Direction] {
        &self.directions
    }

    fn initial_piece(&self, cell: Coordinate) -> Piece {
        self.pieces.get(&cell).copied().unwrap_or(Piece::Empty)
    }

    fn end_zone_owner(&self, cell: Coordinate) -> Option<Piece> {
        self.end_zones.get(&cell).copied()
    }

    fn max_distance(&self) -> i32 {
        self.max_distance
    }

    fn turn_order(&self) -> Vec<Piece> {
        self.turn_order.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(topology: &dyn Topology, piece: Piece) -> usize {
        topology.cells().into_iter().filter(|&c| topology.initial_piece(c) == piece).count()
    }

    #[test]
    fn square_two_players_has_two_corners() {
        let board = SquareBoard::new(2).unwrap();
        assert_eq!(board.cells().len(), 100);
        assert_eq!(count(&board, Piece::White), 10);
        assert_eq!(count(&board, Piece::Black), 10);
        assert_eq!(count(&board, Piece::Blue), 0);
        assert_eq!(board.initial_piece(Coordinate::new(0, 0)), Piece::White);
        assert_eq!(board.initial_piece(Coordinate::new(9, 9)), Piece::Black);
        assert_eq!(board.end_zone_owner(Coordinate::new(0, 0)), Some(Piece::Black));
        assert_eq!(board.end_zone_owner(Coordinate::new(5, 5)), None);
    }

    #[test]
    fn square_four_players_has_four_corners() {
        let board = SquareBoard::new(4).unwrap();
        for p in [Piece::White, Piece::Black, Piece::Yellow, Piece::Blue] {
            assert_eq!(count(&board, p), 10, "{p}");
        }
        assert_eq!(board.initial_piece(Coordinate::new(0, 9)), Piece::Blue);
        assert_eq!(board.initial_piece(Coordinate::new(9, 0)), Piece::Yellow);
        assert_eq!(board.turn_order().len(), 4);
    }

    #[test]
    fn square_rejects_three_players() {
        assert_eq!(SquareBoard::new(3), Err(EngineError::UnsupportedPlayerCount(3)));
    }

    #[test]
    fn star_has_121_cells() {
        let board = StarBoard::new(6).unwrap();
        assert_eq!(board.cells().len(), 121);
        for p in [Piece::White, Piece::Black, Piece::Yellow, Piece::Blue, Piece::Green, Piece::Red] {
            assert_eq!(count(&board, p), 10, "{p}");
        }
        assert_eq!(count(&board, Piece::Empty), 61);
    }

    #[test]
    fn star_two_players_leaves_other_corners_empty() {
        let board = StarBoard::new(2).unwrap();
        assert_eq!(count(&board, Piece::White), 10);
        assert_eq!(count(&board, Piece::Black), 10);
        assert_eq!(count(&board, Piece::Empty), 101);
        // The red peak is an ordinary empty cell with no end zone owner.
        assert_eq!(board.initial_piece(Coordinate::new(0, 12)), Piece::Empty);
        assert_eq!(board.end_zone_owner(Coordinate::new(0, 12)), None);
    }

    #[test]
    fn star_corners_are_lattice_neighbours_of_the_hexagon() {
        let board = StarBoard::new(6).unwrap();
        let cells: std::collections::HashSet<Coordinate> = board.cells().into_iter().collect();
        // Every cell has at least two on-board neighbours.
        for &c in &cells {
            let neighbours = board.directions().iter().filter(|&&d| cells.contains(&c.step(d, 1))).count();
            assert!(neighbours >= 2, "{c} has {neighbours} neighbours");
        }
        // Peaks as documented.
        assert_eq!(board.initial_piece(Coordinate::new(0, 12)), Piece::Red);
        assert_eq!(board.initial_piece(Coordinate::new(32, 12)), Piece::Green);
        assert_eq!(board.initial_piece(Coordinate::new(24, 0)), Piece::White);
        assert_eq!(board.initial_piece(Coordinate::new(8, 24)), Piece::Black);
    }

    #[test]
    fn star_rejects_odd_counts() {
        assert!(StarBoard::new(3).is_err());
        assert!(StarBoard::new(5).is_err());
    }

    #[test]
    fn custom_board_builder() {
        let board = CustomBoard::grid(3, 3)
            .place(Piece::White, &[(0, 0)])
            .end_zone(Piece::White, &[(2, 2)])
            .players(&[Piece::White]);
        assert_eq!(board.cells().len(), 9);
        assert_eq!(board.initial_piece(Coordinate::new(0, 0)), Piece::White);
        assert_eq!(board.end_zone_owner(Coordinate::new(2, 2)), Some(Piece::White));
        // Explicit end zones override the opposite-corner default.
        assert_eq!(board.end_zone_owner(Coordinate::new(0, 0)), None);
    }

    #[test]
    fn board_kind_builds_topologies() {
        let t = BoardKind::Star.topology(4).unwrap();
        assert_eq!(t.turn_order().len(), 4);
        assert!(BoardKind::Square.topology(6).is_err());
    }
}

//! Game state representation.
//!
//! `GameState` is the authoritative record of a game: who occupies every
//! cell, each player's remaining distance to victory, whose turn it is,
//! and the winner once there is one. Geometry lives in a shared
//! `BoardLayout`, so cloning a state for a search node only copies the
//! occupancy vector and a few scalars.

use std::sync::Arc;

use super::coordinate::{greedy_distance, Coordinate, Direction};
use super::layout::BoardLayout;
use super::moves::Move;
use super::piece::{Piece, PIECE_COUNT};
use super::player::Player;
use super::topology::Topology;
use crate::error::EngineError;
use crate::movegen::DestinationSearch;

/// Complete game state at a point in time.
///
/// Occupancy is stored once, as one piece per cell index; per-piece
/// position lists are derived on demand.
#[derive(Debug, Clone)]
pub struct GameState {
    layout: Arc<BoardLayout>,
    occupants: Vec<Piece>,
    players: Vec<Player>,
    /// Cached sum of `distance_to_free_end_zone` over each piece's cells.
    distances: [i32; PIECE_COUNT],
    current: usize,
    winner: Option<Piece>,
    /// Scratch for the interactive single-origin destination search.
    pub(crate) search: DestinationSearch,
}

impl GameState {
    /// Sets up a game on `topology` with `players` in turn order.
    ///
    /// Fails if the board is empty, a piece or end zone on the board has no
    /// player, a player has no pieces or no end zone, or no cell starts
    /// empty.
    pub fn new<T: Topology + ?Sized>(topology: &T, players: Vec<Player>) -> Result<Self, EngineError> {
        let mut cells = topology.cells();
        cells.sort();
        cells.dedup();
        if cells.is_empty() {
            return Err(EngineError::EmptyBoard);
        }

        let mut seated = [false; PIECE_COUNT];
        for p in &players {
            if p.piece.is_empty() {
                return Err(EngineError::UnknownPiece(p.piece));
            }
            if seated[p.piece as usize] {
                return Err(EngineError::DuplicatePlayer(p.piece));
            }
            seated[p.piece as usize] = true;
        }
        if players.is_empty() {
            return Err(EngineError::UnsupportedPlayerCount(0));
        }

        let mut occupants = Vec::with_capacity(cells.len());
        let mut owners = Vec::with_capacity(cells.len());
        for &cell in &cells {
            let piece = topology.initial_piece(cell);
            if !piece.is_empty() && !seated[piece as usize] {
                return Err(EngineError::UnknownPiece(piece));
            }
            occupants.push(piece);

            let owner = topology.end_zone_owner(cell);
            if let Some(o) = owner {
                if o.is_empty() || !seated[o as usize] {
                    return Err(EngineError::UnknownPiece(o));
                }
            }
            owners.push(owner);
        }

        let mut layout = BoardLayout::new(
            cells,
            topology.directions().to_vec(),
            owners,
            topology.max_distance(),
        );

        for p in &players {
            if !occupants.contains(&p.piece) {
                return Err(EngineError::NoPieces(p.piece));
            }
            if layout.end_zone(p.piece).is_empty() {
                return Err(EngineError::EmptyEndZone(p.piece));
            }
        }

        layout.center = find_center(&layout, &occupants).ok_or(EngineError::NoEmptyCells)?;
        for p in &players {
            layout.farthest[p.piece as usize] = find_farthest(&layout, &occupants, p.piece);
        }

        let mut state = GameState {
            layout: Arc::new(layout),
            occupants,
            players,
            distances: [0; PIECE_COUNT],
            current: 0,
            winner: None,
            search: DestinationSearch::default(),
        };
        for i in 0..state.players.len() {
            let piece = state.players[i].piece;
            state.refresh_distance(piece);
        }
        Ok(state)
    }

    /// Sets up a game with one AI player per colour in the topology's
    /// turn order.
    pub fn from_topology<T: Topology + ?Sized>(topology: &T) -> Result<Self, EngineError> {
        let players = topology.turn_order().into_iter().map(Player::ai).collect();
        GameState::new(topology, players)
    }

    // ----------------------------------------------------------------
    // Geometry
    // ----------------------------------------------------------------

    /// All cells in row-major order.
    pub fn cells(&self) -> &[Coordinate] {
        self.layout.cells()
    }

    pub fn directions(&self) -> &[Direction] {
        self.layout.directions()
    }

    pub fn contains(&self, c: Coordinate) -> bool {
        self.layout.index_of(c).is_some()
    }

    /// The empty cell nearest the mean of the empty cells at setup.
    pub fn center(&self) -> Coordinate {
        self.layout.cell(self.layout.center)
    }

    /// The end-zone cell farthest from `piece`'s starting pieces.
    pub fn farthest_end_zone(&self, piece: Piece) -> Option<Coordinate> {
        self.layout.farthest[piece as usize].map(|i| self.layout.cell(i))
    }

    pub fn max_distance(&self) -> i32 {
        self.layout.max_distance()
    }

    /// Cells of `piece`'s end zone in row-major order.
    pub fn end_zone(&self, piece: Piece) -> Vec<Coordinate> {
        self.layout.end_zone(piece).iter().map(|&i| self.layout.cell(i)).collect()
    }

    pub fn end_zone_owner(&self, c: Coordinate) -> Option<Piece> {
        self.layout.index_of(c).and_then(|i| self.layout.end_zone_owner(i))
    }

    pub fn in_end_zone(&self, piece: Piece, c: Coordinate) -> bool {
        self.end_zone_owner(c) == Some(piece)
    }

    /// Greedy step distance between two coordinates.
    ///
    /// Uses the precomputed matrix for on-board cells and walks the
    /// lattice otherwise. Not necessarily symmetric.
    pub fn distance(&self, from: Coordinate, to: Coordinate) -> i32 {
        match (self.layout.index_of(from), self.layout.index_of(to)) {
            (Some(a), Some(b)) => self.layout.distance(a, b),
            _ => greedy_distance(self.layout.directions(), from, to),
        }
    }

    /// Distance from `origin` to the nearest cell of `piece`'s end zone not
    /// already holding `piece`; 0 if `origin` is itself in that end zone.
    pub fn distance_to_free_end_zone(&self, piece: Piece, origin: Coordinate) -> i32 {
        match self.layout.index_of(origin) {
            Some(idx) => self.free_end_zone_distance(piece, idx),
            None => {
                let dirs = self.layout.directions();
                self.layout
                    .end_zone(piece)
                    .iter()
                    .filter(|&&z| self.occupants[z] != piece)
                    .map(|&z| greedy_distance(dirs, origin, self.layout.cell(z)))
                    .min()
                    .unwrap_or(0)
            }
        }
    }

    // ----------------------------------------------------------------
    // Occupancy
    // ----------------------------------------------------------------

    /// The occupant of `c`, or `None` if `c` is off the board.
    pub fn occupant(&self, c: Coordinate) -> Option<Piece> {
        self.layout.index_of(c).map(|i| self.occupants[i])
    }

    /// Cells holding `piece` (or the empty cells for `Piece::Empty`), in
    /// row-major order.
    pub fn positions(&self, piece: Piece) -> Vec<Coordinate> {
        self.occupants
            .iter()
            .enumerate()
            .filter(|(_, &p)| p == piece)
            .map(|(i, _)| self.layout.cell(i))
            .collect()
    }

    pub fn piece_count(&self, piece: Piece) -> usize {
        self.occupants.iter().filter(|&&p| p == piece).count()
    }

    /// Number of cells in `zone_owner`'s end zone holding a piece other
    /// than `piece`.
    pub fn foreign_in_end_zone(&self, zone_owner: Piece, piece: Piece) -> usize {
        self.layout
            .end_zone(zone_owner)
            .iter()
            .filter(|&&z| {
                let occ = self.occupants[z];
                !occ.is_empty() && occ != piece
            })
            .count()
    }

    // ----------------------------------------------------------------
    // Players, turns and winner
    // ----------------------------------------------------------------

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, piece: Piece) -> Option<&Player> {
        self.players.iter().find(|p| p.piece == piece)
    }

    /// Mutable access to a player's human flag and tier.
    pub fn player_mut(&mut self, piece: Piece) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.piece == piece)
    }

    pub fn current_player(&self) -> &Player {
        &self.players[self.current]
    }

    /// The player who moves after the current one.
    pub fn next_player(&self) -> &Player {
        &self.players[(self.current + 1) % self.players.len()]
    }

    /// Passes the turn to the next player in round-robin order.
    pub fn advance_turn(&mut self) {
        self.current = (self.current + 1) % self.players.len();
    }

    pub fn winner(&self) -> Option<Piece> {
        self.winner
    }

    /// Cached remaining distance of `piece`'s player.
    pub fn player_distance(&self, piece: Piece) -> i32 {
        self.distances[piece as usize]
    }

    /// True iff every cell of `piece`'s end zone is occupied and at least
    /// one of them holds `piece`.
    pub fn is_winner(&self, piece: Piece) -> bool {
        let mut own = false;
        for &z in self.layout.end_zone(piece) {
            match self.occupants[z] {
                Piece::Empty => return false,
                p if p == piece => own = true,
                _ => {}
            }
        }
        own
    }

    // ----------------------------------------------------------------
    // Mutation
    // ----------------------------------------------------------------

    /// Moves a piece from `mv.origin` to `mv.destination`.
    ///
    /// Does not check reachability: callers pick moves from move
    /// generation. Does not advance the turn. Clears the destination
    /// search and records the mover as winner if the move completes its
    /// end zone; an existing winner is never replaced.
    pub fn apply_move(&mut self, mv: &Move) -> Result<(), EngineError> {
        let expected = self.current_player().piece;
        if mv.piece != expected {
            return Err(EngineError::OutOfTurn { expected, got: mv.piece });
        }
        let from = self.layout.index_of(mv.origin).ok_or(EngineError::OffBoard(mv.origin))?;
        let to = self
            .layout
            .index_of(mv.destination)
            .ok_or(EngineError::OffBoard(mv.destination))?;
        if self.occupants[from] != mv.piece {
            return Err(EngineError::NotOwner { piece: mv.piece, at: mv.origin });
        }
        if !self.occupants[to].is_empty() {
            return Err(EngineError::Occupied(mv.destination));
        }

        let before = self.free_end_zone_distance(mv.piece, from);
        self.occupants[from] = Piece::Empty;
        self.occupants[to] = mv.piece;
        let after = self.free_end_zone_distance(mv.piece, to);

        let slot = mv.piece as usize;
        self.distances[slot] += after - before;
        // Entering or leaving the own end zone changes which zone cells
        // count as free for the mover's other pieces.
        if self.layout.end_zone_owner(from) == Some(mv.piece)
            || self.layout.end_zone_owner(to) == Some(mv.piece)
        {
            self.refresh_distance(mv.piece);
        }
        debug_assert_eq!(self.distances[slot], self.recompute_distance(mv.piece));

        self.search.clear();
        if self.winner.is_none() && self.is_winner(mv.piece) {
            self.winner = Some(mv.piece);
        }
        Ok(())
    }

    // ----------------------------------------------------------------
    // Crate-internal index access
    // ----------------------------------------------------------------

    #[inline]
    pub(crate) fn layout(&self) -> &BoardLayout {
        &self.layout
    }

    #[inline]
    pub(crate) fn occupant_at(&self, idx: usize) -> Piece {
        self.occupants[idx]
    }

    pub(crate) fn free_end_zone_distance(&self, piece: Piece, idx: usize) -> i32 {
        if self.layout.end_zone_owner(idx) == Some(piece) {
            return 0;
        }
        self.layout
            .end_zone(piece)
            .iter()
            .filter(|&&z| self.occupants[z] != piece)
            .map(|&z| self.layout.distance(idx, z))
            .min()
            .unwrap_or(0)
    }

    fn recompute_distance(&self, piece: Piece) -> i32 {
        self.occupants
            .iter()
            .enumerate()
            .filter(|(_, &p)| p == piece)
            .map(|(i, _)| self.free_end_zone_distance(piece, i))
            .sum()
    }

    fn refresh_distance(&mut self, piece: Piece) {
        self.distances[piece as usize] = self.recompute_distance(piece);
    }
}

/// Index of the empty cell closest to the mean of all empty cells.
fn find_center(layout: &BoardLayout, occupants: &[Piece]) -> Option<usize> {
    let empty: Vec<usize> = (0..layout.len()).filter(|&i| occupants[i].is_empty()).collect();
    if empty.is_empty() {
        return None;
    }
    let n = empty.len() as f64;
    let row_mean = empty.iter().map(|&i| layout.cell(i).row as f64).sum::<f64>() / n;
    let col_mean = empty.iter().map(|&i| layout.cell(i).col as f64).sum::<f64>() / n;

    let mut best: Option<(usize, f64)> = None;
    for &i in &empty {
        let c = layout.cell(i);
        let d = (c.row as f64 - row_mean).abs() + (c.col as f64 - col_mean).abs();
        if best.map_or(true, |(_, b)| d < b) {
            best = Some((i, d));
        }
    }
    best.map(|(i, _)| i)
}

/// The end-zone cell of `piece` at the greatest distance from any of its
/// starting pieces (first strict maximum).
fn find_farthest(layout: &BoardLayout, occupants: &[Piece], piece: Piece) -> Option<usize> {
    let mut best: Option<(usize, i32)> = None;
    for from in (0..layout.len()).filter(|&i| occupants[i] == piece) {
        for &z in layout.end_zone(piece) {
            let d = layout.distance(from, z);
            if best.map_or(true, |(_, b)| d > b) {
                best = Some((z, d));
            }
        }
    }
    best.map(|(z, _)| z)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::topology::{CustomBoard, SquareBoard};

    fn c(row: i32, col: i32) -> Coordinate {
        Coordinate::new(row, col)
    }

    fn square() -> GameState {
        GameState::from_topology(&SquareBoard::new(2).unwrap()).unwrap()
    }

    #[test]
    fn initial_square_state() {
        let state = square();
        assert_eq!(state.cells().len(), 100);
        assert_eq!(state.piece_count(Piece::White), 10);
        assert_eq!(state.piece_count(Piece::Black), 10);
        assert_eq!(state.piece_count(Piece::Empty), 80);
        assert_eq!(state.current_player().piece, Piece::White);
        assert_eq!(state.next_player().piece, Piece::Black);
        assert_eq!(state.winner(), None);
        assert_eq!(state.end_zone(Piece::White).len(), 10);
        assert!(state.in_end_zone(Piece::White, c(9, 9)));
        assert!(state.in_end_zone(Piece::Black, c(0, 0)));
    }

    #[test]
    fn initial_distance_is_sum_of_greedy_distances() {
        let state = square();
        for piece in [Piece::White, Piece::Black] {
            let zone = state.end_zone(piece);
            let expected: i32 = state
                .positions(piece)
                .into_iter()
                .map(|p| {
                    zone.iter()
                        .filter(|&&z| state.occupant(z) != Some(piece))
                        .map(|&z| greedy_distance(state.directions(), p, z))
                        .min()
                        .unwrap()
                })
                .sum();
            assert_eq!(state.player_distance(piece), expected, "{piece}");
            assert!(!state.is_winner(piece));
        }
        // Symmetric layout, symmetric totals.
        assert_eq!(state.player_distance(Piece::White), state.player_distance(Piece::Black));
    }

    #[test]
    fn center_and_farthest_are_fixed_at_setup() {
        let mut state = square();
        let center = state.center();
        assert_eq!(state.occupant(center), Some(Piece::Empty));
        // First cell of White's end zone at the full board span from (0,0).
        let far = state.farthest_end_zone(Piece::White).unwrap();
        assert!(state.in_end_zone(Piece::White, far));
        assert_eq!(state.distance(c(0, 0), far), 9);
        assert_eq!(far, c(6, 9));
        let black_far = state.farthest_end_zone(Piece::Black).unwrap();
        assert!(state.in_end_zone(Piece::Black, black_far));
        assert_eq!(state.distance(c(6, 9), black_far), 9);

        let mv = Move::new(c(3, 0), c(4, 0), Piece::White);
        state.apply_move(&mv).unwrap();
        assert_eq!(state.center(), center);
        assert_eq!(state.farthest_end_zone(Piece::White), Some(far));
    }

    #[test]
    fn apply_move_updates_occupancy_and_distance() {
        let mut state = square();
        let before = state.player_distance(Piece::White);
        let mv = Move::new(c(3, 0), c(4, 1), Piece::White);
        state.apply_move(&mv).unwrap();
        assert_eq!(state.occupant(c(3, 0)), Some(Piece::Empty));
        assert_eq!(state.occupant(c(4, 1)), Some(Piece::White));
        assert!(state.player_distance(Piece::White) < before);
        // Turn is advanced separately.
        assert_eq!(state.current_player().piece, Piece::White);
    }

    #[test]
    fn apply_move_rejects_bad_moves() {
        let mut state = square();
        assert_eq!(
            state.apply_move(&Move::new(c(9, 9), c(8, 8), Piece::Black)),
            Err(EngineError::OutOfTurn { expected: Piece::White, got: Piece::Black })
        );
        assert_eq!(
            state.apply_move(&Move::new(c(5, 5), c(5, 6), Piece::White)),
            Err(EngineError::NotOwner { piece: Piece::White, at: c(5, 5) })
        );
        assert_eq!(
            state.apply_move(&Move::new(c(0, 0), c(0, 1), Piece::White)),
            Err(EngineError::Occupied(c(0, 1)))
        );
        assert_eq!(
            state.apply_move(&Move::new(c(0, 3), c(-1, 3), Piece::White)),
            Err(EngineError::OffBoard(c(-1, 3)))
        );
    }

    #[test]
    fn move_then_inverse_restores_state() {
        let mut state = square();
        let white_before = state.positions(Piece::White);
        let dist_before = state.player_distance(Piece::White);
        let mv = Move::new(c(2, 1), c(3, 2), Piece::White);
        state.apply_move(&mv).unwrap();
        state.apply_move(&mv.inverse()).unwrap();
        assert_eq!(state.positions(Piece::White), white_before);
        assert_eq!(state.player_distance(Piece::White), dist_before);
    }

    #[test]
    fn turn_rotation_is_round_robin() {
        let mut state = GameState::from_topology(&SquareBoard::new(4).unwrap()).unwrap();
        let order: Vec<Piece> = (0..5)
            .map(|_| {
                let p = state.current_player().piece;
                state.advance_turn();
                p
            })
            .collect();
        assert_eq!(
            order,
            vec![Piece::White, Piece::Yellow, Piece::Black, Piece::Blue, Piece::White]
        );
    }

    fn near_win() -> GameState {
        // White needs (2,2) filled; Black sits in (2,1) of White's zone.
        let board = CustomBoard::grid(3, 3)
            .place(Piece::White, &[(1, 1), (2, 0)])
            .place(Piece::Black, &[(2, 1), (0, 2)])
            .end_zone(Piece::White, &[(2, 0), (2, 1), (2, 2)])
            .end_zone(Piece::Black, &[(0, 0), (0, 1)])
            .players(&[Piece::White, Piece::Black]);
        GameState::from_topology(&board).unwrap()
    }

    #[test]
    fn winner_requires_full_zone_with_own_piece() {
        let mut state = near_win();
        assert!(!state.is_winner(Piece::White));
        state.apply_move(&Move::new(c(1, 1), c(2, 2), Piece::White)).unwrap();
        assert!(state.is_winner(Piece::White));
        assert_eq!(state.winner(), Some(Piece::White));
    }

    #[test]
    fn winner_is_sticky() {
        let mut state = near_win();
        state.apply_move(&Move::new(c(1, 1), c(2, 2), Piece::White)).unwrap();
        state.apply_move(&Move::new(c(2, 2), c(1, 1), Piece::White)).unwrap();
        assert!(!state.is_winner(Piece::White));
        assert_eq!(state.winner(), Some(Piece::White));
    }

    #[test]
    fn zone_full_of_foreign_pieces_is_not_a_win() {
        let board = CustomBoard::grid(2, 3)
            .place(Piece::White, &[(0, 0)])
            .place(Piece::Black, &[(1, 1), (1, 2)])
            .end_zone(Piece::White, &[(1, 1), (1, 2)])
            .end_zone(Piece::Black, &[(0, 0)])
            .players(&[Piece::White, Piece::Black]);
        let state = GameState::from_topology(&board).unwrap();
        assert!(!state.is_winner(Piece::White));
        assert_eq!(state.foreign_in_end_zone(Piece::White, Piece::White), 2);
        assert_eq!(state.foreign_in_end_zone(Piece::White, Piece::Black), 0);
    }

    #[test]
    fn distance_cache_tracks_end_zone_entry() {
        let mut state = near_win();
        // (1,1) is one step from the free zone cell (2,2).
        assert_eq!(state.distance_to_free_end_zone(Piece::White, c(1, 1)), 1);
        assert_eq!(state.distance_to_free_end_zone(Piece::White, c(2, 0)), 0);
        assert_eq!(state.player_distance(Piece::White), 1);
        state.apply_move(&Move::new(c(1, 1), c(2, 2), Piece::White)).unwrap();
        assert_eq!(state.player_distance(Piece::White), 0);
    }

    #[test]
    fn setup_validation() {
        let empty = CustomBoard::default();
        assert_eq!(GameState::from_topology(&empty).unwrap_err(), EngineError::EmptyBoard);

        let no_zone = CustomBoard::grid(2, 2)
            .place(Piece::White, &[(0, 0)])
            .players(&[Piece::White]);
        assert_eq!(
            GameState::from_topology(&no_zone).unwrap_err(),
            EngineError::EmptyEndZone(Piece::White)
        );

        let stranger = CustomBoard::grid(2, 2)
            .place(Piece::White, &[(0, 0)])
            .place(Piece::Red, &[(0, 1)])
            .end_zone(Piece::White, &[(1, 1)])
            .players(&[Piece::White]);
        assert_eq!(
            GameState::from_topology(&stranger).unwrap_err(),
            EngineError::UnknownPiece(Piece::Red)
        );

        let full = CustomBoard::grid(1, 2)
            .place(Piece::White, &[(0, 0), (0, 1)])
            .end_zone(Piece::White, &[(0, 1)])
            .players(&[Piece::White]);
        assert_eq!(GameState::from_topology(&full).unwrap_err(), EngineError::NoEmptyCells);

        let twice = SquareBoard::new(2).unwrap();
        assert_eq!(
            GameState::new(&twice, vec![Player::ai(Piece::White), Player::ai(Piece::White)])
                .unwrap_err(),
            EngineError::DuplicatePlayer(Piece::White)
        );
    }

    #[test]
    fn player_flags_are_mutable() {
        let mut state = square();
        state.player_mut(Piece::Black).unwrap().human = true;
        assert!(!state.player(Piece::Black).unwrap().is_ai());
        assert!(state.player(Piece::Red).is_none());
    }
}

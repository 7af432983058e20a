//! Legal move generation.
//!
//! A piece moves either one step to a vacant neighbour or along a chain
//! of hops, each jumping an adjacent occupied cell to land on the vacant
//! cell directly beyond it. `GameState` carries a single-origin search
//! protocol for interactive consumers; the free functions here run on a
//! private scratch search and leave that protocol untouched.

mod hops;

pub(crate) use hops::DestinationSearch;

use rand::Rng;

use crate::board::{Coordinate, GameState, Move, Piece};
use crate::error::EngineError;

impl GameState {
    /// Computes the destinations reachable from `origin`.
    ///
    /// Results for a previous origin must be cleared first.
    pub fn update_destinations(&mut self, origin: Coordinate) -> Result<(), EngineError> {
        if let Some(held) = self.search.origin() {
            return Err(EngineError::SearchNotCleared(self.layout().cell(held)));
        }
        let idx = occupied_index(self, origin)?;
        let mut search = std::mem::take(&mut self.search);
        search.run(self, idx);
        self.search = search;
        Ok(())
    }

    /// The origin whose destinations are currently held, if any.
    pub fn search_origin(&self) -> Option<Coordinate> {
        self.search.origin().map(|i| self.layout().cell(i))
    }

    /// Destinations computed by the last `update_destinations`, in
    /// discovery order.
    pub fn destinations(&self) -> Result<Vec<Coordinate>, EngineError> {
        if self.search.origin().is_none() {
            return Err(EngineError::NoActiveSearch);
        }
        Ok(self.search.destinations().map(|i| self.layout().cell(i)).collect())
    }

    pub fn is_destination(&self, dest: Coordinate) -> Result<bool, EngineError> {
        if self.search.origin().is_none() {
            return Err(EngineError::NoActiveSearch);
        }
        Ok(self.layout().index_of(dest).is_some_and(|i| self.search.is_destination(i)))
    }

    /// The cells visited on the way from the searched origin to `dest`,
    /// both inclusive.
    pub fn move_chain(&self, dest: Coordinate) -> Result<Vec<Coordinate>, EngineError> {
        if self.search.origin().is_none() {
            return Err(EngineError::NoActiveSearch);
        }
        let chain = self
            .layout()
            .index_of(dest)
            .and_then(|i| self.search.chain(i))
            .ok_or(EngineError::NotADestination(dest))?;
        Ok(chain.into_iter().map(|i| self.layout().cell(i)).collect())
    }

    pub fn clear_destinations(&mut self) {
        self.search.clear();
    }
}

/// Destinations reachable from `origin`, in discovery order.
pub fn legal_destinations(state: &GameState, origin: Coordinate) -> Result<Vec<Coordinate>, EngineError> {
    let idx = occupied_index(state, origin)?;
    let mut search = DestinationSearch::default();
    search.run(state, idx);
    Ok(search.destinations().map(|i| state.layout().cell(i)).collect())
}

/// Moves for the piece at `origin`, each carrying its full chain.
pub fn legal_moves_from(state: &GameState, origin: Coordinate) -> Result<Vec<Move>, EngineError> {
    let idx = occupied_index(state, origin)?;
    let piece = state.occupant_at(idx);
    let mut search = DestinationSearch::default();
    let mut moves = Vec::new();
    collect_moves(state, piece, idx, &mut search, &mut moves);
    Ok(moves)
}

/// Every move available to `piece`: origins in board order, destinations
/// in discovery order.
pub fn all_moves(state: &GameState, piece: Piece) -> Vec<Move> {
    if piece.is_empty() {
        return Vec::new();
    }
    let mut search = DestinationSearch::default();
    let mut moves = Vec::new();
    for idx in 0..state.layout().len() {
        if state.occupant_at(idx) == piece {
            collect_moves(state, piece, idx, &mut search, &mut moves);
        }
    }
    moves
}

/// True if `piece` has at least one move.
pub fn has_legal_move(state: &GameState, piece: Piece) -> bool {
    let layout = state.layout();
    (0..layout.len()).filter(|&i| state.occupant_at(i) == piece).any(|i| {
        (0..layout.directions().len()).any(|dir| {
            let step = layout.step(i, dir, 1);
            match step {
                Some(n) if state.occupant_at(n).is_empty() => true,
                Some(_) => layout.step(i, dir, 2).is_some_and(|l| state.occupant_at(l).is_empty()),
                None => false,
            }
        })
    })
}

/// Picks a uniformly random move for `piece`, or `None` if it has none.
pub fn random_move(piece: Piece, state: &GameState, rng: &mut impl Rng) -> Option<Move> {
    let mut moves = all_moves(state, piece);
    if moves.is_empty() {
        return None;
    }
    let idx = rng.gen_range(0..moves.len());
    Some(moves.swap_remove(idx))
}

/// Cell index of `origin`, which must be on the board and hold a piece.
fn occupied_index(state: &GameState, origin: Coordinate) -> Result<usize, EngineError> {
    let idx = state.layout().index_of(origin).ok_or(EngineError::OffBoard(origin))?;
    if state.occupant_at(idx).is_empty() {
        return Err(EngineError::EmptyOrigin(origin));
    }
    Ok(idx)
}

fn collect_moves(
    state: &GameState,
    piece: Piece,
    origin: usize,
    search: &mut DestinationSearch,
    out: &mut Vec<Move>,
) {
    let layout = state.layout();
    search.run(state, origin);
    for dest in search.destinations() {
        if let Some(chain) = search.chain(dest) {
            let path = chain.into_iter().map(|i| layout.cell(i)).collect();
            out.extend(Move::with_path(piece, path));
        }
    }
    search.clear();
}

//! Candidate move filtering.
//!
//! Keeps the branching factor of the decision tree small. Each tier has
//! its own rule; a piece stuck in a crowded opponent end zone overrides
//! the tier at the root.

use crate::board::{Coordinate, GameState, Mode, Move, Piece};
use crate::eval::heuristic::{edge_delta, enters_crowded_end_zone, is_forward, is_not_backward, move_delta};

/// Maximum number of blocking-piece moves kept at the root.
pub const BLOCKING_MOVE_CAP: usize = 3;

/// Per-decision inputs that stay fixed across the whole tree.
#[derive(Debug, Clone, Copy)]
pub struct FilterContext {
    pub mode: Mode,
    /// Player the decision is made for; its farthest end-zone cell is the
    /// mid-game reference at every node, whoever moves there.
    pub acting: Piece,
    /// Acting player's mid-game flag at the root.
    pub mid_game: bool,
    pub center: Coordinate,
}

impl FilterContext {
    /// Reduces `moves` (all of one piece's moves at a node) to the ones the
    /// search expands, in expansion order.
    ///
    /// Never returns an empty list when `moves` is non-empty: if the rules
    /// remove everything, the first `mode.move_cap()` moves are kept.
    pub fn filter(&self, state: &GameState, moves: Vec<Move>, blocking: &[Coordinate]) -> Vec<Move> {
        if moves.is_empty() {
            return moves;
        }

        if !blocking.is_empty() {
            let freed = self.blocking_moves(state, &moves, blocking);
            if !freed.is_empty() {
                return freed;
            }
            log::trace!("blocking pieces cannot move forward; using {} filter", self.mode);
        }

        let kept = match self.mode {
            Mode::Easy => moves
                .iter()
                .filter(|m| is_forward(state, m))
                .take(Mode::Easy.move_cap())
                .cloned()
                .collect(),
            Mode::Endgame => moves
                .iter()
                .filter(|m| is_not_backward(state, m))
                .take(Mode::Endgame.move_cap())
                .cloned()
                .collect(),
            Mode::Normal | Mode::Hard => self.ranked(state, &moves),
        };

        if kept.is_empty() {
            log::trace!("{} filter left no moves; keeping the first {}", self.mode, self.mode.move_cap());
            let mut moves = moves;
            moves.truncate(self.mode.move_cap());
            return moves;
        }
        kept
    }

    /// Forward moves of blocking pieces, deepest first.
    fn blocking_moves(&self, state: &GameState, moves: &[Move], blocking: &[Coordinate]) -> Vec<Move> {
        let mut freed: Vec<Move> = moves
            .iter()
            .filter(|m| blocking.contains(&m.origin) && is_forward(state, m))
            .cloned()
            .collect();
        freed.sort_by_key(|m| -state.distance(m.origin, self.center));
        freed.truncate(BLOCKING_MOVE_CAP);
        freed
    }

    /// Normal and hard tiers: drop moves into crowded opponent zones, then
    /// rank by progress, origin and destination placement relative to a
    /// phase-dependent reference cell, and end-zone edge preference.
    fn ranked(&self, state: &GameState, moves: &[Move]) -> Vec<Move> {
        let mut keyed: Vec<((i32, i32, i32, i32), &Move)> = moves
            .iter()
            .filter(|m| !enters_crowded_end_zone(state, m))
            .map(|m| (self.rank_key(state, m), m))
            .collect();
        keyed.sort_by_key(|(key, _)| *key);
        keyed
            .into_iter()
            .take(self.mode.move_cap())
            .map(|(_, m)| m.clone())
            .collect()
    }

    fn rank_key(&self, state: &GameState, mv: &Move) -> (i32, i32, i32, i32) {
        let (sign, reference) = if self.mid_game {
            (1, state.farthest_end_zone(self.acting).unwrap_or(self.center))
        } else {
            (-1, self.center)
        };
        (
            move_delta(state, mv),
            sign * state.distance(mv.origin, reference),
            state.distance(mv.destination, reference),
            edge_delta(state, mv),
        )
    }
}

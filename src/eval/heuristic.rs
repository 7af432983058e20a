//! Heuristic position evaluation and phase detection.
//!
//! Scores a position from the acting player's perspective as the gap
//! between its remaining distance and the leading opponent's, and
//! classifies candidate moves for the search filters.
//!
//! All distances are the greedy step distance precomputed by the board
//! layout, so every function here is a table lookup plus a scan over at
//! most one player's pieces or one end zone.

use crate::board::{Coordinate, GameState, Move, Piece};

/// A player is in the end game once every piece is within this many steps
/// of its farthest end-zone cell.
pub const END_GAME_DISTANCE: i32 = 4;

/// A player is in the mid game once every piece is within this many steps
/// of a free end-zone cell.
pub const MID_GAME_DISTANCE: i32 = 5;

/// An end zone is crowded once it holds at least `pieces / ratio` foreign
/// pieces.
pub const CROWDED_END_ZONE_RATIO: usize = 2;

/// True if every piece of `piece` is close to its farthest end-zone cell.
pub fn is_end_game(state: &GameState, piece: Piece) -> bool {
    let Some(far) = state.farthest_end_zone(piece) else {
        return false;
    };
    state
        .positions(piece)
        .into_iter()
        .all(|p| state.distance(p, far) <= END_GAME_DISTANCE)
}

pub fn is_mid_game(state: &GameState, piece: Piece) -> bool {
    state
        .positions(piece)
        .into_iter()
        .all(|p| state.distance_to_free_end_zone(piece, p) <= MID_GAME_DISTANCE)
}

/// The opponent with the smallest remaining distance (first in turn order
/// on ties), or `None` for a solo game.
pub fn leading_opponent(state: &GameState, acting: Piece) -> Option<Piece> {
    let mut best: Option<(Piece, i32)> = None;
    for p in state.players() {
        if p.piece == acting {
            continue;
        }
        let d = state.player_distance(p.piece);
        if best.map_or(true, |(_, b)| d < b) {
            best = Some((p.piece, d));
        }
    }
    best.map(|(p, _)| p)
}

/// Acting player's remaining distance minus the leading opponent's.
/// Lower is better for the acting player.
#[inline]
pub fn heuristic(state: &GameState, acting: Piece, leading: Option<Piece>) -> i32 {
    let opponent = leading.map_or(0, |p| state.player_distance(p));
    state.player_distance(acting) - opponent
}

/// Score of a position where the acting player has won with `height` plies
/// of search remaining. Below any heuristic value, and lower for wins
/// found closer to the root.
pub fn win_score(state: &GameState, acting: Piece, height: u32) -> i32 {
    let pieces = state.piece_count(acting) as i32;
    let players = state.players().len() as i32;
    -(height as i32) - state.max_distance() * pieces * players
}

/// True if `zone_owner`'s end zone holds at least half as many pieces
/// foreign to `piece` as `piece` has on the board.
pub fn is_crowded(state: &GameState, zone_owner: Piece, piece: Piece) -> bool {
    state.foreign_in_end_zone(zone_owner, piece) >= state.piece_count(piece) / CROWDED_END_ZONE_RATIO
}

/// Cells of `piece` stuck in a crowded opponent end zone, deepest (farthest
/// from the center) first.
pub fn blocking_positions(state: &GameState, piece: Piece) -> Vec<Coordinate> {
    let mut blocking: Vec<Coordinate> = state
        .positions(piece)
        .into_iter()
        .filter(|&p| match state.end_zone_owner(p) {
            Some(owner) if owner != piece => is_crowded(state, owner, piece),
            _ => false,
        })
        .collect();
    let center = state.center();
    blocking.sort_by_key(|&p| -state.distance(p, center));
    blocking
}

/// Change in distance to a free end-zone cell; negative moves forward.
#[inline]
pub fn move_delta(state: &GameState, mv: &Move) -> i32 {
    state.distance_to_free_end_zone(mv.piece, mv.destination)
        - state.distance_to_free_end_zone(mv.piece, mv.origin)
}

/// Destination strictly closer to a free end-zone cell than the origin.
#[inline]
pub fn is_forward(state: &GameState, mv: &Move) -> bool {
    move_delta(state, mv) < 0
}

/// Destination no farther from a free end-zone cell than the origin.
#[inline]
pub fn is_not_backward(state: &GameState, mv: &Move) -> bool {
    move_delta(state, mv) <= 0
}

/// Distance from the destination to the center, negated inside the
/// mover's own end zone and zero outside every end zone.
pub fn edge_delta(state: &GameState, mv: &Move) -> i32 {
    match state.end_zone_owner(mv.destination) {
        Some(owner) => {
            let d = state.distance(mv.destination, state.center());
            if owner == mv.piece {
                -d
            } else {
                d
            }
        }
        None => 0,
    }
}

/// True if the move enters a crowded opponent end zone from outside it.
pub fn enters_crowded_end_zone(state: &GameState, mv: &Move) -> bool {
    match state.end_zone_owner(mv.destination) {
        Some(owner) if owner != mv.piece => {
            state.end_zone_owner(mv.origin) != Some(owner) && is_crowded(state, owner, mv.piece)
        }
        _ => false,
    }
}

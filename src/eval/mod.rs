//! Position evaluation.
//!
//! Scores a position from the acting player's perspective and classifies
//! game phase and candidate moves for the search.

pub mod heuristic;

pub use heuristic::{
    blocking_positions, heuristic, is_end_game, is_mid_game, leading_opponent, win_score,
};

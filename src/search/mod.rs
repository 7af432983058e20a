//! Search and move selection.
//!
//! Builds a bounded-depth decision tree over filtered candidate moves and
//! returns the best move for the requested quality tier.

pub mod filter;
pub mod minimax;

pub use filter::FilterContext;
pub use minimax::{decide_move, Minimax, SearchConfig, SearchResult, TieBreak};

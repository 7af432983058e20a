//! Sternhalma engine library.
//!
//! Rules engine and AI for star/square halma games: board topologies,
//! game state, hop-chain move generation, heuristic evaluation and an
//! N-player minimax search, plus a session facade and self-play runner.

pub mod board;
pub mod engine;
pub mod error;
pub mod eval;
pub mod movegen;
pub mod search;
pub mod selfplay;

pub use board::{GameState, Mode, Move, Piece, Player};
pub use engine::{Engine, EngineOptions};
pub use error::EngineError;
pub use search::decide_move;

//! Board representation and game-state types.
//!
//! Contains coordinates, pieces, players, moves, board topologies and the
//! authoritative game state.

pub mod coordinate;
pub(crate) mod layout;
pub mod moves;
pub mod piece;
pub mod player;
pub mod state;
pub mod topology;

pub use coordinate::{greedy_distance, Coordinate, Direction};
pub use moves::Move;
pub use piece::{Piece, PIECE_COUNT, PLAYER_PIECES};
pub use player::{Mode, Player};
pub use state::GameState;
pub use topology::{BoardKind, CustomBoard, SquareBoard, StarBoard, Topology};

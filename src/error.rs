//! Engine error type.
//!
//! Every variant is a caller precondition violation or an internal fault.
//! Nothing here is transient: retrying the same call yields the same error.

use crate::board::{Coordinate, Piece};

/// Errors returned by board construction, move application, the
/// destination search protocol, and the AI.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("board has no cells")]
    EmptyBoard,

    #[error("board has no empty cell to anchor the center")]
    NoEmptyCells,

    #[error("{0} players are not supported on this board")]
    UnsupportedPlayerCount(usize),

    #[error("piece {0} is not in the player roster")]
    UnknownPiece(Piece),

    #[error("piece {0} appears twice in the player roster")]
    DuplicatePlayer(Piece),

    #[error("player {0} has no pieces on the board")]
    NoPieces(Piece),

    #[error("player {0} has an empty end zone")]
    EmptyEndZone(Piece),

    #[error("coordinate {0} is not on the board")]
    OffBoard(Coordinate),

    #[error("it is {expected}'s turn, not {got}'s")]
    OutOfTurn { expected: Piece, got: Piece },

    #[error("no piece at {0}")]
    EmptyOrigin(Coordinate),

    #[error("{piece} has no piece at {at}")]
    NotOwner { piece: Piece, at: Coordinate },

    #[error("destination {0} is occupied")]
    Occupied(Coordinate),

    #[error("destinations for {0} must be cleared before starting a new search")]
    SearchNotCleared(Coordinate),

    #[error("no destination search has been computed")]
    NoActiveSearch,

    #[error("{0} is not a destination of the current search")]
    NotADestination(Coordinate),

    #[error("game is over, {0} has won")]
    GameOver(Piece),

    #[error("{0} has no legal move")]
    NoLegalMoves(Piece),

    #[error("search produced no root child matching the root value {0}")]
    BrokenSearch(i32),

    #[error("unknown option '{0}'")]
    UnknownOption(String),

    #[error("invalid value '{value}' for option '{name}'")]
    InvalidOption { name: String, value: String },

    #[error("invalid configuration: {0}")]
    Config(String),
}

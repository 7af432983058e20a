//! Engine session management.
//!
//! Holds the current game, the player roster and the engine options, and
//! runs the AI for the player to move. Options can be set as a typed
//! struct, loaded from JSON, or changed one at a time by name.

use serde::{Deserialize, Serialize};

use crate::board::{BoardKind, Coordinate, GameState, Mode, Move, Piece, Player};
use crate::error::EngineError;
use crate::movegen::{all_moves, legal_destinations, legal_moves_from};
use crate::search::{Minimax, SearchConfig, SearchResult, TieBreak};

/// Settings for new games and AI decisions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineOptions {
    pub board: BoardKind,
    pub players: usize,
    /// Tier given to AI players at the start of a game.
    pub mode: Mode,
    /// Pieces controlled by a human at the start of a game.
    pub humans: Vec<Piece>,
    pub search: SearchConfig,
}

impl Default for EngineOptions {
    fn default() -> Self {
        EngineOptions {
            board: BoardKind::Square,
            players: 2,
            mode: Mode::Normal,
            humans: Vec::new(),
            search: SearchConfig::default(),
        }
    }
}

impl EngineOptions {
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        serde_json::from_str(json).map_err(|e| EngineError::Config(e.to_string()))
    }
}

/// A game in progress.
pub struct Engine {
    state: GameState,
    options: EngineOptions,
    history: Vec<Move>,
}

impl Engine {
    /// Starts a game as described by `options`.
    pub fn new(options: EngineOptions) -> Result<Self, EngineError> {
        let state = build_state(&options)?;
        Ok(Engine { state, options, history: Vec::new() })
    }

    /// Wraps an already set-up game, such as one built from a custom
    /// topology.
    pub fn from_state(state: GameState, options: EngineOptions) -> Self {
        Engine { state, options, history: Vec::new() }
    }

    /// Discards the current game and starts a fresh one from the options.
    pub fn new_game(&mut self) -> Result<(), EngineError> {
        self.state = build_state(&self.options)?;
        self.history.clear();
        Ok(())
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Moves played so far, in order.
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    pub fn current_player(&self) -> Player {
        *self.state.current_player()
    }

    pub fn winner(&self) -> Option<Piece> {
        self.state.winner()
    }

    /// Every move available to the player to move.
    pub fn legal_moves(&self) -> Vec<Move> {
        all_moves(&self.state, self.state.current_player().piece)
    }

    pub fn legal_destinations(&self, origin: Coordinate) -> Result<Vec<Coordinate>, EngineError> {
        legal_destinations(&self.state, origin)
    }

    /// Plays `mv` for the player to move and passes the turn on.
    ///
    /// The move must be reachable from its origin; a missing path is
    /// filled in from move generation. The turn stays with the winner once
    /// the game is decided.
    pub fn play(&mut self, mv: &Move) -> Result<(), EngineError> {
        if let Some(winner) = self.state.winner() {
            return Err(EngineError::GameOver(winner));
        }
        let expected = self.state.current_player().piece;
        if mv.piece != expected {
            return Err(EngineError::OutOfTurn { expected, got: mv.piece });
        }
        let generated = legal_moves_from(&self.state, mv.origin)?
            .into_iter()
            .find(|m| m.piece == mv.piece && m.destination == mv.destination)
            .ok_or(EngineError::NotADestination(mv.destination))?;

        self.state.apply_move(&generated)?;
        self.history.push(generated);
        if self.state.winner().is_none() {
            self.state.advance_turn();
        }
        Ok(())
    }

    /// Runs the AI for the player to move at that player's tier.
    pub fn ai_move(&self) -> Result<SearchResult, EngineError> {
        if let Some(winner) = self.state.winner() {
            return Err(EngineError::GameOver(winner));
        }
        let player = self.state.current_player();
        Minimax::new(&self.state, player.mode, self.options.search).search(&self.state)
    }

    /// Plays one AI turn. Returns `None` without moving if the player to
    /// move is human.
    pub fn step(&mut self) -> Result<Option<Move>, EngineError> {
        if !self.state.current_player().is_ai() {
            return Ok(None);
        }
        let result = self.ai_move()?;
        self.play(&result.mv)?;
        Ok(Some(result.mv))
    }

    pub fn set_human(&mut self, piece: Piece, human: bool) -> Result<(), EngineError> {
        let player = self.state.player_mut(piece).ok_or(EngineError::UnknownPiece(piece))?;
        player.human = human;
        Ok(())
    }

    pub fn set_mode(&mut self, piece: Piece, mode: Mode) -> Result<(), EngineError> {
        let player = self.state.player_mut(piece).ok_or(EngineError::UnknownPiece(piece))?;
        player.mode = mode;
        Ok(())
    }

    /// Sets an option by name.
    ///
    /// `Board` and `Players` take effect at the next `new_game`; `Mode`
    /// also retunes every AI player in the current game.
    pub fn set_option(&mut self, name: &str, value: &str) -> Result<(), EngineError> {
        let invalid = || EngineError::InvalidOption { name: name.to_string(), value: value.to_string() };
        match name {
            "Board" => {
                self.options.board = match value {
                    "square" => BoardKind::Square,
                    "star" => BoardKind::Star,
                    _ => return Err(invalid()),
                };
            }
            "Players" => {
                self.options.players = value.parse().map_err(|_| invalid())?;
            }
            "Mode" => {
                let mode = Mode::from_name(value).ok_or_else(invalid)?;
                self.options.mode = mode;
                let ai: Vec<Piece> = self.state.players().iter().filter(|p| p.is_ai()).map(|p| p.piece).collect();
                for piece in ai {
                    self.set_mode(piece, mode)?;
                }
            }
            "TieBreak" => {
                self.options.search.tie_break = match value {
                    "first" => TieBreak::FirstFound,
                    seed => TieBreak::Seeded(seed.parse().map_err(|_| invalid())?),
                };
            }
            "Parallel" => {
                self.options.search.parallel = value.parse().map_err(|_| invalid())?;
            }
            _ => return Err(EngineError::UnknownOption(name.to_string())),
        }
        Ok(())
    }
}

fn build_state(options: &EngineOptions) -> Result<GameState, EngineError> {
    let topology = options.board.topology(options.players)?;
    let players = topology
        .turn_order()
        .into_iter()
        .map(|piece| {
            if options.humans.contains(&piece) {
                Player::human(piece).with_mode(options.mode)
            } else {
                Player::ai(piece).with_mode(options.mode)
            }
        })
        .collect();
    GameState::new(topology.as_ref(), players)
}

//! Self-play game generation.
//!
//! Plays AI-only games on a standard board until a player wins or a ply
//! cap is reached, recording every move with its full path and the final
//! distance totals. Games can run concurrently on a rayon pool; each game
//! is seeded from the run seed and its index, so a run reproduces exactly
//! regardless of thread count.

use std::io::Write;
use std::time::Instant;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::board::{BoardKind, Mode, Move, Piece, Player};
use crate::engine::{Engine, EngineOptions};
use crate::error::EngineError;
use crate::movegen::{has_legal_move, random_move};
use crate::search::SearchConfig;

/// Configuration for self-play game generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelfPlayConfig {
    pub num_games: usize,
    pub board: BoardKind,
    pub players: usize,
    /// Tier used by every player.
    pub mode: Mode,
    /// Games still undecided after this many plies are recorded unfinished.
    pub max_plies: usize,
    /// Probability of playing a uniformly random move instead of the AI's.
    pub exploration: f64,
    /// Number of parallel threads for concurrent games.
    pub threads: usize,
    /// Random seed (0 = use entropy).
    pub seed: u64,
    /// Suppress per-game progress logging.
    pub quiet: bool,
    pub search: SearchConfig,
}

impl Default for SelfPlayConfig {
    fn default() -> Self {
        SelfPlayConfig {
            num_games: 10,
            board: BoardKind::Square,
            players: 2,
            mode: Mode::Normal,
            max_plies: 400,
            exploration: 0.0,
            threads: 4,
            seed: 0,
            quiet: false,
            search: SearchConfig::default(),
        }
    }
}

impl SelfPlayConfig {
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        serde_json::from_str(json).map_err(|e| EngineError::Config(e.to_string()))
    }

    fn engine_options(&self) -> EngineOptions {
        EngineOptions {
            board: self.board,
            players: self.players,
            mode: self.mode,
            humans: Vec::new(),
            search: self.search,
        }
    }
}

/// A complete self-play game record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub game_id: usize,
    pub board: BoardKind,
    pub players: Vec<Player>,
    pub moves: Vec<Move>,
    pub winner: Option<Piece>,
    /// Set when the player to move had no legal move.
    pub stalled: bool,
    /// Remaining distance of every player at the end, in turn order.
    pub final_distances: Vec<(Piece, i32)>,
}

impl GameRecord {
    pub fn plies(&self) -> usize {
        self.moves.len()
    }
}

fn game_rng(config: &SelfPlayConfig, game_id: usize) -> SmallRng {
    if config.seed != 0 {
        SmallRng::seed_from_u64(config.seed.wrapping_add(game_id as u64))
    } else {
        SmallRng::from_entropy()
    }
}

/// Plays a single self-play game and returns the game record.
pub fn play_game(config: &SelfPlayConfig, game_id: usize, rng: &mut SmallRng) -> Result<GameRecord, EngineError> {
    let mut engine = Engine::new(config.engine_options())?;
    let mut stalled = false;

    while engine.winner().is_none() && engine.history().len() < config.max_plies {
        let piece = engine.current_player().piece;
        if !has_legal_move(engine.state(), piece) {
            stalled = true;
            break;
        }
        let explore = config.exploration > 0.0 && rng.gen::<f64>() < config.exploration;
        let mv = if explore {
            random_move(piece, engine.state(), rng).ok_or(EngineError::NoLegalMoves(piece))?
        } else {
            engine.ai_move()?.mv
        };
        engine.play(&mv)?;
    }

    let state = engine.state();
    Ok(GameRecord {
        game_id,
        board: config.board,
        players: state.players().to_vec(),
        moves: engine.history().to_vec(),
        winner: state.winner(),
        stalled,
        final_distances: state.players().iter().map(|p| (p.piece, state.player_distance(p.piece))).collect(),
    })
}

fn play_logged(config: &SelfPlayConfig, game_id: usize) -> Result<GameRecord, EngineError> {
    let start = Instant::now();
    let mut rng = game_rng(config, game_id);
    let game = play_game(config, game_id, &mut rng)?;
    if !config.quiet {
        let outcome = match game.winner {
            Some(w) => format!("{w} wins"),
            None if game.stalled => "stalled".to_string(),
            None => "unfinished".to_string(),
        };
        log::info!(
            "game {}/{}: {} in {} plies ({:.1}s)",
            game_id + 1,
            config.num_games,
            outcome,
            game.plies(),
            start.elapsed().as_secs_f64()
        );
    }
    Ok(game)
}

/// Runs self-play generation, returning records in game order.
///
/// When `config.threads > 1`, games are played concurrently using rayon.
pub fn run_self_play(config: &SelfPlayConfig) -> Result<Vec<GameRecord>, EngineError> {
    if config.threads > 1 {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.threads)
            .build()
            .map_err(|e| EngineError::Config(e.to_string()))?;
        pool.install(|| {
            (0..config.num_games)
                .into_par_iter()
                .map(|i| play_logged(config, i))
                .collect()
        })
    } else {
        (0..config.num_games).map(|i| play_logged(config, i)).collect()
    }
}

/// Writes game records as JSONL (one JSON object per game, one per line).
pub fn write_jsonl<W: Write>(games: &[GameRecord], out: &mut W) -> std::io::Result<()> {
    for game in games {
        serde_json::to_writer(&mut *out, game)?;
        writeln!(out)?;
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quick(num_games: usize, threads: usize, seed: u64) -> SelfPlayConfig {
        SelfPlayConfig {
            num_games,
            mode: Mode::Easy,
            max_plies: 30,
            exploration: 0.2,
            threads,
            seed,
            quiet: true,
            ..Default::default()
        }
    }

    #[test]
    fn play_single_game_respects_ply_cap() {
        let config = quick(1, 1, 42);
        let mut rng = SmallRng::seed_from_u64(42);
        let game = play_game(&config, 0, &mut rng).unwrap();
        assert!(game.plies() <= config.max_plies);
        assert_eq!(game.players.len(), 2);
        assert_eq!(game.final_distances.len(), 2);
        // Turns alternate.
        for (i, mv) in game.moves.iter().enumerate() {
            let expected = if i % 2 == 0 { Piece::White } else { Piece::Black };
            assert_eq!(mv.piece, expected);
            assert!(mv.path.is_some());
        }
    }

    #[test]
    fn replaying_a_record_reproduces_the_final_position() {
        let config = quick(1, 1, 7);
        let game = run_self_play(&config).unwrap().remove(0);
        let mut engine = Engine::new(config.engine_options()).unwrap();
        for mv in &game.moves {
            engine.play(mv).unwrap();
        }
        let state = engine.state();
        for &(piece, dist) in &game.final_distances {
            assert_eq!(state.player_distance(piece), dist);
        }
        assert_eq!(engine.winner(), game.winner);
    }

    #[test]
    fn sequential_and_parallel_runs_agree() {
        let sequential = run_self_play(&quick(3, 1, 99)).unwrap();
        let parallel = run_self_play(&quick(3, 2, 99)).unwrap();
        assert_eq!(sequential.len(), 3);
        assert_eq!(sequential, parallel);
        for (i, game) in parallel.iter().enumerate() {
            assert_eq!(game.game_id, i);
        }
    }

    #[test]
    fn star_board_six_players() {
        let config = SelfPlayConfig {
            board: BoardKind::Star,
            players: 6,
            max_plies: 12,
            ..quick(1, 1, 5)
        };
        let game = run_self_play(&config).unwrap().remove(0);
        assert_eq!(game.players.len(), 6);
        assert_eq!(game.plies(), 12);
    }

    #[test]
    fn jsonl_output_is_valid() {
        let games = run_self_play(&quick(2, 1, 11)).unwrap();
        let mut buf = Vec::new();
        write_jsonl(&games, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        for (line, game) in lines.iter().zip(&games) {
            let parsed: GameRecord = serde_json::from_str(line).unwrap();
            assert_eq!(&parsed, game);
        }
    }

    #[test]
    fn config_from_json() {
        let config = SelfPlayConfig::from_json(r#"{"num_games":2,"board":"star","mode":"hard"}"#).unwrap();
        assert_eq!(config.num_games, 2);
        assert_eq!(config.board, BoardKind::Star);
        assert_eq!(config.mode, Mode::Hard);
        assert_eq!(config.max_plies, SelfPlayConfig::default().max_plies);
    }
}

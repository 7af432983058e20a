//! Multi-player minimax.
//!
//! The N-player game is reduced to two roles: the acting player minimizes
//! the heuristic and every other mover maximizes it, with the leading
//! opponent fixed once per decision. Near the end of a game the search
//! switches to a self-sufficient mode where every ply is the acting
//! player's own move.
//!
//! The decision tree lives in an arena (`DecisionTree`); each node's state
//! is a clone of its parent's with one move applied, dropped once the
//! node's value is known.

use std::time::{Duration, Instant};

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::board::{Coordinate, GameState, Mode, Move, Piece};
use crate::error::EngineError;
use crate::eval::heuristic::{blocking_positions, heuristic, is_end_game, is_mid_game, leading_opponent, win_score};
use crate::movegen::all_moves;

use super::filter::FilterContext;

/// How the root picks among children sharing the best value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// First in generation order.
    #[default]
    FirstFound,
    /// Uniformly random, reproducible from the seed.
    Seeded(u64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub tie_break: TieBreak,
    /// Evaluate root children on the rayon thread pool.
    pub parallel: bool,
}

/// Outcome of one decision.
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub mv: Move,
    pub score: i32,
    pub nodes: u64,
    pub depth: u32,
    /// Tier actually searched (`Endgame` when forced by the position).
    pub mode: Mode,
    pub elapsed: Duration,
}

#[derive(Debug)]
struct DecisionNode {
    mv: Option<Move>,
    value: i32,
    children: Vec<usize>,
}

/// Arena-backed decision tree for one search.
#[derive(Debug, Default)]
struct DecisionTree {
    nodes: Vec<DecisionNode>,
}

impl DecisionTree {
    fn with_root(mv: Option<Move>) -> Self {
        DecisionTree { nodes: vec![DecisionNode { mv, value: 0, children: Vec::new() }] }
    }

    fn add_child(&mut self, parent: usize, mv: Move) -> usize {
        let id = self.nodes.len();
        self.nodes.push(DecisionNode { mv: Some(mv), value: 0, children: Vec::new() });
        self.nodes[parent].children.push(id);
        id
    }

    /// Appends `sub` under `parent`, returning the index of its root.
    fn graft(&mut self, parent: usize, sub: DecisionTree) -> usize {
        let offset = self.nodes.len();
        for mut node in sub.nodes {
            for child in &mut node.children {
                *child += offset;
            }
            self.nodes.push(node);
        }
        self.nodes[parent].children.push(offset);
        offset
    }

    fn len(&self) -> usize {
        self.nodes.len()
    }
}

/// Minimax search tuned to one position and one acting player.
#[derive(Debug, Clone)]
pub struct Minimax {
    acting: Piece,
    leading: Option<Piece>,
    end_game: bool,
    depth: u32,
    filter: FilterContext,
    blocking: Vec<Coordinate>,
    config: SearchConfig,
}

impl Minimax {
    /// Prepares a search for the current player of `state` at `mode`.
    ///
    /// Phase, leading opponent and blocking pieces are read from `state`
    /// here and stay fixed for the whole search.
    pub fn new(state: &GameState, mode: Mode, config: SearchConfig) -> Self {
        let acting = state.current_player().piece;
        let end_game = mode == Mode::Endgame || is_end_game(state, acting);
        let mode = if end_game { Mode::Endgame } else { mode };
        Minimax {
            acting,
            leading: leading_opponent(state, acting),
            end_game,
            depth: mode.depth(),
            filter: FilterContext { mode, acting, mid_game: is_mid_game(state, acting), center: state.center() },
            blocking: blocking_positions(state, acting),
            config,
        }
    }

    pub fn acting(&self) -> Piece {
        self.acting
    }

    pub fn leading_opponent(&self) -> Option<Piece> {
        self.leading
    }

    pub fn mode(&self) -> Mode {
        self.filter.mode
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Runs the search from `state` and returns the chosen move.
    pub fn search(&self, state: &GameState) -> Result<SearchResult, EngineError> {
        let start = Instant::now();
        let moves = all_moves(state, self.acting);
        if moves.is_empty() {
            return Err(EngineError::NoLegalMoves(self.acting));
        }
        let candidates = self.filter.filter(state, moves, &self.blocking);

        // Children in generation order; expansion stops at the first
        // immediate win.
        let mut children = Vec::with_capacity(candidates.len());
        let mut winning = None;
        for mv in candidates {
            let (child, next) = self.play(state, &mv)?;
            if child.is_winner(self.acting) {
                winning = Some(mv);
                break;
            }
            children.push((mv, child, next));
        }

        let height = self.depth.saturating_sub(1);
        let subtrees: Vec<(DecisionTree, i32)> = if self.config.parallel {
            children
                .into_par_iter()
                .map(|(mv, child, next)| self.subtree(mv, &child, next, height))
                .collect::<Result<_, _>>()?
        } else {
            children
                .into_iter()
                .map(|(mv, child, next)| self.subtree(mv, &child, next, height))
                .collect::<Result<_, _>>()?
        };

        let mut tree = DecisionTree::with_root(None);
        let mut best = i32::MAX;
        for (sub, value) in subtrees {
            tree.graft(0, sub);
            best = best.min(value);
        }
        if let Some(mv) = winning {
            let id = tree.add_child(0, mv);
            let value = win_score(state, self.acting, self.depth);
            tree.nodes[id].value = value;
            best = best.min(value);
        }
        tree.nodes[0].value = best;

        let mv = self.pick(&tree)?;
        let result = SearchResult {
            mv,
            score: best,
            nodes: tree.len() as u64,
            depth: self.depth,
            mode: self.filter.mode,
            elapsed: start.elapsed(),
        };
        log::debug!(
            "{} {} depth {} nodes {} score {} time {}ms move {}",
            self.acting,
            result.mode,
            result.depth,
            result.nodes,
            result.score,
            result.elapsed.as_millis(),
            result.mv
        );
        Ok(result)
    }

    /// Root child whose value equals the root's.
    fn pick(&self, tree: &DecisionTree) -> Result<Move, EngineError> {
        let root = &tree.nodes[0];
        let matching: Vec<usize> = root
            .children
            .iter()
            .copied()
            .filter(|&c| tree.nodes[c].value == root.value)
            .collect();
        let chosen = match self.config.tie_break {
            TieBreak::FirstFound => matching.first().copied(),
            TieBreak::Seeded(seed) if !matching.is_empty() => {
                let mut rng = SmallRng::seed_from_u64(seed);
                Some(matching[rng.gen_range(0..matching.len())])
            }
            TieBreak::Seeded(_) => None,
        };
        chosen
            .and_then(|c| tree.nodes[c].mv.clone())
            .ok_or(EngineError::BrokenSearch(root.value))
    }

    /// Clones `state`, applies `mv` and hands the turn on. Returns the
    /// child state and the piece that moves next.
    fn play(&self, state: &GameState, mv: &Move) -> Result<(GameState, Piece), EngineError> {
        let mut child = state.clone();
        child.apply_move(mv)?;
        if self.end_game {
            return Ok((child, self.acting));
        }
        child.advance_turn();
        let next = child.current_player().piece;
        Ok((child, next))
    }

    fn subtree(
        &self,
        mv: Move,
        state: &GameState,
        mover: Piece,
        height: u32,
    ) -> Result<(DecisionTree, i32), EngineError> {
        let mut tree = DecisionTree::with_root(Some(mv));
        let value = self.expand(&mut tree, 0, state, mover, height)?;
        Ok((tree, value))
    }

    /// Fills in `node` (whose position is `state`, with `mover` to play)
    /// and returns its value.
    fn expand(
        &self,
        tree: &mut DecisionTree,
        node: usize,
        state: &GameState,
        mover: Piece,
        height: u32,
    ) -> Result<i32, EngineError> {
        if height == 0 {
            let value = heuristic(state, self.acting, self.leading);
            tree.nodes[node].value = value;
            return Ok(value);
        }

        let moves = all_moves(state, mover);
        if moves.is_empty() {
            let value = heuristic(state, self.acting, self.leading);
            tree.nodes[node].value = value;
            return Ok(value);
        }

        let minimize = mover == self.acting;
        let mut value = if minimize { i32::MAX } else { i32::MIN };
        for mv in self.filter.filter(state, moves, &[]) {
            let (child_state, next) = self.play(state, &mv)?;
            let child = tree.add_child(node, mv);
            if minimize && child_state.is_winner(self.acting) {
                let win = win_score(state, self.acting, height);
                tree.nodes[child].value = win;
                value = win;
                break;
            }
            let v = self.expand(tree, child, &child_state, next, height - 1)?;
            value = if minimize { value.min(v) } else { value.max(v) };
        }
        tree.nodes[node].value = value;
        Ok(value)
    }
}

/// Picks a move for the current player of `state` at quality tier `mode`.
pub fn decide_move(state: &GameState, mode: Mode) -> Result<Move, EngineError> {
    Minimax::new(state, mode, SearchConfig::default()).search(state).map(|r| r.mv)
}

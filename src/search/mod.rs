//! The three solving strategies and the plumbing they share.
//!
//! - `bfs`: single-direction breadth-first search, move-count optimal.
//! - `bidirectional`: two layer-synchronous breadth-first searches meeting in the middle,
//!   also move-count optimal.
//! - `annealing`: Metropolis random walk on the Manhattan energy; neither optimal nor
//!   guaranteed to finish.
//!
//! Every call owns its own visited sets and parent arenas; nothing is shared between calls.

pub mod annealing;
pub mod bfs;
pub mod bidirectional;

use crate::error::PuzzleError;
use crate::puzzle::{off_board, Move, State};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use annealing::AnnealingSchedule;

/// Comfortably above the 181,440 states reachable from any 8-puzzle board.
pub const DEFAULT_MAX_EXPANSIONS: usize = 500_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    Bfs,
    Bidirectional,
    SimulatedAnnealing,
}

impl Strategy {
    pub const ALL: [Strategy; 3] = [Strategy::Bfs, Strategy::Bidirectional, Strategy::SimulatedAnnealing];

    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Bfs => "bfs",
            Strategy::Bidirectional => "bidirectional",
            Strategy::SimulatedAnnealing => "simulated_annealing",
        }
    }

    /// Whether a returned solution is guaranteed to be the shortest one.
    pub fn is_optimal(&self) -> bool {
        !matches!(self, Strategy::SimulatedAnnealing)
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Strategy {
    type Err = PuzzleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "bfs" | "breadth_first" => Ok(Strategy::Bfs),
            "bidirectional" | "bidi" => Ok(Strategy::Bidirectional),
            "simulated_annealing" | "annealing" | "sa" => Ok(Strategy::SimulatedAnnealing),
            _ => Err(PuzzleError::InvalidStrategy(s.to_string())),
        }
    }
}

/// Per-call tunables. `max_expansions` bounds the two exhaustive searches,
/// `annealing` carries its own iteration bound.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    pub max_expansions: Option<usize>,
    pub annealing: AnnealingSchedule,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_expansions: Some(DEFAULT_MAX_EXPANSIONS),
            annealing: AnnealingSchedule::default(),
        }
    }
}

impl SearchConfig {
    pub fn unbounded() -> Self {
        Self {
            max_expansions: None,
            ..Self::default()
        }
    }
}

/// A move sequence from the start state to the goal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Solution {
    pub strategy: Strategy,
    pub moves: Vec<Move>,
    /// Nodes expanded (exhaustive searches) or iterations run (annealing).
    pub explored: usize,
}

impl Solution {
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    /// Empty means the start already was the goal.
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Every state along the way, `start` first. Fails on the first move that
    /// would push the blank off the board.
    pub fn states(&self, start: &State) -> Result<Vec<State>, PuzzleError> {
        let mut current = *start;
        let mut states = Vec::with_capacity(self.moves.len() + 1);
        states.push(current);
        for (i, &dir) in self.moves.iter().enumerate() {
            current = current.try_move(dir).ok_or_else(|| off_board(i, dir))?;
            states.push(current);
        }
        Ok(states)
    }
}

/// Runs `strategy` from `start` towards `goal`.
///
/// Fails with `Unreachable` before searching when the two boards have different
/// permutation parity. `rng` is only consulted by simulated annealing.
pub fn solve<R: Rng + ?Sized>(
    start: &State,
    goal: &State,
    strategy: Strategy,
    config: &SearchConfig,
    rng: &mut R,
) -> Result<Solution, PuzzleError> {
    if !start.same_parity(goal) {
        return Err(PuzzleError::Unreachable);
    }

    match strategy {
        Strategy::Bfs => bfs::search(start, goal, config.max_expansions),
        Strategy::Bidirectional => bidirectional::search(start, goal, config.max_expansions),
        Strategy::SimulatedAnnealing => annealing::search(start, goal, &config.annealing, rng),
    }
}

struct Node {
    state: State,
    parent: Option<(usize, Move)>,
}

/// Arena of discovered states; each node points at its parent by index.
pub(crate) struct SearchTree {
    nodes: Vec<Node>,
}

impl SearchTree {
    pub(crate) fn new(root: State) -> Self {
        Self {
            nodes: vec![Node { state: root, parent: None }],
        }
    }

    pub(crate) fn push(&mut self, state: State, parent: usize, dir: Move) -> usize {
        self.nodes.push(Node {
            state,
            parent: Some((parent, dir)),
        });
        self.nodes.len() - 1
    }

    pub(crate) fn state(&self, id: usize) -> State {
        self.nodes[id].state
    }

    /// Moves leading from the root to `id`, in forward order.
    pub(crate) fn path_to(&self, id: usize) -> Vec<Move> {
        let mut path = Vec::new();
        let mut cursor = id;
        while let Some((parent, dir)) = self.nodes[cursor].parent {
            path.push(dir);
            cursor = parent;
        }
        path.reverse();
        path
    }
}

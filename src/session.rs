//! One puzzle instance and the operations a front end performs on it.

use crate::error::PuzzleError;
use crate::heuristic::{self, Difficulty, MIN_FRESH_DISTANCE};
use crate::puzzle::{Move, State, GOAL};
use crate::search::{self, SearchConfig, Solution, Strategy};
use rand::Rng;

/// Number of random blank moves used to scramble a fresh instance.
pub const DEFAULT_WALK_LENGTH: usize = 40;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PuzzleSession {
    initial_state: State,
}

impl PuzzleSession {
    /// A fresh, solvable instance at least `MIN_FRESH_DISTANCE` away from the goal.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::generate_with_walk(rng, DEFAULT_WALK_LENGTH)
    }

    /// Like `generate`, scrambling with `walk_length` random moves per attempt.
    /// Walks shorter than the distance floor could never qualify, so they are lengthened.
    pub fn generate_with_walk<R: Rng + ?Sized>(rng: &mut R, walk_length: usize) -> Self {
        let steps = walk_length.max(MIN_FRESH_DISTANCE);
        loop {
            let candidate = State::scrambled(rng, steps);
            if candidate != GOAL && heuristic::heuristic(&candidate) >= MIN_FRESH_DISTANCE {
                return Self {
                    initial_state: candidate,
                };
            }
        }
    }

    /// Wraps a caller-provided board, refusing ones that can never reach the goal.
    pub fn from_state(state: State) -> Result<Self, PuzzleError> {
        if !state.is_solvable() {
            return Err(PuzzleError::Unreachable);
        }
        Ok(Self {
            initial_state: state,
        })
    }

    pub fn initial_state(&self) -> &State {
        &self.initial_state
    }

    pub fn goal(&self) -> &State {
        &GOAL
    }

    pub fn heuristic(&self) -> usize {
        heuristic::heuristic(&self.initial_state)
    }

    pub fn difficulty(&self) -> Difficulty {
        Difficulty::from_distance(self.heuristic())
    }

    pub fn solve<R: Rng + ?Sized>(
        &self,
        strategy: Strategy,
        config: &SearchConfig,
        rng: &mut R,
    ) -> Result<Solution, PuzzleError> {
        search::solve(&self.initial_state, &GOAL, strategy, config, rng)
    }

    /// First move of a shortest solution, `None` when already solved.
    pub fn hint(&self, config: &SearchConfig) -> Result<Option<Move>, PuzzleError> {
        let solution = search::bfs::search(&self.initial_state, &GOAL, config.max_expansions)?;
        Ok(solution.moves.first().copied())
    }
}

/// Generates an instance and labels it.
pub fn generate_instance<R: Rng + ?Sized>(rng: &mut R) -> (State, Difficulty) {
    let session = PuzzleSession::generate(rng);
    (session.initial_state, session.difficulty())
}

use crate::search::Strategy;

/// Everything that can go wrong between receiving a board and handing back moves.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PuzzleError {
    #[error("invalid state: {0}")]
    InvalidState(String),
    #[error("state is not reachable from the goal (wrong permutation parity)")]
    Unreachable,
    #[error("{strategy} gave up after exploring {explored} nodes without reaching the goal")]
    SearchExhausted { strategy: Strategy, explored: usize },
    #[error("unknown strategy '{0}' (expected bfs, bidirectional or annealing)")]
    InvalidStrategy(String),
    #[error("invalid annealing schedule: {0}")]
    InvalidSchedule(String),
}

impl PuzzleError {
    /// True for the ordinary "no answer within the bound" outcome, false for bad input.
    pub fn is_search_failure(&self) -> bool {
        matches!(self, PuzzleError::SearchExhausted { .. })
    }
}

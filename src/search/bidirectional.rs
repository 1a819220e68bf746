//! Meet-in-the-middle breadth-first search.
//!
//! One search grows from the start, the other from the goal; the move relation is
//! symmetric, so the backward side simply expands neighbors too. Each round expands
//! one complete layer of whichever side currently has the smaller frontier.
//!
//! Every newly discovered state is checked against the opposite side's visited map
//! at insertion time. Since no earlier insertion produced a meeting, any meeting
//! found while completing a layer already has minimal total length, so the first
//! one is returned and the result is as short as a plain BFS answer.

use super::{SearchTree, Solution, Strategy};
use crate::error::PuzzleError;
use crate::puzzle::{Move, State};
use std::collections::HashMap;

struct Side {
    tree: SearchTree,
    visited: HashMap<State, usize>,
    frontier: Vec<usize>,
}

impl Side {
    fn new(root: State) -> Self {
        let mut visited = HashMap::new();
        visited.insert(root, 0);
        Self {
            tree: SearchTree::new(root),
            visited,
            frontier: vec![0],
        }
    }
}

struct Budget {
    limit: Option<usize>,
    expanded: usize,
}

impl Budget {
    fn spend(&mut self) -> Result<(), PuzzleError> {
        if self.limit.is_some_and(|limit| self.expanded >= limit) {
            return Err(self.exhausted());
        }
        self.expanded += 1;
        Ok(())
    }

    fn exhausted(&self) -> PuzzleError {
        PuzzleError::SearchExhausted {
            strategy: Strategy::Bidirectional,
            explored: self.expanded,
        }
    }
}

pub fn search(start: &State, goal: &State, max_expansions: Option<usize>) -> Result<Solution, PuzzleError> {
    if start == goal {
        return Ok(Solution {
            strategy: Strategy::Bidirectional,
            moves: Vec::new(),
            explored: 0,
        });
    }

    let mut forward = Side::new(*start);
    let mut backward = Side::new(*goal);
    let mut budget = Budget {
        limit: max_expansions,
        expanded: 0,
    };

    loop {
        // An empty frontier means that side's whole component has been seen.
        if forward.frontier.is_empty() || backward.frontier.is_empty() {
            return Err(budget.exhausted());
        }

        let meeting = if forward.frontier.len() <= backward.frontier.len() {
            expand_layer(&mut forward, &backward, &mut budget)?
        } else {
            expand_layer(&mut backward, &forward, &mut budget)?.map(|(b, f)| (f, b))
        };

        if let Some((f, b)) = meeting {
            return Ok(Solution {
                strategy: Strategy::Bidirectional,
                moves: join(&forward.tree, f, &backward.tree, b),
                explored: budget.expanded,
            });
        }
    }
}

/// Expands every node of `side`'s current frontier. Returns `(own id, other id)`
/// of the first state also known to `other`.
fn expand_layer(side: &mut Side, other: &Side, budget: &mut Budget) -> Result<Option<(usize, usize)>, PuzzleError> {
    let layer = std::mem::take(&mut side.frontier);
    let mut next_layer = Vec::with_capacity(layer.len() * 2);

    for current in layer {
        budget.spend()?;
        let state = side.tree.state(current);
        for (dir, next) in state.neighbors() {
            if side.visited.contains_key(&next) {
                continue;
            }
            let id = side.tree.push(next, current, dir);
            side.visited.insert(next, id);
            if let Some(&met) = other.visited.get(&next) {
                return Ok(Some((id, met)));
            }
            next_layer.push(id);
        }
    }

    side.frontier = next_layer;
    Ok(None)
}

/// Forward moves up to the meeting state, then the backward chain walked from the
/// meeting state towards the goal with every move inverted.
fn join(forward: &SearchTree, f: usize, backward: &SearchTree, b: usize) -> Vec<Move> {
    let mut moves = forward.path_to(f);
    moves.extend(backward.path_to(b).iter().rev().map(Move::opposite));
    moves
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::GOAL;
    use crate::search::bfs;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_two_move_scenario() {
        let start = State::new([1, 2, 3, 4, 0, 6, 7, 5, 8]).unwrap();
        let solution = search(&start, &GOAL, None).unwrap();
        assert_eq!(solution.moves, vec![Move::Down, Move::Right]);
    }

    #[test]
    fn test_one_move_from_goal() {
        let start = GOAL.try_move(Move::Left).unwrap();
        let solution = search(&start, &GOAL, None).unwrap();
        assert_eq!(solution.moves, vec![Move::Right]);
    }

    #[test]
    fn test_backward_moves_are_inverted() {
        let mut rng = SmallRng::seed_from_u64(21);
        for _ in 0..30 {
            let start = State::scrambled(&mut rng, 40);
            let solution = search(&start, &GOAL, None).unwrap();
            assert_eq!(start.apply_moves(&solution.moves).unwrap(), GOAL);
        }
    }

    #[test]
    fn test_matches_bfs_length() {
        let mut rng = SmallRng::seed_from_u64(42);
        for _ in 0..30 {
            let start = State::scrambled(&mut rng, 60);
            let expected = bfs::search(&start, &GOAL, None).unwrap();
            let actual = search(&start, &GOAL, None).unwrap();
            assert_eq!(actual.len(), expected.len());
        }
    }

    #[test]
    fn test_explores_fewer_nodes_than_bfs() {
        let start = State::new([8, 6, 7, 2, 5, 4, 3, 0, 1]).unwrap();
        let expected = bfs::search(&start, &GOAL, None).unwrap();
        let actual = search(&start, &GOAL, None).unwrap();
        assert_eq!(actual.len(), 31);
        assert!(actual.explored < expected.explored);
    }

    #[test]
    fn test_expansion_cap() {
        let start = State::new([8, 6, 7, 2, 5, 4, 3, 0, 1]).unwrap();
        let err = search(&start, &GOAL, Some(10)).unwrap_err();
        assert_eq!(
            err,
            PuzzleError::SearchExhausted {
                strategy: Strategy::Bidirectional,
                explored: 10
            }
        );
    }
}

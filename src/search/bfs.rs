use super::{SearchTree, Solution, Strategy};
use crate::error::PuzzleError;
use crate::puzzle::State;
use std::collections::{HashSet, VecDeque};

/// Breadth-first search from `start` to `goal`.
///
/// States are marked visited when enqueued and tested against the goal when
/// dequeued, so the first goal popped is at minimal depth. `max_expansions`
/// caps the number of dequeued non-goal states.
pub fn search(start: &State, goal: &State, max_expansions: Option<usize>) -> Result<Solution, PuzzleError> {
    let mut tree = SearchTree::new(*start);
    let mut visited = HashSet::new();
    let mut frontier = VecDeque::new();
    let mut expanded = 0;

    visited.insert(*start);
    frontier.push_back(0);

    while let Some(current) = frontier.pop_front() {
        let state = tree.state(current);
        if state == *goal {
            return Ok(Solution {
                strategy: Strategy::Bfs,
                moves: tree.path_to(current),
                explored: expanded,
            });
        }

        if max_expansions.is_some_and(|limit| expanded >= limit) {
            break;
        }
        expanded += 1;

        for (dir, next) in state.neighbors() {
            if visited.insert(next) {
                frontier.push_back(tree.push(next, current, dir));
            }
        }
    }

    Err(PuzzleError::SearchExhausted {
        strategy: Strategy::Bfs,
        explored: expanded,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::{Move, GOAL};

    #[test]
    fn test_two_move_scenario() {
        let start = State::new([1, 2, 3, 4, 0, 6, 7, 5, 8]).unwrap();
        let solution = search(&start, &GOAL, None).unwrap();
        assert_eq!(solution.moves, vec![Move::Down, Move::Right]);
        assert_eq!(start.apply_moves(&solution.moves).unwrap(), GOAL);
    }

    #[test]
    fn test_already_solved() {
        let solution = search(&GOAL, &GOAL, Some(0)).unwrap();
        assert!(solution.is_empty());
        assert_eq!(solution.explored, 0);
    }

    #[test]
    fn test_expansion_cap_fails_gracefully() {
        let start = State::new([8, 6, 7, 2, 5, 4, 3, 0, 1]).unwrap();
        let err = search(&start, &GOAL, Some(100)).unwrap_err();
        assert_eq!(
            err,
            PuzzleError::SearchExhausted {
                strategy: Strategy::Bfs,
                explored: 100
            }
        );
        assert!(err.is_search_failure());
    }

    #[test]
    fn test_hardest_instance_is_31_moves() {
        // One of the two 8-puzzle positions at maximal distance from the goal.
        let start = State::new([8, 6, 7, 2, 5, 4, 3, 0, 1]).unwrap();
        let solution = search(&start, &GOAL, None).unwrap();
        assert_eq!(solution.len(), 31);
        assert_eq!(start.apply_moves(&solution.moves).unwrap(), GOAL);
    }

    #[test]
    fn test_wrong_parity_exhausts_whole_component() {
        // Called directly, bypassing the parity check in `solve`.
        let swapped = State::new([2, 1, 3, 4, 5, 6, 7, 8, 0]).unwrap();
        let err = search(&swapped, &GOAL, None).unwrap_err();
        assert_eq!(
            err,
            PuzzleError::SearchExhausted {
                strategy: Strategy::Bfs,
                explored: 181_440
            }
        );
    }
}

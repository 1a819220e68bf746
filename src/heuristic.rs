//! Manhattan-distance estimate and the difficulty bands derived from it.
//!
//! The same distance feeds difficulty labels, the freshness filter used when
//! generating instances, and the energy function of simulated annealing, so
//! all three always agree.

use crate::puzzle::{State, CELLS, GOAL, SIZE};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Highest distance still labelled `Easy`.
pub const EASY_MAX: usize = 10;
/// Highest distance still labelled `Medium`.
pub const MEDIUM_MAX: usize = 15;
/// Generated instances closer to the goal than this are thrown away.
pub const MIN_FRESH_DISTANCE: usize = 5;

/// Sum over tiles 1..=8 of their row plus column displacement from `goal`.
/// The blank does not contribute.
pub fn manhattan_distance(state: &State, goal: &State) -> usize {
    let mut home = [0usize; CELLS];
    for (i, &tile) in goal.tiles().iter().enumerate() {
        home[tile as usize] = i;
    }

    state
        .tiles()
        .iter()
        .enumerate()
        .filter(|&(_, &tile)| tile != 0)
        .map(|(i, &tile)| {
            let target = home[tile as usize];
            (i / SIZE).abs_diff(target / SIZE) + (i % SIZE).abs_diff(target % SIZE)
        })
        .sum()
}

/// Distance to the canonical goal.
pub fn heuristic(state: &State) -> usize {
    manhattan_distance(state, &GOAL)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn from_distance(distance: usize) -> Self {
        match distance {
            d if d <= EASY_MAX => Difficulty::Easy,
            d if d <= MEDIUM_MAX => Difficulty::Medium,
            _ => Difficulty::Hard,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        };
        write!(f, "{}", s)
    }
}

pub fn classify(state: &State) -> Difficulty {
    Difficulty::from_distance(heuristic(state))
}

use super::{Solution, Strategy};
use crate::error::PuzzleError;
use crate::heuristic::manhattan_distance;
use crate::puzzle::State;
use rand::seq::IteratorRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Cooling schedule and stopping bounds for simulated annealing.
///
/// The temperature is multiplied by `cooling_rate` once every `cooling_interval`
/// iterations. The run gives up when the temperature falls below
/// `min_temperature` or after `max_iterations` iterations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnealingSchedule {
    pub initial_temperature: f64,
    pub cooling_rate: f64,
    pub cooling_interval: usize,
    pub min_temperature: f64,
    pub max_iterations: usize,
}

impl Default for AnnealingSchedule {
    fn default() -> Self {
        Self {
            initial_temperature: 50.0,
            cooling_rate: 0.999,
            cooling_interval: 10,
            min_temperature: 0.01,
            max_iterations: 100_000,
        }
    }
}

impl AnnealingSchedule {
    pub fn validate(&self) -> Result<(), PuzzleError> {
        if !(self.initial_temperature > 0.0 && self.initial_temperature.is_finite()) {
            return Err(PuzzleError::InvalidSchedule(format!(
                "initial temperature must be positive, got {}",
                self.initial_temperature
            )));
        }
        if !(self.cooling_rate > 0.0 && self.cooling_rate < 1.0) {
            return Err(PuzzleError::InvalidSchedule(format!(
                "cooling rate must lie strictly between 0 and 1, got {}",
                self.cooling_rate
            )));
        }
        if self.cooling_interval == 0 {
            return Err(PuzzleError::InvalidSchedule("cooling interval must be at least 1".to_string()));
        }
        if !(self.min_temperature > 0.0) {
            return Err(PuzzleError::InvalidSchedule(format!(
                "minimum temperature must be positive, got {}",
                self.min_temperature
            )));
        }
        Ok(())
    }
}

/// Metropolis random walk over the Manhattan-distance energy.
///
/// Every accepted step is appended to the path, including steps that undo the
/// previous one, so a successful answer is usually far from minimal.
pub fn search<R: Rng + ?Sized>(
    start: &State,
    goal: &State,
    schedule: &AnnealingSchedule,
    rng: &mut R,
) -> Result<Solution, PuzzleError> {
    schedule.validate()?;

    let mut current = *start;
    let mut energy = manhattan_distance(&current, goal);
    let mut temperature = schedule.initial_temperature;
    let mut path = Vec::new();
    let mut iteration = 0;

    while iteration < schedule.max_iterations {
        if current == *goal {
            break;
        }
        if temperature < schedule.min_temperature {
            break;
        }

        let Some((dir, candidate)) = current.neighbors().choose(rng) else {
            break;
        };
        let candidate_energy = manhattan_distance(&candidate, goal);
        let delta = candidate_energy as f64 - energy as f64;

        if delta <= 0.0 || rng.gen::<f64>() < (-delta / temperature).exp() {
            path.push(dir);
            current = candidate;
            energy = candidate_energy;
        }

        iteration += 1;
        if iteration % schedule.cooling_interval == 0 {
            temperature *= schedule.cooling_rate;
        }
    }

    if current == *goal {
        Ok(Solution {
            strategy: Strategy::SimulatedAnnealing,
            moves: path,
            explored: iteration,
        })
    } else {
        Err(PuzzleError::SearchExhausted {
            strategy: Strategy::SimulatedAnnealing,
            explored: iteration,
        })
    }
}

//! # Eight Puzzle Solver Library
//!
//! State-space search for the sliding 3x3 puzzle. Given a scrambled board it finds
//! a sequence of blank moves leading to the canonical goal
//! `[1, 2, 3, 4, 5, 6, 7, 8, 0]`.
//!
//! ## Modules
//! - `puzzle`: the `State` board, `Move` directions, neighbor generation and parity.
//! - `heuristic`: Manhattan distance and `Difficulty` labels.
//! - `search`: breadth-first, bidirectional and simulated-annealing strategies,
//!   selected through the `Strategy` enum.
//! - `session`: `PuzzleSession`, which owns an instance and dispatches solves.
//! - `error`: `PuzzleError`, returned by every fallible operation.
//!
//! All randomness comes from an `Rng` passed in by the caller, so seeded runs are
//! reproducible.

pub mod error;
pub mod heuristic;
pub mod puzzle;
pub mod search;
pub mod session;

pub use error::PuzzleError;
pub use heuristic::{heuristic, manhattan_distance, Difficulty};
pub use puzzle::{Move, State, GOAL};
pub use search::{solve, AnnealingSchedule, SearchConfig, Solution, Strategy};
pub use session::{generate_instance, PuzzleSession};

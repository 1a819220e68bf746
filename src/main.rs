use clap::Parser;
use crossterm::style::Stylize;
use crossterm::tty::IsTty;
use eight_puzzle::puzzle::SIZE;
use eight_puzzle::search::DEFAULT_MAX_EXPANSIONS;
use eight_puzzle::session::DEFAULT_WALK_LENGTH;
use eight_puzzle::{AnnealingSchedule, Difficulty, Move, PuzzleError, PuzzleSession, SearchConfig, Solution, State, Strategy};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::Serialize;
use std::time::{Duration, Instant};

#[derive(Parser, Debug)]
#[command(author, version, about = "Solve the sliding 8-puzzle", long_about = None)]
struct Args {
    /// Search strategy: bfs, bidirectional or annealing
    #[arg(short, long, default_value = "bfs")]
    strategy: Strategy,

    /// Run every strategy on the same instance and compare them
    #[arg(long)]
    all: bool,

    /// Starting board, e.g. "123405786" or "1,2,3,4,0,5,7,8,6". A random one is generated when omitted
    #[arg(long)]
    state: Option<State>,

    /// Seed for instance generation and annealing
    #[arg(long)]
    seed: Option<u64>,

    /// Random blank moves used to scramble a generated instance
    #[arg(long, default_value_t = DEFAULT_WALK_LENGTH)]
    walk_length: usize,

    /// Node expansion cap for bfs and bidirectional search
    #[arg(long, default_value_t = DEFAULT_MAX_EXPANSIONS)]
    max_expansions: usize,

    /// Lift the expansion cap entirely
    #[arg(long)]
    unbounded: bool,

    /// Annealing start temperature
    #[arg(long, default_value_t = AnnealingSchedule::default().initial_temperature)]
    temperature: f64,

    /// Annealing multiplicative cooling factor
    #[arg(long, default_value_t = AnnealingSchedule::default().cooling_rate)]
    cooling_rate: f64,

    /// Iterations between two cooling steps
    #[arg(long, default_value_t = AnnealingSchedule::default().cooling_interval)]
    cooling_interval: usize,

    /// Annealing gives up below this temperature
    #[arg(long, default_value_t = AnnealingSchedule::default().min_temperature)]
    min_temperature: f64,

    /// Annealing iteration cap
    #[arg(long, default_value_t = AnnealingSchedule::default().max_iterations)]
    max_iterations: usize,

    /// Only print the first move of a shortest solution
    #[arg(long)]
    hint: bool,

    /// Print the board after every move of the solution
    #[arg(long)]
    replay: bool,

    /// Emit a JSON report instead of text
    #[arg(long)]
    json: bool,
}

impl Args {
    fn strategies(&self) -> Vec<Strategy> {
        if self.all {
            Strategy::ALL.to_vec()
        } else {
            vec![self.strategy]
        }
    }

    /// Annealing settings only matter when annealing is going to run.
    fn validated_config(&self) -> Result<SearchConfig, PuzzleError> {
        let config = self.search_config();
        if !self.hint && self.strategies().contains(&Strategy::SimulatedAnnealing) {
            config.annealing.validate()?;
        }
        Ok(config)
    }

    fn search_config(&self) -> SearchConfig {
        SearchConfig {
            max_expansions: if self.unbounded { None } else { Some(self.max_expansions) },
            annealing: AnnealingSchedule {
                initial_temperature: self.temperature,
                cooling_rate: self.cooling_rate,
                cooling_interval: self.cooling_interval,
                min_temperature: self.min_temperature,
                max_iterations: self.max_iterations,
            },
        }
    }
}

#[derive(Serialize)]
struct Report<'a> {
    initial: &'a State,
    goal: &'a State,
    heuristic: usize,
    difficulty: Difficulty,
    runs: Vec<RunReport<'a>>,
}

#[derive(Serialize)]
struct RunReport<'a> {
    strategy: Strategy,
    solved: bool,
    length: Option<usize>,
    moves: Option<&'a [Move]>,
    explored: usize,
    elapsed_ms: f64,
    error: Option<String>,
}

struct Run {
    strategy: Strategy,
    result: Result<Solution, PuzzleError>,
    elapsed: Duration,
}

impl Run {
    fn report(&self) -> RunReport<'_> {
        let explored = match &self.result {
            Ok(solution) => solution.explored,
            Err(PuzzleError::SearchExhausted { explored, .. }) => *explored,
            Err(_) => 0,
        };
        RunReport {
            strategy: self.strategy,
            solved: self.result.is_ok(),
            length: self.result.as_ref().ok().map(Solution::len),
            moves: self.result.as_ref().ok().map(|s| s.moves.as_slice()),
            explored,
            elapsed_ms: self.elapsed.as_secs_f64() * 1000.0,
            error: self.result.as_ref().err().map(ToString::to_string),
        }
    }
}

fn render_board(state: &State, styled: bool) -> String {
    if !styled {
        return state.to_string();
    }
    let mut out = String::new();
    for (i, &tile) in state.tiles().iter().enumerate() {
        let cell = if tile == 0 {
            " _ ".dim().to_string()
        } else if eight_puzzle::GOAL.tiles()[i] == tile {
            format!("{:2} ", tile).green().bold().to_string()
        } else {
            format!("{:2} ", tile).yellow().to_string()
        };
        out.push_str(&cell);
        if i % SIZE == SIZE - 1 {
            out.push('\n');
        }
    }
    out
}

fn print_runs(session: &PuzzleSession, runs: &[Run], replay: bool, styled: bool) {
    for run in runs {
        match &run.result {
            Ok(solution) => {
                let label = if run.strategy.is_optimal() { "optimal" } else { "non-optimal" };
                println!(
                    "{}: found {} solution with {} moves ({} explored, {:.1?})",
                    run.strategy,
                    label,
                    solution.len(),
                    solution.explored,
                    run.elapsed
                );
                if replay {
                    match solution.states(session.initial_state()) {
                        Ok(states) => {
                            for (dir, state) in solution.moves.iter().zip(states.iter().skip(1)) {
                                println!("{}\n{}", dir, render_board(state, styled));
                            }
                        }
                        Err(err) => println!("  cannot replay: {}", err),
                    }
                } else if !solution.is_empty() {
                    let moves: Vec<String> = solution.moves.iter().map(ToString::to_string).collect();
                    println!("  {}", moves.join(" "));
                }
            }
            Err(err) => println!("{}: {} ({:.1?})", run.strategy, err, run.elapsed),
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut rng = match args.seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_entropy(),
    };

    let session = match args.state {
        Some(state) => PuzzleSession::from_state(state)?,
        None => PuzzleSession::generate_with_walk(&mut rng, args.walk_length),
    };
    log::info!(
        "instance {:?}: distance {}, {}",
        session.initial_state().tiles(),
        session.heuristic(),
        session.difficulty()
    );

    let config = args.validated_config()?;
    let styled = !args.json && std::io::stdout().is_tty();

    if args.hint {
        match session.hint(&config)? {
            Some(dir) => println!("Move the blank {}", dir),
            None => println!("Already solved"),
        }
        return Ok(());
    }

    let strategies = args.strategies();
    let mut runs = Vec::with_capacity(strategies.len());
    for strategy in strategies {
        log::debug!("running {}", strategy);
        let started = Instant::now();
        let result = session.solve(strategy, &config, &mut rng);
        let elapsed = started.elapsed();
        match &result {
            Ok(solution) => log::info!(
                "{} solved in {} moves, {} explored, {:?}",
                strategy,
                solution.len(),
                solution.explored,
                elapsed
            ),
            Err(err) => log::warn!("{} failed: {}", strategy, err),
        }
        runs.push(Run {
            strategy,
            result,
            elapsed,
        });
    }

    if args.json {
        let report = Report {
            initial: session.initial_state(),
            goal: session.goal(),
            heuristic: session.heuristic(),
            difficulty: session.difficulty(),
            runs: runs.iter().map(Run::report).collect(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Initial Puzzle ({}, distance {}):", session.difficulty(), session.heuristic());
        println!("{}", render_board(session.initial_state(), styled));
        print_runs(&session, &runs, args.replay, styled);
    }

    let failures = runs.iter().filter(|run| run.result.is_err()).count();
    if failures > 0 {
        anyhow::bail!("{} of {} strategies found no solution", failures, runs.len());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use eight_puzzle::GOAL;

    fn args(extra: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("eight-puzzle").chain(extra.iter().copied())).unwrap()
    }

    #[test]
    fn test_bad_cooling_rate_ignored_without_annealing() {
        let bfs_only = args(&["--strategy", "bfs", "--cooling-rate", "1.0"]);
        assert!(bfs_only.validated_config().is_ok());
        let hint = args(&["--hint", "--strategy", "annealing", "--cooling-rate", "1.0"]);
        assert!(hint.validated_config().is_ok());
    }

    #[test]
    fn test_bad_cooling_rate_rejected_with_annealing() {
        let single = args(&["--strategy", "annealing", "--cooling-rate", "1.0"]);
        assert!(matches!(single.validated_config(), Err(PuzzleError::InvalidSchedule(_))));
        let all = args(&["--all", "--cooling-rate", "1.0"]);
        assert!(matches!(all.validated_config(), Err(PuzzleError::InvalidSchedule(_))));
    }

    #[test]
    fn test_styled_board_breaks_rows_at_grid_width() {
        let rendered = render_board(&GOAL, true);
        assert_eq!(rendered.lines().count(), SIZE);
        assert!(rendered.ends_with('\n'));
        assert_eq!(render_board(&GOAL, false), GOAL.to_string());
    }
}

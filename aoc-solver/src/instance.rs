//! Parsed solver instances and their type-erased interface

use crate::error::{ParseError, SolveError};
use crate::solver::{Solver, SolverExt};
use chrono::{DateTime, TimeDelta, Utc};

/// Answer for one part together with when it was computed
#[derive(Debug, Clone)]
pub struct SolveResult {
    /// The answer string
    pub answer: String,
    /// When solving started (UTC)
    pub solve_start: DateTime<Utc>,
    /// When solving completed (UTC)
    pub solve_end: DateTime<Utc>,
}

impl SolveResult {
    /// Solve duration
    pub fn duration(&self) -> TimeDelta {
        self.solve_end - self.solve_start
    }
}

/// One parsed puzzle input, ready to have its parts solved
///
/// Owns the solver's shared data, so a part that caches an intermediate
/// result (a traced loop, a remapped range set) makes it available to the
/// parts solved after it.
pub struct SolverInstance<'a, S: Solver> {
    year: u16,
    day: u8,
    shared: S::SharedData<'a>,
    parse_start: DateTime<Utc>,
    parse_end: DateTime<Utc>,
}

impl<'a, S: Solver> SolverInstance<'a, S> {
    /// Parse `input` and record how long it took
    pub fn new(year: u16, day: u8, input: &'a str) -> Result<Self, ParseError> {
        let parse_start = Utc::now();
        let shared = S::parse(input)?;
        let parse_end = Utc::now();

        Ok(Self {
            year,
            day,
            shared,
            parse_start,
            parse_end,
        })
    }

    /// Borrow the shared data
    pub fn shared(&self) -> &S::SharedData<'a> {
        &self.shared
    }
}

/// Type-erased interface over any [`SolverInstance`]
///
/// # Example
///
/// ```no_run
/// use aoc_solver::DynSolver;
///
/// fn report(mut solver: Box<dyn DynSolver>) -> Result<(), Box<dyn std::error::Error>> {
///     for part in 1..=solver.parts() {
///         let result = solver.solve(part)?;
///         println!("{}/{:02} part {}: {}", solver.year(), solver.day(), part, result.answer);
///     }
///     println!("parse took {}", solver.parse_duration());
///     Ok(())
/// }
/// ```
pub trait DynSolver {
    /// Solve the specified part with timing
    fn solve(&mut self, part: u8) -> Result<SolveResult, SolveError>;

    /// Parse start time (UTC)
    fn parse_start(&self) -> DateTime<Utc>;

    /// Parse end time (UTC)
    fn parse_end(&self) -> DateTime<Utc>;

    /// Puzzle year
    fn year(&self) -> u16;

    /// Puzzle day
    fn day(&self) -> u8;

    /// Number of parts the underlying solver supports
    fn parts(&self) -> u8;

    /// Parse duration
    fn parse_duration(&self) -> TimeDelta {
        self.parse_end() - self.parse_start()
    }
}

impl<'a, S: SolverExt> DynSolver for SolverInstance<'a, S> {
    fn solve(&mut self, part: u8) -> Result<SolveResult, SolveError> {
        let solve_start = Utc::now();
        let answer = S::solve_part_checked_range(&mut self.shared, part)?;
        let solve_end = Utc::now();

        Ok(SolveResult {
            answer,
            solve_start,
            solve_end,
        })
    }

    fn parse_start(&self) -> DateTime<Utc> {
        self.parse_start
    }

    fn parse_end(&self) -> DateTime<Utc> {
        self.parse_end
    }

    fn year(&self) -> u16 {
        self.year
    }

    fn day(&self) -> u8 {
        self.day
    }

    fn parts(&self) -> u8 {
        S::PARTS
    }
}

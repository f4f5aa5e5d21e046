//! Sequential executor for running solvers

use crate::config::Config;
use crate::error::ExecutorError;
use crate::inputs::{InputStore, read_input};
use aoc_solver::{SolverError, SolverRegistry};
use chrono::TimeDelta;
use std::ops::RangeInclusive;
use std::path::PathBuf;
use tracing::{debug, info};

/// Result from a single solved part
#[derive(Debug, Clone)]
pub struct SolverResult {
    pub year: u16,
    pub day: u8,
    pub part: u8,
    pub answer: String,
    /// Set on the first part solved from an input, which paid for the parse
    pub parse_duration: Option<TimeDelta>,
    pub solve_duration: TimeDelta,
}

/// Work item representing a solver to execute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    pub year: u16,
    pub day: u8,
    pub parts: RangeInclusive<u8>,
}

/// Runs the selected solvers one after another, stopping at the first error
pub struct Executor {
    registry: SolverRegistry,
    inputs: InputStore,
    input_file: Option<PathBuf>,
    year_filter: Option<u16>,
    day_filter: Option<u8>,
    part_filter: Option<u8>,
}

impl Executor {
    /// Create a new executor from config
    pub fn new(registry: SolverRegistry, config: &Config) -> Self {
        Self {
            registry,
            inputs: InputStore::new(config.input_dir.clone()),
            input_file: config.input_file.clone(),
            year_filter: config.year_filter,
            day_filter: config.day_filter,
            part_filter: config.part_filter,
        }
    }

    /// Collect work items by filtering from registry metadata
    pub fn collect_work_items(&self) -> Vec<WorkItem> {
        self.registry
            .iter_info()
            .filter(|info| self.year_filter.is_none_or(|y| info.year == y))
            .filter(|info| self.day_filter.is_none_or(|d| info.day == d))
            .map(|info| WorkItem {
                year: info.year,
                day: info.day,
                parts: self.filter_parts(info.parts),
            })
            .filter(|w| !w.parts.is_empty())
            .inspect(|w| debug!(year = w.year, day = w.day, parts = ?w.parts, "selected solver"))
            .collect()
    }

    /// Filter parts based on the part filter and solver's max parts
    #[allow(clippy::reversed_empty_ranges)]
    fn filter_parts(&self, max_parts: u8) -> RangeInclusive<u8> {
        match self.part_filter {
            Some(p) if p <= max_parts => p..=p,
            Some(_) => 1..=0, // Empty range - intentional
            None => 1..=max_parts,
        }
    }

    /// Execute work items in `(year, day, part)` order
    ///
    /// Nothing is returned unless every part succeeds.
    pub fn execute(&self, work_items: &[WorkItem]) -> Result<Vec<SolverResult>, ExecutorError> {
        if self.input_file.is_some() && work_items.len() != 1 {
            return Err(ExecutorError::AmbiguousInput(work_items.len()));
        }

        let mut results = Vec::new();
        for work in work_items {
            self.run_solver(work, &mut results)?;
        }
        Ok(results)
    }

    /// Parse one input and solve the requested parts against it
    fn run_solver(
        &self,
        work: &WorkItem,
        results: &mut Vec<SolverResult>,
    ) -> Result<(), ExecutorError> {
        let (year, day) = (work.year, work.day);
        let solver_error = |source: SolverError| ExecutorError::Solver { year, day, source };

        let input = self.load_input(work)?;
        let mut solver = self
            .registry
            .create_solver(year, day, &input)
            .map_err(solver_error)?;

        let mut parse_duration = Some(solver.parse_duration());
        for part in work.parts.clone() {
            let solved = solver
                .solve(part)
                .map_err(|e| solver_error(e.into()))?;
            let solve_duration = solved.duration();
            results.push(SolverResult {
                year,
                day,
                part,
                answer: solved.answer,
                parse_duration: parse_duration.take(),
                solve_duration,
            });
        }
        Ok(())
    }

    /// Read the explicit input file, or the day's file from the input directory
    fn load_input(&self, work: &WorkItem) -> Result<String, ExecutorError> {
        let (year, day) = (work.year, work.day);
        let path = match &self.input_file {
            Some(path) => path.clone(),
            None => self.inputs.input_path(year, day),
        };
        info!("Reading input for {}/{:02} from {}", year, day, path.display());

        read_input(&path).map_err(|source| ExecutorError::Input { year, day, source })
    }
}

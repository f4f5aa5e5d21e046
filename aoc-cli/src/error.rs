//! Error types for the CLI

use std::path::PathBuf;
use thiserror::Error;

/// Main CLI error type
#[derive(Error, Debug)]
pub enum CliError {
    /// Registration error
    #[error("Registration error: {0}")]
    Registration(#[from] aoc_solver::RegistrationError),

    /// Executor error
    #[error(transparent)]
    Executor(#[from] ExecutorError),
}

/// Executor-specific errors
#[derive(Error, Debug)]
pub enum ExecutorError {
    /// Input lookup failed
    #[error("Input for {year}/{day:02}: {source}")]
    Input {
        year: u16,
        day: u8,
        #[source]
        source: InputError,
    },

    /// Solver parse or solve failed
    #[error("{year}/{day:02}: {source}")]
    Solver {
        year: u16,
        day: u8,
        #[source]
        source: aoc_solver::SolverError,
    },

    /// `--input` given while more than one solver is selected
    #[error("--input needs exactly one selected solver, {0} selected")]
    AmbiguousInput(usize),
}

/// Input file errors
#[derive(Error, Debug)]
pub enum InputError {
    /// No input file at the expected location
    #[error("input file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// IO error
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

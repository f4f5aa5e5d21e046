//! Advent of Code Solver Library
//!
//! A small, type-safe framework for Advent of Code solvers. Each puzzle is a
//! type that parses its input once into shared data and then answers one or
//! more parts from it.
//!
//! # Overview
//!
//! - [`AocParser`] parses input into `SharedData`
//! - [`PartSolver<N>`] answers part `N`; [`Solver`] dispatches over parts
//!   (usually generated by `#[derive(AocSolver)]`)
//! - [`SolverInstance`] / [`DynSolver`] hold parsed data behind dynamic
//!   dispatch and time parsing and solving
//! - [`RegistryBuilder`] / [`SolverRegistry`] map `(year, day)` to solvers;
//!   `#[derive(AutoRegisterSolver)]` submits a [`SolverPlugin`] so the
//!   registry can discover it
//!
//! # Quick Example
//!
//! ```
//! use aoc_solver::{AocParser, AocSolver, ParseError, PartSolver, RegistryBuilder, SolveError, register_solver};
//!
//! #[derive(AocSolver)]
//! #[aoc_solver(max_parts = 2)]
//! struct Widths;
//!
//! impl AocParser for Widths {
//!     type SharedData<'a> = Vec<(i64, i64)>;
//!
//!     fn parse(input: &str) -> Result<Self::SharedData<'_>, ParseError> {
//!         input
//!             .lines()
//!             .map(|line| {
//!                 let (lo, hi) = line
//!                     .split_once('-')
//!                     .ok_or_else(|| ParseError::InvalidFormat(line.to_string()))?;
//!                 let lo = lo.parse().map_err(|_| ParseError::InvalidFormat(line.to_string()))?;
//!                 let hi = hi.parse().map_err(|_| ParseError::InvalidFormat(line.to_string()))?;
//!                 Ok((lo, hi))
//!             })
//!             .collect()
//!     }
//! }
//!
//! impl PartSolver<1> for Widths {
//!     fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
//!         Ok(shared.iter().map(|(lo, hi)| hi - lo + 1).sum::<i64>().to_string())
//!     }
//! }
//!
//! impl PartSolver<2> for Widths {
//!     fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
//!         Ok(shared.iter().map(|(lo, _)| *lo).min().unwrap_or_default().to_string())
//!     }
//! }
//!
//! let mut builder = RegistryBuilder::new();
//! register_solver!(builder, Widths, 2023, 1);
//! let registry = builder.build();
//!
//! let mut solver = registry.create_solver(2023, 1, "3-5\n10-10").unwrap();
//! assert_eq!(solver.solve(1).unwrap().answer, "4");
//! assert_eq!(solver.solve(2).unwrap().answer, "3");
//! ```
//!
//! # Sharing Work Between Parts
//!
//! Parts get `&mut SharedData`, so a part can store an expensive
//! intermediate result (for example in an `Option` field) for the parts
//! solved after it on the same instance.

mod error;
mod instance;
mod registry;
mod solver;

pub use error::{ParseError, RegistrationError, SolveError, SolverError};
pub use instance::{DynSolver, SolveResult, SolverInstance};
pub use registry::{
    BASE_YEAR, DAYS_PER_YEAR, FactoryInfo, MAX_YEARS, RegisterableSolver, RegistryBuilder,
    SolverFactory, SolverPlugin, SolverRegistry,
};
pub use solver::{AocParser, PartSolver, Solver, SolverExt};

// Used by the code `AutoRegisterSolver` expands to
pub use inventory;

pub use aoc_solver_macros::{AocSolver, AutoRegisterSolver};

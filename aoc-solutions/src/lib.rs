//! Advent of Code puzzle solutions with automatic registration
//!
//! Solutions live under [`my_solutions`], organized by year, and register
//! themselves through the `AutoRegisterSolver` derive macro. The reusable
//! pieces they are built on (interval remapping, pipe loop tracing) live in
//! [`utils`].

pub mod utils;

#[cfg(feature = "my-solutions")]
pub mod my_solutions;

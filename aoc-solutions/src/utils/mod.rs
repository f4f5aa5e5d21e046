//! Puzzle-independent building blocks shared by the solutions

pub mod pipe_loop;
pub mod range_map;

use aoc_solver::{AocParser, ParseError, PartSolver, SolveError};
use aoc_solver_macros::{AocSolver, AutoRegisterSolver};

use crate::utils::pipe_loop::{PipeGrid, PipeLoop};

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2023, day = 10, tags = ["grid"])]
pub struct Solver;

#[derive(Debug)]
pub struct SharedData {
    grid: PipeGrid,
    pipe_loop: Option<PipeLoop>,
}

impl AocParser for Solver {
    type SharedData<'a> = SharedData;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        input
            .parse::<PipeGrid>()
            .map(|grid| SharedData {
                grid,
                pipe_loop: None,
            })
            .map_err(|e| ParseError::InvalidFormat(e.to_string()))
    }
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(traced_loop(shared)?.farthest_distance().to_string())
    }
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let pipe_loop = traced_loop(shared)?;
        let crossings = pipe_loop.crossings();
        Ok(pipe_loop.count_enclosed(&crossings).to_string())
    }
}

/// Trace the loop on first use and keep it for the other part
fn traced_loop(shared: &mut SharedData) -> Result<&PipeLoop, SolveError> {
    let pipe_loop = match shared.pipe_loop.take() {
        Some(pipe_loop) => pipe_loop,
        None => shared.grid.trace_loop().map_err(SolveError::failed)?,
    };
    Ok(shared.pipe_loop.insert(pipe_loop))
}

#[cfg(test)]
mod tests {
    use super::*;
    use aoc_solver::Solver as _;

    const SIMPLE: &str = "\
-L|F7
7S-7|
L|7||
-L-J|
L|-JF
";

    const COMPLEX: &str = "\
7-F7-
.FJ|7
SJLL7
|F--J
LJ.LJ
";

    const ENCLOSED_4: &str = "\
...........
.S-------7.
.|F-----7|.
.||.....||.
.||.....||.
.|L-7.F-J|.
.|..|.|..|.
.L--J.L--J.
...........
";

    const ENCLOSED_8: &str = "\
.F----7F7F7F7F-7....
.|F--7||||||||FJ....
.||.FJ||||||||L7....
FJL7L7LJLJ||LJ.L-7..
L--J.L7...LJS7F-7L7.
....F-J..F7FJ|L7L7L7
....L7.F7||L7|.L7L7|
.....|FJLJ|FJ|F7|.LJ
....FJL-7.||.||||...
....L---J.LJ.LJLJ...
";

    const ENCLOSED_10: &str = "\
FF7FSF7F7F7F7F7F---7
L|LJ||||||||||||F--J
FL-7LJLJ||||||LJL-77
F--JF--7||LJLJ7F7FJ-
L---JF-JLJ.||-FJLJJ7
|F|F-JF---7F7-L7L|7|
|FFJF7L7F-JF7|JL---7
7-L-JL7||F7|L7F-7F7|
L.L7LFJ|||||FJL7||LJ
L7JLJL-JLJLJL--JLJ.L
";

    fn solve(input: &str, part: u8) -> String {
        let mut shared = Solver::parse(input).unwrap();
        Solver::solve_part(&mut shared, part).unwrap()
    }

    #[test]
    fn test_example_part_1() {
        assert_eq!(solve(SIMPLE, 1), "4");
        assert_eq!(solve(COMPLEX, 1), "8");
    }

    #[test]
    fn test_example_part_2() {
        assert_eq!(solve(ENCLOSED_4, 2), "4");
        assert_eq!(solve(ENCLOSED_8, 2), "8");
        assert_eq!(solve(ENCLOSED_10, 2), "10");
    }

    #[test]
    fn test_loop_traced_once() {
        let mut shared = Solver::parse(COMPLEX).unwrap();
        assert!(shared.pipe_loop.is_none());

        Solver::solve_part(&mut shared, 1).unwrap();
        let first = shared.pipe_loop.clone();
        assert!(first.is_some());

        Solver::solve_part(&mut shared, 2).unwrap();
        assert_eq!(shared.pipe_loop, first);
    }

    #[test]
    fn test_parse_errors_are_invalid_format() {
        for input in ["S.\n.", "S?\n..", "S.\nS.", "..\n..", ""] {
            assert!(
                matches!(Solver::parse(input), Err(ParseError::InvalidFormat(_))),
                "{input:?}"
            );
        }
    }

    #[test]
    fn test_broken_loop_fails_solve() {
        let mut shared = Solver::parse("S-7\n|.|\nL-.\n").unwrap();
        assert!(matches!(
            Solver::solve_part(&mut shared, 1),
            Err(SolveError::SolveFailed(_))
        ));
        assert!(shared.pipe_loop.is_none());
    }
}

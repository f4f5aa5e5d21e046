use aoc_solver::{AocParser, AocSolver, ParseError, PartSolver, SolveError, Solver};

/// Parsed rows plus a lazily computed summary shared by both parts
#[derive(Debug)]
struct SharedData<'a> {
    rows: Vec<&'a str>,
    summary: Option<Summary>,
    computations: usize,
}

#[derive(Debug)]
struct Summary {
    widest: usize,
    total: usize,
}

#[derive(AocSolver)]
#[aoc_solver(max_parts = 2)]
struct Rows;

impl AocParser for Rows {
    type SharedData<'a> = SharedData<'a>;

    fn parse(input: &str) -> Result<Self::SharedData<'_>, ParseError> {
        let rows: Vec<&str> = input.lines().filter(|l| !l.is_empty()).collect();
        if rows.is_empty() {
            return Err(ParseError::MissingData("no rows".into()));
        }
        Ok(SharedData {
            rows,
            summary: None,
            computations: 0,
        })
    }
}

fn summary<'s>(shared: &'s mut SharedData<'_>) -> &'s Summary {
    let rows = &shared.rows;
    let computations = &mut shared.computations;
    shared.summary.get_or_insert_with(|| {
        *computations += 1;
        Summary {
            widest: rows.iter().map(|r| r.len()).max().unwrap_or(0),
            total: rows.iter().map(|r| r.len()).sum(),
        }
    })
}

impl PartSolver<1> for Rows {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(summary(shared).widest.to_string())
    }
}

impl PartSolver<2> for Rows {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(summary(shared).total.to_string())
    }
}

#[test]
fn test_borrowed_shared_data() {
    let input = String::from("S-7\n|.|\nL-J\n");
    let shared = Rows::parse(&input).unwrap();
    assert_eq!(shared.rows, vec!["S-7", "|.|", "L-J"]);
}

#[test]
fn test_summary_computed_once_across_parts() {
    let mut shared = Rows::parse("..F7.\n.FJ|.\n").unwrap();

    assert_eq!(Rows::solve_part(&mut shared, 1).unwrap(), "5");
    assert_eq!(Rows::solve_part(&mut shared, 2).unwrap(), "10");
    assert_eq!(shared.computations, 1);
}

#[test]
fn test_part_two_alone_still_computes() {
    let mut shared = Rows::parse("ab\nc").unwrap();

    assert_eq!(Rows::solve_part(&mut shared, 2).unwrap(), "3");
    assert_eq!(shared.computations, 1);
}

#[test]
fn test_parse_error() {
    assert!(matches!(Rows::parse("\n\n"), Err(ParseError::MissingData(_))));
}

use aoc_solver::{
    AocParser, AocSolver, AutoRegisterSolver, ParseError, PartSolver, RegistryBuilder, SolveError,
    SolverError,
};

/// Counts `#` cells in a grid
#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2021, day = 11, tags = ["test", "grid"])]
struct Walls;

impl AocParser for Walls {
    type SharedData<'a> = Vec<&'a str>;

    fn parse(input: &str) -> Result<Self::SharedData<'_>, ParseError> {
        let rows: Vec<&str> = input.lines().collect();
        match rows.first() {
            Some(first) if rows.iter().all(|r| r.len() == first.len()) => Ok(rows),
            Some(_) => Err(ParseError::InvalidFormat("ragged grid".into())),
            None => Err(ParseError::MissingData("empty grid".into())),
        }
    }
}

impl PartSolver<1> for Walls {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(shared.iter().map(|r| r.matches('#').count()).sum::<usize>().to_string())
    }
}

impl PartSolver<2> for Walls {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(shared.iter().map(|r| r.matches('.').count()).sum::<usize>().to_string())
    }
}

/// Registered with a different tag set so filtering can tell them apart
#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 1)]
#[aoc(year = 2021, day = 12)]
struct Untagged;

impl AocParser for Untagged {
    type SharedData<'a> = &'a str;

    fn parse(input: &str) -> Result<Self::SharedData<'_>, ParseError> {
        Ok(input)
    }
}

impl PartSolver<1> for Untagged {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(shared.len().to_string())
    }
}

#[test]
fn test_plugin_discovered_by_registry() {
    let registry = RegistryBuilder::new()
        .register_all_plugins()
        .expect("Failed to register plugins")
        .build();

    let info = registry.get_info(2021, 11).expect("plugin was not registered");
    assert_eq!(info.parts, 2);
    assert_eq!(info.tags, &["test", "grid"]);

    let mut solver = registry
        .create_solver(2021, 11, "#.#\n.##")
        .expect("Failed to create solver");
    assert_eq!(solver.solve(1).unwrap().answer, "4");
    assert_eq!(solver.solve(2).unwrap().answer, "2");
}

#[test]
fn test_tag_filter() {
    let registry = RegistryBuilder::new()
        .register_solver_plugins(|plugin| plugin.tags.contains(&"grid"))
        .expect("Failed to register plugins")
        .build();

    assert!(registry.contains(2021, 11));
    assert!(!registry.contains(2021, 12));
}

#[test]
fn test_parse_error_through_registry() {
    let registry = RegistryBuilder::new()
        .register_all_plugins()
        .expect("Failed to register plugins")
        .build();

    let result = registry.create_solver(2021, 11, "##\n#");
    assert!(matches!(
        result,
        Err(SolverError::ParseError(ParseError::InvalidFormat(_)))
    ));
}

#[test]
fn test_untagged_plugin_has_one_part() {
    let registry = RegistryBuilder::new()
        .register_all_plugins()
        .expect("Failed to register plugins")
        .build();

    let mut solver = registry.create_solver(2021, 12, "abc").unwrap();
    assert_eq!(solver.parts(), 1);
    assert_eq!(solver.solve(1).unwrap().answer, "3");
    assert!(matches!(
        solver.solve(2),
        Err(SolveError::PartOutOfRange(2))
    ));
}

//! Property-based tests for part dispatch and part bounds
//!
//! The derive-generated `Solver::solve_part` must agree with calling the
//! `PartSolver<N>` impls directly, and the range-checked and dynamic entry
//! points must reject part numbers outside `1..=PARTS`.

use aoc_solver::{
    AocParser, AocSolver, DynSolver, ParseError, PartSolver, SolveError, Solver, SolverExt,
    SolverInstance,
};
use proptest::prelude::*;

/// Offsets every number by the first one; part 1 sums, part 2 finds the minimum
#[derive(AocSolver)]
#[aoc_solver(max_parts = 2)]
struct Shifted;

struct ShiftedData {
    offset: i64,
    values: Vec<i64>,
    shifted: Option<Vec<i64>>,
}

impl AocParser for Shifted {
    type SharedData<'a> = ShiftedData;

    fn parse(input: &str) -> Result<Self::SharedData<'_>, ParseError> {
        let mut numbers = input.split_whitespace().map(|n| {
            n.parse::<i64>()
                .map_err(|_| ParseError::InvalidFormat(format!("bad int: {n}")))
        });
        let offset = numbers
            .next()
            .ok_or_else(|| ParseError::MissingData("offset".into()))??;
        let values = numbers.collect::<Result<_, _>>()?;
        Ok(ShiftedData {
            offset,
            values,
            shifted: None,
        })
    }
}

fn shifted(shared: &mut ShiftedData) -> &[i64] {
    let (offset, values) = (shared.offset, &shared.values);
    shared
        .shifted
        .get_or_insert_with(|| values.iter().map(|v| v + offset).collect())
}

impl PartSolver<1> for Shifted {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(shifted(shared).iter().sum::<i64>().to_string())
    }
}

impl PartSolver<2> for Shifted {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        shifted(shared)
            .iter()
            .min()
            .map(|v| v.to_string())
            .ok_or_else(|| SolveError::failed("no values"))
    }
}

fn input_for(offset: i64, values: &[i64]) -> String {
    std::iter::once(offset)
        .chain(values.iter().copied())
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn solve_part_dispatches_to_part_solver(
        offset in -50i64..50,
        values in prop::collection::vec(-1000i64..1000, 1..8),
        part in 1u8..=2,
    ) {
        let input = input_for(offset, &values);
        let mut dispatched = Shifted::parse(&input).unwrap();
        let mut direct = Shifted::parse(&input).unwrap();

        let via_solver = Shifted::solve_part(&mut dispatched, part).unwrap();
        let via_part = match part {
            1 => <Shifted as PartSolver<1>>::solve(&mut direct).unwrap(),
            _ => <Shifted as PartSolver<2>>::solve(&mut direct).unwrap(),
        };
        prop_assert_eq!(via_solver, via_part);
    }

    #[test]
    fn parts_agree_with_plain_iteration(
        offset in -50i64..50,
        values in prop::collection::vec(-1000i64..1000, 1..8),
    ) {
        let mut shared = Shifted::parse(&input_for(offset, &values)).unwrap();

        let sum: i64 = values.iter().map(|v| v + offset).sum();
        let min = values.iter().map(|v| v + offset).min().unwrap();
        prop_assert_eq!(Shifted::solve_part(&mut shared, 1).unwrap(), sum.to_string());
        prop_assert_eq!(Shifted::solve_part(&mut shared, 2).unwrap(), min.to_string());
    }

    #[test]
    fn invalid_part_rejected(part in prop_oneof![Just(0u8), 3u8..=255]) {
        let mut shared = Shifted::parse("1 2 3").unwrap();

        match Shifted::solve_part(&mut shared, part) {
            Err(SolveError::PartNotImplemented(p)) => prop_assert_eq!(p, part),
            other => prop_assert!(false, "expected PartNotImplemented, got {:?}", other),
        }
        match Shifted::solve_part_checked_range(&mut shared, part) {
            Err(SolveError::PartOutOfRange(p)) => prop_assert_eq!(p, part),
            other => prop_assert!(false, "expected PartOutOfRange, got {:?}", other),
        }
    }
}

#[test]
fn test_instance_reports_metadata_and_timing() {
    let mut instance = SolverInstance::<Shifted>::new(2023, 5, "10 1 2").unwrap();

    assert_eq!(instance.year(), 2023);
    assert_eq!(instance.day(), 5);
    assert_eq!(instance.parts(), 2);
    assert!(instance.parse_duration() >= chrono::TimeDelta::zero());

    let result = instance.solve(1).unwrap();
    assert_eq!(result.answer, "23");
    assert!(result.duration() >= chrono::TimeDelta::zero());
}

#[test]
fn test_instance_keeps_shared_cache_between_parts() {
    let mut instance = SolverInstance::<Shifted>::new(2023, 5, "1 5 7").unwrap();
    assert!(instance.shared().shifted.is_none());

    instance.solve(2).unwrap();
    assert_eq!(instance.shared().shifted.as_deref(), Some(&[6, 8][..]));
}

#[test]
fn test_instance_rejects_out_of_range_part() {
    let mut instance = SolverInstance::<Shifted>::new(2023, 5, "1 5").unwrap();
    assert!(matches!(instance.solve(3), Err(SolveError::PartOutOfRange(3))));
}

#[test]
fn test_parse_failure() {
    assert!(matches!(
        SolverInstance::<Shifted>::new(2023, 5, ""),
        Err(ParseError::MissingData(_))
    ));
    assert!(matches!(
        SolverInstance::<Shifted>::new(2023, 5, "1 x"),
        Err(ParseError::InvalidFormat(_))
    ));
}

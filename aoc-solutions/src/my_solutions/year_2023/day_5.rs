use std::cell::OnceCell;

use anyhow::{Context, anyhow, bail};
use aoc_solver::{AocParser, ParseError, PartSolver, SolveError};
use aoc_solver_macros::{AocSolver, AutoRegisterSolver};
use itertools::Itertools;
use regex::Regex;
use tracing::debug;

use crate::utils::range_map::{self, Chain, MapRule, MapTable, Range};

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2023, day = 5, tags = ["ranges"])]
pub struct Solver;

#[derive(Debug)]
pub struct SharedData {
    seeds: Vec<i64>,
    chain: Chain,
}

/// One non-blank almanac line
#[derive(Debug, PartialEq, Eq)]
enum Line<'a> {
    Seeds(Vec<i64>),
    Header { from: &'a str, to: &'a str },
    Rule { dst: i64, src: i64, len: i64 },
}

/// Line classifier with lazily compiled patterns
#[derive(Debug, Default)]
struct LineParser {
    header_regex: OnceCell<Regex>,
    rule_regex: OnceCell<Regex>,
}

impl LineParser {
    fn header_regex(&self) -> &Regex {
        self.header_regex
            .get_or_init(|| Regex::new(r"^([A-Za-z]+)-to-([A-Za-z]+) map:$").unwrap())
    }

    fn rule_regex(&self) -> &Regex {
        self.rule_regex
            .get_or_init(|| Regex::new(r"^(\d+)\s+(\d+)\s+(\d+)$").unwrap())
    }

    fn classify<'a>(&self, line: &'a str) -> anyhow::Result<Line<'a>> {
        if let Some(numbers) = line.strip_prefix("seeds:") {
            return numbers
                .split_whitespace()
                .map(|n| parse_number(n).with_context(|| format!("invalid seed '{n}'")))
                .collect::<anyhow::Result<Vec<_>>>()
                .map(Line::Seeds);
        }

        if let Some(captures) = self.header_regex().captures(line) {
            let (_, [from, to]) = captures.extract();
            return Ok(Line::Header { from, to });
        }

        if let Some(captures) = self.rule_regex().captures(line) {
            let (_, [dst, src, len]) = captures.extract();
            return Ok(Line::Rule {
                dst: parse_number(dst)?,
                src: parse_number(src)?,
                len: parse_number(len)?,
            });
        }

        bail!("unrecognized line '{line}'")
    }
}

fn parse_number(text: &str) -> anyhow::Result<i64> {
    text.parse::<i64>()
        .with_context(|| format!("'{text}' is not a valid number"))
}

fn at_line(line_no: usize, error: anyhow::Error) -> anyhow::Error {
    anyhow!("(line {}) {:#}", line_no, error)
}

/// Map section still collecting rules
#[derive(Debug)]
struct OpenTable<'a> {
    line_no: usize,
    from: &'a str,
    to: &'a str,
    rules: Vec<MapRule>,
}

#[derive(Debug, Default)]
struct AlmanacBuilder<'a> {
    seeds: Option<Vec<i64>>,
    chain: Chain,
    open: Option<OpenTable<'a>>,
}

impl<'a> AlmanacBuilder<'a> {
    fn push(&mut self, line_no: usize, line: Line<'a>) -> anyhow::Result<()> {
        match line {
            Line::Seeds(seeds) => {
                if self.seeds.is_some() {
                    return Err(at_line(line_no, anyhow!("duplicate 'seeds:' line")));
                }
                if self.open.is_some() || !self.chain.is_empty() {
                    return Err(at_line(
                        line_no,
                        anyhow!("'seeds:' line must come before any map"),
                    ));
                }
                self.seeds = Some(seeds);
            }
            Line::Header { from, to } => {
                self.close()?;
                self.open = Some(OpenTable {
                    line_no,
                    from,
                    to,
                    rules: Vec::new(),
                });
            }
            Line::Rule { dst, src, len } => {
                let table = self
                    .open
                    .as_mut()
                    .ok_or_else(|| at_line(line_no, anyhow!("map rule before any map header")))?;
                let rule = MapRule::new(dst, src, len).map_err(|e| at_line(line_no, e.into()))?;
                table.rules.push(rule);
            }
        }
        Ok(())
    }

    /// Turn the open section into a table and link it onto the chain
    fn close(&mut self) -> anyhow::Result<()> {
        let Some(open) = self.open.take() else {
            return Ok(());
        };
        MapTable::new(open.from, open.to, open.rules)
            .and_then(|table| self.chain.push(table))
            .map_err(|e| at_line(open.line_no, e.into()))
    }

    fn finish(mut self) -> anyhow::Result<(Option<Vec<i64>>, Chain)> {
        self.close()?;
        Ok((self.seeds, self.chain))
    }
}

impl AocParser for Solver {
    type SharedData<'a> = SharedData;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        let parser = LineParser::default();
        let mut builder = AlmanacBuilder::default();

        input
            .lines()
            .enumerate()
            .map(|(line_idx, line)| (line_idx + 1, line.trim()))
            .filter(|(_, line)| !line.is_empty())
            .try_for_each(|(line_no, line)| {
                let line = parser
                    .classify(line)
                    .map_err(|e| at_line(line_no, e))?;
                builder.push(line_no, line)
            })
            .map_err(|e| ParseError::InvalidFormat(e.to_string()))?;

        let (seeds, chain) = builder
            .finish()
            .map_err(|e| ParseError::InvalidFormat(e.to_string()))?;
        let seeds = seeds.ok_or_else(|| ParseError::MissingData("no 'seeds:' line".into()))?;

        debug!(
            seeds = seeds.len(),
            maps = chain.len(),
            "parsed almanac"
        );
        Ok(SharedData { seeds, chain })
    }
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let locations = shared
            .seeds
            .iter()
            .map(|&seed| shared.chain.map_value(seed))
            .collect::<Result<Vec<_>, _>>()
            .map_err(SolveError::failed)?;

        locations
            .into_iter()
            .min()
            .map(|location| location.to_string())
            .ok_or_else(|| SolveError::failed("no seeds to plant"))
    }
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let ranges = seed_ranges(&shared.seeds)?;
        if ranges.is_empty() {
            return Err(SolveError::failed("no seed ranges to plant"));
        }

        let locations = shared.chain.remap(ranges).map_err(SolveError::failed)?;
        range_map::lowest(&locations)
            .map(|location| location.to_string())
            .ok_or_else(|| SolveError::failed("no locations reached"))
    }
}

/// Read the seed list as `(start, len)` pairs, dropping empty ones
fn seed_ranges(seeds: &[i64]) -> Result<Vec<Range>, SolveError> {
    if seeds.len() % 2 != 0 {
        return Err(SolveError::failed(format!(
            "seed numbers must come in (start, length) pairs, found {} numbers",
            seeds.len()
        )));
    }

    let ranges = seeds
        .iter()
        .copied()
        .tuples()
        .filter(|&(_, len)| len > 0)
        .map(|(start, len)| {
            Range::from_start_len(start, len).ok_or_else(|| {
                SolveError::failed(format!(
                    "seed range starting at {start} with length {len} does not fit in 64 bits"
                ))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(range_map::coalesce(ranges))
}

#[cfg(test)]
mod tests {
    use super::*;
    use aoc_solver::Solver as _;

    const EXAMPLE: &str = "\
seeds: 79 14 55 13

seed-to-soil map:
50 98 2
52 50 48

soil-to-fertilizer map:
0 15 37
37 52 2
39 0 15

fertilizer-to-water map:
49 53 8
0 11 42
42 0 7
57 7 4

water-to-light map:
88 18 7
18 25 70

light-to-temperature map:
45 77 23
81 45 19
68 64 13

temperature-to-humidity map:
0 69 1
1 0 69

humidity-to-location map:
60 56 37
56 93 4
";

    fn parse_err(input: &str) -> String {
        match Solver::parse(input) {
            Err(ParseError::InvalidFormat(message)) => message,
            other => panic!("expected InvalidFormat, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_example() {
        let shared = Solver::parse(EXAMPLE).unwrap();
        assert_eq!(shared.seeds, vec![79, 14, 55, 13]);
        assert_eq!(shared.chain.len(), 7);
        assert_eq!(shared.chain.categories().first().unwrap(), "seed");
        assert_eq!(shared.chain.categories().last().unwrap(), "location");
    }

    #[test]
    fn test_example_part_1() {
        let mut shared = Solver::parse(EXAMPLE).unwrap();
        assert_eq!(Solver::solve_part(&mut shared, 1).unwrap(), "35");
    }

    #[test]
    fn test_example_part_2() {
        let mut shared = Solver::parse(EXAMPLE).unwrap();
        assert_eq!(Solver::solve_part(&mut shared, 2).unwrap(), "46");
    }

    #[test]
    fn test_no_maps_is_identity() {
        let mut shared = Solver::parse("seeds: 7 3 2 4").unwrap();
        assert_eq!(Solver::solve_part(&mut shared, 1).unwrap(), "2");
        assert_eq!(Solver::solve_part(&mut shared, 2).unwrap(), "2");
    }

    #[test]
    fn test_missing_seeds() {
        assert!(matches!(
            Solver::parse("seed-to-soil map:\n50 98 2\n"),
            Err(ParseError::MissingData(_))
        ));
    }

    #[test]
    fn test_line_numbers_in_errors() {
        let message = parse_err("seeds: 1 2\n\nseed-to-soil map:\n50 98 x\n");
        assert!(message.starts_with("(line 4)"), "{message}");

        let message = parse_err("seeds: 1 2\n12 13 14\n");
        assert!(message.contains("(line 2)"), "{message}");
        assert!(message.contains("before any map header"), "{message}");
    }

    #[test]
    fn test_seeds_must_come_first_and_once() {
        let message = parse_err("seeds: 1\nseeds: 2\n");
        assert!(message.contains("duplicate"), "{message}");

        let message = parse_err("seed-to-soil map:\n1 2 3\nseeds: 1\n");
        assert!(message.contains("before any map"), "{message}");
    }

    #[test]
    fn test_structural_errors_reported_at_header() {
        let message = parse_err("seeds: 1\nseed-to-soil map:\n10 0 5\n20 3 5\n");
        assert!(message.starts_with("(line 2)"), "{message}");
        assert!(message.contains("overlapping"), "{message}");

        let message = parse_err("seeds: 1\nseed-to-soil map:\n1 2 3\nwater-to-light map:\n1 2 3\n");
        assert!(message.starts_with("(line 4)"), "{message}");
        assert!(message.contains("chain broken"), "{message}");

        let message = parse_err("seeds: 1\nseed-to-soil map:\n1 2 0\n");
        assert!(message.starts_with("(line 3)"), "{message}");
    }

    #[test]
    fn test_rule_running_past_i64_max() {
        let message = parse_err("seeds: 1 2\nseed-to-soil map:\n9223372036854775807 0 2\n");
        assert!(message.starts_with("(line 3)"), "{message}");
        assert!(message.contains("64 bits"), "{message}");
    }

    #[test]
    fn test_overflowing_number() {
        let message = parse_err("seeds: 99999999999999999999\n");
        assert!(message.contains("invalid seed"), "{message}");
    }

    #[test]
    fn test_odd_seed_count_fails_part_2() {
        let mut shared = Solver::parse("seeds: 1 2 3").unwrap();
        assert_eq!(Solver::solve_part(&mut shared, 1).unwrap(), "1");
        assert!(matches!(
            Solver::solve_part(&mut shared, 2),
            Err(SolveError::SolveFailed(_))
        ));
    }

    #[test]
    fn test_empty_seeds_fail() {
        let mut shared = Solver::parse("seeds:\n").unwrap();
        assert!(matches!(
            Solver::solve_part(&mut shared, 1),
            Err(SolveError::SolveFailed(_))
        ));
        assert!(matches!(
            Solver::solve_part(&mut shared, 2),
            Err(SolveError::SolveFailed(_))
        ));
    }

    #[test]
    fn test_seed_range_past_i64_max_fails() {
        assert!(matches!(
            seed_ranges(&[i64::MAX, 2]),
            Err(SolveError::SolveFailed(_))
        ));
    }

    #[test]
    fn test_zero_length_pairs_dropped() {
        assert_eq!(
            seed_ranges(&[5, 0, 10, 2, 11, 3]).unwrap(),
            vec![Range::new(10, 13)]
        );
    }
}

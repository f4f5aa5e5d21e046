//! Interval remapping through an ordered chain of category maps
//!
//! A [`MapTable`] translates values from one category to the next with a set
//! of sorted, non-overlapping [`MapRule`]s; values that no rule covers keep
//! their number. A [`Chain`] links tables end to end (`seed -> soil -> ... ->
//! location`) and pushes either single values or whole [`Range`]s through
//! every table in order. Ranges are split at rule boundaries, so a range set
//! of any width is remapped in time proportional to the number of pieces,
//! not the number of values.

use std::cmp::{max, min};
use std::collections::HashMap;
use thiserror::Error;
use tracing::debug;

/// Errors raised while building rules, tables, and chains
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeMapError {
    /// A rule with a zero or negative length
    #[error("rule length must be > 0 (dst = {dst_lower}, src = {src_lower}, len = {len})")]
    EmptyRule {
        dst_lower: i64,
        src_lower: i64,
        len: i64,
    },

    /// A rule whose source or destination runs past `i64::MAX`
    #[error("rule does not fit in 64 bits (dst = {dst_lower}, src = {src_lower}, len = {len})")]
    RuleOverflow {
        dst_lower: i64,
        src_lower: i64,
        len: i64,
    },

    /// Two rules of one table cover a common source value
    #[error("{from}-to-{to} map has overlapping rules at source {first_upper} >= {second_lower}")]
    OverlappingRules {
        from: String,
        to: String,
        first_upper: i64,
        second_lower: i64,
    },

    /// A table does not start where the chain currently ends
    #[error("chain broken: expected a map from '{expected}', found '{found}'")]
    DiscontinuousChain { expected: String, found: String },

    /// No table registered for a category pair
    #[error("no map registered from '{from}' to '{to}'")]
    UnknownPair { from: String, to: String },
}

/// Inclusive integer interval, `lower <= upper`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Range {
    pub lower: i64,
    pub upper: i64,
}

impl Range {
    pub fn new(lower: i64, upper: i64) -> Self {
        debug_assert!(lower <= upper, "empty range [{lower}, {upper}]");
        Self { lower, upper }
    }

    /// `len` values starting at `start`, or `None` when `len <= 0` or the
    /// last value overflows
    pub fn from_start_len(start: i64, len: i64) -> Option<Self> {
        if len <= 0 {
            return None;
        }
        start.checked_add(len - 1).map(|upper| Self::new(start, upper))
    }

    /// Number of values covered
    pub fn size(&self) -> i64 {
        self.upper - self.lower + 1
    }

    pub fn contains(&self, value: i64) -> bool {
        (self.lower..=self.upper).contains(&value)
    }
}

/// Maps source interval `[src_lower, src_upper]` onto the equally long
/// interval starting at `dst_lower`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapRule {
    pub src_lower: i64,
    pub src_upper: i64,
    pub dst_lower: i64,
}

impl MapRule {
    /// Build from the `dst src len` triple used by the puzzle input
    pub fn new(dst_lower: i64, src_lower: i64, len: i64) -> Result<Self, RangeMapError> {
        if len <= 0 {
            return Err(RangeMapError::EmptyRule {
                dst_lower,
                src_lower,
                len,
            });
        }
        let overflow = RangeMapError::RuleOverflow {
            dst_lower,
            src_lower,
            len,
        };
        let source = Range::from_start_len(src_lower, len).ok_or(overflow.clone())?;
        Range::from_start_len(dst_lower, len).ok_or(overflow)?;
        Ok(Self {
            src_lower: source.lower,
            src_upper: source.upper,
            dst_lower,
        })
    }

    /// Distance every covered value moves
    pub fn offset(&self) -> i64 {
        self.dst_lower - self.src_lower
    }

    pub fn source(&self) -> Range {
        Range::new(self.src_lower, self.src_upper)
    }

    /// Translate a single value, `None` when the rule does not cover it
    pub fn map_value(&self, value: i64) -> Option<i64> {
        self.source()
            .contains(value)
            .then(|| value - self.src_lower + self.dst_lower)
    }

    /// Translate a range the caller has already clipped to the rule's source
    pub fn translate(&self, range: Range) -> Range {
        debug_assert!(self.src_lower <= range.lower && range.upper <= self.src_upper);
        Range::new(
            range.lower - self.src_lower + self.dst_lower,
            range.upper - self.src_lower + self.dst_lower,
        )
    }
}

/// All rules translating category `from` into category `to`
///
/// Rules are kept sorted by `src_lower` and never overlap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapTable {
    from: String,
    to: String,
    rules: Vec<MapRule>,
}

impl MapTable {
    /// Sort `rules` by source and reject overlapping ones
    pub fn new(
        from: impl Into<String>,
        to: impl Into<String>,
        mut rules: Vec<MapRule>,
    ) -> Result<Self, RangeMapError> {
        let (from, to) = (from.into(), to.into());
        rules.sort_unstable_by_key(|rule| rule.src_lower);

        if let Some(pair) = rules
            .windows(2)
            .find(|pair| pair[1].src_lower <= pair[0].src_upper)
        {
            return Err(RangeMapError::OverlappingRules {
                from,
                to,
                first_upper: pair[0].src_upper,
                second_lower: pair[1].src_lower,
            });
        }

        Ok(Self { from, to, rules })
    }

    /// Source category name
    pub fn from_category(&self) -> &str {
        &self.from
    }

    /// Destination category name
    pub fn to_category(&self) -> &str {
        &self.to
    }

    pub fn rules(&self) -> &[MapRule] {
        &self.rules
    }

    /// Translate one value; uncovered values map to themselves
    pub fn map_value(&self, value: i64) -> i64 {
        self.rules
            .iter()
            .find_map(|rule| rule.map_value(value))
            .unwrap_or(value)
    }

    /// Split `range` at rule boundaries and push the translated pieces to `out`
    ///
    /// Pieces no rule covers are pushed unchanged. The pieces cover exactly
    /// as many values as `range`.
    pub fn remap_range(&self, range: Range, out: &mut Vec<Range>) {
        let mut remaining = range;

        for rule in &self.rules {
            if remaining.upper < rule.src_lower {
                // sorted rules: nothing further along can match either
                break;
            }
            if remaining.lower > rule.src_upper {
                continue;
            }

            if remaining.lower < rule.src_lower {
                out.push(Range::new(remaining.lower, rule.src_lower - 1));
            }

            let overlap = Range::new(
                max(remaining.lower, rule.src_lower),
                min(remaining.upper, rule.src_upper),
            );
            out.push(rule.translate(overlap));

            if remaining.upper <= rule.src_upper {
                return;
            }
            remaining = Range::new(overlap.upper + 1, remaining.upper);
        }

        out.push(remaining);
    }

    /// Remap a whole range set; the result is sorted by lower bound
    pub fn remap(&self, ranges: &[Range]) -> Vec<Range> {
        let mut out = Vec::with_capacity(ranges.len());
        for &range in ranges {
            self.remap_range(range, &mut out);
        }
        out.sort_unstable();
        out
    }
}

/// Tables linked end to end, each one's destination the next one's source
#[derive(Debug, Clone, Default)]
pub struct Chain {
    categories: Vec<String>,
    tables: HashMap<(String, String), MapTable>,
}

impl Chain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a table; it must start at the category the chain ends with
    pub fn push(&mut self, table: MapTable) -> Result<(), RangeMapError> {
        match self.categories.last() {
            None => {
                self.categories.push(table.from_category().to_string());
            }
            Some(last) if last == table.from_category() => {}
            Some(last) => {
                return Err(RangeMapError::DiscontinuousChain {
                    expected: last.clone(),
                    found: table.from_category().to_string(),
                });
            }
        }

        debug!(
            from = table.from_category(),
            to = table.to_category(),
            rules = table.rules().len(),
            "linking map"
        );
        self.categories.push(table.to_category().to_string());
        self.tables
            .insert((table.from.clone(), table.to.clone()), table);
        Ok(())
    }

    /// Category names in chain order
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Number of tables in the chain
    pub fn len(&self) -> usize {
        self.categories.len().saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Look up the table translating `from` into `to`
    pub fn table(&self, from: &str, to: &str) -> Result<&MapTable, RangeMapError> {
        self.tables
            .get(&(from.to_string(), to.to_string()))
            .ok_or_else(|| RangeMapError::UnknownPair {
                from: from.to_string(),
                to: to.to_string(),
            })
    }

    /// Tables in chain order
    pub fn tables(&self) -> impl Iterator<Item = Result<&MapTable, RangeMapError>> + '_ {
        self.categories
            .windows(2)
            .map(|pair| self.table(&pair[0], &pair[1]))
    }

    /// Push one value through every table
    pub fn map_value(&self, value: i64) -> Result<i64, RangeMapError> {
        self.tables()
            .try_fold(value, |value, table| Ok(table?.map_value(value)))
    }

    /// Push a range set through every table, re-sorting after each one
    pub fn remap(&self, ranges: Vec<Range>) -> Result<Vec<Range>, RangeMapError> {
        self.tables().try_fold(ranges, |ranges, table| {
            let table = table?;
            let remapped = table.remap(&ranges);
            debug!(
                from = table.from_category(),
                to = table.to_category(),
                before = ranges.len(),
                after = remapped.len(),
                "remapped ranges"
            );
            Ok(remapped)
        })
    }
}

/// Smallest lower bound of a range set
pub fn lowest(ranges: &[Range]) -> Option<i64> {
    ranges.iter().map(|range| range.lower).min()
}

/// Sort a range set and merge ranges that overlap or touch
pub fn coalesce(mut ranges: Vec<Range>) -> Vec<Range> {
    ranges.sort_unstable();
    let mut merged: Vec<Range> = Vec::with_capacity(ranges.len());
    for range in ranges {
        match merged.last_mut() {
            Some(last) if range.lower <= last.upper.saturating_add(1) => {
                last.upper = max(last.upper, range.upper);
            }
            _ => merged.push(range),
        }
    }
    merged
}

//! Solver registry keyed by `(year, day)`

use crate::error::{ParseError, RegistrationError, SolverError};
use crate::instance::{DynSolver, SolverInstance};
use crate::solver::Solver;
use std::collections::BTreeMap;

/// First Advent of Code year
pub const BASE_YEAR: u16 = 2015;
/// Number of supported years (2015-2034)
pub const MAX_YEARS: u16 = 20;
/// Puzzle days per year
pub const DAYS_PER_YEAR: u8 = 25;

/// Check that a year/day pair is inside the supported calendar
#[inline]
fn is_valid_year_day(year: u16, day: u8) -> bool {
    (BASE_YEAR..BASE_YEAR + MAX_YEARS).contains(&year) && (1..=DAYS_PER_YEAR).contains(&day)
}

/// Factory that parses input into a boxed solver instance
pub type SolverFactory =
    Box<dyn for<'a> Fn(&'a str) -> Result<Box<dyn DynSolver + 'a>, ParseError> + Send + Sync>;

/// Metadata about a registered solver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FactoryInfo {
    /// The Advent of Code year
    pub year: u16,
    /// The day number (1-25)
    pub day: u8,
    /// Number of parts this solver supports
    pub parts: u8,
    /// Tags the solver was registered with
    pub tags: &'static [&'static str],
}

struct SolverEntry {
    factory: SolverFactory,
    parts: u8,
    tags: &'static [&'static str],
}

/// Builder for an immutable [`SolverRegistry`]
///
/// Rejects duplicate and out-of-calendar registrations.
///
/// ```
/// use aoc_solver::RegistryBuilder;
///
/// let registry = RegistryBuilder::new().register_all_plugins().unwrap().build();
/// assert!(registry.get_info(2015, 0).is_none());
/// ```
#[derive(Default)]
pub struct RegistryBuilder {
    solvers: BTreeMap<(u16, u8), SolverEntry>,
}

impl RegistryBuilder {
    /// Create a new empty registry builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a solver factory for a specific year and day
    pub fn register<F>(
        mut self,
        year: u16,
        day: u8,
        parts: u8,
        tags: &'static [&'static str],
        factory: F,
    ) -> Result<Self, RegistrationError>
    where
        F: for<'a> Fn(&'a str) -> Result<Box<dyn DynSolver + 'a>, ParseError>
            + Send
            + Sync
            + 'static,
    {
        if !is_valid_year_day(year, day) {
            return Err(RegistrationError::InvalidYearDay(year, day));
        }
        if self.solvers.contains_key(&(year, day)) {
            return Err(RegistrationError::DuplicateSolver(year, day));
        }
        self.solvers.insert(
            (year, day),
            SolverEntry {
                factory: Box::new(factory),
                parts,
                tags,
            },
        );
        Ok(self)
    }

    /// Register every plugin submitted through `inventory::submit!`
    pub fn register_all_plugins(self) -> Result<Self, RegistrationError> {
        self.register_solver_plugins(|_| true)
    }

    /// Register the plugins accepted by `filter`
    ///
    /// ```no_run
    /// # use aoc_solver::RegistryBuilder;
    /// // Only the 2023 grid puzzles
    /// let registry = RegistryBuilder::new()
    ///     .register_solver_plugins(|plugin| plugin.year == 2023 && plugin.tags.contains(&"grid"))
    ///     .unwrap()
    ///     .build();
    /// ```
    pub fn register_solver_plugins<F>(mut self, filter: F) -> Result<Self, RegistrationError>
    where
        F: Fn(&SolverPlugin) -> bool,
    {
        for plugin in inventory::iter::<SolverPlugin>() {
            if filter(plugin) {
                self = plugin
                    .solver
                    .register_with(self, plugin.year, plugin.day, plugin.tags)?;
            }
        }
        Ok(self)
    }

    /// Finalize the builder
    pub fn build(self) -> SolverRegistry {
        SolverRegistry {
            solvers: self.solvers,
        }
    }
}

/// Immutable lookup from `(year, day)` to solver factories
///
/// Iteration is ordered by year, then day.
pub struct SolverRegistry {
    solvers: BTreeMap<(u16, u8), SolverEntry>,
}

impl SolverRegistry {
    /// Parse `input` with the solver registered for `year`/`day`
    pub fn create_solver<'a>(
        &self,
        year: u16,
        day: u8,
        input: &'a str,
    ) -> Result<Box<dyn DynSolver + 'a>, SolverError> {
        if !is_valid_year_day(year, day) {
            return Err(SolverError::InvalidYearDay(year, day));
        }
        let entry = self
            .solvers
            .get(&(year, day))
            .ok_or(SolverError::NotFound(year, day))?;

        (entry.factory)(input).map_err(SolverError::ParseError)
    }

    /// Metadata for all registered solvers
    pub fn iter_info(&self) -> impl Iterator<Item = FactoryInfo> + '_ {
        self.solvers.iter().map(|(&(year, day), entry)| FactoryInfo {
            year,
            day,
            parts: entry.parts,
            tags: entry.tags,
        })
    }

    /// Metadata for one solver
    pub fn get_info(&self, year: u16, day: u8) -> Option<FactoryInfo> {
        self.solvers.get(&(year, day)).map(|entry| FactoryInfo {
            year,
            day,
            parts: entry.parts,
            tags: entry.tags,
        })
    }

    /// Whether a solver exists for year/day
    pub fn contains(&self, year: u16, day: u8) -> bool {
        self.solvers.contains_key(&(year, day))
    }

    /// Number of registered solvers
    pub fn len(&self) -> usize {
        self.solvers.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.solvers.is_empty()
    }
}

/// Object-safe registration hook, implemented for every [`Solver`]
///
/// `Solver` has associated types and consts, so plugins hold a
/// `&'static dyn RegisterableSolver` instead.
pub trait RegisterableSolver: Sync {
    /// Register this solver with the builder under `year`/`day`
    fn register_with(
        &self,
        builder: RegistryBuilder,
        year: u16,
        day: u8,
        tags: &'static [&'static str],
    ) -> Result<RegistryBuilder, RegistrationError>;

    /// Number of parts this solver supports
    fn parts(&self) -> u8;
}

impl<S> RegisterableSolver for S
where
    S: Solver + Sync + 'static,
{
    fn register_with(
        &self,
        builder: RegistryBuilder,
        year: u16,
        day: u8,
        tags: &'static [&'static str],
    ) -> Result<RegistryBuilder, RegistrationError> {
        builder.register(year, day, S::PARTS, tags, move |input: &str| {
            Ok(Box::new(SolverInstance::<S>::new(year, day, input)?))
        })
    }

    fn parts(&self) -> u8 {
        S::PARTS
    }
}

/// Plugin record collected by `inventory`
///
/// Usually emitted by `#[derive(AutoRegisterSolver)]`:
///
/// ```ignore
/// #[derive(AocSolver, AutoRegisterSolver)]
/// #[aoc_solver(max_parts = 2)]
/// #[aoc(year = 2023, day = 5, tags = ["ranges"])]
/// pub struct Solver;
/// ```
pub struct SolverPlugin {
    /// The Advent of Code year
    pub year: u16,
    /// The day number (1-25)
    pub day: u8,
    /// The solver (type-erased)
    pub solver: &'static dyn RegisterableSolver,
    /// Tags for filtering (e.g. "ranges", "grid")
    pub tags: &'static [&'static str],
}

inventory::collect!(SolverPlugin);

/// Register a solver type with a builder binding, panicking on duplicates
///
/// ```
/// use aoc_solver::{register_solver, AocParser, ParseError, RegistryBuilder, SolveError, Solver};
///
/// struct Echo;
///
/// impl AocParser for Echo {
///     type SharedData<'a> = &'a str;
///
///     fn parse(input: &str) -> Result<Self::SharedData<'_>, ParseError> {
///         Ok(input.trim())
///     }
/// }
///
/// impl Solver for Echo {
///     const PARTS: u8 = 1;
///
///     fn solve_part(shared: &mut Self::SharedData<'_>, _part: u8) -> Result<String, SolveError> {
///         Ok(shared.to_string())
///     }
/// }
///
/// let mut builder = RegistryBuilder::new();
/// register_solver!(builder, Echo, 2023, 1);
/// let registry = builder.build();
///
/// let mut solver = registry.create_solver(2023, 1, " 42 ").unwrap();
/// assert_eq!(solver.solve(1).unwrap().answer, "42");
/// ```
#[macro_export]
macro_rules! register_solver {
    ($builder:expr, $solver:ty, $year:expr, $day:expr) => {
        $builder = $builder
            .register(
                $year,
                $day,
                <$solver as $crate::Solver>::PARTS,
                &[],
                |input: &str| {
                    Ok(::std::boxed::Box::new(
                        $crate::SolverInstance::<$solver>::new($year, $day, input)?,
                    ))
                },
            )
            .expect("Failed to register solver");
    };
}

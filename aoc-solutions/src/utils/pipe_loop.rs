//! Closed pipe loops on a character grid and the cells they enclose
//!
//! A [`PipeGrid`] is parsed from glyphs (`| - L J 7 F`, `S` for the start,
//! `.` for ground). [`PipeGrid::trace_loop`] follows the pipe from the start
//! until it closes, inferring the start's real shape on the way. The traced
//! [`PipeLoop`] then answers two questions: how far the farthest loop cell is
//! from the start, and which cells lie inside the loop.
//!
//! Enclosure uses crossing parity on the gaps between grid lines. Every loop
//! edge crosses exactly one gap, recorded in a [`CrossingIndex`]. A ray along
//! a gap never touches a loop vertex, so counting crossings on one side of a
//! cell gives a clean inside/outside answer without doubling the grid.

use bitflags::bitflags;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

/// Grid coordinate; `y` grows downward
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The adjacent cell in `direction`
    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.offset();
        Self::new(self.x + dx, self.y + dy)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    pub const fn offset(self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::South => (0, 1),
            Direction::East => (1, 0),
            Direction::West => (-1, 0),
        }
    }

    pub const fn opposite(self) -> Self {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::West => Direction::East,
        }
    }

    pub const fn side(self) -> Sides {
        match self {
            Direction::North => Sides::NORTH,
            Direction::South => Sides::SOUTH,
            Direction::East => Sides::EAST,
            Direction::West => Sides::WEST,
        }
    }
}

bitflags! {
    /// Sides of a cell that carry a pipe connector
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Sides: u8 {
        const NORTH = 1 << 0;
        const SOUTH = 1 << 1;
        const EAST = 1 << 2;
        const WEST = 1 << 3;
    }
}

impl Sides {
    /// Connectors drawn by a grid glyph, `None` outside the alphabet
    ///
    /// The start glyph `S` claims all four sides until the trace resolves
    /// which two it really uses.
    pub fn from_glyph(glyph: char) -> Option<Self> {
        let sides = match glyph {
            '|' => Sides::NORTH | Sides::SOUTH,
            '-' => Sides::EAST | Sides::WEST,
            'L' => Sides::NORTH | Sides::EAST,
            'J' => Sides::NORTH | Sides::WEST,
            '7' => Sides::SOUTH | Sides::WEST,
            'F' => Sides::SOUTH | Sides::EAST,
            'S' => Sides::all(),
            '.' => Sides::empty(),
            _ => return None,
        };
        Some(sides)
    }

    /// Inverse of [`Sides::from_glyph`] for two-sided pipes
    pub fn glyph(self) -> Option<char> {
        [
            (Sides::NORTH | Sides::SOUTH, '|'),
            (Sides::EAST | Sides::WEST, '-'),
            (Sides::NORTH | Sides::EAST, 'L'),
            (Sides::NORTH | Sides::WEST, 'J'),
            (Sides::SOUTH | Sides::WEST, '7'),
            (Sides::SOUTH | Sides::EAST, 'F'),
        ]
        .into_iter()
        .find_map(|(sides, glyph)| (sides == self).then_some(glyph))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipeLoopError {
    #[error("grid is empty")]
    EmptyGrid,

    #[error("invalid line length on line {line}: expected {expected}, found {found}")]
    RowLength {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("invalid character '{glyph}' at position {cell}")]
    InvalidGlyph { glyph: char, cell: Cell },

    #[error("duplicate start at {second}, first start at {first}")]
    DuplicateStart { first: Cell, second: Cell },

    #[error("grid has no start cell")]
    MissingStart,

    /// A row or column index that does not fit a [`Cell`] coordinate
    #[error("grid too large: position ({x}, {y}) exceeds {}", i32::MAX)]
    TooLarge { x: usize, y: usize },

    /// No connector of the start leads back to it
    #[error("main pipe is broken: loop from {start} dead-ends at {at}")]
    BrokenLoop { start: Cell, at: Cell },
}

/// Pipe connectors of every non-ground cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipeGrid {
    width: usize,
    height: usize,
    start: Cell,
    tiles: HashMap<Cell, Sides>,
}

impl PipeGrid {
    /// Build a grid directly from connectors; `start` is given all four sides
    pub fn new(width: usize, height: usize, start: Cell, mut tiles: HashMap<Cell, Sides>) -> Self {
        tiles.insert(start, Sides::all());
        Self {
            width,
            height,
            start,
            tiles,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn start(&self) -> Cell {
        self.start
    }

    /// Connectors at `cell`, empty for ground and cells off the grid
    pub fn sides(&self, cell: Cell) -> Sides {
        self.tiles.get(&cell).copied().unwrap_or_default()
    }

    /// Follow the pipe from the start until it closes
    ///
    /// Each of the start's four candidate connectors is tried in turn; the
    /// first that leads back to the start defines the loop and the start's
    /// real shape.
    pub fn trace_loop(&self) -> Result<PipeLoop, PipeLoopError> {
        let mut dead_end = DeadEnd {
            steps: 0,
            at: self.start,
        };

        for first in Direction::ALL {
            match self.follow(first) {
                Ok(pipe_loop) => {
                    debug!(
                        start = %self.start,
                        length = pipe_loop.len(),
                        "traced pipe loop"
                    );
                    return Ok(pipe_loop);
                }
                Err(end) if end.steps > dead_end.steps => dead_end = end,
                Err(_) => {}
            }
        }

        Err(PipeLoopError::BrokenLoop {
            start: self.start,
            at: dead_end.at,
        })
    }

    fn follow(&self, first: Direction) -> Result<PipeLoop, DeadEnd> {
        let mut path = vec![self.start];
        let mut connections = HashMap::new();
        let mut heading = first;
        let mut current = self.start.step(first);

        while current != self.start {
            let dead_end = DeadEnd {
                steps: path.len(),
                at: current,
            };
            if path.len() > self.tiles.len() {
                return Err(dead_end);
            }

            let sides = self.sides(current);
            let entry = heading.opposite();
            if !sides.contains(entry.side()) {
                return Err(dead_end);
            }
            let exit = Direction::ALL
                .into_iter()
                .find(|&d| d != entry && sides.contains(d.side()))
                .ok_or(dead_end)?;

            connections.insert(current, sides);
            path.push(current);
            heading = exit;
            current = current.step(exit);
        }

        connections.insert(self.start, first.side() | heading.opposite().side());
        Ok(PipeLoop { path, connections })
    }
}

/// Where a trace attempt stopped and how far it got
#[derive(Debug, Clone, Copy)]
struct DeadEnd {
    steps: usize,
    at: Cell,
}

impl FromStr for PipeGrid {
    type Err = PipeLoopError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut width = None;
        let mut height = 0;
        let mut start: Option<Cell> = None;
        let mut tiles = HashMap::new();

        for (y, line) in s
            .lines()
            .map(str::trim_end)
            .filter(|line| !line.is_empty())
            .enumerate()
        {
            let found = line.chars().count();
            match width {
                None => width = Some(found),
                Some(expected) if expected != found => {
                    return Err(PipeLoopError::RowLength {
                        line: y + 1,
                        expected,
                        found,
                    });
                }
                Some(_) => {}
            }

            for (x, glyph) in line.chars().enumerate() {
                let cell = cell_at(x, y)?;
                let sides =
                    Sides::from_glyph(glyph).ok_or(PipeLoopError::InvalidGlyph { glyph, cell })?;

                if glyph == 'S' {
                    if let Some(first) = start.replace(cell) {
                        return Err(PipeLoopError::DuplicateStart {
                            first,
                            second: cell,
                        });
                    }
                }
                if !sides.is_empty() {
                    tiles.insert(cell, sides);
                }
            }
            height += 1;
        }

        let width = width.ok_or(PipeLoopError::EmptyGrid)?;
        let start = start.ok_or(PipeLoopError::MissingStart)?;
        Ok(Self::new(width, height, start, tiles))
    }
}

/// Cell at column `x`, row `y` of the parsed text
fn cell_at(x: usize, y: usize) -> Result<Cell, PipeLoopError> {
    match (i32::try_from(x), i32::try_from(y)) {
        (Ok(cx), Ok(cy)) => Ok(Cell::new(cx, cy)),
        _ => Err(PipeLoopError::TooLarge { x, y }),
    }
}

/// Inclusive rectangle of cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub min: Cell,
    pub max: Cell,
}

impl BoundingBox {
    pub fn contains(&self, cell: Cell) -> bool {
        (self.min.x..=self.max.x).contains(&cell.x) && (self.min.y..=self.max.y).contains(&cell.y)
    }

    /// Cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = Cell> + use<> {
        let (min, max) = (self.min, self.max);
        (min.y..=max.y).flat_map(move |y| (min.x..=max.x).map(move |x| Cell::new(x, y)))
    }
}

/// The single closed loop through the start cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipeLoop {
    path: Vec<Cell>,
    connections: HashMap<Cell, Sides>,
}

impl PipeLoop {
    /// Number of cells on the loop
    pub fn len(&self) -> usize {
        self.path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    /// Loop cells in walking order, starting at the start cell
    pub fn path(&self) -> &[Cell] {
        &self.path
    }

    pub fn start(&self) -> Cell {
        self.path[0]
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.connections.contains_key(&cell)
    }

    /// Resolved connectors of a loop cell, empty for cells off the loop
    pub fn connections(&self, cell: Cell) -> Sides {
        self.connections.get(&cell).copied().unwrap_or_default()
    }

    /// Steps from the start to the loop cell farthest from it
    pub fn farthest_distance(&self) -> usize {
        self.len().div_ceil(2)
    }

    pub fn bounding_box(&self) -> BoundingBox {
        let start = self.start();
        self.path.iter().fold(
            BoundingBox {
                min: start,
                max: start,
            },
            |bbox, cell| BoundingBox {
                min: Cell::new(bbox.min.x.min(cell.x), bbox.min.y.min(cell.y)),
                max: Cell::new(bbox.max.x.max(cell.x), bbox.max.y.max(cell.y)),
            },
        )
    }

    /// Gap crossings of every loop edge
    pub fn crossings(&self) -> CrossingIndex {
        CrossingIndex::new(self)
    }

    /// Cells strictly inside the loop, in row-major order
    pub fn enclosed<'a>(&'a self, index: &'a CrossingIndex) -> impl Iterator<Item = Cell> + 'a {
        self.bounding_box()
            .cells()
            .filter(move |&cell| !self.contains(cell) && index.encloses(cell))
    }

    pub fn count_enclosed(&self, index: &CrossingIndex) -> usize {
        self.enclosed(index).count()
    }
}

/// Loop edges indexed by the grid gap they cross
///
/// `vertical[g]` holds the `x` of every vertical edge between rows `g` and
/// `g + 1`; `horizontal[g]` holds the `y` of every horizontal edge between
/// columns `g` and `g + 1`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrossingIndex {
    vertical: HashMap<i32, BTreeSet<i32>>,
    horizontal: HashMap<i32, BTreeSet<i32>>,
}

impl CrossingIndex {
    pub fn new(pipe_loop: &PipeLoop) -> Self {
        let mut index = Self::default();
        for (&cell, &sides) in &pipe_loop.connections {
            if sides.contains(Sides::NORTH) {
                index.vertical.entry(cell.y - 1).or_default().insert(cell.x);
            }
            if sides.contains(Sides::SOUTH) {
                index.vertical.entry(cell.y).or_default().insert(cell.x);
            }
            if sides.contains(Sides::WEST) {
                index.horizontal.entry(cell.x - 1).or_default().insert(cell.y);
            }
            if sides.contains(Sides::EAST) {
                index.horizontal.entry(cell.x).or_default().insert(cell.y);
            }
        }
        index
    }

    /// Vertical edges crossing the gap below row `gap`
    pub fn vertical(&self, gap: i32) -> Option<&BTreeSet<i32>> {
        self.vertical.get(&gap)
    }

    /// Horizontal edges crossing the gap right of column `gap`
    pub fn horizontal(&self, gap: i32) -> Option<&BTreeSet<i32>> {
        self.horizontal.get(&gap)
    }

    /// Whether a cell that is not on the loop lies inside it
    ///
    /// Both gaps around the cell must see an odd number of crossings before
    /// it, along both axes.
    pub fn encloses(&self, cell: Cell) -> bool {
        let inside_rows = [cell.y - 1, cell.y]
            .into_iter()
            .all(|gap| odd_before(self.vertical.get(&gap), cell.x));
        let inside_columns = [cell.x - 1, cell.x]
            .into_iter()
            .all(|gap| odd_before(self.horizontal.get(&gap), cell.y));
        inside_rows && inside_columns
    }
}

fn odd_before(crossings: Option<&BTreeSet<i32>>, limit: i32) -> bool {
    crossings.is_some_and(|c| c.range(..limit).count() % 2 == 1)
}

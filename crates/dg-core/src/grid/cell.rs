//! Grid cells, world placement and ordered cell sets

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use super::Direction;

/// One room slot on the layout grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    /// The origin room every layout grows from
    pub const ORIGIN: Cell = Cell { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Neighbouring cell one step in `dir`
    pub const fn step(self, dir: Direction) -> Cell {
        let (dx, dy) = dir.offset();
        Cell {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// The four neighbours in table order
    pub fn neighbors(self) -> impl Iterator<Item = (Direction, Cell)> {
        Direction::ALL.into_iter().map(move |dir| (dir, self.step(dir)))
    }

    pub const fn manhattan(self, other: Cell) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Direction from `self` to an adjacent `other`
    pub fn direction_to(self, other: Cell) -> Option<Direction> {
        Direction::from_offset(other.x - self.x, other.y - self.y)
    }

    pub fn is_adjacent(self, other: Cell) -> bool {
        self.manhattan(other) == 1
    }

    /// World-space centre of this cell
    pub fn world_center(self, cell_size: f32) -> WorldPos {
        let half = cell_size / 2.0;
        WorldPos {
            x: self.x as f32 * cell_size + half,
            y: self.y as f32 * cell_size + half,
        }
    }
}

impl core::fmt::Display for Cell {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Position on the ground plane in world units
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WorldPos {
    pub x: f32,
    pub y: f32,
}

impl WorldPos {
    pub fn midpoint(self, other: WorldPos) -> WorldPos {
        WorldPos {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
        }
    }
}

/// Insertion-ordered set of cells.
///
/// Lookups go through the hash index; iteration always follows insertion
/// order so anything driven by it replays identically for a given seed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellSet {
    order: Vec<Cell>,
    index: HashMap<Cell, usize>,
}

impl CellSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a cell; returns false if it was already present
    pub fn insert(&mut self, cell: Cell) -> bool {
        if self.index.contains_key(&cell) {
            return false;
        }
        self.index.insert(cell, self.order.len());
        self.order.push(cell);
        true
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.index.contains_key(&cell)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Cell> + '_ {
        self.order.iter().copied()
    }

    pub fn as_slice(&self) -> &[Cell] {
        &self.order
    }

    pub fn first(&self) -> Option<Cell> {
        self.order.first().copied()
    }
}

impl FromIterator<Cell> for CellSet {
    fn from_iter<I: IntoIterator<Item = Cell>>(iter: I) -> Self {
        let mut set = CellSet::new();
        for cell in iter {
            set.insert(cell);
        }
        set
    }
}

impl Serialize for CellSet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.order.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for CellSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let cells = Vec::<Cell>::deserialize(deserializer)?;
        Ok(cells.into_iter().collect())
    }
}

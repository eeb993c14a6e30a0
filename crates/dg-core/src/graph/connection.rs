//! Door connections between adjacent rooms

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::grid::{Cell, Direction, Sides};

/// Symmetric key for a connection between two adjacent cells.
///
/// The smaller cell (by x, then y) is always stored first so
/// `ConnectionKey::new(a, b) == ConnectionKey::new(b, a)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConnectionKey {
    a: Cell,
    b: Cell,
}

impl ConnectionKey {
    pub fn new(p: Cell, q: Cell) -> Self {
        if p <= q { Self { a: p, b: q } } else { Self { a: q, b: p } }
    }

    pub fn cells(&self) -> (Cell, Cell) {
        (self.a, self.b)
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.a == cell || self.b == cell
    }

    /// True when exactly one endpoint satisfies `inside`
    pub fn crosses(&self, inside: impl Fn(Cell) -> bool) -> bool {
        inside(self.a) != inside(self.b)
    }
}

impl core::fmt::Display for ConnectionKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{},{}-{},{}", self.a.x, self.a.y, self.b.x, self.b.y)
    }
}

/// Set of doors between occupied cells
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionGraph {
    doors: BTreeSet<ConnectionKey>,
}

impl ConnectionGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a door between two adjacent cells; returns false if it existed
    /// or the cells are not adjacent.
    pub fn connect(&mut self, p: Cell, q: Cell) -> bool {
        if !p.is_adjacent(q) {
            return false;
        }
        self.doors.insert(ConnectionKey::new(p, q))
    }

    pub fn is_connected(&self, p: Cell, q: Cell) -> bool {
        self.doors.contains(&ConnectionKey::new(p, q))
    }

    pub fn contains(&self, key: &ConnectionKey) -> bool {
        self.doors.contains(key)
    }

    pub fn len(&self) -> usize {
        self.doors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.doors.is_empty()
    }

    /// Doors in key order
    pub fn iter(&self) -> impl Iterator<Item = ConnectionKey> + '_ {
        self.doors.iter().copied()
    }

    /// Keep only the doors matching `keep`; returns how many were removed
    pub fn retain(&mut self, mut keep: impl FnMut(&ConnectionKey) -> bool) -> usize {
        let before = self.doors.len();
        self.doors.retain(|k| keep(k));
        before - self.doors.len()
    }

    /// Sides of `cell` that carry a door
    pub fn open_sides(&self, cell: Cell) -> Sides {
        Direction::ALL
            .into_iter()
            .filter(|dir| self.is_connected(cell, cell.step(*dir)))
            .fold(Sides::empty(), |acc, dir| acc | dir.side())
    }

    /// Number of doors on `cell`
    pub fn degree(&self, cell: Cell) -> u32 {
        self.open_sides(cell).count()
    }

    /// Cells joined to `cell` by a door, in direction order
    pub fn neighbors(&self, cell: Cell) -> impl Iterator<Item = (Direction, Cell)> + '_ {
        cell.neighbors()
            .filter(move |(_, n)| self.is_connected(cell, *n))
    }
}

//! Randomized frontier growth of the occupied cell set
//!
//! Starts from the origin and repeatedly claims a uniformly random frontier
//! cell until the target count is reached or the frontier runs dry.

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

use crate::rng::LayoutRng;

use super::{Cell, CellSet};

/// Optional limits on where rooms may be placed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GrowthBounds {
    pub min_x: Option<i32>,
    pub max_x: Option<i32>,
    pub min_y: Option<i32>,
    pub max_y: Option<i32>,
}

impl GrowthBounds {
    pub const UNBOUNDED: GrowthBounds = GrowthBounds {
        min_x: None,
        max_x: None,
        min_y: None,
        max_y: None,
    };

    /// Keep every room at y >= 0
    pub const fn upper_half() -> Self {
        GrowthBounds {
            min_y: Some(0),
            ..Self::UNBOUNDED
        }
    }

    /// Inclusive rectangle
    pub const fn boxed(min_x: i32, max_x: i32, min_y: i32, max_y: i32) -> Self {
        GrowthBounds {
            min_x: Some(min_x),
            max_x: Some(max_x),
            min_y: Some(min_y),
            max_y: Some(max_y),
        }
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.min_x.is_none_or(|v| cell.x >= v)
            && self.max_x.is_none_or(|v| cell.x <= v)
            && self.min_y.is_none_or(|v| cell.y >= v)
            && self.max_y.is_none_or(|v| cell.y <= v)
    }
}

/// Result of one growth run
#[derive(Debug, Clone)]
pub struct GrowthOutcome {
    /// Occupied cells in the order they were claimed; the origin is first
    pub cells: CellSet,
    pub requested: usize,
}

impl GrowthOutcome {
    /// True when the frontier ran out before the target was met
    pub fn exhausted(&self) -> bool {
        self.cells.len() < self.requested
    }
}

/// Candidate cells bordering the occupied set
#[derive(Debug, Default)]
struct Frontier {
    queue: Vec<Cell>,
    queued: HashSet<Cell>,
    /// Cells that may never be claimed
    sealed: HashSet<Cell>,
}

impl Frontier {
    fn push_neighbors(&mut self, cell: Cell, occupied: &CellSet, bounds: &GrowthBounds) {
        for (_, n) in cell.neighbors() {
            if !bounds.contains(n)
                || occupied.contains(n)
                || self.sealed.contains(&n)
                || self.queued.contains(&n)
            {
                continue;
            }
            self.queued.insert(n);
            self.queue.push(n);
        }
    }

    fn take_random(&mut self, rng: &mut LayoutRng) -> Option<Cell> {
        let idx = rng.index(self.queue.len())?;
        let cell = self.queue.swap_remove(idx);
        self.queued.remove(&cell);
        Some(cell)
    }
}

/// Grows a connected set of grid cells around the origin
#[derive(Debug, Clone, Copy, Default)]
pub struct GridLayoutEngine {
    bounds: GrowthBounds,
    forced_corridor: bool,
}

impl GridLayoutEngine {
    pub fn new(bounds: GrowthBounds, forced_corridor: bool) -> Self {
        Self {
            bounds,
            forced_corridor,
        }
    }

    /// Grow up to `target` cells (at least the origin)
    pub fn grow(&self, target: usize, rng: &mut LayoutRng) -> GrowthOutcome {
        let target = target.max(1);
        let mut occupied = CellSet::new();
        let mut frontier = Frontier::default();

        occupied.insert(Cell::ORIGIN);
        frontier.push_neighbors(Cell::ORIGIN, &occupied, &self.bounds);

        if self.forced_corridor && target > 1 {
            // The origin keeps a single neighbour so it is always a dead end.
            if let Some(first) = frontier.take_random(rng) {
                for cell in frontier.queue.drain(..) {
                    frontier.sealed.insert(cell);
                }
                frontier.queued.clear();
                occupied.insert(first);
                frontier.push_neighbors(first, &occupied, &self.bounds);
            }
        }

        while occupied.len() < target {
            let Some(cell) = frontier.take_random(rng) else {
                break;
            };
            occupied.insert(cell);
            frontier.push_neighbors(cell, &occupied, &self.bounds);
        }

        GrowthOutcome {
            cells: occupied,
            requested: target,
        }
    }
}

/// Check that every cell is 4-adjacency-reachable from the origin
pub fn is_grid_connected(cells: &CellSet) -> bool {
    if cells.is_empty() {
        return true;
    }
    if !cells.contains(Cell::ORIGIN) {
        return false;
    }
    let mut seen = HashSet::new();
    let mut stack = vec![Cell::ORIGIN];
    seen.insert(Cell::ORIGIN);
    while let Some(cell) = stack.pop() {
        for (_, n) in cell.neighbors() {
            if cells.contains(n) && seen.insert(n) {
                stack.push(n);
            }
        }
    }
    seen.len() == cells.len()
}

//! Reachability over the door graph: BFS, depth maps and the accessible set

use std::collections::VecDeque;

use hashbrown::HashMap;

use crate::grid::{Cell, CellSet};

use super::{ConnectionGraph, ConnectionKey};

/// Breadth-first walk from `start` over doors accepted by `passable`.
///
/// Returns the reached cells in visit order, `start` first.
pub fn reachable_from(
    graph: &ConnectionGraph,
    start: Cell,
    passable: impl Fn(&ConnectionKey) -> bool,
) -> CellSet {
    let mut reached = CellSet::new();
    let mut queue = VecDeque::new();
    reached.insert(start);
    queue.push_back(start);

    while let Some(current) = queue.pop_front() {
        for (_, n) in graph.neighbors(current) {
            if reached.contains(n) || !passable(&ConnectionKey::new(current, n)) {
                continue;
            }
            reached.insert(n);
            queue.push_back(n);
        }
    }

    reached
}

/// BFS hop distance from the origin
#[derive(Debug, Clone, Default)]
pub struct DepthMap {
    depths: HashMap<Cell, u32>,
    max: u32,
}

impl DepthMap {
    /// Depths over every door in `graph`
    pub fn compute(graph: &ConnectionGraph, origin: Cell) -> Self {
        let mut depths = HashMap::new();
        let mut queue = VecDeque::new();
        let mut max = 0;
        depths.insert(origin, 0);
        queue.push_back(origin);

        while let Some(current) = queue.pop_front() {
            let d = depths[&current];
            for (_, n) in graph.neighbors(current) {
                if depths.contains_key(&n) {
                    continue;
                }
                depths.insert(n, d + 1);
                max = max.max(d + 1);
                queue.push_back(n);
            }
        }

        Self { depths, max }
    }

    pub fn get(&self, cell: Cell) -> Option<u32> {
        self.depths.get(&cell).copied()
    }

    pub fn max_depth(&self) -> u32 {
        self.max
    }

    /// Depth scaled to 0..=1 by the deepest room; unreachable cells give None
    pub fn normalized(&self, cell: Cell) -> Option<f32> {
        let d = self.get(cell)?;
        if self.max == 0 {
            return Some(0.0);
        }
        Some(d as f32 / self.max as f32)
    }

    pub fn len(&self) -> usize {
        self.depths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.depths.is_empty()
    }
}

/// Computes the rooms reachable before the key is found
#[derive(Debug, Clone, Copy, Default)]
pub struct AccessibilityAnalyzer;

impl AccessibilityAnalyzer {
    /// BFS from the origin that never crosses the gating door
    pub fn accessible_set(
        &self,
        graph: &ConnectionGraph,
        origin: Cell,
        gating: Option<ConnectionKey>,
    ) -> CellSet {
        reachable_from(graph, origin, |key| Some(*key) != gating)
    }
}

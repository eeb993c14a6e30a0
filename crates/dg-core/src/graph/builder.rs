//! Door graph construction
//!
//! Two phases:
//! 1. Spanning tree: BFS from the origin, one door per newly discovered room
//! 2. Extra doors: each remaining adjacent pair gets a loop door by chance,
//!    unless the pair is protected

use std::collections::VecDeque;

use hashbrown::HashSet;

use crate::grid::{Cell, CellSet};
use crate::rng::LayoutRng;

use super::{ConnectionGraph, ConnectionKey};

/// Pairs that must never receive a loop door
#[derive(Debug, Clone, Copy)]
pub struct DoorProtection<'a> {
    /// Locked region; pairs crossing its boundary are protected
    pub locked: &'a CellSet,
    /// Role rooms; any pair touching one is protected
    pub special: &'a [Cell],
}

impl DoorProtection<'_> {
    pub fn is_protected(&self, key: &ConnectionKey) -> bool {
        key.crosses(|c| self.locked.contains(c))
            || self.special.iter().any(|s| key.contains(*s))
    }
}

/// Builds the door graph over an occupied set
#[derive(Debug, Clone, Copy)]
pub struct ConnectivityGraphBuilder {
    extra_door_chance: f32,
}

impl ConnectivityGraphBuilder {
    pub fn new(extra_door_chance: f32) -> Self {
        Self { extra_door_chance }
    }

    /// Phase 1: BFS spanning tree from the origin.
    ///
    /// Yields exactly `occupied.len() - 1` doors for a connected set.
    pub fn spanning_tree(&self, occupied: &CellSet) -> ConnectionGraph {
        let mut graph = ConnectionGraph::new();
        if !occupied.contains(Cell::ORIGIN) {
            return graph;
        }

        let mut visited = HashSet::new();
        let mut queue = VecDeque::new();
        visited.insert(Cell::ORIGIN);
        queue.push_back(Cell::ORIGIN);

        while let Some(current) = queue.pop_front() {
            for (_, n) in current.neighbors() {
                if occupied.contains(n) && visited.insert(n) {
                    graph.connect(current, n);
                    queue.push_back(n);
                }
            }
        }

        graph
    }

    /// Phase 2: add loop doors between unconnected adjacent rooms.
    ///
    /// Each unordered pair is rolled once, visiting rooms in growth order.
    /// Returns the number of doors added.
    pub fn add_extra_doors(
        &self,
        graph: &mut ConnectionGraph,
        occupied: &CellSet,
        protection: &DoorProtection<'_>,
        rng: &mut LayoutRng,
    ) -> usize {
        let mut rolled = HashSet::new();
        let mut added = 0;

        for cell in occupied.iter() {
            for (_, n) in cell.neighbors() {
                if !occupied.contains(n) {
                    continue;
                }
                let key = ConnectionKey::new(cell, n);
                if !rolled.insert(key) || graph.contains(&key) || protection.is_protected(&key) {
                    continue;
                }
                if rng.chance(self.extra_door_chance) && graph.connect(cell, n) {
                    added += 1;
                }
            }
        }

        added
    }
}

//! Special room roles: safe room, key room and exit room

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::graph::{ConnectionGraph, DepthMap};
use crate::grid::{Cell, CellSet};

/// Single-instance room roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Role {
    /// Starting room at the origin
    Safe,
    /// Holds the key that opens the gating door
    Key,
    /// Ladder out of the level, inside the locked region
    Exit,
}

/// Role cells chosen for one layout; each is optional
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleAssignment {
    pub safe: Option<Cell>,
    pub key: Option<Cell>,
    pub exit: Option<Cell>,
}

impl RoleAssignment {
    pub fn role_of(&self, cell: Cell) -> Option<Role> {
        if self.safe == Some(cell) {
            Some(Role::Safe)
        } else if self.key == Some(cell) {
            Some(Role::Key)
        } else if self.exit == Some(cell) {
            Some(Role::Exit)
        } else {
            None
        }
    }

    pub fn get(&self, role: Role) -> Option<Cell> {
        match role {
            Role::Safe => self.safe,
            Role::Key => self.key,
            Role::Exit => self.exit,
        }
    }

    /// Assigned role cells
    pub fn cells(&self) -> Vec<Cell> {
        [self.safe, self.key, self.exit].into_iter().flatten().collect()
    }
}

/// Picks key and exit rooms from deep dead ends
#[derive(Debug, Clone, Copy)]
pub struct RoleAssigner {
    min_depth: u32,
}

impl RoleAssigner {
    pub fn new(min_depth: u32) -> Self {
        Self { min_depth }
    }

    /// Assign roles.
    ///
    /// The safe room is the origin. The key room is the deepest dead end in
    /// `accessible`, the exit room the deepest dead end in `locked`; either
    /// falls back to the deepest qualifying room of its region.
    pub fn assign(
        &self,
        occupied: &CellSet,
        graph: &ConnectionGraph,
        depths: &DepthMap,
        accessible: &CellSet,
        locked: &CellSet,
    ) -> RoleAssignment {
        let safe = occupied.contains(Cell::ORIGIN).then_some(Cell::ORIGIN);
        let key = self.pick(graph, depths, accessible, &[]);
        let taken: Vec<Cell> = key.into_iter().collect();
        let exit = self.pick(graph, depths, locked, &taken);
        RoleAssignment { safe, key, exit }
    }

    fn pick(
        &self,
        graph: &ConnectionGraph,
        depths: &DepthMap,
        region: &CellSet,
        taken: &[Cell],
    ) -> Option<Cell> {
        let eligible = |cell: &Cell| {
            *cell != Cell::ORIGIN
                && !taken.contains(cell)
                && depths.get(*cell).is_some_and(|d| d >= self.min_depth)
        };

        deepest(region.iter().filter(eligible).filter(|c| graph.degree(*c) == 1), depths)
            .or_else(|| deepest(region.iter().filter(eligible), depths))
    }
}

/// Deepest cell; the first one seen wins ties
fn deepest(cells: impl Iterator<Item = Cell>, depths: &DepthMap) -> Option<Cell> {
    let mut best: Option<(Cell, u32)> = None;
    for cell in cells {
        let d = depths.get(cell).unwrap_or(0);
        if best.is_none_or(|(_, bd)| d > bd) {
            best = Some((cell, d));
        }
    }
    best.map(|(c, _)| c)
}

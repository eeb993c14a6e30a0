//! Per-side room features: doors, the locked door, walls and windows

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::carve::GatingConnection;
use crate::graph::ConnectionGraph;
use crate::grid::{Cell, CellSet, Direction};

/// What a room shows on one compass side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SideFeature {
    /// Open connection to the neighbour
    Door,
    /// The gating connection
    LockedDoor,
    /// Occupied neighbour without a connection
    Wall,
    /// No neighbour
    ExteriorWall,
    /// Exterior side near the edge of the layout
    Window,
}

/// Features for the four sides, indexed like `Direction::ALL`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSides {
    pub north: SideFeature,
    pub east: SideFeature,
    pub south: SideFeature,
    pub west: SideFeature,
}

impl RoomSides {
    pub fn get(&self, dir: Direction) -> SideFeature {
        match dir {
            Direction::North => self.north,
            Direction::East => self.east,
            Direction::South => self.south,
            Direction::West => self.west,
        }
    }

    fn set(&mut self, dir: Direction, feature: SideFeature) {
        match dir {
            Direction::North => self.north = feature,
            Direction::East => self.east = feature,
            Direction::South => self.south = feature,
            Direction::West => self.west = feature,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Direction, SideFeature)> + '_ {
        Direction::ALL.into_iter().map(|d| (d, self.get(d)))
    }
}

/// Inclusive bounding box of the occupied cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extent {
    pub min_x: i32,
    pub max_x: i32,
    pub min_y: i32,
    pub max_y: i32,
}

impl Extent {
    pub const fn point(cell: Cell) -> Extent {
        Extent {
            min_x: cell.x,
            max_x: cell.x,
            min_y: cell.y,
            max_y: cell.y,
        }
    }

    pub fn of(cells: &CellSet) -> Option<Extent> {
        let mut ext = Extent::point(cells.first()?);
        for c in cells.iter() {
            ext.min_x = ext.min_x.min(c.x);
            ext.max_x = ext.max_x.max(c.x);
            ext.min_y = ext.min_y.min(c.y);
            ext.max_y = ext.max_y.max(c.y);
        }
        Some(ext)
    }

    pub fn width(&self) -> u32 {
        self.min_x.abs_diff(self.max_x) + 1
    }

    pub fn height(&self) -> u32 {
        self.min_y.abs_diff(self.max_y) + 1
    }

    /// Whether `cell` lies within one cell of the edge it faces in `dir`
    pub fn near_edge(&self, cell: Cell, dir: Direction) -> bool {
        match dir {
            Direction::North => cell.y >= self.max_y - 1,
            Direction::East => cell.x >= self.max_x - 1,
            Direction::South => cell.y <= self.min_y + 1,
            Direction::West => cell.x <= self.min_x + 1,
        }
    }
}

/// Resolve every side of `cell`
pub fn room_sides(
    cell: Cell,
    occupied: &CellSet,
    graph: &ConnectionGraph,
    gating: Option<GatingConnection>,
    extent: &Extent,
) -> RoomSides {
    let mut sides = RoomSides {
        north: SideFeature::ExteriorWall,
        east: SideFeature::ExteriorWall,
        south: SideFeature::ExteriorWall,
        west: SideFeature::ExteriorWall,
    };
    let gate = gating.map(|g| g.key());
    for (dir, n) in cell.neighbors() {
        let feature = if occupied.contains(n) {
            if gate.is_some_and(|g| g.contains(cell) && g.contains(n)) {
                SideFeature::LockedDoor
            } else if graph.is_connected(cell, n) {
                SideFeature::Door
            } else {
                SideFeature::Wall
            }
        } else if extent.near_edge(cell, dir) {
            SideFeature::Window
        } else {
            SideFeature::ExteriorWall
        };
        sides.set(dir, feature);
    }
    sides
}

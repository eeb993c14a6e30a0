//! Abstract layout description handed to collaborators

use serde::{Deserialize, Serialize};
use strum::Display;

use crate::error::{LayoutIssue, Severity};
use crate::graph::ConnectionKey;
use crate::grid::{Cell, Direction, Sides, WorldPos};
use crate::pacing::{RoomSpawns, Tier};
use crate::roles::Role;
use crate::shape::RoomShape;
use crate::sides::{Extent, RoomSides};

/// One emitted room
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomLayout {
    pub cell: Cell,
    /// World-space centre
    pub position: WorldPos,
    pub shape: RoomShape,
    /// Rotation applied to the variant, in degrees
    pub yaw: f32,
    pub variant: String,
    pub role: Option<Role>,
    pub locked: bool,
    /// Hop depth from the origin over every door
    pub depth: u32,
    pub tier: Option<Tier>,
    pub open_sides: Sides,
    pub sides: RoomSides,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ConnectionKind {
    /// Both rooms outside the locked region
    Unlocked,
    /// Both rooms inside the locked region
    Locked,
    /// The door between the regions
    Gating,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionRecord {
    pub key: ConnectionKey,
    pub kind: ConnectionKind,
}

/// Placement of the gating door
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GatingDoor {
    pub key: ConnectionKey,
    pub locked_room: Cell,
    pub unlocked_room: Cell,
    /// Midpoint between the two room centres
    pub position: WorldPos,
    /// From the locked room towards the unlocked room
    pub facing: Direction,
    pub yaw: f32,
}

/// A single spawned object of a configured class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnPlacement {
    pub class: String,
    pub cell: Cell,
    pub position: WorldPos,
    pub yaw: f32,
}

/// Full result of one generation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutResult {
    pub seed: u64,
    /// Zero-based level index
    pub level: u32,
    pub cell_size: f32,
    pub requested_cells: usize,
    /// Rooms in growth order; skipped rooms are absent
    pub rooms: Vec<RoomLayout>,
    /// Sorted by key
    pub connections: Vec<ConnectionRecord>,
    pub extent: Option<Extent>,
    pub safe_room: Option<Cell>,
    pub key_room: Option<Cell>,
    pub exit_room: Option<Cell>,
    pub locked_rooms: Vec<Cell>,
    pub gating_door: Option<GatingDoor>,
    /// Rooms with at least one enemy or treasure
    pub spawns: Vec<RoomSpawns>,
    pub key_item: Option<SpawnPlacement>,
    pub locked_door: Option<SpawnPlacement>,
    pub issues: Vec<LayoutIssue>,
}

impl LayoutResult {
    pub fn room(&self, cell: Cell) -> Option<&RoomLayout> {
        self.rooms.iter().find(|r| r.cell == cell)
    }

    pub fn role_room(&self, role: Role) -> Option<Cell> {
        match role {
            Role::Safe => self.safe_room,
            Role::Key => self.key_room,
            Role::Exit => self.exit_room,
        }
    }

    /// World position of the safe room, where a player would be placed
    pub fn safe_position(&self) -> Option<WorldPos> {
        self.safe_room.map(|c| c.world_center(self.cell_size))
    }

    pub fn connections_of_kind(
        &self,
        kind: ConnectionKind,
    ) -> impl Iterator<Item = &ConnectionRecord> {
        self.connections.iter().filter(move |c| c.kind == kind)
    }

    pub fn total_enemies(&self) -> u32 {
        self.spawns.iter().map(|s| s.enemies).sum()
    }

    pub fn total_treasure(&self) -> u32 {
        self.spawns.iter().map(|s| s.treasure).sum()
    }

    pub fn warnings(&self) -> impl Iterator<Item = &LayoutIssue> {
        self.issues.iter().filter(|i| i.severity() == Severity::Warning)
    }

    pub fn errors(&self) -> impl Iterator<Item = &LayoutIssue> {
        self.issues.iter().filter(|i| i.severity() == Severity::Error)
    }
}

//! Compass directions and the shared direction table
//!
//! Grid offsets, facing yaw, opposites and side bits all come from
//! `DIRECTION_TABLE` so growth, door placement and shape orientation agree.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// Compass direction on the layout grid. North is +y, east is +x.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
)]
#[repr(u8)]
pub enum Direction {
    North = 0,
    East = 1,
    South = 2,
    West = 3,
}

/// Per-direction data shared by every pipeline stage
#[derive(Debug, Clone, Copy)]
pub struct DirectionInfo {
    /// Grid step (dx, dy)
    pub offset: (i32, i32),
    /// Facing yaw in degrees, clockwise from north
    pub yaw: f32,
    pub opposite: Direction,
    pub side: Sides,
    /// Next direction clockwise
    pub clockwise: Direction,
}

pub const DIRECTION_TABLE: [DirectionInfo; 4] = [
    DirectionInfo {
        offset: (0, 1),
        yaw: 0.0,
        opposite: Direction::South,
        side: Sides::NORTH,
        clockwise: Direction::East,
    },
    DirectionInfo {
        offset: (1, 0),
        yaw: 90.0,
        opposite: Direction::West,
        side: Sides::EAST,
        clockwise: Direction::South,
    },
    DirectionInfo {
        offset: (0, -1),
        yaw: 180.0,
        opposite: Direction::North,
        side: Sides::SOUTH,
        clockwise: Direction::West,
    },
    DirectionInfo {
        offset: (-1, 0),
        yaw: 270.0,
        opposite: Direction::East,
        side: Sides::WEST,
        clockwise: Direction::North,
    },
];

impl Direction {
    /// All directions in table order (N, E, S, W)
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    pub const fn info(self) -> &'static DirectionInfo {
        &DIRECTION_TABLE[self as usize]
    }

    pub const fn offset(self) -> (i32, i32) {
        self.info().offset
    }

    pub const fn yaw(self) -> f32 {
        self.info().yaw
    }

    pub const fn opposite(self) -> Direction {
        self.info().opposite
    }

    pub const fn clockwise(self) -> Direction {
        self.info().clockwise
    }

    pub const fn side(self) -> Sides {
        self.info().side
    }

    /// Check if two directions lie on the same axis
    pub const fn is_opposite(self, other: Direction) -> bool {
        self.opposite() as u8 == other as u8
    }

    /// Direction for a unit grid step, if it is one
    pub fn from_offset(dx: i32, dy: i32) -> Option<Direction> {
        Direction::ALL
            .into_iter()
            .find(|dir| dir.offset() == (dx, dy))
    }
}

bitflags! {
    /// Set of open room sides
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Sides: u8 {
        const NORTH = 0x01;
        const EAST = 0x02;
        const SOUTH = 0x04;
        const WEST = 0x08;
    }
}

// Manual serde impl for Sides
impl Serialize for Sides {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.bits().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Sides {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let bits = u8::deserialize(deserializer)?;
        Ok(Sides::from_bits_truncate(bits))
    }
}

impl Sides {
    /// Build a side set from a list of directions
    pub fn from_directions(dirs: &[Direction]) -> Self {
        dirs.iter().fold(Sides::empty(), |acc, dir| acc | dir.side())
    }

    pub fn has(self, dir: Direction) -> bool {
        self.contains(dir.side())
    }

    /// Number of open sides
    pub fn count(self) -> u32 {
        self.bits().count_ones()
    }

    /// Open directions in table order
    pub fn directions(self) -> impl Iterator<Item = Direction> {
        Direction::ALL.into_iter().filter(move |dir| self.has(*dir))
    }
}

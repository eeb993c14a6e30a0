//! Generation defaults and fixed policy constants

/// World units per grid cell
pub const DEFAULT_CELL_SIZE: f32 = 1000.0;

/// Rooms requested per level
pub const DEFAULT_TARGET_CELLS: usize = 15;

/// Probability of a loop door between two adjacent rooms
pub const DEFAULT_EXTRA_DOOR_CHANCE: f32 = 0.3;

/// Locked fraction limits and default
pub const MIN_LOCKED_FRACTION: f32 = 0.2;
pub const MAX_LOCKED_FRACTION: f32 = 0.5;
pub const DEFAULT_LOCKED_FRACTION: f32 = 0.3;

/// The locked region is only carved once the level has this many rooms
pub const MIN_CELLS_FOR_LOCKED_AREA: usize = 5;

/// Smallest locked region that is ever targeted
pub const MIN_LOCKED_ROOMS: usize = 2;

/// Spawn budgets
pub const DEFAULT_ENEMY_BUDGET: u32 = 3;
pub const DEFAULT_TREASURE_BUDGET: u32 = 2;

/// Minimum hop depth for key and exit rooms
pub const DEFAULT_MIN_DEAD_END_DEPTH: u32 = 3;

/// Normalized depth cutoffs between pacing tiers
pub const DEFAULT_MID_TIER_CUTOFF: f32 = 0.3;
pub const DEFAULT_LATE_TIER_CUTOFF: f32 = 0.6;

/// Fraction of rooms (farthest first) eligible for loot
pub const DEFAULT_FAR_ROOM_FRACTION: f32 = 0.3;

/// Level progression policy
pub const DEFAULT_CELLS_PER_LEVEL: usize = 3;
pub const DEFAULT_ENEMIES_PER_ROOM: f32 = 0.3;

//! Generator configuration

use serde::{Deserialize, Serialize};

use crate::carve::clamp_locked_fraction;
use crate::consts::*;
use crate::error::ConfigError;
use crate::grid::GrowthBounds;
use crate::pacing::PacingConfig;
use crate::shape::{ShapePools, SpecialRoomVariants};

/// Names of the things a collaborator spawns; unset classes are skipped
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnClasses {
    pub enemy: Option<String>,
    pub treasure: Option<String>,
    pub key: Option<String>,
    pub locked_door: Option<String>,
}

impl Default for SpawnClasses {
    fn default() -> Self {
        Self {
            enemy: Some("enemy".to_string()),
            treasure: Some("treasure".to_string()),
            key: Some("key".to_string()),
            locked_door: Some("locked_door".to_string()),
        }
    }
}

impl SpawnClasses {
    pub fn none() -> Self {
        Self {
            enemy: None,
            treasure: None,
            key: None,
            locked_door: None,
        }
    }
}

/// How each new level grows
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelProgression {
    pub cells_per_level: usize,
    /// Enemy budget is `floor(target_cells * enemies_per_room)` after a step
    pub enemies_per_room: f32,
}

impl Default for LevelProgression {
    fn default() -> Self {
        Self {
            cells_per_level: DEFAULT_CELLS_PER_LEVEL,
            enemies_per_room: DEFAULT_ENEMIES_PER_ROOM,
        }
    }
}

/// Everything one generation run depends on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Fixed seed; None draws one from entropy per run
    pub seed: Option<u64>,
    /// World units per grid cell
    pub cell_size: f32,
    pub target_cells: usize,
    pub extra_door_chance: f32,
    /// Clamped to 0.2..=0.5
    pub locked_fraction: f32,
    pub enemy_budget: u32,
    pub treasure_budget: u32,
    pub min_dead_end_depth: u32,
    /// Restrict the first expansion to one origin neighbour
    pub forced_corridor: bool,
    pub bounds: GrowthBounds,
    pub pacing: PacingConfig,
    pub progression: LevelProgression,
    pub shape_pools: ShapePools,
    pub special_rooms: SpecialRoomVariants,
    pub spawn_classes: SpawnClasses,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: None,
            cell_size: DEFAULT_CELL_SIZE,
            target_cells: DEFAULT_TARGET_CELLS,
            extra_door_chance: DEFAULT_EXTRA_DOOR_CHANCE,
            locked_fraction: DEFAULT_LOCKED_FRACTION,
            enemy_budget: DEFAULT_ENEMY_BUDGET,
            treasure_budget: DEFAULT_TREASURE_BUDGET,
            min_dead_end_depth: DEFAULT_MIN_DEAD_END_DEPTH,
            forced_corridor: true,
            bounds: GrowthBounds::UNBOUNDED,
            pacing: PacingConfig::default(),
            progression: LevelProgression::default(),
            shape_pools: ShapePools::default(),
            special_rooms: SpecialRoomVariants::default(),
            spawn_classes: SpawnClasses::default(),
        }
    }
}

impl GeneratorConfig {
    /// Default configuration with a fixed seed
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    /// Check the configuration and clamp the locked fraction into range
    pub fn validated(mut self) -> Result<Self, ConfigError> {
        self.validate()?;
        self.locked_fraction = clamp_locked_fraction(self.locked_fraction);
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.target_cells == 0 {
            return Err(ConfigError::NoCells);
        }
        if !self.cell_size.is_finite() || self.cell_size <= 0.0 {
            return Err(ConfigError::InvalidCellSize(self.cell_size));
        }
        if !(0.0..=1.0).contains(&self.extra_door_chance) {
            return Err(ConfigError::InvalidProbability {
                name: "extra_door_chance",
                value: self.extra_door_chance,
            });
        }
        let ratio = self.progression.enemies_per_room;
        if !ratio.is_finite() || ratio < 0.0 {
            return Err(ConfigError::InvalidProbability {
                name: "enemies_per_room",
                value: ratio,
            });
        }
        self.pacing.validate()
    }

    /// Grow the level by `delta` rooms and rescale the enemy budget
    pub fn advance_level(&mut self, delta: usize) {
        self.target_cells = self.target_cells.saturating_add(delta);
        self.enemy_budget =
            (self.target_cells as f32 * self.progression.enemies_per_room).floor() as u32;
    }
}

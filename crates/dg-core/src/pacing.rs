//! Depth-paced enemy and loot placement

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::consts::{DEFAULT_FAR_ROOM_FRACTION, DEFAULT_LATE_TIER_CUTOFF, DEFAULT_MID_TIER_CUTOFF};
use crate::error::ConfigError;
use crate::graph::DepthMap;
use crate::grid::{Cell, CellSet};
use crate::rng::LayoutRng;

/// Pacing band for encounter density
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Tier {
    Early,
    Mid,
    Late,
    Locked,
}

/// Spawn roll for one tier: `chance` per room, then `min..=max` enemies
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierSpawn {
    pub chance: f32,
    pub min: u32,
    pub max: u32,
}

impl TierSpawn {
    pub const fn new(chance: f32, min: u32, max: u32) -> Self {
        Self { chance, min, max }
    }
}

/// Tier cutoffs, per-tier rolls and processing order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PacingConfig {
    /// Normalized depth at which `Mid` starts
    pub mid_cutoff: f32,
    /// Normalized depth at which `Late` starts
    pub late_cutoff: f32,
    pub early: TierSpawn,
    pub mid: TierSpawn,
    pub late: TierSpawn,
    pub locked: TierSpawn,
    /// Order in which tiers draw from the shared enemy budget
    pub tier_order: [Tier; 4],
    /// Farthest share of non-special rooms eligible for loot
    pub far_room_fraction: f32,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            mid_cutoff: DEFAULT_MID_TIER_CUTOFF,
            late_cutoff: DEFAULT_LATE_TIER_CUTOFF,
            early: TierSpawn::new(0.2, 1, 1),
            mid: TierSpawn::new(0.4, 1, 2),
            late: TierSpawn::new(0.6, 1, 2),
            locked: TierSpawn::new(1.0, 2, 3),
            tier_order: [Tier::Early, Tier::Mid, Tier::Late, Tier::Locked],
            far_room_fraction: DEFAULT_FAR_ROOM_FRACTION,
        }
    }
}

impl PacingConfig {
    pub fn spawn(&self, tier: Tier) -> TierSpawn {
        match tier {
            Tier::Early => self.early,
            Tier::Mid => self.mid,
            Tier::Late => self.late,
            Tier::Locked => self.locked,
        }
    }

    /// Tier for an unlocked room at the given normalized depth
    pub fn depth_tier(&self, normalized: f32) -> Tier {
        if normalized < self.mid_cutoff {
            Tier::Early
        } else if normalized < self.late_cutoff {
            Tier::Mid
        } else {
            Tier::Late
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let ordered = 0.0 <= self.mid_cutoff
            && self.mid_cutoff <= self.late_cutoff
            && self.late_cutoff <= 1.0;
        if !ordered {
            return Err(ConfigError::TierCutoffs {
                mid: self.mid_cutoff,
                late: self.late_cutoff,
            });
        }
        for (name, spawn) in [
            ("early", self.early),
            ("mid", self.mid),
            ("late", self.late),
            ("locked", self.locked),
        ] {
            if !(0.0..=1.0).contains(&spawn.chance) {
                return Err(ConfigError::InvalidProbability {
                    name,
                    value: spawn.chance,
                });
            }
            if spawn.min > spawn.max {
                return Err(ConfigError::InvertedRange {
                    name,
                    min: spawn.min,
                    max: spawn.max,
                });
            }
        }
        for (i, tier) in self.tier_order.iter().enumerate() {
            if self.tier_order[..i].contains(tier) {
                return Err(ConfigError::DuplicateTier(tier.to_string()));
            }
        }
        if !(0.0..=1.0).contains(&self.far_room_fraction) {
            return Err(ConfigError::InvalidProbability {
                name: "far_room_fraction",
                value: self.far_room_fraction,
            });
        }
        Ok(())
    }
}

/// Spawns placed in one room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSpawns {
    pub cell: Cell,
    pub tier: Option<Tier>,
    pub enemies: u32,
    pub treasure: u32,
}

impl RoomSpawns {
    pub fn is_empty(&self) -> bool {
        self.enemies == 0 && self.treasure == 0
    }
}

/// Per-room tiers and spawn counts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncounterPlan {
    /// Every room in growth order
    pub rooms: Vec<RoomSpawns>,
}

impl EncounterPlan {
    pub fn total_enemies(&self) -> u32 {
        self.rooms.iter().map(|r| r.enemies).sum()
    }

    pub fn total_treasure(&self) -> u32 {
        self.rooms.iter().map(|r| r.treasure).sum()
    }

    pub fn get(&self, cell: Cell) -> Option<&RoomSpawns> {
        self.rooms.iter().find(|r| r.cell == cell)
    }

    /// Rooms with at least one spawn
    pub fn occupied_rooms(&self) -> impl Iterator<Item = &RoomSpawns> {
        self.rooms.iter().filter(|r| !r.is_empty())
    }
}

/// Places enemies by depth tier and loot in far rooms
#[derive(Debug, Clone, Copy)]
pub struct EncounterPacer<'a> {
    config: &'a PacingConfig,
    enemy_budget: u32,
    treasure_budget: u32,
}

impl<'a> EncounterPacer<'a> {
    pub fn new(config: &'a PacingConfig, enemy_budget: u32, treasure_budget: u32) -> Self {
        Self {
            config,
            enemy_budget,
            treasure_budget,
        }
    }

    /// Build the encounter plan.
    ///
    /// `special` holds role rooms; they never get tiers or loot. Rooms next
    /// to the origin are left untiered as well.
    pub fn plan(
        &self,
        occupied: &CellSet,
        depths: &DepthMap,
        locked: &CellSet,
        special: &[Cell],
        rng: &mut LayoutRng,
    ) -> EncounterPlan {
        let mut rooms: Vec<RoomSpawns> = occupied
            .iter()
            .map(|cell| RoomSpawns {
                cell,
                tier: self.tier_of(cell, depths, locked, special),
                enemies: 0,
                treasure: 0,
            })
            .collect();

        self.place_enemies(&mut rooms, rng);
        self.place_treasure(&mut rooms, special, rng);

        EncounterPlan { rooms }
    }

    fn tier_of(
        &self,
        cell: Cell,
        depths: &DepthMap,
        locked: &CellSet,
        special: &[Cell],
    ) -> Option<Tier> {
        if cell == Cell::ORIGIN || cell.is_adjacent(Cell::ORIGIN) || special.contains(&cell) {
            return None;
        }
        if locked.contains(cell) {
            return Some(Tier::Locked);
        }
        Some(self.config.depth_tier(depths.normalized(cell).unwrap_or(0.0)))
    }

    fn place_enemies(&self, rooms: &mut [RoomSpawns], rng: &mut LayoutRng) {
        let mut remaining = self.enemy_budget;
        for tier in self.config.tier_order {
            let spawn = self.config.spawn(tier);
            for room in rooms.iter_mut().filter(|r| r.tier == Some(tier)) {
                if remaining == 0 {
                    return;
                }
                if !rng.chance(spawn.chance) {
                    continue;
                }
                let count = rng.range_inclusive(spawn.min, spawn.max).min(remaining);
                room.enemies += count;
                remaining -= count;
            }
        }
    }

    fn place_treasure(&self, rooms: &mut [RoomSpawns], special: &[Cell], rng: &mut LayoutRng) {
        if self.treasure_budget == 0 {
            return;
        }
        let mut far: Vec<usize> = (0..rooms.len())
            .filter(|&i| !special.contains(&rooms[i].cell))
            .collect();
        if far.is_empty() {
            return;
        }
        // Stable sort keeps growth order among equally distant rooms.
        far.sort_by_key(|&i| core::cmp::Reverse(rooms[i].cell.manhattan(Cell::ORIGIN)));
        let count = ((far.len() as f32 * self.config.far_room_fraction).ceil() as usize)
            .clamp(1, far.len());
        far.truncate(count);
        rng.shuffle(&mut far);

        for &i in far.iter().take(self.treasure_budget as usize) {
            rooms[i].treasure = 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::ConnectionGraph;

    /// Corridor (0,0)..(len-1,0) with its depth map
    fn corridor(len: i32) -> (CellSet, DepthMap) {
        let cells: CellSet = (0..len).map(|x| Cell::new(x, 0)).collect();
        let mut graph = ConnectionGraph::new();
        for x in 0..len - 1 {
            graph.connect(Cell::new(x, 0), Cell::new(x + 1, 0));
        }
        (cells, DepthMap::compute(&graph, Cell::ORIGIN))
    }

    #[test]
    fn test_tiers_by_depth() {
        let (cells, depths) = corridor(11);
        let locked: CellSet = [Cell::new(10, 0)].into_iter().collect();
        let config = PacingConfig::default();
        let pacer = EncounterPacer::new(&config, 0, 0);
        let plan = pacer.plan(&cells, &depths, &locked, &[Cell::ORIGIN], &mut LayoutRng::new(1));

        let tier = |x| plan.get(Cell::new(x, 0)).and_then(|r| r.tier);
        assert_eq!(tier(0), None);
        assert_eq!(tier(1), None);
        assert_eq!(tier(2), Some(Tier::Early));
        assert_eq!(tier(3), Some(Tier::Mid));
        assert_eq!(tier(5), Some(Tier::Mid));
        assert_eq!(tier(6), Some(Tier::Late));
        assert_eq!(tier(10), Some(Tier::Locked));
        assert_eq!(plan.total_enemies(), 0);
    }

    #[test]
    fn test_enemy_budget_cap() {
        let (cells, depths) = corridor(20);
        let locked: CellSet = (15..20).map(|x| Cell::new(x, 0)).collect();
        let config = PacingConfig::default();
        for seed in 0..50 {
            let pacer = EncounterPacer::new(&config, 3, 0);
            let plan = pacer.plan(&cells, &depths, &locked, &[], &mut LayoutRng::new(seed));
            assert!(plan.total_enemies() <= 3, "seed {seed}");
        }
    }

    #[test]
    fn test_locked_first_order_fills_locked_rooms() {
        let (cells, depths) = corridor(20);
        let locked: CellSet = (15..20).map(|x| Cell::new(x, 0)).collect();
        let config = PacingConfig {
            tier_order: [Tier::Locked, Tier::Early, Tier::Mid, Tier::Late],
            ..PacingConfig::default()
        };
        let pacer = EncounterPacer::new(&config, 4, 0);
        let plan = pacer.plan(&cells, &depths, &locked, &[], &mut LayoutRng::new(9));
        // Locked rooms always roll 2..=3 so the budget is spent there.
        let in_locked: u32 = plan
            .rooms
            .iter()
            .filter(|r| r.tier == Some(Tier::Locked))
            .map(|r| r.enemies)
            .sum();
        assert_eq!(in_locked, 4);
        assert_eq!(plan.total_enemies(), 4);
    }

    #[test]
    fn test_treasure_in_far_rooms() {
        let (cells, depths) = corridor(10);
        let config = PacingConfig::default();
        let special = [Cell::ORIGIN, Cell::new(9, 0)];
        for seed in 0..30 {
            let pacer = EncounterPacer::new(&config, 0, 2);
            let mut rng = LayoutRng::new(seed);
            let plan = pacer.plan(&cells, &depths, &CellSet::new(), &special, &mut rng);
            assert_eq!(plan.total_treasure(), 2);
            // Eight eligible rooms, the farthest three are 6, 7 and 8.
            for room in plan.occupied_rooms() {
                assert!((6..=8).contains(&room.cell.x), "seed {seed}: {:?}", room.cell);
                assert_eq!(room.treasure, 1);
            }
        }
    }

    #[test]
    fn test_treasure_budget_exceeds_far_rooms() {
        let (cells, depths) = corridor(3);
        let config = PacingConfig::default();
        let pacer = EncounterPacer::new(&config, 0, 5);
        let mut rng = LayoutRng::new(4);
        let plan = pacer.plan(&cells, &depths, &CellSet::new(), &[Cell::ORIGIN], &mut rng);
        // ceil(2 * 0.3) = 1 far room.
        assert_eq!(plan.total_treasure(), 1);
        assert_eq!(plan.get(Cell::new(2, 0)).map(|r| r.treasure), Some(1));
    }

    #[test]
    fn test_validate() {
        assert!(PacingConfig::default().validate().is_ok());
        let bad = PacingConfig {
            mid: TierSpawn::new(0.5, 3, 1),
            ..PacingConfig::default()
        };
        assert!(matches!(bad.validate(), Err(ConfigError::InvertedRange { name: "mid", .. })));
        let dup = PacingConfig {
            tier_order: [Tier::Early, Tier::Early, Tier::Late, Tier::Locked],
            ..PacingConfig::default()
        };
        assert_eq!(dup.validate(), Err(ConfigError::DuplicateTier("early".into())));
        let cutoffs = PacingConfig {
            mid_cutoff: 0.7,
            ..PacingConfig::default()
        };
        assert!(matches!(cutoffs.validate(), Err(ConfigError::TierCutoffs { .. })));
    }
}

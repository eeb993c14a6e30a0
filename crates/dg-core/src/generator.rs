//! The generator object: owns configuration and the current layout, runs
//! the pipeline and notifies collaborators.

use crate::carve::{GatingConnection, LockedAreaCarver};
use crate::config::GeneratorConfig;
use crate::error::{ConfigError, LayoutIssue};
use crate::graph::{
    AccessibilityAnalyzer, ConnectionGraph, ConnectivityGraphBuilder, DepthMap, DoorProtection,
};
use crate::grid::{Cell, CellSet, GridLayoutEngine, WorldPos};
use crate::layout::{
    ConnectionKind, ConnectionRecord, GatingDoor, LayoutResult, RoomLayout, SpawnPlacement,
};
use crate::pacing::EncounterPacer;
use crate::rng::LayoutRng;
use crate::roles::{Role, RoleAssigner, RoleAssignment};
use crate::shape::{RoomShape, RoomShapeClassifier};
use crate::sides::{Extent, room_sides};

/// Collaborator that turns layouts into world entities
pub trait LayoutObserver {
    /// Destroy everything built from the previous layout
    fn release_all(&mut self);

    /// A new layout is ready to be instantiated
    fn layout_ready(&mut self, layout: &LayoutResult);
}

/// Owns one generation context. Requests on one instance must be serialized.
pub struct DungeonGenerator {
    config: GeneratorConfig,
    base_seed: u64,
    level: u32,
    current: Option<LayoutResult>,
    observers: Vec<Box<dyn LayoutObserver>>,
}

impl core::fmt::Debug for DungeonGenerator {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DungeonGenerator")
            .field("config", &self.config)
            .field("base_seed", &self.base_seed)
            .field("level", &self.level)
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}

impl DungeonGenerator {
    pub fn new(config: GeneratorConfig) -> Result<Self, ConfigError> {
        let config = config.validated()?;
        let base_seed = resolve_seed(&config);
        Ok(Self {
            config,
            base_seed,
            level: 0,
            current: None,
            observers: Vec::new(),
        })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    /// Seed used for the current level
    pub fn level_seed(&self) -> u64 {
        self.base_seed.wrapping_add(u64::from(self.level))
    }

    /// Replace the configuration and restart at level zero
    pub fn set_config(&mut self, config: GeneratorConfig) -> Result<(), ConfigError> {
        self.config = config.validated()?;
        self.base_seed = resolve_seed(&self.config);
        self.level = 0;
        Ok(())
    }

    pub fn attach_observer(&mut self, observer: Box<dyn LayoutObserver>) {
        self.observers.push(observer);
    }

    pub fn current(&self) -> Option<&LayoutResult> {
        self.current.as_ref()
    }

    /// Release every emitted entity and drop the current layout
    pub fn clear(&mut self) {
        for observer in &mut self.observers {
            observer.release_all();
        }
        self.current = None;
    }

    /// Reconfigure, then build level zero from scratch
    pub fn generate(&mut self, config: GeneratorConfig) -> Result<&LayoutResult, ConfigError> {
        self.set_config(config)?;
        Ok(self.regenerate())
    }

    /// Rebuild the current level with the stored configuration
    pub fn regenerate(&mut self) -> &LayoutResult {
        self.clear();
        let layout = build_layout(&self.config, self.level_seed(), self.level);
        for observer in &mut self.observers {
            observer.layout_ready(&layout);
        }
        self.current.insert(layout)
    }

    /// Grow the level by `delta` rooms, rescale the enemy budget and
    /// regenerate. Returns where the player should be placed.
    pub fn next_level(&mut self, delta: usize) -> Option<WorldPos> {
        self.config.advance_level(delta);
        self.level += 1;
        log::info!(
            "advancing to level {}: {} rooms, {} enemies",
            self.level,
            self.config.target_cells,
            self.config.enemy_budget
        );
        self.regenerate().safe_position()
    }
}

fn resolve_seed(config: &GeneratorConfig) -> u64 {
    config
        .seed
        .unwrap_or_else(|| LayoutRng::from_entropy().seed())
}

/// Run the full pipeline for one level
pub fn build_layout(config: &GeneratorConfig, seed: u64, level: u32) -> LayoutResult {
    let mut rng = LayoutRng::new(seed);
    let mut issues = Vec::new();

    // Occupied cells
    let growth = GridLayoutEngine::new(config.bounds, config.forced_corridor)
        .grow(config.target_cells, &mut rng);
    if growth.exhausted() {
        log::warn!(
            "frontier exhausted: placed {} of {} rooms",
            growth.cells.len(),
            growth.requested
        );
        issues.push(LayoutIssue::FrontierExhausted {
            placed: growth.cells.len(),
            requested: growth.requested,
        });
    }
    let occupied = growth.cells;

    // Spanning tree and locked region
    let builder = ConnectivityGraphBuilder::new(config.extra_door_chance);
    let mut graph = builder.spanning_tree(&occupied);
    let area = LockedAreaCarver::new(config.locked_fraction).carve(&occupied, &mut graph, &mut rng);
    let (locked, gating) = match area {
        Some(area) => {
            if area.is_short() {
                log::warn!(
                    "locked area reached {} of {} rooms",
                    area.cells.len(),
                    area.target
                );
                issues.push(LayoutIssue::LockedAreaShort {
                    carved: area.cells.len(),
                    target: area.target,
                });
            }
            log::debug!(
                "locked {} rooms, removed {} boundary doors, repaired {}",
                area.cells.len(),
                area.removed_doors,
                area.repaired_doors
            );
            (area.cells, area.gating)
        }
        None => (CellSet::new(), None),
    };

    // Roles, before loop doors so role rooms stay dead ends
    let accessible =
        AccessibilityAnalyzer.accessible_set(&graph, Cell::ORIGIN, gating.map(|g| g.key()));
    let role_depths = DepthMap::compute(&graph, Cell::ORIGIN);
    let roles = RoleAssigner::new(config.min_dead_end_depth).assign(
        &occupied,
        &graph,
        &role_depths,
        &accessible,
        &locked,
    );
    for role in [Role::Key, Role::Exit] {
        if roles.get(role).is_none() {
            log::warn!("no room qualifies for the {role} role");
            issues.push(LayoutIssue::RoleUnassigned { role });
        }
    }
    let special = roles.cells();

    let added = builder.add_extra_doors(
        &mut graph,
        &occupied,
        &DoorProtection {
            locked: &locked,
            special: &special,
        },
        &mut rng,
    );
    log::debug!("added {added} loop doors, {} total", graph.len());

    let depths = DepthMap::compute(&graph, Cell::ORIGIN);
    log::debug!("deepest room is {} doors from the origin", depths.max_depth());
    let extent = Extent::of(&occupied);
    let bounds = extent.unwrap_or(Extent::point(Cell::ORIGIN));

    // Shapes; rooms without a variant are skipped
    let classifier = RoomShapeClassifier::new(&config.shape_pools);
    let mut rooms = Vec::with_capacity(occupied.len());
    for cell in occupied.iter() {
        let open = graph.open_sides(cell);
        let role = roles.role_of(cell);
        let shape = RoomShape::of_room(open);
        let variant = match role {
            Some(role) => {
                let variant = special_variant(config, role)
                    .or_else(|| classifier.variant(&shape, &mut rng));
                if variant.is_none() {
                    issues.push(LayoutIssue::MissingSpecialVariant { cell, role });
                }
                variant
            }
            None => {
                let variant = classifier.variant(&shape, &mut rng);
                if variant.is_none() {
                    issues.push(LayoutIssue::MissingShapeVariant {
                        cell,
                        kind: shape.kind(),
                    });
                }
                variant
            }
        };
        let Some(variant) = variant else {
            log::error!("room {cell} skipped: no {} variant", shape.kind());
            continue;
        };
        rooms.push(RoomLayout {
            cell,
            position: cell.world_center(config.cell_size),
            yaw: shape.yaw(),
            shape,
            variant,
            role,
            locked: locked.contains(cell),
            depth: depths.get(cell).unwrap_or(0),
            tier: None,
            open_sides: open,
            sides: room_sides(cell, &occupied, &graph, gating, &bounds),
        });
    }

    // Encounters over emitted rooms only
    let emitted: CellSet = rooms.iter().map(|r| r.cell).collect();
    let classes = &config.spawn_classes;
    let enemy_budget = if classes.enemy.is_some() { config.enemy_budget } else { 0 };
    let treasure_budget = if classes.treasure.is_some() {
        config.treasure_budget
    } else {
        0
    };
    let plan = EncounterPacer::new(&config.pacing, enemy_budget, treasure_budget).plan(
        &emitted,
        &depths,
        &locked,
        &special,
        &mut rng,
    );
    for room in &mut rooms {
        room.tier = plan.get(room.cell).and_then(|r| r.tier);
    }

    let gating_door = gating.map(|g| gating_door(g, config.cell_size));
    let key_item = key_item(config, &roles, &emitted);
    if let Some(item) = &key_item {
        log::info!("key placed at {}, depth {}", item.cell, depths.get(item.cell).unwrap_or(0));
    }
    let locked_door = match (&classes.locked_door, gating_door) {
        (Some(class), Some(door)) => Some(SpawnPlacement {
            class: class.clone(),
            cell: door.unlocked_room,
            position: door.position,
            yaw: door.yaw,
        }),
        _ => None,
    };

    LayoutResult {
        seed,
        level,
        cell_size: config.cell_size,
        requested_cells: growth.requested,
        rooms,
        connections: connection_records(&graph, &locked, gating),
        extent,
        safe_room: roles.safe,
        key_room: roles.key,
        exit_room: roles.exit,
        locked_rooms: locked.as_slice().to_vec(),
        gating_door,
        spawns: plan.occupied_rooms().copied().collect(),
        key_item,
        locked_door,
        issues,
    }
}

fn special_variant(config: &GeneratorConfig, role: Role) -> Option<String> {
    let special = &config.special_rooms;
    match role {
        Role::Safe => special.safe.clone(),
        Role::Key => special.key.clone(),
        Role::Exit => special.exit.clone(),
    }
}

fn gating_door(gate: GatingConnection, cell_size: f32) -> GatingDoor {
    let facing = gate.facing();
    GatingDoor {
        key: gate.key(),
        locked_room: gate.locked,
        unlocked_room: gate.unlocked,
        position: gate
            .locked
            .world_center(cell_size)
            .midpoint(gate.unlocked.world_center(cell_size)),
        facing,
        yaw: facing.yaw(),
    }
}

fn key_item(
    config: &GeneratorConfig,
    roles: &RoleAssignment,
    emitted: &CellSet,
) -> Option<SpawnPlacement> {
    let class = config.spawn_classes.key.as_ref()?;
    let cell = roles.key.filter(|c| emitted.contains(*c))?;
    Some(SpawnPlacement {
        class: class.clone(),
        cell,
        position: cell.world_center(config.cell_size),
        yaw: 0.0,
    })
}

fn connection_records(
    graph: &ConnectionGraph,
    locked: &CellSet,
    gating: Option<GatingConnection>,
) -> Vec<ConnectionRecord> {
    let gate = gating.map(|g| g.key());
    graph
        .iter()
        .map(|key| {
            let (a, b) = key.cells();
            let kind = if Some(key) == gate {
                ConnectionKind::Gating
            } else if locked.contains(a) && locked.contains(b) {
                ConnectionKind::Locked
            } else {
                ConnectionKind::Unlocked
            };
            ConnectionRecord { key, kind }
        })
        .collect()
}

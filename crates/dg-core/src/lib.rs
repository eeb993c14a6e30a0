//! dg-core: room-grid level topology generation
//!
//! Builds the abstract layout of a room-based level:
//! - a connected set of grid cells grown from the origin
//! - a door graph that keeps every room reachable
//! - a locked region behind a single gating door
//! - safe, key and exit rooms picked from deep dead ends
//! - per-room shape and orientation for asset selection
//! - depth-paced enemy and loot placement
//!
//! Everything is pure logic driven by a seeded [`LayoutRng`]; a fixed seed
//! and configuration always produce the same [`LayoutResult`].

pub mod carve;
pub mod config;
pub mod consts;
pub mod error;
pub mod generator;
pub mod graph;
pub mod grid;
pub mod layout;
pub mod pacing;
pub mod rng;
pub mod roles;
pub mod shape;
pub mod sides;

pub use carve::{GatingConnection, LockedArea, LockedAreaCarver};
pub use config::{GeneratorConfig, LevelProgression, SpawnClasses};
pub use error::{ConfigError, LayoutIssue, Severity};
pub use generator::{DungeonGenerator, LayoutObserver, build_layout};
pub use graph::{
    AccessibilityAnalyzer, ConnectionGraph, ConnectionKey, ConnectivityGraphBuilder, DepthMap,
};
pub use grid::{Cell, CellSet, Direction, GridLayoutEngine, GrowthBounds, Sides, WorldPos};
pub use layout::{
    ConnectionKind, ConnectionRecord, GatingDoor, LayoutResult, RoomLayout, SpawnPlacement,
};
pub use pacing::{EncounterPacer, PacingConfig, RoomSpawns, Tier, TierSpawn};
pub use rng::LayoutRng;
pub use roles::{Role, RoleAssigner, RoleAssignment};
pub use shape::{RoomShape, RoomShapeClassifier, ShapeKind, ShapePools, SpecialRoomVariants};
pub use sides::{Extent, RoomSides, SideFeature};

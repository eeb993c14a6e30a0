//! Invariants that must hold for every generated layout

use dg_core::graph::reachable_from;
use dg_core::grid::is_grid_connected;
use dg_core::{
    AccessibilityAnalyzer, Cell, CellSet, ConnectionGraph, ConnectionKind,
    ConnectivityGraphBuilder, GeneratorConfig, GridLayoutEngine, GrowthBounds, LayoutIssue,
    LayoutResult, LayoutRng, RoomShape, build_layout,
};
use proptest::prelude::*;

fn graph_of(layout: &LayoutResult) -> ConnectionGraph {
    let mut graph = ConnectionGraph::new();
    for record in &layout.connections {
        let (a, b) = record.key.cells();
        graph.connect(a, b);
    }
    graph
}

fn arb_config() -> impl Strategy<Value = GeneratorConfig> {
    (
        any::<u64>(),
        1usize..40,
        0.0f32..=1.0,
        0.2f32..=0.5,
        0u32..8,
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(
            |(seed, cells, extra, fraction, enemies, forced, upper)| GeneratorConfig {
                seed: Some(seed),
                target_cells: cells,
                extra_door_chance: extra,
                locked_fraction: fraction,
                enemy_budget: enemies,
                forced_corridor: forced,
                bounds: if upper {
                    GrowthBounds::upper_half()
                } else {
                    GrowthBounds::UNBOUNDED
                },
                ..GeneratorConfig::default()
            },
        )
}

fn generate(config: &GeneratorConfig) -> LayoutResult {
    build_layout(config, config.seed.unwrap_or(0), 0)
}

proptest! {
    #[test]
    fn rooms_fill_target_and_stay_grid_connected(config in arb_config()) {
        let layout = generate(&config);
        prop_assert_eq!(layout.rooms.len(), config.target_cells);
        let cells: CellSet = layout.rooms.iter().map(|r| r.cell).collect();
        prop_assert!(is_grid_connected(&cells));
        prop_assert!(
            !layout
                .warnings()
                .any(|w| matches!(w, LayoutIssue::FrontierExhausted { .. })),
            "unexpected FrontierExhausted warning"
        );
    }

    #[test]
    fn spanning_tree_has_one_door_per_room(seed in any::<u64>(), target in 1usize..60) {
        let cells = GridLayoutEngine::new(GrowthBounds::UNBOUNDED, true)
            .grow(target, &mut LayoutRng::new(seed))
            .cells;
        let graph = ConnectivityGraphBuilder::new(0.3).spanning_tree(&cells);
        prop_assert_eq!(graph.len(), cells.len() - 1);
        let reached = reachable_from(&graph, Cell::ORIGIN, |_| true);
        prop_assert_eq!(reached.len(), cells.len());
    }

    #[test]
    fn unlocked_rooms_never_stranded(config in arb_config()) {
        let layout = generate(&config);
        let graph = graph_of(&layout);
        let locked: CellSet = layout.locked_rooms.iter().copied().collect();
        let reached = reachable_from(&graph, Cell::ORIGIN, |key| {
            let (a, b) = key.cells();
            !locked.contains(a) && !locked.contains(b)
        });
        for room in layout.rooms.iter().filter(|r| !r.locked) {
            prop_assert!(reached.contains(room.cell), "stranded {}", room.cell);
        }
    }

    #[test]
    fn single_gate_when_locked(config in arb_config()) {
        let layout = generate(&config);
        let gates = layout.connections_of_kind(ConnectionKind::Gating).count();
        if layout.locked_rooms.is_empty() {
            prop_assert_eq!(gates, 0);
            prop_assert!(layout.gating_door.is_none());
        } else {
            prop_assert_eq!(gates, 1);
            let locked: CellSet = layout.locked_rooms.iter().copied().collect();
            let crossing = layout
                .connections
                .iter()
                .filter(|c| c.key.crosses(|cell| locked.contains(cell)))
                .count();
            prop_assert_eq!(crossing, 1);
        }
    }

    #[test]
    fn accessible_set_excludes_locked(config in arb_config()) {
        let layout = generate(&config);
        let graph = graph_of(&layout);
        let gate = layout.gating_door.map(|d| d.key);
        let accessible = AccessibilityAnalyzer.accessible_set(&graph, Cell::ORIGIN, gate);
        for cell in &layout.locked_rooms {
            prop_assert!(!accessible.contains(*cell));
        }
        // Once the gate opens every room is reachable.
        let everything = reachable_from(&graph, Cell::ORIGIN, |_| true);
        prop_assert_eq!(everything.len(), layout.rooms.len());
    }

    #[test]
    fn roles_are_distinct_and_placed(config in arb_config()) {
        let layout = generate(&config);
        let roles: Vec<Cell> = [layout.safe_room, layout.key_room, layout.exit_room]
            .into_iter()
            .flatten()
            .collect();
        for (i, a) in roles.iter().enumerate() {
            prop_assert!(!roles[i + 1..].contains(a));
        }
        prop_assert_eq!(layout.safe_room, Some(Cell::ORIGIN));
        if let Some(key) = layout.key_room {
            prop_assert!(!layout.locked_rooms.contains(&key));
        }
        if let Some(exit) = layout.exit_room {
            prop_assert!(layout.locked_rooms.contains(&exit));
        }
    }

    #[test]
    fn enemy_budget_respected(config in arb_config()) {
        let layout = generate(&config);
        prop_assert!(layout.total_enemies() <= config.enemy_budget);
        prop_assert!(layout.total_treasure() <= config.treasure_budget);
        for spawn in &layout.spawns {
            prop_assert!(Some(spawn.cell) != layout.safe_room);
        }
    }

    #[test]
    fn shapes_match_open_sides(config in arb_config()) {
        let layout = generate(&config);
        let graph = graph_of(&layout);
        for room in &layout.rooms {
            prop_assert_eq!(room.open_sides, graph.open_sides(room.cell));
            prop_assert_eq!(room.shape, RoomShape::of_room(room.open_sides));
            if room.open_sides.count() > 1 {
                prop_assert!(
                    !matches!(room.shape, RoomShape::DeadEnd { .. }),
                    "room with >1 open side classified as DeadEnd"
                );
            }
        }
    }
}

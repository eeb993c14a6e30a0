//! dungeon-gen: generate room-grid levels from the command line

mod plan;

use std::error::Error;

use clap::Parser;

use dg_core::consts::DEFAULT_CELLS_PER_LEVEL;
use dg_core::{DungeonGenerator, GeneratorConfig, GrowthBounds, LayoutResult, Role};

/// Room-grid level generator
#[derive(Parser, Debug)]
#[command(name = "dungeon-gen")]
#[command(version, about = "Generate room-grid level layouts", long_about = None)]
struct Args {
    /// Fixed seed; random when omitted
    #[arg(short = 's', long)]
    seed: Option<u64>,

    /// Number of rooms to grow
    #[arg(short = 'n', long, default_value_t = 15)]
    cells: usize,

    /// Probability of a loop door between adjacent rooms
    #[arg(long, default_value_t = 0.3)]
    extra_door_chance: f32,

    /// Share of rooms behind the locked door (clamped to 0.2-0.5)
    #[arg(long, default_value_t = 0.3)]
    locked_fraction: f32,

    /// Enemy budget
    #[arg(long, default_value_t = 3)]
    enemies: u32,

    /// Treasure budget
    #[arg(long, default_value_t = 2)]
    treasure: u32,

    /// Minimum hop depth for key and exit rooms
    #[arg(long, default_value_t = 3)]
    min_dead_end_depth: u32,

    /// Let the origin have more than one neighbour
    #[arg(long)]
    no_forced_corridor: bool,

    /// Only grow rooms with y >= 0
    #[arg(long)]
    upper_half: bool,

    /// Levels to generate, each larger than the last
    #[arg(short = 'l', long, default_value_t = 1)]
    levels: u32,

    /// Print the layout as JSON instead of a plan
    #[arg(long)]
    json: bool,
}

impl Args {
    fn config(&self) -> GeneratorConfig {
        GeneratorConfig {
            seed: self.seed,
            target_cells: self.cells,
            extra_door_chance: self.extra_door_chance,
            locked_fraction: self.locked_fraction,
            enemy_budget: self.enemies,
            treasure_budget: self.treasure,
            min_dead_end_depth: self.min_dead_end_depth,
            forced_corridor: !self.no_forced_corridor,
            bounds: if self.upper_half {
                GrowthBounds::upper_half()
            } else {
                GrowthBounds::UNBOUNDED
            },
            ..GeneratorConfig::default()
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();
    log::debug!("starting with {args:?}");

    let mut generator = DungeonGenerator::new(args.config())?;
    generator.regenerate();
    for level in 0..args.levels.max(1) {
        if level > 0 {
            generator.next_level(DEFAULT_CELLS_PER_LEVEL);
        }
        if let Some(layout) = generator.current() {
            print_layout(layout, args.json)?;
        }
    }
    Ok(())
}

fn print_layout(layout: &LayoutResult, json: bool) -> Result<(), Box<dyn Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(layout)?);
        return Ok(());
    }

    println!(
        "level {} seed {}: {} rooms, {} doors, {} locked",
        layout.level,
        layout.seed,
        layout.rooms.len(),
        layout.connections.len(),
        layout.locked_rooms.len()
    );
    for role in [Role::Safe, Role::Key, Role::Exit] {
        if let Some(cell) = layout.role_room(role) {
            println!("{role} room {cell}");
        }
    }
    print!("{}", plan::render(layout));
    println!("{}", plan::LEGEND);
    if let Some(door) = &layout.gating_door {
        println!(
            "locked door {} facing {} at ({:.0}, {:.0})",
            door.key, door.facing, door.position.x, door.position.y
        );
    }
    for spawn in &layout.spawns {
        println!(
            "room {}: {} enemies, {} treasure",
            spawn.cell, spawn.enemies, spawn.treasure
        );
    }
    for issue in &layout.issues {
        println!("{}: {issue}", issue.severity());
    }
    println!();
    Ok(())
}

//! ASCII floor plan of a layout, north up

use dg_core::{Cell, ConnectionKind, LayoutResult, Role};

pub const LEGEND: &str = "S safe  K key  X exit  L locked  o room  - | door  = ! locked door";

fn room_glyph(layout: &LayoutResult, cell: Cell) -> Option<char> {
    let room = layout.room(cell)?;
    Some(match room.role {
        Some(Role::Safe) => 'S',
        Some(Role::Key) => 'K',
        Some(Role::Exit) => 'X',
        None if room.locked => 'L',
        None => 'o',
    })
}

/// Render rooms on even columns/rows with doors between them
pub fn render(layout: &LayoutResult) -> String {
    let Some(ext) = layout.extent else {
        return String::new();
    };
    let width = (ext.width() * 2 - 1) as usize;
    let height = (ext.height() * 2 - 1) as usize;
    let mut canvas = vec![vec![' '; width]; height];

    // Row 0 is the northern edge.
    let col = |x: i32| ((x - ext.min_x) * 2) as usize;
    let row = |y: i32| ((ext.max_y - y) * 2) as usize;

    for room in &layout.rooms {
        if let Some(glyph) = room_glyph(layout, room.cell) {
            canvas[row(room.cell.y)][col(room.cell.x)] = glyph;
        }
    }
    for record in &layout.connections {
        let (a, b) = record.key.cells();
        let gate = record.kind == ConnectionKind::Gating;
        let (r, c, glyph) = if a.y == b.y {
            (row(a.y), col(a.x.min(b.x)) + 1, if gate { '=' } else { '-' })
        } else {
            (row(a.y.max(b.y)) + 1, col(a.x), if gate { '!' } else { '|' })
        };
        canvas[r][c] = glyph;
    }

    let mut out = String::new();
    for line in canvas {
        let line: String = line.into_iter().collect();
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use dg_core::{GeneratorConfig, build_layout};

    #[test]
    fn test_single_room() {
        let config = GeneratorConfig {
            target_cells: 1,
            ..GeneratorConfig::seeded(1)
        };
        assert_eq!(render(&build_layout(&config, 1, 0)), "S\n");
    }

    #[test]
    fn test_plan_contains_every_room() {
        let layout = build_layout(&GeneratorConfig::seeded(9), 9, 0);
        let plan = render(&layout);
        let rooms = plan.chars().filter(|c| "SKXLo".contains(*c)).count();
        assert_eq!(rooms, layout.rooms.len());
        let gates = plan.chars().filter(|c| *c == '=' || *c == '!').count();
        assert_eq!(gates, 1);
    }
}

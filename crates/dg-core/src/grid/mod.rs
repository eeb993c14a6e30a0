//! Layout grid: cells, directions and growth

mod cell;
mod direction;
mod growth;

pub use cell::{Cell, CellSet, WorldPos};
pub use direction::{DIRECTION_TABLE, Direction, DirectionInfo, Sides};
pub use growth::{GridLayoutEngine, GrowthBounds, GrowthOutcome, is_grid_connected};

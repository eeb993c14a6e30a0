//! Room shape classification for asset selection
//!
//! A room's open sides decide its shape category and rotation:
//! - 1 side: dead end facing the opening
//! - 2 opposite sides: straight along that axis
//! - 2 adjacent sides: turn, keyed by the open corner
//! - 3 sides: T-junction, keyed by the closed side
//! - 4 sides: crossroad

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::grid::{Direction, Sides};
use crate::rng::LayoutRng;

/// Shape category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ShapeKind {
    DeadEnd,
    Straight,
    Turn,
    TJunction,
    Crossroad,
}

/// Axis of a straight room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum Axis {
    NorthSouth,
    EastWest,
}

/// Open corner of a turn room, named clockwise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
pub enum Corner {
    NorthEast,
    EastSouth,
    SouthWest,
    WestNorth,
}

impl Corner {
    /// First side of the corner going clockwise; sets the rotation
    pub const fn leading(self) -> Direction {
        match self {
            Corner::NorthEast => Direction::North,
            Corner::EastSouth => Direction::East,
            Corner::SouthWest => Direction::South,
            Corner::WestNorth => Direction::West,
        }
    }

    fn from_leading(dir: Direction) -> Corner {
        match dir {
            Direction::North => Corner::NorthEast,
            Direction::East => Corner::EastSouth,
            Direction::South => Corner::SouthWest,
            Direction::West => Corner::WestNorth,
        }
    }
}

/// Shape category plus orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum RoomShape {
    DeadEnd { opening: Direction },
    Straight { axis: Axis },
    Turn { corner: Corner },
    TJunction { closed: Direction },
    Crossroad,
}

impl RoomShape {
    /// Classify an open-side set; a room with no doors has no shape
    pub fn classify(open: Sides) -> Option<RoomShape> {
        let dirs: Vec<Direction> = open.directions().collect();
        match dirs.as_slice() {
            [] => None,
            [only] => Some(RoomShape::DeadEnd { opening: *only }),
            [a, b] if a.is_opposite(*b) => Some(RoomShape::Straight {
                axis: match a {
                    Direction::North | Direction::South => Axis::NorthSouth,
                    Direction::East | Direction::West => Axis::EastWest,
                },
            }),
            [a, b] => {
                // Adjacent pair: the leading side is the one whose clockwise
                // neighbour is the other.
                let leading = if a.clockwise() == *b { *a } else { *b };
                Some(RoomShape::Turn {
                    corner: Corner::from_leading(leading),
                })
            }
            [_, _, _] => {
                let closed = Direction::ALL.into_iter().find(|d| !open.has(*d))?;
                Some(RoomShape::TJunction { closed })
            }
            _ => Some(RoomShape::Crossroad),
        }
    }

    /// Shape of an emitted room; a room with no doors (a one-room level)
    /// is a dead end facing north
    pub fn of_room(open: Sides) -> RoomShape {
        RoomShape::classify(open).unwrap_or(RoomShape::DeadEnd {
            opening: Direction::North,
        })
    }

    pub fn kind(&self) -> ShapeKind {
        match self {
            RoomShape::DeadEnd { .. } => ShapeKind::DeadEnd,
            RoomShape::Straight { .. } => ShapeKind::Straight,
            RoomShape::Turn { .. } => ShapeKind::Turn,
            RoomShape::TJunction { .. } => ShapeKind::TJunction,
            RoomShape::Crossroad => ShapeKind::Crossroad,
        }
    }

    /// Rotation in degrees for an asset authored facing north.
    ///
    /// Dead ends are authored open to the north, straights north-south,
    /// turns open north and east, T-junctions closed to the south.
    pub fn yaw(&self) -> f32 {
        match self {
            RoomShape::DeadEnd { opening } => opening.yaw(),
            RoomShape::Straight { axis: Axis::NorthSouth } => Direction::North.yaw(),
            RoomShape::Straight { axis: Axis::EastWest } => Direction::East.yaw(),
            RoomShape::Turn { corner } => corner.leading().yaw(),
            RoomShape::TJunction { closed } => closed.opposite().yaw(),
            RoomShape::Crossroad => 0.0,
        }
    }
}

/// Caller-supplied asset variants per shape category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapePools {
    pub dead_end: Vec<String>,
    pub straight: Vec<String>,
    pub turn: Vec<String>,
    pub t_junction: Vec<String>,
    pub crossroad: Vec<String>,
}

impl Default for ShapePools {
    fn default() -> Self {
        Self {
            dead_end: vec!["dead_end".to_string()],
            straight: vec!["straight".to_string()],
            turn: vec!["turn".to_string()],
            t_junction: vec!["t_junction".to_string()],
            crossroad: vec!["crossroad".to_string()],
        }
    }
}

impl ShapePools {
    /// Pools with no variants at all
    pub fn empty() -> Self {
        Self {
            dead_end: Vec::new(),
            straight: Vec::new(),
            turn: Vec::new(),
            t_junction: Vec::new(),
            crossroad: Vec::new(),
        }
    }

    pub fn pool(&self, kind: ShapeKind) -> &[String] {
        match kind {
            ShapeKind::DeadEnd => &self.dead_end,
            ShapeKind::Straight => &self.straight,
            ShapeKind::Turn => &self.turn,
            ShapeKind::TJunction => &self.t_junction,
            ShapeKind::Crossroad => &self.crossroad,
        }
    }
}

/// Dedicated variants for role rooms; unset roles borrow from the dead-end pool
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpecialRoomVariants {
    pub safe: Option<String>,
    pub key: Option<String>,
    pub exit: Option<String>,
}

/// Resolves shapes to concrete variants
#[derive(Debug, Clone, Copy)]
pub struct RoomShapeClassifier<'a> {
    pools: &'a ShapePools,
}

impl<'a> RoomShapeClassifier<'a> {
    pub fn new(pools: &'a ShapePools) -> Self {
        Self { pools }
    }

    /// Pick a variant uniformly from the shape's pool; None if the pool is empty
    pub fn variant(&self, shape: &RoomShape, rng: &mut LayoutRng) -> Option<String> {
        rng.choose(self.pools.pool(shape.kind())).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sides(dirs: &[Direction]) -> Sides {
        Sides::from_directions(dirs)
    }

    use Direction::*;

    #[test]
    fn test_dead_end_faces_opening() {
        for dir in Direction::ALL {
            let shape = RoomShape::classify(sides(&[dir])).unwrap();
            assert_eq!(shape, RoomShape::DeadEnd { opening: dir });
            assert_eq!(shape.yaw(), dir.yaw());
        }
    }

    #[test]
    fn test_straight_north_south() {
        let shape = RoomShape::classify(sides(&[North, South])).unwrap();
        assert_eq!(shape, RoomShape::Straight { axis: Axis::NorthSouth });
        assert_eq!(shape.kind(), ShapeKind::Straight);
        assert_eq!(shape.yaw(), 0.0);
        let shape = RoomShape::classify(sides(&[East, West])).unwrap();
        assert_eq!(shape, RoomShape::Straight { axis: Axis::EastWest });
        assert_eq!(shape.yaw(), 90.0);
    }

    #[test]
    fn test_turn_corners() {
        let cases = [
            (&[North, East][..], Corner::NorthEast, 0.0),
            (&[East, South][..], Corner::EastSouth, 90.0),
            (&[South, West][..], Corner::SouthWest, 180.0),
            (&[West, North][..], Corner::WestNorth, 270.0),
        ];
        for (dirs, corner, yaw) in cases {
            let shape = RoomShape::classify(sides(dirs)).unwrap();
            assert_eq!(shape, RoomShape::Turn { corner });
            assert_eq!(shape.yaw(), yaw);
        }
    }

    #[test]
    fn test_t_junction_missing_west() {
        let shape = RoomShape::classify(sides(&[North, East, South])).unwrap();
        assert_eq!(shape, RoomShape::TJunction { closed: West });
        assert_eq!(shape.yaw(), 90.0);
        let shape = RoomShape::classify(sides(&[North, East, West])).unwrap();
        assert_eq!(shape, RoomShape::TJunction { closed: South });
        assert_eq!(shape.yaw(), 0.0);
    }

    #[test]
    fn test_crossroad_and_empty() {
        assert_eq!(RoomShape::classify(Sides::all()), Some(RoomShape::Crossroad));
        assert_eq!(RoomShape::classify(Sides::empty()), None);
    }

    #[test]
    fn test_of_room_follows_doors() {
        assert_eq!(
            RoomShape::of_room(sides(&[South])),
            RoomShape::DeadEnd { opening: South }
        );
        // A multi-door room never collapses to a dead end.
        assert_eq!(
            RoomShape::of_room(sides(&[South, West])),
            RoomShape::Turn {
                corner: Corner::SouthWest
            }
        );
        assert_eq!(
            RoomShape::of_room(Sides::empty()),
            RoomShape::DeadEnd { opening: North }
        );
    }

    #[test]
    fn test_variant_from_pool() {
        let mut pools = ShapePools::empty();
        pools.turn = vec!["turn_a".into(), "turn_b".into()];
        let classifier = RoomShapeClassifier::new(&pools);
        let mut rng = LayoutRng::new(3);
        let turn = RoomShape::Turn { corner: Corner::NorthEast };
        for _ in 0..20 {
            let v = classifier.variant(&turn, &mut rng).unwrap();
            assert!(v == "turn_a" || v == "turn_b");
        }
        assert!(classifier.variant(&RoomShape::Crossroad, &mut rng).is_none());
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(ShapeKind::TJunction.to_string(), "t-junction");
        assert_eq!(ShapeKind::DeadEnd.to_string(), "dead-end");
    }
}

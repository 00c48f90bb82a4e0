use serde::{Deserialize, Serialize};

/// A position on the square match grid. `Ord` so coordinates can key ordered
/// maps with a stable iteration order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub const DIRECTIONS: [Coord; 4] = [
        Coord { x: 1, y: 0 },  // East
        Coord { x: 0, y: -1 }, // North
        Coord { x: -1, y: 0 }, // West
        Coord { x: 0, y: 1 },  // South
    ];

    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn neighbors(self) -> impl Iterator<Item = Coord> {
        Self::DIRECTIONS.into_iter().map(move |d| self + d)
    }

    #[inline]
    pub fn distance(self, other: Coord) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}

impl std::ops::Add for Coord {
    type Output = Coord;

    fn add(self, other: Coord) -> Coord {
        Coord {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

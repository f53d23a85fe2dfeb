use serde::{Deserialize, Serialize};

use super::direction::Direction;

/// Integer tile coordinates in the maze.
///
/// Coordinates are signed so that lookahead positions (sensor windows, ghost
/// targets) can lie outside the maze. Use [`Maze::resolve`](crate::Maze::resolve)
/// to map a position back into the maze before indexing.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[display("({x}, {y})")]
pub struct TilePosition {
    pub x: i32,
    pub y: i32,
}

impl TilePosition {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the position `distance` tiles away in `dir`.
    #[must_use]
    pub const fn step(self, dir: Direction, distance: i32) -> Self {
        let (dx, dy) = dir.delta();
        Self {
            x: self.x + dx * distance,
            y: self.y + dy * distance,
        }
    }

    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Squared Euclidean distance, used for ghost target selection.
    #[must_use]
    pub const fn distance_squared(self, other: Self) -> i32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }
}

impl From<(i32, i32)> for TilePosition {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step() {
        let pos = TilePosition::new(10, 10);
        assert_eq!(pos.step(Direction::Up, 2), TilePosition::new(10, 8));
        assert_eq!(pos.step(Direction::Left, 1), TilePosition::new(9, 10));
        assert_eq!(pos.step(Direction::Down, -3), TilePosition::new(10, 7));
    }

    #[test]
    fn test_distance_squared() {
        let a = TilePosition::new(0, 0);
        let b = TilePosition::new(3, -4);
        assert_eq!(a.distance_squared(b), 25);
        assert_eq!(b.distance_squared(a), 25);
    }
}

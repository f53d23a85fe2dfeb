use serde::{Deserialize, Serialize};

/// One of the four movement directions on the tile grid.
///
/// Directions are unit step vectors in maze coordinates, where `y` grows downward.
/// The agent's egocentric reference frame is derived from its heading with
/// [`Direction::perspective`].
///
/// # Example
///
/// ```
/// use mazechase_engine::Direction;
///
/// assert_eq!(Direction::Up.delta(), (0, -1));
/// assert_eq!(Direction::Up.rotated_right(), Direction::Right);
/// assert_eq!(
///     Direction::Right.perspective(),
///     [Direction::Right, Direction::Down, Direction::Left, Direction::Up],
/// );
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[display("up")]
    Up,
    #[display("right")]
    Right,
    #[display("down")]
    Down,
    #[display("left")]
    Left,
}

impl Direction {
    /// All directions in compass order (clockwise from up).
    pub const ALL: [Self; 4] = [Self::Up, Self::Right, Self::Down, Self::Left];

    /// Unit step `(dx, dy)` of this direction.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Right => (1, 0),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
        }
    }

    /// Rotates 90 degrees clockwise: `(dx, dy) -> (-dy, dx)`.
    #[must_use]
    pub const fn rotated_right(self) -> Self {
        match self {
            Self::Up => Self::Right,
            Self::Right => Self::Down,
            Self::Down => Self::Left,
            Self::Left => Self::Up,
        }
    }

    /// Returns the opposite direction.
    #[must_use]
    pub const fn reversed(self) -> Self {
        self.rotated_right().rotated_right()
    }

    /// Returns the egocentric ordering `[forward, right, back, left]` for this heading.
    ///
    /// Sensory encoders lay out per-direction features in this order and the action
    /// decoder maps controller output indices through it, so both must agree.
    #[must_use]
    pub const fn perspective(self) -> [Self; 4] {
        let right = self.rotated_right();
        let back = right.rotated_right();
        let left = back.rotated_right();
        [self, right, back, left]
    }
}

use serde::{Deserialize, Serialize};

use crate::core::{Maze, TilePosition};

/// Points for a regular dot.
pub const DOT_SCORE: u32 = 10;
/// Points for a power dot.
pub const POWER_DOT_SCORE: u32 = 50;
/// Points for the bonus fruit.
pub const FRUIT_SCORE: u32 = 100;
/// Frames the fruit stays available after spawning.
pub const FRUIT_DURATION: u32 = 570;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::IsVariant)]
#[serde(rename_all = "snake_case")]
pub enum Consumable {
    Dot,
    PowerDot,
}

impl Consumable {
    #[must_use]
    pub const fn score(self) -> u32 {
        match self {
            Self::Dot => DOT_SCORE,
            Self::PowerDot => POWER_DOT_SCORE,
        }
    }
}

/// Dots and power dots still present in the maze.
///
/// Stored as a dense per-tile grid so lookups from the sensory encoders stay
/// constant time and iteration order never depends on hashing.
#[derive(Debug, Clone)]
pub struct Consumables {
    width: usize,
    cells: Vec<Option<Consumable>>,
    remaining_dots: u32,
    remaining_power_dots: u32,
}

impl Consumables {
    /// Places consumables from the maze layout. Disabled kinds are left out.
    #[must_use]
    pub fn new(maze: &Maze, dots: bool, power_dots: bool) -> Self {
        let mut this = Self {
            width: maze.width(),
            cells: vec![None; maze.width() * maze.height()],
            remaining_dots: 0,
            remaining_power_dots: 0,
        };
        if dots {
            for &pos in maze.dots() {
                this.place(pos, Consumable::Dot);
            }
        }
        if power_dots {
            for &pos in maze.power_dots() {
                this.place(pos, Consumable::PowerDot);
            }
        }
        this
    }

    fn index(&self, pos: TilePosition) -> Option<usize> {
        let x = usize::try_from(pos.x).ok()?;
        let y = usize::try_from(pos.y).ok()?;
        let index = y * self.width + x;
        (x < self.width && index < self.cells.len()).then_some(index)
    }

    fn place(&mut self, pos: TilePosition, kind: Consumable) {
        let Some(index) = self.index(pos) else {
            return;
        };
        if self.cells[index].replace(kind).is_none() {
            match kind {
                Consumable::Dot => self.remaining_dots += 1,
                Consumable::PowerDot => self.remaining_power_dots += 1,
            }
        }
    }

    /// Returns the consumable at a resolved maze position.
    #[must_use]
    pub fn get(&self, pos: TilePosition) -> Option<Consumable> {
        self.index(pos).and_then(|index| self.cells[index])
    }

    /// Whether a dot or power dot is present at `pos`.
    #[must_use]
    pub fn contains(&self, pos: TilePosition) -> bool {
        self.get(pos).is_some()
    }

    /// Removes and returns the consumable at `pos`.
    pub fn take(&mut self, pos: TilePosition) -> Option<Consumable> {
        let index = self.index(pos)?;
        let kind = self.cells[index].take()?;
        match kind {
            Consumable::Dot => self.remaining_dots -= 1,
            Consumable::PowerDot => self.remaining_power_dots -= 1,
        }
        Some(kind)
    }

    /// Dots plus power dots still in the maze.
    #[must_use]
    pub fn remaining(&self) -> u32 {
        self.remaining_dots + self.remaining_power_dots
    }

    #[must_use]
    pub fn remaining_dots(&self) -> u32 {
        self.remaining_dots
    }

    #[must_use]
    pub fn remaining_power_dots(&self) -> u32 {
        self.remaining_power_dots
    }
}

/// Bonus fruit that appears at the fruit spot for a limited time.
#[derive(Debug, Clone)]
pub struct Fruit {
    tile: TilePosition,
    available: bool,
    countdown: u32,
}

impl Fruit {
    #[must_use]
    pub fn new(tile: TilePosition) -> Self {
        Self {
            tile,
            available: false,
            countdown: 0,
        }
    }

    #[must_use]
    pub fn tile(&self) -> TilePosition {
        self.tile
    }

    #[must_use]
    pub fn is_available(&self) -> bool {
        self.available
    }

    /// Whether the fruit is currently present at `pos`.
    #[must_use]
    pub fn is_at(&self, pos: TilePosition) -> bool {
        self.available && self.tile == pos
    }

    /// Frames left before the fruit disappears.
    #[must_use]
    pub fn countdown(&self) -> u32 {
        self.countdown
    }

    pub(crate) fn spawn(&mut self) {
        self.available = true;
        self.countdown = FRUIT_DURATION;
    }

    /// Advances the fruit timer. Returns `true` if the agent ate the fruit this frame.
    pub(crate) fn update(&mut self, agent_tile: TilePosition) -> bool {
        if !self.available {
            return false;
        }
        if agent_tile == self.tile {
            self.available = false;
            return true;
        }
        self.countdown = self.countdown.saturating_sub(1);
        if self.countdown == 0 {
            self.available = false;
        }
        false
    }
}

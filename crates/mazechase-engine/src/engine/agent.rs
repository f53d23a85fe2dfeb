use crate::core::{Direction, Maze, TilePosition};

/// Movement progress needed to advance one tile.
pub(crate) const FULL_STEP: u32 = 100;

/// Agent speed, in percent of one tile per frame.
pub const AGENT_SPEED: u32 = 80;
/// Agent speed while ghosts are frightened.
pub const AGENT_FRIGHTENED_SPEED: u32 = 90;

/// The player-controlled character.
///
/// Owned by exactly one world. Score never decreases during an episode.
///
/// Movement follows the classic cornering rule: the requested direction is taken
/// if its neighbor tile is walkable, otherwise the agent keeps going along its
/// current heading, otherwise it stays put.
#[derive(Debug, Clone)]
pub struct Agent {
    tile: TilePosition,
    previous_tile: TilePosition,
    heading: Direction,
    alive: bool,
    score: u32,
    entered_new_tile: bool,
    pause_frames: u32,
    move_progress: u32,
}

impl Agent {
    #[must_use]
    pub fn new(tile: TilePosition, heading: Direction) -> Self {
        Self {
            tile,
            previous_tile: tile,
            heading,
            alive: true,
            score: 0,
            entered_new_tile: false,
            pause_frames: 0,
            move_progress: 0,
        }
    }

    #[must_use]
    pub fn tile(&self) -> TilePosition {
        self.tile
    }

    /// Tile occupied before the most recent movement frame.
    #[must_use]
    pub fn previous_tile(&self) -> TilePosition {
        self.previous_tile
    }

    #[must_use]
    pub fn heading(&self) -> Direction {
        self.heading
    }

    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Whether the most recent movement frame moved the agent onto a new tile.
    ///
    /// Consumables are only picked up on such frames.
    #[must_use]
    pub fn entered_new_tile(&self) -> bool {
        self.entered_new_tile
    }

    /// Advances the agent by one frame. Returns `true` if it moved onto a new tile.
    pub(crate) fn advance(&mut self, maze: &Maze, requested: Direction, speed: u32) -> bool {
        self.previous_tile = self.tile;
        self.entered_new_tile = false;
        if !self.alive {
            return false;
        }
        if self.pause_frames > 0 {
            self.pause_frames -= 1;
            return false;
        }

        self.move_progress += speed;
        if self.move_progress < FULL_STEP {
            return false;
        }

        let step = maze
            .neighbor(self.tile, requested)
            .map(|next| (requested, next))
            .or_else(|| {
                maze.neighbor(self.tile, self.heading)
                    .map(|next| (self.heading, next))
            });
        let Some((heading, next)) = step else {
            // blocked: no progress is banked
            self.move_progress -= speed;
            return false;
        };

        self.heading = heading;
        self.tile = next;
        self.move_progress -= FULL_STEP;
        self.entered_new_tile = true;
        true
    }

    pub(crate) fn place(&mut self, tile: TilePosition, heading: Direction) {
        self.tile = tile;
        self.previous_tile = tile;
        self.heading = heading;
        self.entered_new_tile = false;
        self.move_progress = 0;
    }

    pub(crate) fn add_score(&mut self, points: u32) {
        self.score += points;
    }

    pub(crate) fn pause(&mut self, frames: u32) {
        self.pause_frames = self.pause_frames.max(frames);
    }

    pub(crate) fn kill(&mut self) {
        self.alive = false;
    }
}

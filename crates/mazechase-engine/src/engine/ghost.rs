use arrayvec::ArrayVec;
use rand::Rng as _;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::core::{Direction, Maze, TilePosition};

use super::agent::{Agent, FULL_STEP};

/// Normal ghost speed, in percent of one tile per frame.
pub const GHOST_SPEED: u32 = 75;
pub const FRIGHTENED_GHOST_SPEED: u32 = 50;
pub const TUNNEL_GHOST_SPEED: u32 = 40;
pub const RETURNING_GHOST_SPEED: u32 = 150;
/// Blinky's speed at aggression levels 1 and 2.
pub const ELROY_SPEEDS: [u32; 2] = [80, 85];

/// Frames ghosts stay frightened after a power dot is eaten.
pub const FRIGHTENED_DURATION: u32 = 360;
/// Points for the first ghost eaten per power dot; doubles for each further ghost.
pub const GHOST_BASE_SCORE: u32 = 200;

/// Tunnel columns on each side of the maze where ghosts slow down.
const TUNNEL_DEPTH: i32 = 6;

/// Order in which ghosts try directions; the first of equally good candidates wins.
const STEER_ORDER: [Direction; 4] = [
    Direction::Up,
    Direction::Left,
    Direction::Down,
    Direction::Right,
];

/// Scatter/chase phases in frames; chase lasts forever after the last entry.
const MODE_SCHEDULE: [(GhostMode, u32); 7] = [
    (GhostMode::Scatter, 420),
    (GhostMode::Chase, 1200),
    (GhostMode::Scatter, 420),
    (GhostMode::Chase, 1200),
    (GhostMode::Scatter, 300),
    (GhostMode::Chase, 1200),
    (GhostMode::Scatter, 300),
];

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum GhostKind {
    Blinky,
    Pinky,
    Inky,
    Clyde,
}

impl GhostKind {
    pub const LEN: usize = 4;
    /// All ghosts in collision and encoding order.
    pub const ALL: [Self; Self::LEN] = [Self::Blinky, Self::Pinky, Self::Inky, Self::Clyde];

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Corner each ghost heads for while scattering. Lies outside the maze.
    #[must_use]
    pub const fn scatter_target(self) -> TilePosition {
        match self {
            Self::Blinky => TilePosition::new(25, -3),
            Self::Pinky => TilePosition::new(2, -3),
            Self::Inky => TilePosition::new(27, 31),
            Self::Clyde => TilePosition::new(0, 31),
        }
    }

    /// Waiting slot inside the ghost house, relative to the exit tile.
    const fn house_offset(self) -> (i32, i32) {
        match self {
            Self::Blinky => (0, 0),
            Self::Pinky => (0, 3),
            Self::Inky => (-2, 3),
            Self::Clyde => (2, 3),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::IsVariant)]
#[serde(rename_all = "snake_case")]
pub enum GhostMode {
    Scatter,
    Chase,
}

#[derive(Debug, Clone, Default)]
struct ModeSchedule {
    phase: usize,
    elapsed: u32,
}

impl ModeSchedule {
    fn mode(&self) -> GhostMode {
        MODE_SCHEDULE
            .get(self.phase)
            .map_or(GhostMode::Chase, |(mode, _)| *mode)
    }

    /// Advances one frame. Returns `true` when the mode switched.
    fn tick(&mut self) -> bool {
        let Some(&(_, duration)) = MODE_SCHEDULE.get(self.phase) else {
            return false;
        };
        self.elapsed += 1;
        if self.elapsed < duration {
            return false;
        }
        self.phase += 1;
        self.elapsed = 0;
        true
    }
}

/// A single ghost as seen by the sensory encoders.
#[derive(Debug, Clone)]
pub struct Ghost {
    kind: GhostKind,
    tile: TilePosition,
    previous_tile: TilePosition,
    heading: Direction,
    released: bool,
    frightened: bool,
    returning: bool,
    move_progress: u32,
}

impl Ghost {
    fn new(kind: GhostKind, tile: TilePosition) -> Self {
        Self {
            kind,
            tile,
            previous_tile: tile,
            heading: Direction::Left,
            released: false,
            frightened: false,
            returning: false,
            move_progress: 0,
        }
    }

    #[must_use]
    pub fn kind(&self) -> GhostKind {
        self.kind
    }

    #[must_use]
    pub fn tile(&self) -> TilePosition {
        self.tile
    }

    #[must_use]
    pub fn heading(&self) -> Direction {
        self.heading
    }

    /// Whether the ghost has left the house.
    #[must_use]
    pub fn is_released(&self) -> bool {
        self.released
    }

    #[must_use]
    pub fn is_frightened(&self) -> bool {
        self.frightened
    }

    /// Whether the ghost was eaten and is heading back to the house exit.
    #[must_use]
    pub fn is_returning(&self) -> bool {
        self.returning
    }

    /// Whether touching this ghost catches the agent.
    #[must_use]
    pub fn is_threat(&self) -> bool {
        self.released && !self.returning && !self.frightened
    }

    /// Whether touching this ghost lets the agent eat it.
    #[must_use]
    pub fn is_edible(&self) -> bool {
        self.released && !self.returning && self.frightened
    }

    fn is_active(&self) -> bool {
        self.released && !self.returning
    }

    fn touches(&self, agent: &Agent) -> bool {
        self.tile == agent.tile()
            || (self.tile == agent.previous_tile() && self.previous_tile == agent.tile())
    }

    /// Picks the next step toward `target`, or a random one when `target` is `None`.
    ///
    /// Reversing is only allowed in a dead end.
    fn steer(
        &self,
        maze: &Maze,
        target: Option<TilePosition>,
        rng: &mut Pcg32,
    ) -> Option<(Direction, TilePosition)> {
        let back = self.heading.reversed();
        let candidates = STEER_ORDER
            .into_iter()
            .filter(|dir| *dir != back)
            .filter_map(|dir| maze.neighbor(self.tile, dir).map(|next| (dir, next)))
            .collect::<ArrayVec<_, 4>>();
        if candidates.is_empty() {
            return maze.neighbor(self.tile, back).map(|next| (back, next));
        }
        let Some(target) = target else {
            return Some(candidates[rng.random_range(0..candidates.len())]);
        };
        candidates
            .into_iter()
            .min_by_key(|(_, next)| next.distance_squared(target))
    }
}

/// Result of checking the agent against every ghost for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionOutcome {
    pub ghosts_eaten: u32,
    pub points: u32,
    pub caught: bool,
}

/// The four ghosts plus the shared mode and frightened timers.
#[derive(Debug, Clone)]
pub struct Ghosts {
    members: [Ghost; GhostKind::LEN],
    exit: TilePosition,
    schedule: ModeSchedule,
    frightened_frames: u32,
    eaten_in_fright: u32,
    elroy: u8,
}

impl Ghosts {
    /// Places the ghosts in their starting slots. Blinky and Pinky start released;
    /// with `release_all` every ghost does.
    #[must_use]
    pub fn new(maze: &Maze, release_all: bool) -> Self {
        let exit = maze.ghost_exit();
        let members = GhostKind::ALL.map(|kind| {
            let (dx, dy) = kind.house_offset();
            Ghost::new(kind, exit.offset(dx, dy))
        });
        let mut this = Self {
            members,
            exit,
            schedule: ModeSchedule::default(),
            frightened_frames: 0,
            eaten_in_fright: 0,
            elroy: 0,
        };
        this.release(GhostKind::Blinky);
        this.release(GhostKind::Pinky);
        if release_all {
            this.release(GhostKind::Inky);
            this.release(GhostKind::Clyde);
        }
        this
    }

    pub fn iter(&self) -> impl Iterator<Item = &Ghost> + '_ {
        self.members.iter()
    }

    #[must_use]
    pub fn get(&self, kind: GhostKind) -> &Ghost {
        &self.members[kind.index()]
    }

    #[must_use]
    pub fn mode(&self) -> GhostMode {
        self.schedule.mode()
    }

    /// Whether a frightened period is running.
    #[must_use]
    pub fn is_frightened(&self) -> bool {
        self.frightened_frames > 0
    }

    #[must_use]
    pub fn frightened_frames(&self) -> u32 {
        self.frightened_frames
    }

    /// Blinky's aggression level (0, 1 or 2).
    #[must_use]
    pub fn elroy_level(&self) -> u8 {
        self.elroy
    }

    pub(crate) fn release(&mut self, kind: GhostKind) {
        let exit = self.exit;
        let ghost = &mut self.members[kind.index()];
        if ghost.released {
            return;
        }
        ghost.released = true;
        ghost.tile = exit;
        ghost.previous_tile = exit;
        ghost.heading = Direction::Left;
    }

    pub(crate) fn place(&mut self, kind: GhostKind, tile: TilePosition, heading: Direction) {
        let ghost = &mut self.members[kind.index()];
        ghost.released = true;
        ghost.returning = false;
        ghost.tile = tile;
        ghost.previous_tile = tile;
        ghost.heading = heading;
        ghost.move_progress = 0;
    }

    pub(crate) fn escalate(&mut self, level: u8) {
        self.elroy = self.elroy.max(level.min(2));
    }

    /// Starts a frightened period: active ghosts turn edible and reverse.
    pub(crate) fn frighten(&mut self) {
        self.frightened_frames = FRIGHTENED_DURATION;
        self.eaten_in_fright = 0;
        for ghost in self.members.iter_mut().filter(|ghost| ghost.is_active()) {
            ghost.frightened = true;
            ghost.heading = ghost.heading.reversed();
        }
    }

    fn tick_timers(&mut self) {
        if self.frightened_frames > 0 {
            self.frightened_frames -= 1;
            if self.frightened_frames == 0 {
                for ghost in &mut self.members {
                    ghost.frightened = false;
                }
            }
        } else if self.schedule.tick() {
            for ghost in self.members.iter_mut().filter(|ghost| ghost.is_active()) {
                ghost.heading = ghost.heading.reversed();
            }
        }
    }

    pub(crate) fn target(
        &self,
        ghost: &Ghost,
        agent: &Agent,
        blinky: TilePosition,
    ) -> TilePosition {
        if ghost.returning {
            return self.exit;
        }
        let chase = self.mode().is_chase() || (ghost.kind == GhostKind::Blinky && self.elroy > 0);
        if !chase {
            return ghost.kind.scatter_target();
        }
        let pos = agent.tile();
        let heading = agent.heading();
        match ghost.kind {
            GhostKind::Blinky => pos,
            GhostKind::Pinky => pos.step(heading, 4),
            GhostKind::Inky => {
                let pivot = pos.step(heading, 2);
                TilePosition::new(2 * pivot.x - blinky.x, 2 * pivot.y - blinky.y)
            }
            GhostKind::Clyde => {
                if ghost.tile.distance_squared(pos) > 64 {
                    pos
                } else {
                    ghost.kind.scatter_target()
                }
            }
        }
    }

    fn speed(&self, ghost: &Ghost, maze: &Maze) -> u32 {
        let tile = ghost.tile;
        let width = i32::try_from(maze.width()).unwrap_or(i32::MAX);
        let in_tunnel =
            maze.is_tunnel_row(tile.y) && (tile.x < TUNNEL_DEPTH || tile.x >= width - TUNNEL_DEPTH);
        if ghost.returning {
            RETURNING_GHOST_SPEED
        } else if ghost.frightened {
            FRIGHTENED_GHOST_SPEED
        } else if in_tunnel {
            TUNNEL_GHOST_SPEED
        } else if ghost.kind == GhostKind::Blinky && self.elroy > 0 {
            ELROY_SPEEDS[usize::from(self.elroy - 1)]
        } else {
            GHOST_SPEED
        }
    }

    /// Advances timers and moves every released ghost by one frame.
    pub(crate) fn advance(&mut self, maze: &Maze, agent: &Agent, rng: &mut Pcg32) {
        self.tick_timers();
        let blinky = self.members[GhostKind::Blinky.index()].tile;
        for index in 0..self.members.len() {
            self.members[index].previous_tile = self.members[index].tile;
            if !self.members[index].released {
                continue;
            }
            let target = self.target(&self.members[index], agent, blinky);
            let speed = self.speed(&self.members[index], maze);
            let exit = self.exit;

            let ghost = &mut self.members[index];
            ghost.move_progress += speed;
            while ghost.move_progress >= FULL_STEP {
                ghost.move_progress -= FULL_STEP;
                let goal = (!ghost.frightened).then_some(target);
                let Some((heading, next)) = ghost.steer(maze, goal, rng) else {
                    ghost.move_progress = 0;
                    break;
                };
                ghost.heading = heading;
                ghost.tile = next;
                if ghost.returning && ghost.tile == exit {
                    ghost.returning = false;
                    ghost.move_progress = 0;
                    break;
                }
            }
        }
    }

    /// Checks the agent against each ghost in order. Edible ghosts touched are
    /// eaten; any threat touched catches the agent.
    pub(crate) fn resolve_collisions(&mut self, agent: &Agent) -> CollisionOutcome {
        let mut outcome = CollisionOutcome::default();
        if !agent.is_alive() {
            return outcome;
        }
        for ghost in &mut self.members {
            if !ghost.is_active() || !ghost.touches(agent) {
                continue;
            }
            if ghost.frightened {
                ghost.frightened = false;
                ghost.returning = true;
                outcome.points += GHOST_BASE_SCORE << self.eaten_in_fright.min(3);
                outcome.ghosts_eaten += 1;
                self.eaten_in_fright += 1;
            } else {
                outcome.caught = true;
            }
        }
        outcome
    }
}

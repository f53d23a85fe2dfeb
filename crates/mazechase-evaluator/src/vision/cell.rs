//! Tile classification shared by every encoder.

use mazechase_engine::{TilePosition, World};

pub const PATH_CODE: f32 = 0.0;
pub const FRIGHTENED_GHOST_CODE: f32 = 0.1;
pub const FRUIT_CODE: f32 = 0.2;
/// Dots and power dots share one code.
pub const DOT_CODE: f32 = 0.4;
/// Walls, the ghost house door and anything outside the maze.
pub const WALL_CODE: f32 = 0.75;
pub const ACTIVE_GHOST_CODE: f32 = 1.0;

/// Something of interest on a walkable tile.
///
/// Ordered by priority: when several are on one tile, the greatest wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Feature {
    Dot,
    Fruit,
    FrightenedGhost,
    ActiveGhost,
}

impl Feature {
    pub const LEN: usize = 4;

    #[must_use]
    pub const fn code(self) -> f32 {
        match self {
            Self::Dot => DOT_CODE,
            Self::Fruit => FRUIT_CODE,
            Self::FrightenedGhost => FRIGHTENED_GHOST_CODE,
            Self::ActiveGhost => ACTIVE_GHOST_CODE,
        }
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    OutOfBounds,
    Wall,
    Open(Option<Feature>),
}

impl Cell {
    #[must_use]
    pub const fn code(self) -> f32 {
        match self {
            Self::OutOfBounds | Self::Wall => WALL_CODE,
            Self::Open(None) => PATH_CODE,
            Self::Open(Some(feature)) => feature.code(),
        }
    }
}

#[must_use]
pub fn classify(world: &World, pos: TilePosition) -> Cell {
    let maze = world.maze();
    let Some(pos) = maze.resolve(pos) else {
        return Cell::OutOfBounds;
    };
    match maze.tile(pos) {
        None => Cell::OutOfBounds,
        Some(tile) if !tile.is_path() => Cell::Wall,
        Some(_) => Cell::Open(feature_at(world, pos)),
    }
}

/// Highest-priority feature on a resolved walkable tile.
#[must_use]
pub fn feature_at(world: &World, pos: TilePosition) -> Option<Feature> {
    ghost_at(world, pos)
        .or_else(|| (world.features().fruit && world.fruit().is_at(pos)).then_some(Feature::Fruit))
        .or_else(|| world.consumables().contains(pos).then_some(Feature::Dot))
}

fn ghost_at(world: &World, pos: TilePosition) -> Option<Feature> {
    if !world.features().ghosts {
        return None;
    }
    world
        .ghosts()
        .iter()
        .filter(|ghost| ghost.tile() == pos)
        .filter_map(|ghost| {
            if ghost.is_threat() {
                Some(Feature::ActiveGhost)
            } else if ghost.is_edible() {
                Some(Feature::FrightenedGhost)
            } else {
                None
            }
        })
        .max()
}

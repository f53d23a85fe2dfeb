use mazechase_engine::{Direction, TilePosition, World};

use super::{
    BoxedSensoryEncoder, SensoryEncoder,
    cell::{self, Cell, Feature, PATH_CODE, WALL_CODE},
};

/// How a ray scan ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub(crate) enum RayEnd {
    Wall,
    /// Left the maze or reached the range limit.
    Open,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct RayScan {
    pub(crate) can_move: bool,
    /// Highest-priority feature seen and the distance it was first seen at.
    pub(crate) best: Option<(Feature, u32)>,
    pub(crate) seen: [bool; Feature::LEN],
    pub(crate) end: RayEnd,
}

/// Steps outward from `origin` in `dir` until a wall, the edge of the maze, or
/// `range` tiles. Tunnel rows wrap.
pub(crate) fn scan_ray(world: &World, origin: TilePosition, dir: Direction, range: u32) -> RayScan {
    let maze = world.maze();
    let mut scan = RayScan {
        can_move: false,
        best: None,
        seen: [false; Feature::LEN],
        end: RayEnd::Open,
    };
    let mut pos = origin;
    for distance in 1..=range {
        let Some(next) = maze.resolve(pos.step(dir, 1)) else {
            return scan;
        };
        pos = next;
        match cell::classify(world, pos) {
            Cell::OutOfBounds => return scan,
            Cell::Wall => {
                scan.end = RayEnd::Wall;
                return scan;
            }
            Cell::Open(feature) => {
                if distance == 1 {
                    scan.can_move = true;
                }
                if let Some(feature) = feature {
                    scan.seen[feature.index()] = true;
                    if scan.best.is_none_or(|(best, _)| feature > best) {
                        scan.best = Some((feature, distance));
                    }
                }
            }
        }
    }
    scan
}

/// One value per egocentric direction: the best feature along a ray.
///
/// With `diagonals`, four more values flag an active ghost in the 3x3 block
/// centered two tiles forward and two tiles right of each perspective direction
/// (forward-right, right-back, back-left, left-forward).
#[derive(Debug, Clone)]
pub struct RayCast {
    range: u32,
    diagonals: bool,
    distance_weighted: bool,
}

impl RayCast {
    #[must_use]
    pub fn new(range: u32, diagonals: bool, distance_weighted: bool) -> Self {
        Self {
            range,
            diagonals,
            distance_weighted,
        }
    }

    #[must_use]
    pub fn output_len(diagonals: bool) -> usize {
        if diagonals { 8 } else { 4 }
    }

    #[expect(clippy::cast_precision_loss)]
    fn ray_value(&self, scan: &RayScan) -> f32 {
        match scan.best {
            Some((feature, distance)) if self.distance_weighted => {
                let weight = (self.range - distance + 1) as f32 / self.range as f32;
                feature.code() * weight
            }
            Some((feature, _)) => feature.code(),
            None if scan.end.is_wall() => WALL_CODE,
            None => PATH_CODE,
        }
    }
}

fn ghost_near(world: &World, center: TilePosition) -> bool {
    world.features().ghosts
        && world.ghosts().iter().any(|ghost| {
            let tile = ghost.tile();
            ghost.is_threat() && (tile.x - center.x).abs() <= 1 && (tile.y - center.y).abs() <= 1
        })
}

impl SensoryEncoder for RayCast {
    fn id(&self) -> &'static str {
        "ray_cast"
    }

    fn input_len(&self) -> usize {
        Self::output_len(self.diagonals)
    }

    fn clone_boxed(&self) -> BoxedSensoryEncoder {
        Box::new(self.clone())
    }

    fn encode(&self, world: &World, vision: &mut Vec<f32>) {
        vision.clear();
        let agent = world.agent();
        let perspective = agent.heading().perspective();
        for dir in perspective {
            let scan = scan_ray(world, agent.tile(), dir, self.range);
            vision.push(self.ray_value(&scan));
        }
        if self.diagonals {
            for dir in perspective {
                let center = agent.tile().step(dir, 2).step(dir.rotated_right(), 2);
                vision.push(if ghost_near(world, center) { 1.0 } else { 0.0 });
            }
        }
    }
}

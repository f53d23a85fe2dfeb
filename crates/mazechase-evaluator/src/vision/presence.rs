use mazechase_engine::World;

use super::{
    BoxedSensoryEncoder, SensoryEncoder,
    cell::Feature,
    ray_cast::scan_ray,
};

const FLAG_ORDER: [Feature; 4] = [
    Feature::Dot,
    Feature::Fruit,
    Feature::ActiveGhost,
    Feature::FrightenedGhost,
];

/// Binary flags per egocentric direction, grouped by flag.
///
/// Layout: `[can_move; 4]`, `[dot; 4]`, `[fruit; 4]`, `[active_ghost; 4]`,
/// `[frightened_ghost; 4]`, each group in perspective order. A feature counts when
/// it is seen anywhere along the ray before the first wall.
#[derive(Debug, Clone)]
pub struct OneHotPresence {
    range: u32,
}

impl OneHotPresence {
    pub const LEN: usize = 4 * (1 + FLAG_ORDER.len());

    #[must_use]
    pub fn new(range: u32) -> Self {
        Self { range }
    }
}

fn flag(value: bool) -> f32 {
    if value { 1.0 } else { 0.0 }
}

impl SensoryEncoder for OneHotPresence {
    fn id(&self) -> &'static str {
        "one_hot_presence"
    }

    fn input_len(&self) -> usize {
        Self::LEN
    }

    fn clone_boxed(&self) -> BoxedSensoryEncoder {
        Box::new(self.clone())
    }

    fn encode(&self, world: &World, vision: &mut Vec<f32>) {
        vision.clear();
        let agent = world.agent();
        let scans = agent
            .heading()
            .perspective()
            .map(|dir| scan_ray(world, agent.tile(), dir, self.range));
        vision.extend(scans.iter().map(|scan| flag(scan.can_move)));
        for feature in FLAG_ORDER {
            vision.extend(scans.iter().map(|scan| flag(scan.seen[feature.index()])));
        }
    }
}

#[cfg(test)]
mod tests {
    use mazechase_engine::{Direction, GhostKind, TilePosition, WorldFeatures};

    use super::*;
    use crate::vision::test_util;

    const LAYOUT: &str = "\
#########
#   .   #
# ##### #
#   P  E#
#F      #
#########";

    #[test]
    fn test_flag_layout() {
        let mut world = test_util::world(LAYOUT, WorldFeatures::FULL);
        world.place_agent(TilePosition::new(4, 3), Direction::Left);
        world.place_ghost(GhostKind::Blinky, TilePosition::new(1, 3), Direction::Right);
        world.place_ghost(GhostKind::Pinky, TilePosition::new(7, 1), Direction::Left);
        let vision = test_util::encode(&OneHotPresence::new(10), &world);

        // perspective of LEFT: [left, up, right, down]
        #[rustfmt::skip]
        let expected = [
            1.0, 0.0, 1.0, 1.0, // can move
            0.0, 0.0, 0.0, 0.0, // dot
            0.0, 0.0, 0.0, 0.0, // fruit
            1.0, 0.0, 0.0, 0.0, // active ghost
            0.0, 0.0, 0.0, 0.0, // frightened ghost
        ];
        assert_eq!(vision, expected);
    }

    #[test]
    fn test_flags_ignore_distance() {
        let mut world = test_util::world(LAYOUT, WorldFeatures::FULL);
        world.place_agent(TilePosition::new(4, 3), Direction::Left);
        world.place_ghost(GhostKind::Blinky, TilePosition::new(1, 3), Direction::Right);
        world.place_ghost(GhostKind::Pinky, TilePosition::new(7, 1), Direction::Left);
        world.frighten_ghosts();
        let vision = test_util::encode(&OneHotPresence::new(10), &world);
        assert_eq!(vision[12], 0.0);
        assert_eq!(vision[16], 1.0);

        // out of range
        let vision = test_util::encode(&OneHotPresence::new(2), &world);
        assert_eq!(vision[16], 0.0);
    }
}

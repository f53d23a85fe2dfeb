use mazechase_engine::World;

use super::{BoxedSensoryEncoder, SensoryEncoder, cell};

/// Square window of tile codes in the agent's frame.
///
/// The window is `2 * radius + 1` tiles wide and centered `ahead` tiles in front
/// of the agent. Cells are emitted far-ahead row first and left to right within a
/// row; the agent's own cell is skipped when it falls inside the window.
#[derive(Debug, Clone)]
pub struct OccupancyGrid {
    radius: i32,
    ahead: i32,
}

impl OccupancyGrid {
    #[must_use]
    pub fn new(radius: u32, ahead: u32) -> Self {
        Self {
            radius: i32::try_from(radius).unwrap_or(i32::MAX),
            ahead: i32::try_from(ahead).unwrap_or(i32::MAX),
        }
    }

    #[must_use]
    pub fn window_len(radius: u32, ahead: u32) -> usize {
        let side = 2 * radius as usize + 1;
        side * side - usize::from(ahead <= radius)
    }
}

impl SensoryEncoder for OccupancyGrid {
    fn id(&self) -> &'static str {
        "occupancy_grid"
    }

    #[expect(clippy::cast_sign_loss)]
    fn input_len(&self) -> usize {
        Self::window_len(self.radius as u32, self.ahead as u32)
    }

    fn clone_boxed(&self) -> BoxedSensoryEncoder {
        Box::new(self.clone())
    }

    fn encode(&self, world: &World, vision: &mut Vec<f32>) {
        vision.clear();
        let agent = world.agent();
        let [forward, right, ..] = agent.heading().perspective();
        let center = agent.tile().step(forward, self.ahead);
        for f in (-self.radius..=self.radius).rev() {
            for l in -self.radius..=self.radius {
                if l == 0 && f == -self.ahead {
                    continue;
                }
                let pos = center.step(forward, f).step(right, l);
                vision.push(cell::classify(world, pos).code());
            }
        }
    }
}

use mazechase_engine::{GhostKind, World};

use super::{BoxedSensoryEncoder, SensoryEncoder};

/// Own position, open directions and ghost offsets in the agent's frame.
///
/// Layout (14 values):
///
/// - agent x and y normalized to `[0, 1]`
/// - can-move flags in perspective order (4)
/// - for each ghost (Blinky, Pinky, Inky, Clyde) its offset from the agent,
///   scaled by maze width and height and projected onto the forward and right
///   axes (8)
///
/// Ghosts still in the house, returning to it, or absent from the world report `0`.
#[derive(Debug, Clone)]
pub struct RelativePosition;

impl RelativePosition {
    pub const LEN: usize = 2 + 4 + 2 * GhostKind::LEN;
}

impl SensoryEncoder for RelativePosition {
    fn id(&self) -> &'static str {
        "relative_position"
    }

    fn input_len(&self) -> usize {
        Self::LEN
    }

    fn clone_boxed(&self) -> BoxedSensoryEncoder {
        Box::new(self.clone())
    }

    #[expect(clippy::cast_precision_loss)]
    fn encode(&self, world: &World, vision: &mut Vec<f32>) {
        vision.clear();
        let maze = world.maze();
        let agent = world.agent();
        let pos = agent.tile();
        let width = maze.width() as f32;
        let height = maze.height() as f32;

        vision.push(pos.x as f32 / (width - 1.0).max(1.0));
        vision.push(pos.y as f32 / (height - 1.0).max(1.0));

        let perspective = agent.heading().perspective();
        for dir in perspective {
            vision.push(if maze.neighbor(pos, dir).is_some() { 1.0 } else { 0.0 });
        }

        let [forward, right, ..] = perspective.map(|dir| {
            let (dx, dy) = dir.delta();
            (dx as f32, dy as f32)
        });
        for kind in GhostKind::ALL {
            let ghost = world.ghosts().get(kind);
            if !world.features().ghosts || !ghost.is_released() || ghost.is_returning() {
                vision.extend([0.0, 0.0]);
                continue;
            }
            let nx = (ghost.tile().x - pos.x) as f32 / width;
            let ny = (ghost.tile().y - pos.y) as f32 / height;
            vision.push(nx * forward.0 + ny * forward.1);
            vision.push(nx * right.0 + ny * right.1);
        }
    }
}

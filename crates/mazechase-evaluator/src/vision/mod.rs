//! Sensory encoders: world snapshot to controller input vector.
//!
//! Every encoder sees the world from the agent's point of view. Per-direction
//! values follow [`Direction::perspective`](mazechase_engine::Direction::perspective)
//! (`[forward, right, back, left]`), the same ordering the action decoder uses, so
//! a controller never needs to know the absolute heading.
//!
//! Strategies:
//!
//! - [`OccupancyGrid`] - Square window of tile codes around (or ahead of) the agent
//! - [`RayCast`] - Best feature seen along a ray in each direction, plus optional
//!   diagonal ghost flags
//! - [`OneHotPresence`] - Binary flags per direction from the same ray scan
//! - [`RelativePosition`] - Own position, open directions and ghost offsets
//!
//! Tile codes are shared by the grid and the ray scan (see [`cell`]); a tile holding
//! several things reports the highest priority one:
//! active ghost > frightened ghost > fruit > dot.
//!
//! Encoders are pure: they read the world and never mutate it. Positions outside the
//! maze resolve to the wall code (grid) or end the ray (ray scan); nothing indexes
//! outside the grid.

use std::fmt;

use mazechase_engine::World;
use serde::{Deserialize, Serialize};

pub use self::{
    occupancy::OccupancyGrid, presence::OneHotPresence, ray_cast::RayCast,
    relative::RelativePosition,
};

pub mod cell;
mod occupancy;
mod presence;
mod ray_cast;
mod relative;

pub trait SensoryEncoder: fmt::Debug + Send + Sync {
    #[must_use]
    fn id(&self) -> &str;
    /// Number of values [`Self::encode`] produces.
    #[must_use]
    fn input_len(&self) -> usize;
    #[must_use]
    fn clone_boxed(&self) -> BoxedSensoryEncoder;
    /// Replaces the contents of `vision` with exactly [`Self::input_len`] values.
    fn encode(&self, world: &World, vision: &mut Vec<f32>);
}

pub type BoxedSensoryEncoder = Box<dyn SensoryEncoder>;

impl Clone for BoxedSensoryEncoder {
    fn clone(&self) -> Self {
        self.clone_boxed()
    }
}

/// Serializable encoder selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EncoderConfig {
    OccupancyGrid {
        radius: u32,
        #[serde(default)]
        ahead: u32,
    },
    RayCast {
        range: u32,
        #[serde(default)]
        diagonals: bool,
        #[serde(default)]
        distance_weighted: bool,
    },
    OneHotPresence {
        range: u32,
    },
    RelativePosition,
}

impl EncoderConfig {
    #[must_use]
    pub fn input_len(&self) -> usize {
        match *self {
            Self::OccupancyGrid { radius, ahead } => OccupancyGrid::window_len(radius, ahead),
            Self::RayCast { diagonals, .. } => RayCast::output_len(diagonals),
            Self::OneHotPresence { .. } => OneHotPresence::LEN,
            Self::RelativePosition => RelativePosition::LEN,
        }
    }

    #[must_use]
    pub fn build(&self) -> BoxedSensoryEncoder {
        match *self {
            Self::OccupancyGrid { radius, ahead } => Box::new(OccupancyGrid::new(radius, ahead)),
            Self::RayCast {
                range,
                diagonals,
                distance_weighted,
            } => Box::new(RayCast::new(range, diagonals, distance_weighted)),
            Self::OneHotPresence { range } => Box::new(OneHotPresence::new(range)),
            Self::RelativePosition => Box::new(RelativePosition),
        }
    }
}

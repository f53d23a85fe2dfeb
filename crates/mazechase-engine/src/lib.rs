//! Reference maze-chase game engine.
//!
//! [`core`] holds the static geometry (directions, tile positions, the maze grid)
//! and [`engine`] the mutable per-episode state driven by an evaluator.

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

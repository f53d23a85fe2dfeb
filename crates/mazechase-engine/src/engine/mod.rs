//! Game state and per-frame rules.
//!
//! - [`World`] - One episode's mutable state, advanced one frame at a time
//! - [`Agent`] - The controlled character
//! - [`Consumables`] / [`Fruit`] - Dots, power dots and the bonus fruit
//! - [`Ghosts`] - The four chasers with scatter/chase/frightened behavior
//! - [`Checkpoints`] - Events keyed by the remaining-dot count
//! - [`WorldSeed`] - Seed for the world's random number generator
//!
//! # Example
//!
//! ```
//! use mazechase_engine::{Direction, Maze, World, WorldFeatures, WorldSeed};
//!
//! let mut world = World::new(Maze::classic(), WorldFeatures::FULL, WorldSeed::default());
//! for _ in 0..10 {
//!     world.move_agent(Direction::Left);
//!     world.move_ghosts();
//!     world.resolve_collisions();
//!     world.consume();
//!     world.update_fruit();
//!     world.apply_checkpoints();
//! }
//! assert!(world.agent().score() > 0);
//! ```

pub use self::{agent::*, checkpoint::*, consumables::*, ghost::*, world::*, world_stats::*};

mod agent;
mod checkpoint;
mod consumables;
mod ghost;
mod world;
mod world_stats;

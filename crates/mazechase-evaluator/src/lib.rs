//! Episode evaluator for maze-chase controllers.
//!
//! A candidate controller plays one seeded episode of the maze-chase game and the
//! episode is reduced to a fitness value for an evolutionary search.
//!
//! # Architecture
//!
//! ```text
//! World (mazechase-engine)
//!     ↓ encoded by
//! Sensory Encoder (vision)
//!     ↓ fed to
//! Controller
//!     ↓ activations decoded by
//! Action Decoder (action)
//!     ↓ direction applied to
//! World ... until the Termination Policy ends the episode
//!     ↓ score and lifespan reduced by
//! Fitness Function
//! ```
//!
//! Which encoder, ordering, fitness formula, limits and world features are used is
//! decided by a [`PhaseConfig`](phase::PhaseConfig). Strategies are resolved once
//! when the [`EpisodeEvaluator`] is built.
//!
//! # Modules
//!
//! - [`vision`] - Sensory encoders and the shared tile codes
//! - [`action`] - Activations to direction, relative to the agent's heading
//! - [`termination`] - End-of-episode rules and the lifespan penalty
//! - [`fitness`] - Fitness formulas
//! - [`controller`] - The controller boundary and a feed-forward network
//! - [`phase`] - Phase configuration and presets
//! - [`episode_evaluator`] - The per-frame loop, outcomes and observers

pub use self::episode_evaluator::{EpisodeEvaluator, EpisodeOutcome, EvaluationError};

pub mod action;
pub mod controller;
pub mod episode_evaluator;
pub mod fitness;
pub mod phase;
pub mod termination;
pub mod vision;

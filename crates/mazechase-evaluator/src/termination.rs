//! Episode termination rules.
//!
//! The policy is checked once per frame, after the world has been updated, and
//! reports the first matching reason in this order:
//!
//! 1. [`TerminationReason::Caught`] - the agent is dead
//! 2. [`TerminationReason::Cleared`] - every dot is gone (dot worlds only)
//! 3. [`TerminationReason::Starved`] - no score increase for `starvation_frames`
//! 4. [`TerminationReason::StationaryStuck`] - same tile for `stationary_frames`
//! 5. [`TerminationReason::ScoreCap`] - score reached `score_cap`
//! 6. [`TerminationReason::TimeCap`] - frame count reached `max_frames`
//!
//! Starvation and immobility are penalized by subtracting their limit from the
//! elapsed frames, which yields the *true lifespan* used by fitness functions.

use mazechase_engine::{TilePosition, World};
use serde::{Deserialize, Serialize};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::IsVariant,
)]
#[serde(rename_all = "snake_case")]
pub enum TerminationReason {
    #[display("caught")]
    Caught,
    #[display("cleared")]
    Cleared,
    #[display("starved")]
    Starved,
    #[display("stationary_stuck")]
    StationaryStuck,
    #[display("score_cap")]
    ScoreCap,
    #[display("time_cap")]
    TimeCap,
}

/// Episode limits. Only the time cap is mandatory; zero limits are rejected by
/// [`PhaseConfig::validate`](crate::phase::PhaseConfig::validate).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TerminationLimits {
    pub max_frames: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starvation_frames: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stationary_frames: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score_cap: Option<u32>,
}

/// Per-episode termination state machine.
#[derive(Debug, Clone)]
pub struct TerminationPolicy {
    limits: TerminationLimits,
    frames: u32,
    frames_since_score: u32,
    stationary_frames: u32,
    last_score: u32,
    last_tile: TilePosition,
}

impl TerminationPolicy {
    #[must_use]
    pub fn new(limits: TerminationLimits, world: &World) -> Self {
        Self {
            limits,
            frames: 0,
            frames_since_score: 0,
            stationary_frames: 0,
            last_score: world.agent().score(),
            last_tile: world.agent().tile(),
        }
    }

    /// Frames observed so far.
    #[must_use]
    pub fn frames(&self) -> u32 {
        self.frames
    }

    #[must_use]
    pub fn frames_since_score(&self) -> u32 {
        self.frames_since_score
    }

    #[must_use]
    pub fn stationary_frames(&self) -> u32 {
        self.stationary_frames
    }

    /// Updates the counters after one simulated frame.
    pub fn observe(&mut self, world: &World) {
        let agent = world.agent();
        self.frames += 1;

        if agent.score() > self.last_score {
            self.last_score = agent.score();
            self.frames_since_score = 0;
        } else {
            self.frames_since_score += 1;
        }

        if agent.tile() == self.last_tile {
            self.stationary_frames += 1;
        } else {
            self.last_tile = agent.tile();
            self.stationary_frames = 0;
        }
    }

    /// Returns the reason the episode ends on this frame, if any.
    #[must_use]
    pub fn check(&self, world: &World) -> Option<TerminationReason> {
        let reached = |value: u32, limit: Option<u32>| limit.is_some_and(|limit| value >= limit);

        if !world.agent().is_alive() {
            return Some(TerminationReason::Caught);
        }
        if world.features().dots && world.consumables().remaining() == 0 {
            return Some(TerminationReason::Cleared);
        }
        if reached(self.frames_since_score, self.limits.starvation_frames) {
            return Some(TerminationReason::Starved);
        }
        if reached(self.stationary_frames, self.limits.stationary_frames) {
            return Some(TerminationReason::StationaryStuck);
        }
        if reached(world.agent().score(), self.limits.score_cap) {
            return Some(TerminationReason::ScoreCap);
        }
        if self.frames >= self.limits.max_frames {
            return Some(TerminationReason::TimeCap);
        }
        None
    }

    /// Elapsed frames with the starvation or immobility penalty applied.
    #[must_use]
    pub fn true_lifespan(&self, reason: TerminationReason) -> u32 {
        let penalty = match reason {
            TerminationReason::Starved => self.limits.starvation_frames,
            TerminationReason::StationaryStuck => self.limits.stationary_frames,
            _ => None,
        };
        self.frames.saturating_sub(penalty.unwrap_or(0))
    }
}

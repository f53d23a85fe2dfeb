//! Phase configuration: the strategy bundle for one training phase.
//!
//! A [`PhaseConfig`] names everything an [`EpisodeEvaluator`](crate::EpisodeEvaluator)
//! needs: active world features, sensory encoder, action ordering, fitness formula
//! and termination limits. [`Phase`] provides the built-in presets.

use std::str::FromStr;

use mazechase_engine::WorldFeatures;
use serde::{Deserialize, Serialize};

use crate::{
    action::ActionOrdering, fitness::FitnessConfig, termination::TerminationLimits,
    vision::EncoderConfig,
};

/// Largest accepted occupancy-grid radius.
pub const MAX_GRID_RADIUS: u32 = 15;
/// Largest accepted ray range.
pub const MAX_RAY_RANGE: u32 = 64;

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("limit `{_0}` must be greater than zero")]
    ZeroLimit(#[error(not(source))] &'static str),
    #[display("encoder {_0} must be greater than zero")]
    ZeroRange(#[error(not(source))] &'static str),
    #[display("encoder {name} {value} exceeds the maximum of {max}")]
    RangeTooLarge {
        name: &'static str,
        value: u32,
        max: u32,
    },
    #[display("fitness divisor must be greater than zero")]
    ZeroDivisor,
    #[display("fitness constant `{name}` must be finite, got {value}")]
    NonFiniteConstant { name: &'static str, value: f64 },
    #[display("fruit requires dots to be enabled")]
    FruitWithoutDots,
}

/// Immutable configuration of one evaluation phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PhaseConfig {
    pub name: String,
    pub features: WorldFeatures,
    pub encoder: EncoderConfig,
    #[serde(default)]
    pub action_ordering: ActionOrdering,
    pub fitness: FitnessConfig,
    pub limits: TerminationLimits,
}

impl PhaseConfig {
    /// Length of the vision vector the configured encoder produces.
    #[must_use]
    pub fn input_len(&self) -> usize {
        self.encoder.input_len()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.features.fruit && !self.features.dots {
            return Err(ConfigError::FruitWithoutDots);
        }

        let limits = &self.limits;
        if limits.max_frames == 0 {
            return Err(ConfigError::ZeroLimit("max_frames"));
        }
        for (name, limit) in [
            ("starvation_frames", limits.starvation_frames),
            ("stationary_frames", limits.stationary_frames),
            ("score_cap", limits.score_cap),
        ] {
            if limit == Some(0) {
                return Err(ConfigError::ZeroLimit(name));
            }
        }

        let (name, value, max) = match self.encoder {
            EncoderConfig::OccupancyGrid { radius, .. } => ("radius", radius, MAX_GRID_RADIUS),
            EncoderConfig::RayCast { range, .. } | EncoderConfig::OneHotPresence { range } => {
                ("range", range, MAX_RAY_RANGE)
            }
            EncoderConfig::RelativePosition => ("range", 1, 1),
        };
        if value == 0 {
            return Err(ConfigError::ZeroRange(name));
        }
        if value > max {
            return Err(ConfigError::RangeTooLarge { name, value, max });
        }
        if let EncoderConfig::OccupancyGrid { ahead, .. } = self.encoder
            && ahead > MAX_GRID_RADIUS
        {
            return Err(ConfigError::RangeTooLarge {
                name: "ahead",
                value: ahead,
                max: MAX_GRID_RADIUS,
            });
        }

        match self.fitness {
            FitnessConfig::Ratio { k, floor } => {
                check_finite("k", k)?;
                check_finite("floor", floor)?;
            }
            FitnessConfig::PowerRatio { exponent, floor } => {
                check_finite("exponent", exponent)?;
                check_finite("floor", floor)?;
            }
            FitnessConfig::Product { divisor: 0 } => return Err(ConfigError::ZeroDivisor),
            FitnessConfig::Product { .. } | FitnessConfig::RawScore | FitnessConfig::Lifespan => {}
        }
        Ok(())
    }
}

fn check_finite(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFiniteConstant { name, value })
    }
}

/// Built-in training phases, from the simplest world to the full game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Dots only; learn to navigate and eat.
    OnlyDots,
    /// Ghosts only; learn to survive.
    OnlyGhosts,
    DotsAndGhosts,
    FullGame,
    /// Full game seen through ray casts instead of a grid.
    FullGameRays,
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("unknown phase `{_0}`")]
pub struct UnknownPhaseError(#[error(not(source))] String);

impl Phase {
    pub const ALL: [Self; 5] = [
        Self::OnlyDots,
        Self::OnlyGhosts,
        Self::DotsAndGhosts,
        Self::FullGame,
        Self::FullGameRays,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::OnlyDots => "only_dots",
            Self::OnlyGhosts => "only_ghosts",
            Self::DotsAndGhosts => "dots_and_ghosts",
            Self::FullGame => "full_game",
            Self::FullGameRays => "full_game_rays",
        }
    }

    #[must_use]
    pub fn config(self) -> PhaseConfig {
        const GRID: EncoderConfig = EncoderConfig::OccupancyGrid {
            radius: 5,
            ahead: 0,
        };
        let (features, encoder, action_ordering, fitness, limits) = match self {
            Self::OnlyDots => (
                WorldFeatures {
                    dots: true,
                    power_dots: false,
                    fruit: false,
                    ghosts: false,
                },
                EncoderConfig::OccupancyGrid {
                    radius: 3,
                    ahead: 0,
                },
                ActionOrdering::Perspective,
                FitnessConfig::Ratio {
                    k: 1000.0,
                    floor: 0.0,
                },
                TerminationLimits {
                    max_frames: 6000,
                    starvation_frames: None,
                    stationary_frames: Some(60),
                    score_cap: Some(2400),
                },
            ),
            Self::OnlyGhosts => (
                WorldFeatures {
                    dots: false,
                    power_dots: false,
                    fruit: false,
                    ghosts: true,
                },
                EncoderConfig::RelativePosition,
                ActionOrdering::Compass,
                FitnessConfig::Lifespan,
                TerminationLimits {
                    max_frames: 3600,
                    starvation_frames: None,
                    stationary_frames: Some(60),
                    score_cap: None,
                },
            ),
            Self::DotsAndGhosts => (
                WorldFeatures {
                    dots: true,
                    power_dots: false,
                    fruit: false,
                    ghosts: true,
                },
                GRID,
                ActionOrdering::Perspective,
                FitnessConfig::Ratio {
                    k: 100.0,
                    floor: 0.0,
                },
                TerminationLimits {
                    max_frames: 8000,
                    starvation_frames: Some(600),
                    stationary_frames: Some(60),
                    score_cap: None,
                },
            ),
            Self::FullGame => (
                WorldFeatures::FULL,
                GRID,
                ActionOrdering::Perspective,
                FitnessConfig::Product { divisor: 100 },
                TerminationLimits {
                    max_frames: 10_000,
                    starvation_frames: Some(900),
                    stationary_frames: Some(60),
                    score_cap: None,
                },
            ),
            Self::FullGameRays => (
                WorldFeatures::FULL,
                EncoderConfig::RayCast {
                    range: 10,
                    diagonals: true,
                    distance_weighted: false,
                },
                ActionOrdering::Perspective,
                FitnessConfig::PowerRatio {
                    exponent: 2.0,
                    floor: 0.0,
                },
                TerminationLimits {
                    max_frames: 10_000,
                    starvation_frames: Some(900),
                    stationary_frames: Some(60),
                    score_cap: None,
                },
            ),
        };
        PhaseConfig {
            name: self.name().to_owned(),
            features,
            encoder,
            action_ordering,
            fitness,
            limits,
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Phase {
    type Err = UnknownPhaseError;

    /// Accepts snake case or kebab case names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|phase| phase.name() == normalized)
            .ok_or_else(|| UnknownPhaseError(s.to_owned()))
    }
}

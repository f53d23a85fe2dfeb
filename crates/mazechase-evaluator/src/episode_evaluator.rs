//! Episode evaluation: one controller, one seeded world, one fitness value.
//!
//! Each frame runs the same fixed sequence:
//!
//! 1. Encode the world into a vision vector and ask the controller for activations
//! 2. Decode the activations into a direction and move the agent
//! 3. Move the ghosts and resolve collisions
//! 4. Eat whatever the agent just reached, then update the fruit
//! 5. Fire checkpoints for the current remaining-dot count
//! 6. Update the termination counters and check for the end of the episode
//!
//! Given the same configuration, controller and seed, an episode always plays out
//! identically.
//!
//! # Usage
//!
//! ```rust,no_run
//! use mazechase_engine::WorldSeed;
//! use mazechase_evaluator::{
//!     controller::NeuralController, episode_evaluator::EpisodeEvaluator, phase::Phase,
//! };
//!
//! let evaluator = EpisodeEvaluator::new(Phase::FullGame.config())?;
//! let sizes = [evaluator.input_len(), 16, 4];
//! let weights = vec![0.0; NeuralController::weight_count(&sizes)];
//! let controller = NeuralController::new("zeros", sizes.to_vec(), weights)?;
//! let outcome = evaluator.evaluate(&controller, WorldSeed::from_u128(42))?;
//! println!("{} points, fitness {}", outcome.score, outcome.fitness);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::sync::Arc;

use mazechase_engine::{CheckpointEvent, Direction, Maze, World, WorldSeed};
use serde::{Deserialize, Serialize};

use crate::{
    action::{ACTION_COUNT, ActionDecoder},
    controller::{Controller, ControllerError},
    fitness::BoxedFitnessFunction,
    phase::{ConfigError, PhaseConfig},
    termination::{TerminationPolicy, TerminationReason},
    vision::BoxedSensoryEncoder,
};

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum EvaluationError {
    #[display("controller `{controller}` failed at frame {frame}")]
    Controller {
        controller: String,
        frame: u32,
        source: ControllerError,
    },
    #[display(
        "controller `{controller}` returned {actual} activations at frame {frame}, expected {expected}"
    )]
    OutputLength {
        controller: String,
        frame: u32,
        expected: usize,
        actual: usize,
    },
}

/// Result of one evaluated episode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeOutcome {
    pub score: u32,
    pub fitness: f64,
    pub reason: TerminationReason,
    /// Frames actually simulated.
    pub raw_frames: u32,
    /// Frames with the starvation or immobility penalty removed.
    pub true_lifespan: u32,
    pub dots_eaten: u32,
    pub ghosts_eaten: u32,
    pub fruit_eaten: u32,
}

/// Read-only view of one simulated frame.
#[derive(Debug)]
pub struct FrameRecord<'a> {
    /// Zero-based frame index.
    pub frame: u32,
    /// World state after the frame was simulated.
    pub world: &'a World,
    pub vision: &'a [f32],
    pub activations: &'a [f32],
    pub direction: Direction,
    pub score_delta: u32,
    pub checkpoints: &'a [CheckpointEvent],
}

/// Receives every simulated frame. Observers cannot affect the episode.
pub trait FrameObserver {
    fn record(&mut self, record: &FrameRecord<'_>);
}

/// Observer that ignores every frame.
impl FrameObserver for () {
    fn record(&mut self, _record: &FrameRecord<'_>) {}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceStep {
    pub vision: Vec<f32>,
    pub direction: Direction,
    pub score_delta: u32,
}

/// Ordered per-frame history of an episode, for replay and debugging.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeTrace {
    pub steps: Vec<TraceStep>,
}

impl EpisodeTrace {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl FrameObserver for EpisodeTrace {
    fn record(&mut self, record: &FrameRecord<'_>) {
        self.steps.push(TraceStep {
            vision: record.vision.to_vec(),
            direction: record.direction,
            score_delta: record.score_delta,
        });
    }
}

/// Plays episodes under one phase configuration.
///
/// The encoder, decoder and fitness strategies are resolved once at construction.
/// The evaluator holds no per-episode state and can be shared across threads.
#[derive(Debug, Clone)]
pub struct EpisodeEvaluator {
    config: PhaseConfig,
    maze: Arc<Maze>,
    encoder: BoxedSensoryEncoder,
    decoder: ActionDecoder,
    fitness: BoxedFitnessFunction,
}

impl EpisodeEvaluator {
    /// Creates an evaluator playing on the classic maze.
    pub fn new(config: PhaseConfig) -> Result<Self, ConfigError> {
        Self::with_maze(config, Maze::classic())
    }

    pub fn with_maze(config: PhaseConfig, maze: Arc<Maze>) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            encoder: config.encoder.build(),
            decoder: ActionDecoder::new(config.action_ordering),
            fitness: config.fitness.build(),
            config,
            maze,
        })
    }

    #[must_use]
    pub fn config(&self) -> &PhaseConfig {
        &self.config
    }

    #[must_use]
    pub fn maze(&self) -> &Arc<Maze> {
        &self.maze
    }

    /// Length of the vision vector handed to controllers.
    #[must_use]
    pub fn input_len(&self) -> usize {
        self.encoder.input_len()
    }

    /// Length of the activation vector controllers must return.
    #[must_use]
    pub const fn output_len(&self) -> usize {
        ACTION_COUNT
    }

    /// Builds the initial world for `seed`.
    #[must_use]
    pub fn new_world(&self, seed: WorldSeed) -> World {
        World::new(Arc::clone(&self.maze), self.config.features, seed)
    }

    pub fn evaluate(
        &self,
        controller: &dyn Controller,
        seed: WorldSeed,
    ) -> Result<EpisodeOutcome, EvaluationError> {
        self.evaluate_with_observer(controller, seed, &mut ())
    }

    pub fn evaluate_with_observer(
        &self,
        controller: &dyn Controller,
        seed: WorldSeed,
        observer: &mut dyn FrameObserver,
    ) -> Result<EpisodeOutcome, EvaluationError> {
        self.evaluate_world(controller, self.new_world(seed), observer)
    }

    /// Plays an episode from an already prepared world.
    ///
    /// Useful for scenarios that place the agent or ghosts before the first frame.
    pub fn evaluate_world(
        &self,
        controller: &dyn Controller,
        mut world: World,
        observer: &mut dyn FrameObserver,
    ) -> Result<EpisodeOutcome, EvaluationError> {
        let mut policy = TerminationPolicy::new(self.config.limits, &world);
        let mut vision = Vec::with_capacity(self.encoder.input_len());

        let reason = loop {
            let frame = policy.frames();
            let score_before = world.agent().score();

            self.encoder.encode(&world, &mut vision);
            let activations = controller.decide(&vision).map_err(|source| {
                EvaluationError::Controller {
                    controller: controller.id().to_owned(),
                    frame,
                    source,
                }
            })?;
            if activations.len() != ACTION_COUNT {
                return Err(EvaluationError::OutputLength {
                    controller: controller.id().to_owned(),
                    frame,
                    expected: ACTION_COUNT,
                    actual: activations.len(),
                });
            }
            let direction = self.decoder.decode(&activations, world.agent().heading());

            world.move_agent(direction);
            world.move_ghosts();
            world.resolve_collisions();
            world.consume();
            world.update_fruit();
            let checkpoints = world.apply_checkpoints();
            for event in &checkpoints {
                tracing::trace!(frame, %event, "checkpoint fired");
            }

            policy.observe(&world);
            observer.record(&FrameRecord {
                frame,
                world: &world,
                vision: &vision,
                activations: &activations,
                direction,
                score_delta: world.agent().score() - score_before,
                checkpoints: &checkpoints,
            });

            if let Some(reason) = policy.check(&world) {
                break reason;
            }
        };

        let score = world.agent().score();
        let true_lifespan = policy.true_lifespan(reason);
        let fitness = self.fitness.fitness(score, true_lifespan);
        let stats = world.stats();
        tracing::debug!(
            controller = controller.id(),
            %reason,
            score,
            frames = policy.frames(),
            true_lifespan,
            fitness,
            "episode finished"
        );

        Ok(EpisodeOutcome {
            score,
            fitness,
            reason,
            raw_frames: policy.frames(),
            true_lifespan,
            dots_eaten: stats.dots_eaten(),
            ghosts_eaten: stats.ghosts_eaten(),
            fruit_eaten: stats.fruit_eaten(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use mazechase_engine::WorldFeatures;

    use super::*;
    use crate::{
        action::ActionOrdering,
        controller::NeuralController,
        fitness::FitnessConfig,
        phase::Phase,
        termination::TerminationLimits,
        vision::{EncoderConfig, OneHotPresence},
    };

    const NO_FEATURES: WorldFeatures = WorldFeatures {
        dots: false,
        power_dots: false,
        fruit: false,
        ghosts: false,
    };

    #[derive(Debug)]
    struct Constant(Vec<f32>);

    impl Controller for Constant {
        fn id(&self) -> &'static str {
            "constant"
        }

        fn decide(&self, _vision: &[f32]) -> Result<Vec<f32>, ControllerError> {
            Ok(self.0.clone())
        }
    }

    /// Heads for visible dots, otherwise keeps moving without turning back.
    #[derive(Debug)]
    struct DotSeeker;

    impl Controller for DotSeeker {
        fn id(&self) -> &'static str {
            "dot-seeker"
        }

        fn decide(&self, vision: &[f32]) -> Result<Vec<f32>, ControllerError> {
            assert_eq!(vision.len(), OneHotPresence::LEN);
            Ok((0..4)
                .map(|i| {
                    let can_move = vision[i];
                    let dot = vision[4 + i];
                    let back = if i == 2 { 0.5 } else { 0.0 };
                    can_move * (1.0 + 2.0 * dot) - back
                })
                .collect())
        }
    }

    #[derive(Debug)]
    struct Failing;

    impl Controller for Failing {
        fn id(&self) -> &'static str {
            "failing"
        }

        fn decide(&self, vision: &[f32]) -> Result<Vec<f32>, ControllerError> {
            Err(ControllerError::InputLength {
                expected: 1,
                actual: vision.len(),
            })
        }
    }

    fn config(
        features: WorldFeatures,
        encoder: EncoderConfig,
        limits: TerminationLimits,
    ) -> PhaseConfig {
        PhaseConfig {
            name: "test".to_owned(),
            features,
            encoder,
            action_ordering: ActionOrdering::Perspective,
            fitness: FitnessConfig::Ratio {
                k: 1000.0,
                floor: -1.0,
            },
            limits,
        }
    }

    fn network(input_len: usize) -> NeuralController {
        let sizes = vec![input_len, 6, ACTION_COUNT];
        #[expect(clippy::cast_precision_loss)]
        let weights = (0..NeuralController::weight_count(&sizes))
            .map(|i| ((i * 37 % 17) as f32 - 8.0) / 8.0)
            .collect();
        NeuralController::new("fixed", sizes, weights).unwrap()
    }

    #[test]
    fn test_deterministic_for_seed() {
        let mut config = Phase::FullGameRays.config();
        config.limits.max_frames = 600;
        let evaluator = EpisodeEvaluator::new(config).unwrap();
        let controller = network(evaluator.input_len());
        let seed = WorldSeed::from_u128(0x1234_5678);

        let mut first_trace = EpisodeTrace::new();
        let first = evaluator
            .evaluate_with_observer(&controller, seed, &mut first_trace)
            .unwrap();
        let mut second_trace = EpisodeTrace::new();
        let second = evaluator
            .evaluate_with_observer(&controller, seed, &mut second_trace)
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(first_trace, second_trace);
        assert_eq!(first_trace.len(), first.raw_frames as usize);
        assert_eq!(
            first_trace.steps.iter().map(|s| s.score_delta).sum::<u32>(),
            first.score
        );
    }

    #[test]
    fn test_starved_without_score() {
        let limits = TerminationLimits {
            max_frames: 5000,
            starvation_frames: Some(200),
            stationary_frames: None,
            score_cap: None,
        };
        let evaluator =
            EpisodeEvaluator::new(config(NO_FEATURES, EncoderConfig::RelativePosition, limits))
                .unwrap();
        let outcome = evaluator
            .evaluate(&Constant(vec![1.0, 0.0, 0.0, 0.5]), WorldSeed::default())
            .unwrap();

        assert_eq!(outcome.reason, TerminationReason::Starved);
        assert_eq!(outcome.raw_frames, 200);
        assert_eq!(outcome.true_lifespan, 0);
        assert_eq!(outcome.score, 0);
        assert!((outcome.fitness - -1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_stationary_lifespan_correction() {
        let maze = Maze::parse("#######\n#P   F#\n### ###\n###E###\n#######").unwrap();
        let limits = TerminationLimits {
            max_frames: 1000,
            starvation_frames: None,
            stationary_frames: Some(50),
            score_cap: None,
        };
        let mut config = config(NO_FEATURES, EncoderConfig::RelativePosition, limits);
        config.action_ordering = ActionOrdering::Compass;
        config.fitness = FitnessConfig::Lifespan;
        let evaluator = EpisodeEvaluator::with_maze(config, Arc::new(maze)).unwrap();

        // always right: walk to the east wall, then stand still
        let outcome = evaluator
            .evaluate(&Constant(vec![0.0, 1.0, 0.0, 0.0]), WorldSeed::default())
            .unwrap();
        assert_eq!(outcome.reason, TerminationReason::StationaryStuck);
        assert!(outcome.raw_frames > 50);
        assert_eq!(outcome.true_lifespan, outcome.raw_frames - 50);
        assert!((outcome.fitness - f64::from(outcome.true_lifespan)).abs() < f64::EPSILON);

        // always left: blocked from the first frame
        let outcome = evaluator
            .evaluate(&Constant(vec![0.0, 0.0, 0.0, 1.0]), WorldSeed::default())
            .unwrap();
        assert_eq!(outcome.reason, TerminationReason::StationaryStuck);
        assert_eq!(outcome.raw_frames, 50);
        assert_eq!(outcome.true_lifespan, 0);
    }

    fn corridor_evaluator(
        layout: &str,
        features: WorldFeatures,
        limits: TerminationLimits,
    ) -> EpisodeEvaluator {
        let mut config = config(features, EncoderConfig::RelativePosition, limits);
        config.action_ordering = ActionOrdering::Compass;
        let maze = Maze::parse(layout).unwrap();
        EpisodeEvaluator::with_maze(config, Arc::new(maze)).unwrap()
    }

    const ALWAYS_RIGHT: [f32; 4] = [0.0, 1.0, 0.0, 0.0];

    #[test]
    fn test_caught_by_ghost() {
        let layout = "#########\n#PE  F..#\n#########";
        let features = WorldFeatures {
            dots: true,
            power_dots: false,
            fruit: false,
            ghosts: true,
        };
        let limits = TerminationLimits {
            max_frames: 500,
            starvation_frames: None,
            stationary_frames: None,
            score_cap: None,
        };
        let evaluator = corridor_evaluator(layout, features, limits);
        let outcome = evaluator
            .evaluate(&Constant(ALWAYS_RIGHT.to_vec()), WorldSeed::default())
            .unwrap();
        assert_eq!(outcome.reason, TerminationReason::Caught);
        assert_eq!(outcome.score, 0);
        assert_eq!(outcome.true_lifespan, outcome.raw_frames);

        // caught on the same frame starvation is reached: caught wins, no correction
        let starving = TerminationLimits {
            starvation_frames: Some(outcome.raw_frames),
            ..limits
        };
        let evaluator = corridor_evaluator(layout, features, starving);
        let again = evaluator
            .evaluate(&Constant(ALWAYS_RIGHT.to_vec()), WorldSeed::default())
            .unwrap();
        assert_eq!(again.reason, TerminationReason::Caught);
        assert_eq!(again.raw_frames, outcome.raw_frames);
        assert_eq!(again.true_lifespan, outcome.raw_frames);
    }

    #[test]
    fn test_score_cap() {
        let layout = "#########\n#P....F #\n####E####\n#########";
        let features = WorldFeatures {
            dots: true,
            power_dots: false,
            fruit: false,
            ghosts: false,
        };
        let limits = TerminationLimits {
            max_frames: 500,
            starvation_frames: None,
            stationary_frames: None,
            score_cap: Some(30),
        };
        let evaluator = corridor_evaluator(layout, features, limits);
        let outcome = evaluator
            .evaluate(&Constant(ALWAYS_RIGHT.to_vec()), WorldSeed::default())
            .unwrap();
        assert_eq!(outcome.reason, TerminationReason::ScoreCap);
        assert_eq!(outcome.score, 30);
        assert_eq!(outcome.dots_eaten, 3);
        assert_eq!(outcome.true_lifespan, outcome.raw_frames);
    }

    #[derive(Debug, Default)]
    struct DotWatcher {
        remaining: Vec<u32>,
        events: Vec<CheckpointEvent>,
        fired_counts: Vec<usize>,
    }

    impl FrameObserver for DotWatcher {
        fn record(&mut self, record: &FrameRecord<'_>) {
            self.remaining.push(record.world.consumables().remaining());
            self.events.extend_from_slice(record.checkpoints);
            self.fired_counts.push(record.world.checkpoints().fired_count());
        }
    }

    #[test]
    fn test_dots_only_decrease_and_checkpoints_fire_once() {
        let features = WorldFeatures {
            dots: true,
            power_dots: true,
            fruit: true,
            ghosts: true,
        };
        let limits = TerminationLimits {
            max_frames: 3000,
            starvation_frames: None,
            stationary_frames: Some(100),
            score_cap: None,
        };
        let evaluator = EpisodeEvaluator::new(config(
            features,
            EncoderConfig::OneHotPresence { range: 10 },
            limits,
        ))
        .unwrap();
        let initial = evaluator
            .new_world(WorldSeed::default())
            .consumables()
            .remaining();

        let mut watcher = DotWatcher::default();
        let outcome = evaluator
            .evaluate_with_observer(&DotSeeker, WorldSeed::from_u128(7), &mut watcher)
            .unwrap();

        assert!(outcome.dots_eaten > 0);
        assert!(watcher.remaining.windows(2).all(|w| w[1] <= w[0]));
        assert_eq!(
            watcher.remaining.last().copied(),
            Some(initial - outcome.dots_eaten)
        );

        let unique = watcher
            .events
            .iter()
            .map(ToString::to_string)
            .collect::<HashSet<_>>();
        assert_eq!(unique.len(), watcher.events.len());
        assert_eq!(watcher.fired_counts.last().copied(), Some(watcher.events.len()));
        assert!(watcher.fired_counts.windows(2).all(|w| w[1] >= w[0]));
    }

    #[test]
    fn test_controller_failures() {
        let evaluator = EpisodeEvaluator::new(Phase::OnlyGhosts.config()).unwrap();

        let err = evaluator
            .evaluate(&Constant(vec![1.0, 0.0]), WorldSeed::default())
            .unwrap_err();
        assert!(matches!(
            err,
            EvaluationError::OutputLength {
                frame: 0,
                expected: 4,
                actual: 2,
                ..
            }
        ));

        let err = evaluator.evaluate(&Failing, WorldSeed::default()).unwrap_err();
        assert_eq!(err.to_string(), "controller `failing` failed at frame 0");
        assert!(matches!(
            err,
            EvaluationError::Controller {
                source: ControllerError::InputLength { expected: 1, .. },
                ..
            }
        ));

        // a network built for another encoder rejects the vision vector
        let err = evaluator.evaluate(&network(3), WorldSeed::default()).unwrap_err();
        assert!(matches!(
            err,
            EvaluationError::Controller {
                source: ControllerError::InputLength {
                    expected: 3,
                    actual: 14
                },
                ..
            }
        ));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = Phase::OnlyDots.config();
        config.limits.max_frames = 0;
        assert!(EpisodeEvaluator::new(config).is_err());
    }

    #[test]
    fn test_outcome_json() {
        let outcome = EpisodeOutcome {
            score: 240,
            fitness: 240.0,
            reason: TerminationReason::TimeCap,
            raw_frames: 100,
            true_lifespan: 100,
            dots_eaten: 24,
            ghosts_eaten: 0,
            fruit_eaten: 0,
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["reason"], "time_cap");
        assert_eq!(json["score"], 240);
    }
}

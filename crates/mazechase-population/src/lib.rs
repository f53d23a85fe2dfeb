//! Evaluation harness for populations of candidate controllers.
//!
//! This crate sits on the boundary with an evolutionary search: it creates
//! randomly initialized feed-forward controllers, evaluates a whole batch in
//! parallel with an [`EpisodeEvaluator`](mazechase_evaluator::EpisodeEvaluator),
//! and summarizes the results in a [`ProgressReport`](report::ProgressReport).
//!
//! Selection, crossover and mutation are left to the search itself.
//!
//! # Example
//!
//! ```rust,no_run
//! use mazechase_engine::WorldSeed;
//! use mazechase_evaluator::{EpisodeEvaluator, phase::Phase};
//! use mazechase_population::{batch::Batch, report::ProgressReport};
//!
//! let evaluator = EpisodeEvaluator::new(Phase::OnlyDots.config())?;
//! let mut rng = rand::rng();
//! let mut batch = Batch::random(32, &[evaluator.input_len(), 16, 4], 1.0, &mut rng)?;
//! batch.evaluate(&evaluator, WorldSeed::from_u128(7))?;
//! if let Some(report) = ProgressReport::new("only_dots", 0, &batch) {
//!     eprintln!("{}", report.summary());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod batch;
pub mod report;
pub mod weights;

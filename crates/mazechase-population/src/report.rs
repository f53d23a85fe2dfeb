//! Progress summary of an evaluated batch.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use mazechase_evaluator::{EpisodeOutcome, controller::Controller};
use mazechase_stats::descriptive::DescriptiveStats;
use serde::{Deserialize, Serialize};

use crate::batch::Batch;

/// Bests and averages of the attributes tracked for every candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressReport {
    pub created_at: DateTime<Utc>,
    pub phase: String,
    pub generation: u32,
    pub candidates: usize,
    pub best_candidate: String,
    pub best_outcome: EpisodeOutcome,
    pub fitness: DescriptiveStats,
    pub score: DescriptiveStats,
    pub raw_frames: DescriptiveStats,
    pub true_lifespan: DescriptiveStats,
    pub dots_eaten: DescriptiveStats,
    pub ghosts_eaten: DescriptiveStats,
    pub fruit_eaten: DescriptiveStats,
    /// Number of episodes ending for each termination reason.
    pub reasons: BTreeMap<String, usize>,
}

impl ProgressReport {
    /// Summarizes the evaluated candidates of `batch`.
    ///
    /// Returns `None` if no candidate has been evaluated.
    #[must_use]
    pub fn new(phase: impl Into<String>, generation: u32, batch: &Batch) -> Option<Self> {
        let best = batch.best()?;
        let best_outcome = best.outcome()?.clone();
        let outcomes = batch
            .candidates()
            .iter()
            .filter_map(|c| c.outcome())
            .collect::<Vec<_>>();
        let counts = |f: fn(&EpisodeOutcome) -> u32| {
            DescriptiveStats::from_counts(outcomes.iter().map(|o| f(o)))
        };

        let mut reasons = BTreeMap::new();
        for outcome in &outcomes {
            *reasons.entry(outcome.reason.to_string()).or_default() += 1;
        }

        Some(Self {
            created_at: Utc::now(),
            phase: phase.into(),
            generation,
            candidates: outcomes.len(),
            best_candidate: best.controller().id().to_owned(),
            best_outcome,
            fitness: DescriptiveStats::new(outcomes.iter().map(|o| o.fitness))?,
            score: counts(|o| o.score)?,
            raw_frames: counts(|o| o.raw_frames)?,
            true_lifespan: counts(|o| o.true_lifespan)?,
            dots_eaten: counts(|o| o.dots_eaten)?,
            ghosts_eaten: counts(|o| o.ghosts_eaten)?,
            fruit_eaten: counts(|o| o.fruit_eaten)?,
            reasons,
        })
    }

    /// One-line human readable summary.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Gen #{}: best {} fitness={:.3} score={} | avg fitness={:.3} score={:.1} lifespan={:.1}",
            self.generation,
            self.best_candidate,
            self.best_outcome.fitness,
            self.best_outcome.score,
            self.fitness.mean,
            self.score.mean,
            self.true_lifespan.mean,
        )
    }
}

#[cfg(test)]
mod tests {
    use mazechase_engine::WorldSeed;
    use mazechase_evaluator::{EpisodeEvaluator, phase::Phase};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    use super::*;

    #[test]
    fn test_report() {
        let mut config = Phase::OnlyDots.config();
        config.limits.max_frames = 200;
        let evaluator = EpisodeEvaluator::new(config).unwrap();
        let mut rng = Pcg32::seed_from_u64(11);
        let mut batch = Batch::random(4, &[evaluator.input_len(), 4], 1.0, &mut rng).unwrap();
        assert!(ProgressReport::new("only_dots", 0, &batch).is_none());

        batch.evaluate(&evaluator, WorldSeed::from_u128(1)).unwrap();
        let report = ProgressReport::new("only_dots", 3, &batch).unwrap();

        assert_eq!(report.candidates, 4);
        assert_eq!(report.reasons.values().sum::<usize>(), 4);
        assert!((report.fitness.max - report.best_outcome.fitness).abs() < 1e-9);
        assert!(report.score.max >= report.score.mean);
        assert!(report.summary().starts_with("Gen #3: best candidate-"));

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["phase"], "only_dots");
        assert!(json["created_at"].is_string());
    }
}

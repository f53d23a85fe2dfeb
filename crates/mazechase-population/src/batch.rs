//! Parallel evaluation of candidate controllers.
//!
//! Every candidate plays the same seeded episode on its own scoped thread; the
//! evaluator is shared by reference and each thread builds its own world. After
//! evaluation, candidates are sorted by fitness, best first.

use std::{panic, thread};

use mazechase_engine::WorldSeed;
use mazechase_evaluator::{
    EpisodeEvaluator, EpisodeOutcome, EvaluationError,
    controller::{Controller, NetworkShapeError, NeuralController},
};
use rand::Rng;
use rand_distr::NormalError;

use crate::weights;

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum CandidateError {
    #[display("invalid weight distribution")]
    Distribution(NormalError),
    #[display("invalid network shape")]
    Shape(NetworkShapeError),
}

/// A controller together with its latest evaluation result.
#[derive(Debug, Clone)]
pub struct Candidate {
    controller: NeuralController,
    outcome: Option<EpisodeOutcome>,
}

impl Candidate {
    #[must_use]
    pub fn new(controller: NeuralController) -> Self {
        Self {
            controller,
            outcome: None,
        }
    }

    /// Creates a network of the given shape with weights drawn from `N(0, sigma)`.
    pub fn random<R>(
        id: impl Into<String>,
        layer_sizes: Vec<usize>,
        sigma: f32,
        rng: &mut R,
    ) -> Result<Self, CandidateError>
    where
        R: Rng + ?Sized,
    {
        let len = NeuralController::weight_count(&layer_sizes);
        let weights = weights::random_normal(rng, sigma, len)?;
        Ok(Self::new(NeuralController::new(id, layer_sizes, weights)?))
    }

    #[must_use]
    pub fn controller(&self) -> &NeuralController {
        &self.controller
    }

    /// Outcome of the last evaluation, if any.
    #[must_use]
    pub fn outcome(&self) -> Option<&EpisodeOutcome> {
        self.outcome.as_ref()
    }

    /// Fitness of the last evaluation, or negative infinity if not evaluated.
    #[must_use]
    pub fn fitness(&self) -> f64 {
        self.outcome
            .as_ref()
            .map_or(f64::NEG_INFINITY, |outcome| outcome.fitness)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Batch {
    candidates: Vec<Candidate>,
}

impl Batch {
    #[must_use]
    pub fn new(candidates: Vec<Candidate>) -> Self {
        Self { candidates }
    }

    /// Creates `count` random candidates named `candidate-0`, `candidate-1`, ...
    pub fn random<R>(
        count: usize,
        layer_sizes: &[usize],
        sigma: f32,
        rng: &mut R,
    ) -> Result<Self, CandidateError>
    where
        R: Rng + ?Sized,
    {
        let candidates = (0..count)
            .map(|i| Candidate::random(format!("candidate-{i}"), layer_sizes.to_vec(), sigma, rng))
            .collect::<Result<_, _>>()?;
        Ok(Self { candidates })
    }

    #[must_use]
    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Best candidate of the last evaluation.
    #[must_use]
    pub fn best(&self) -> Option<&Candidate> {
        self.candidates.first().filter(|c| c.outcome.is_some())
    }

    /// Evaluates every candidate in parallel on the episode seeded with `seed`.
    ///
    /// On error no outcome is updated and the first failing candidate's error is
    /// returned.
    pub fn evaluate(
        &mut self,
        evaluator: &EpisodeEvaluator,
        seed: WorldSeed,
    ) -> Result<(), EvaluationError> {
        let results = thread::scope(|s| {
            let handles = self
                .candidates
                .iter()
                .map(|candidate| s.spawn(move || evaluator.evaluate(&candidate.controller, seed)))
                .collect::<Vec<_>>();
            handles
                .into_iter()
                .map(|handle| handle.join().unwrap_or_else(|err| panic::resume_unwind(err)))
                .collect::<Result<Vec<_>, _>>()
        })?;

        for (candidate, outcome) in self.candidates.iter_mut().zip(results) {
            tracing::debug!(
                candidate = candidate.controller.id(),
                fitness = outcome.fitness,
                score = outcome.score,
                reason = %outcome.reason,
                "candidate evaluated"
            );
            candidate.outcome = Some(outcome);
        }

        // sort by fitness descending
        self.candidates.sort_by(|a, b| b.fitness().total_cmp(&a.fitness()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use mazechase_evaluator::phase::Phase;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    use super::*;

    fn evaluator() -> EpisodeEvaluator {
        let mut config = Phase::OnlyGhosts.config();
        config.limits.max_frames = 300;
        EpisodeEvaluator::new(config).unwrap()
    }

    #[test]
    fn test_random_batch() {
        let mut rng = Pcg32::seed_from_u64(1);
        let batch = Batch::random(3, &[14, 5, 4], 1.0, &mut rng).unwrap();
        assert_eq!(batch.len(), 3);
        assert_eq!(batch.candidates()[2].controller().id(), "candidate-2");
        assert_eq!(
            batch.candidates()[0].controller().weights().len(),
            NeuralController::weight_count(&[14, 5, 4])
        );
        assert!(batch.best().is_none());

        assert!(matches!(
            Batch::random(1, &[14], 1.0, &mut rng),
            Err(CandidateError::Shape(_))
        ));
    }

    #[test]
    fn test_evaluate_sorts_and_matches_sequential() {
        let evaluator = evaluator();
        let seed = WorldSeed::from_u128(99);
        let mut rng = Pcg32::seed_from_u64(5);
        let mut batch = Batch::random(6, &[evaluator.input_len(), 6, 4], 1.0, &mut rng).unwrap();
        batch.evaluate(&evaluator, seed).unwrap();

        assert!(
            batch
                .candidates()
                .is_sorted_by(|a, b| a.fitness() >= b.fitness())
        );
        for candidate in batch.candidates() {
            let sequential = evaluator.evaluate(candidate.controller(), seed).unwrap();
            assert_eq!(candidate.outcome(), Some(&sequential));
        }
        assert!(batch.best().is_some());
    }

    #[test]
    fn test_evaluate_propagates_errors() {
        let evaluator = evaluator();
        let mut rng = Pcg32::seed_from_u64(5);
        // wrong input size for the encoder
        let mut batch = Batch::random(2, &[3, 4], 1.0, &mut rng).unwrap();
        let err = batch.evaluate(&evaluator, WorldSeed::default()).unwrap_err();
        assert!(matches!(err, EvaluationError::Controller { frame: 0, .. }));
        assert!(batch.candidates().iter().all(|c| c.outcome().is_none()));
    }
}

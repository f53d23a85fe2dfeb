use std::path::PathBuf;

use anyhow::Context;
use mazechase_engine::WorldSeed;
use mazechase_evaluator::{EpisodeEvaluator, EpisodeOutcome};
use mazechase_stats::descriptive::DescriptiveStats;
use serde::Serialize;

use crate::util::{Output, PhaseArg, read_model_file};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct EvaluateArg {
    /// Controller model JSON file
    model: PathBuf,
    #[clap(flatten)]
    phase: PhaseArg,
    /// World seed as 32 hex digits (random if omitted)
    #[arg(long)]
    seed: Option<WorldSeed>,
    /// Number of episodes; seeds after the first are random
    #[arg(long, default_value_t = 1)]
    episodes: usize,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct EpisodeReport {
    seed: WorldSeed,
    outcome: EpisodeOutcome,
}

#[derive(Debug, Serialize)]
struct EvaluationReport {
    model: String,
    phase: String,
    episodes: Vec<EpisodeReport>,
    fitness: Option<DescriptiveStats>,
    score: Option<DescriptiveStats>,
}

pub(crate) fn run(arg: &EvaluateArg) -> anyhow::Result<()> {
    let EvaluateArg {
        model,
        phase,
        seed,
        episodes,
        output,
    } = arg;
    let config = phase.load()?;
    let phase_name = config.name.clone();
    let evaluator = EpisodeEvaluator::new(config)?;
    let model = read_model_file(model)?;
    let controller = model.to_controller_for(evaluator.input_len())?;

    let seeds = seed
        .iter()
        .copied()
        .chain(std::iter::repeat_with(rand::random::<WorldSeed>))
        .take(*episodes)
        .collect::<Vec<_>>();

    let mut reports = vec![];
    for (i, seed) in seeds.into_iter().enumerate() {
        let outcome = evaluator
            .evaluate(&controller, seed)
            .with_context(|| format!("Failed to evaluate episode with seed {seed}"))?;
        eprintln!(
            "Episode #{i} ({seed}): {} after {} frames, score={} fitness={:.3}",
            outcome.reason, outcome.raw_frames, outcome.score, outcome.fitness
        );
        reports.push(EpisodeReport { seed, outcome });
    }

    let report = EvaluationReport {
        model: model.name,
        phase: phase_name,
        fitness: DescriptiveStats::new(reports.iter().map(|r| r.outcome.fitness)),
        score: DescriptiveStats::from_counts(reports.iter().map(|r| r.outcome.score)),
        episodes: reports,
    };
    if let Some(fitness) = &report.fitness {
        eprintln!(
            "Fitness over {} episodes: min={:.3} max={:.3} mean={:.3}",
            fitness.count, fitness.min, fitness.max, fitness.mean
        );
    }
    Output::save_json(&report, output.clone())
}

use std::path::PathBuf;

use anyhow::Context;
use mazechase_engine::WorldSeed;
use mazechase_evaluator::{EpisodeEvaluator, action::ACTION_COUNT, controller::Controller as _};
use mazechase_population::{batch::Batch, report::ProgressReport};
use rand::{SeedableRng, rngs::StdRng};

use crate::{
    model::ControllerModel,
    util::{Output, PhaseArg},
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct EvaluatePopulationArg {
    #[clap(flatten)]
    phase: PhaseArg,
    /// Number of random candidates
    #[arg(long, default_value_t = 50)]
    count: usize,
    /// Hidden layer sizes, comma separated
    #[arg(long, value_delimiter = ',', default_value = "16")]
    hidden: Vec<usize>,
    /// Standard deviation of the initial weights
    #[arg(long, default_value_t = 1.0)]
    sigma: f32,
    /// Seed for generating candidate weights
    #[arg(long)]
    weight_seed: Option<u64>,
    /// World seed shared by every candidate (random if omitted)
    #[arg(long)]
    seed: Option<WorldSeed>,
    /// Save the best candidate as a controller model
    #[arg(long)]
    save_best: Option<PathBuf>,
    /// Output file path for the progress report
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &EvaluatePopulationArg) -> anyhow::Result<()> {
    let EvaluatePopulationArg {
        phase,
        count,
        hidden,
        sigma,
        weight_seed,
        seed,
        save_best,
        output,
    } = arg;
    anyhow::ensure!(*count > 0, "Population must contain at least one candidate");

    let config = phase.load()?;
    let phase_name = config.name.clone();
    let evaluator = EpisodeEvaluator::new(config)?;
    let seed = seed.unwrap_or_else(rand::random);

    let mut layer_sizes = vec![evaluator.input_len()];
    layer_sizes.extend(hidden.iter().copied().filter(|size| *size > 0));
    layer_sizes.push(ACTION_COUNT);

    let mut rng = match weight_seed {
        Some(weight_seed) => StdRng::seed_from_u64(*weight_seed),
        None => StdRng::from_os_rng(),
    };
    let mut batch = Batch::random(*count, &layer_sizes, *sigma, &mut rng)
        .context("Failed to create random candidates")?;

    eprintln!(
        "Evaluating {count} candidates {layer_sizes:?} on phase {phase_name} with seed {seed}..."
    );
    batch.evaluate(&evaluator, seed)?;

    eprintln!("  Candidates:");
    for (i, candidate) in batch.candidates().iter().enumerate() {
        if let Some(outcome) = candidate.outcome() {
            eprintln!(
                "  {i:3}: {:<14} {:<16} score={:5} lifespan={:5} => {:.3}",
                candidate.controller().id(),
                outcome.reason.to_string(),
                outcome.score,
                outcome.true_lifespan,
                outcome.fitness,
            );
        }
    }

    let report = ProgressReport::new(phase_name.clone(), 0, &batch)
        .context("No candidate was evaluated")?;
    eprintln!("{}", report.summary());

    if let Some(path) = save_best {
        let best = batch.best().context("No candidate was evaluated")?;
        let model = ControllerModel::from_controller(best.controller(), Some(phase_name));
        Output::save_json(&model, Some(path.clone()))?;
        eprintln!("Best candidate saved to {}", path.display());
    }

    Output::save_json(&report, output.clone())
}

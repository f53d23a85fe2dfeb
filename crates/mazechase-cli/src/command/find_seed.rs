use std::path::PathBuf;

use mazechase_engine::WorldSeed;
use mazechase_evaluator::{EpisodeEvaluator, EpisodeOutcome};
use serde::Serialize;

use crate::util::{Output, PhaseArg, read_model_file};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct FindSeedArg {
    /// Controller model JSON file
    model: PathBuf,
    #[clap(flatten)]
    phase: PhaseArg,
    /// Maximum number of seeds to try
    #[arg(long, default_value_t = 1000)]
    tries: usize,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct SeedResult {
    seed: WorldSeed,
    outcome: EpisodeOutcome,
}

#[derive(Debug, Serialize)]
struct FindSeedReport {
    model: String,
    phase: String,
    tries: usize,
    /// First seed on which the maze was cleared.
    cleared: Option<SeedResult>,
    /// Seed with the most dots eaten.
    best: Option<SeedResult>,
}

pub(crate) fn run(arg: &FindSeedArg) -> anyhow::Result<()> {
    let FindSeedArg {
        model,
        phase,
        tries,
        output,
    } = arg;
    let config = phase.load()?;
    let phase_name = config.name.clone();
    anyhow::ensure!(
        config.features.dots,
        "Phase {phase_name} has no dots, so the maze can never be cleared"
    );
    let evaluator = EpisodeEvaluator::new(config)?;
    let model = read_model_file(model)?;
    let controller = model.to_controller_for(evaluator.input_len())?;

    let mut best: Option<SeedResult> = None;
    let mut cleared = None;
    let mut tried = 0;
    for _ in 0..*tries {
        let seed = rand::random::<WorldSeed>();
        let outcome = evaluator.evaluate(&controller, seed)?;
        tried += 1;
        eprintln!("{seed}: {} dots ({})", outcome.dots_eaten, outcome.reason);

        if outcome.reason.is_cleared() {
            cleared = Some(SeedResult { seed, outcome });
            break;
        }
        if best
            .as_ref()
            .is_none_or(|best| outcome.dots_eaten > best.outcome.dots_eaten)
        {
            best = Some(SeedResult { seed, outcome });
        }
    }

    match &cleared {
        Some(result) => eprintln!("Cleared the maze with seed {} after {tried} tries", result.seed),
        None => eprintln!("No clearing seed found in {tried} tries"),
    }

    let report = FindSeedReport {
        model: model.name,
        phase: phase_name,
        tries: tried,
        cleared,
        best,
    };
    Output::save_json(&report, output.clone())
}

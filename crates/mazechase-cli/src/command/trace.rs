use std::path::PathBuf;

use mazechase_engine::WorldSeed;
use mazechase_evaluator::{
    EpisodeEvaluator, EpisodeOutcome,
    episode_evaluator::{EpisodeTrace, FrameObserver, FrameRecord},
};
use serde::Serialize;

use crate::util::{Output, PhaseArg, read_model_file};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct TraceArg {
    /// Controller model JSON file
    model: PathBuf,
    #[clap(flatten)]
    phase: PhaseArg,
    /// World seed as 32 hex digits (random if omitted)
    #[arg(long)]
    seed: Option<WorldSeed>,
    /// Print scoring frames to stderr while playing
    #[arg(long)]
    verbose: bool,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct TraceReport {
    model: String,
    phase: String,
    seed: WorldSeed,
    outcome: EpisodeOutcome,
    trace: EpisodeTrace,
}

/// Records the trace and optionally echoes scoring frames.
#[derive(Debug, Default)]
struct TraceRecorder {
    trace: EpisodeTrace,
    verbose: bool,
}

impl FrameObserver for TraceRecorder {
    fn record(&mut self, record: &FrameRecord<'_>) {
        self.trace.record(record);
        if self.verbose && (record.score_delta > 0 || !record.checkpoints.is_empty()) {
            let agent = record.world.agent();
            eprintln!(
                "  frame {:5}: {} heading {} +{} (score {}){}",
                record.frame,
                agent.tile(),
                record.direction,
                record.score_delta,
                agent.score(),
                record
                    .checkpoints
                    .iter()
                    .map(|event| format!(" [{event}]"))
                    .collect::<String>(),
            );
        }
    }
}

pub(crate) fn run(arg: &TraceArg) -> anyhow::Result<()> {
    let TraceArg {
        model,
        phase,
        seed,
        verbose,
        output,
    } = arg;
    let config = phase.load()?;
    let phase_name = config.name.clone();
    let evaluator = EpisodeEvaluator::new(config)?;
    let model = read_model_file(model)?;
    let controller = model.to_controller_for(evaluator.input_len())?;
    let seed = seed.unwrap_or_else(rand::random);

    let mut recorder = TraceRecorder {
        trace: EpisodeTrace::new(),
        verbose: *verbose,
    };
    eprintln!("Tracing {} on phase {phase_name} with seed {seed}...", model.name);
    let outcome = evaluator.evaluate_with_observer(&controller, seed, &mut recorder)?;
    eprintln!(
        "{} after {} frames, score={} fitness={:.3}",
        outcome.reason, outcome.raw_frames, outcome.score, outcome.fitness
    );

    let report = TraceReport {
        model: model.name,
        phase: phase_name,
        seed,
        outcome,
        trace: recorder.trace,
    };
    Output::save_json(&report, output.clone())
}

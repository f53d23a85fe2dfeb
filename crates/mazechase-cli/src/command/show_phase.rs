use std::path::PathBuf;

use mazechase_evaluator::phase::{Phase, PhaseConfig};
use serde::Serialize;

use crate::util::{Output, read_json_file};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ShowPhaseArg {
    /// Phase preset to show (all presets if omitted)
    phase: Option<Phase>,
    /// Validate and show a phase configuration JSON file instead
    #[arg(long, conflicts_with = "phase")]
    config: Option<PathBuf>,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct PhaseSummary {
    input_len: usize,
    #[serde(flatten)]
    config: PhaseConfig,
}

impl PhaseSummary {
    fn new(config: PhaseConfig) -> Self {
        Self {
            input_len: config.input_len(),
            config,
        }
    }
}

pub(crate) fn run(arg: &ShowPhaseArg) -> anyhow::Result<()> {
    let ShowPhaseArg {
        phase,
        config,
        output,
    } = arg;
    let configs = match (config, phase) {
        (Some(path), _) => {
            let config: PhaseConfig = read_json_file("phase config", path)?;
            config.validate()?;
            vec![config]
        }
        (None, Some(phase)) => vec![phase.config()],
        (None, None) => Phase::ALL.into_iter().map(Phase::config).collect(),
    };

    for config in &configs {
        eprintln!(
            "{}: {} inputs, {:?} ordering",
            config.name,
            config.input_len(),
            config.action_ordering
        );
    }
    let summaries = configs
        .into_iter()
        .map(PhaseSummary::new)
        .collect::<Vec<_>>();
    Output::save_json(&summaries, output.clone())
}

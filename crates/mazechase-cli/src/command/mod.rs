use clap::{Parser, Subcommand};

use self::{
    evaluate::EvaluateArg, evaluate_population::EvaluatePopulationArg, find_seed::FindSeedArg,
    show_phase::ShowPhaseArg, trace::TraceArg,
};

mod evaluate;
mod evaluate_population;
mod find_seed;
mod show_phase;
mod trace;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Evaluate a saved controller on one or more seeded episodes
    Evaluate(#[clap(flatten)] EvaluateArg),
    /// Evaluate a batch of random controllers in parallel
    EvaluatePopulation(#[clap(flatten)] EvaluatePopulationArg),
    /// Record the per-frame trace of one episode
    Trace(#[clap(flatten)] TraceArg),
    /// Search for a seed on which a controller clears the maze
    FindSeed(#[clap(flatten)] FindSeedArg),
    /// Print phase configurations
    ShowPhase(#[clap(flatten)] ShowPhaseArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Evaluate(arg) => evaluate::run(&arg)?,
        Mode::EvaluatePopulation(arg) => evaluate_population::run(&arg)?,
        Mode::Trace(arg) => trace::run(&arg)?,
        Mode::FindSeed(arg) => find_seed::run(&arg)?,
        Mode::ShowPhase(arg) => show_phase::run(&arg)?,
    }
    Ok(())
}

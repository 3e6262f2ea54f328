use clap::{Parser, Subcommand};

use self::{plan::PlanArg, play::PlayArg, simulate::SimulateArg};

mod common;
mod plan;
mod play;
mod simulate;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Recommend the next activation for a harvest
    Plan(#[clap(flatten)] PlanArg),
    /// Play a harvest interactively, reporting each outcome
    Play(#[clap(flatten)] PlayArg),
    /// Play many harvests against random outcomes
    Simulate(#[clap(flatten)] SimulateArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Plan(arg) => plan::run(&arg)?,
        Mode::Play(arg) => play::run(&arg)?,
        Mode::Simulate(arg) => simulate::run(&arg)?,
    }
    Ok(())
}

use std::path::PathBuf;

use croprot_engine::PlotConfig;
use croprot_planner::{
    config::PlannerConfig,
    simulator::{GameSimulator, SimulationSummary},
};
use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg64Mcg;
use serde::Serialize;

use crate::{
    command::common::{GameArg, SearchArg, Setup},
    util::Output,
};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct SimulateArg {
    #[clap(flatten)]
    game: GameArg,
    #[clap(flatten)]
    search: SearchArg,
    /// Number of games to play
    #[arg(long, default_value_t = 100)]
    games: usize,
    /// Random seed; a fresh one is drawn when omitted
    #[arg(long)]
    seed: Option<u64>,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize)]
struct SimulationReport {
    seed: u64,
    starting_seeds: u32,
    plots: Vec<PlotConfig>,
    planner: PlannerConfig,
    summary: SimulationSummary,
}

pub(crate) fn run(arg: &SimulateArg) -> anyhow::Result<()> {
    let SimulateArg {
        game,
        search,
        games,
        seed,
        output,
    } = arg;

    let setup = Setup::load(game, search)?;
    let initial = setup.initial_state()?;
    let simulator = GameSimulator::new(setup.planner()?);

    let seed = seed.unwrap_or_else(|| rand::rng().random());
    let mut rng = Pcg64Mcg::seed_from_u64(seed);
    eprintln!("Simulating {games} games (seed {seed})...");
    let summary = simulator.run(&initial, *games, &mut rng)?;
    eprintln!(
        "Mean score {:.2} (min {:.2}, max {:.2}), mean T3 {:.2}",
        summary.mean_score, summary.min_score, summary.max_score, summary.mean_t3
    );

    let report = SimulationReport {
        seed,
        starting_seeds: setup.starting_seeds,
        plots: setup.plots,
        planner: setup.planner,
        summary,
    };
    Output::save_json(&report, output.as_deref())
}

use std::path::PathBuf;

use anyhow::Context;
use croprot_engine::{GameState, PlotConfig, parse_plot_list};
use croprot_planner::{config::PlannerConfig, planner::Planner};

use crate::{schema::settings::Settings, util};

/// Where the harvest comes from: plot colors on the command line, a
/// settings file, or both (the command line wins).
#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct GameArg {
    /// Plot colors, e.g. `YR,YB,RB` or `yellow/red,blue/red`
    #[arg(long)]
    plots: Option<String>,
    /// Seeds each field starts with
    #[arg(long)]
    starting_seeds: Option<u32>,
    /// JSON settings file with plots and planner settings
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct SearchArg {
    /// How many activations ahead to plan (1-8)
    #[arg(long)]
    depth: Option<usize>,
    /// Maximum number of sequences evaluated per decision
    #[arg(long)]
    max_branching: Option<usize>,
    /// Score single activations only
    #[arg(long)]
    shallow: bool,
    /// Stop expanding branches less likely than this (0 disables)
    #[arg(long)]
    probability_threshold: Option<f64>,
    /// Evaluate sequences in generation order
    #[arg(long)]
    no_heuristic: bool,
    /// Ignore the latent value of unused fields
    #[arg(long)]
    no_future_potential: bool,
}

impl SearchArg {
    fn apply(&self, config: &mut PlannerConfig) {
        let Self {
            depth,
            max_branching,
            shallow,
            probability_threshold,
            no_heuristic,
            no_future_potential,
        } = self;
        if let Some(depth) = depth {
            config.lookahead_depth = *depth;
        }
        if let Some(max_branching) = max_branching {
            config.max_branching_factor = *max_branching;
        }
        if let Some(threshold) = probability_threshold {
            config.probability_threshold = *threshold;
        }
        config.enable_deep_search &= !shallow;
        config.heuristic_ordering &= !no_heuristic;
        config.future_potential &= !no_future_potential;
    }
}

/// Resolved inputs of a command.
#[derive(Debug, Clone)]
pub(crate) struct Setup {
    pub plots: Vec<PlotConfig>,
    pub starting_seeds: u32,
    pub planner: PlannerConfig,
}

impl Setup {
    pub fn load(game: &GameArg, search: &SearchArg) -> anyhow::Result<Self> {
        let mut settings = match &game.config {
            Some(path) => util::read_json_file::<Settings, _>("settings", path)?,
            None => Settings::default(),
        };
        Self::resolve(game, search, &mut settings)?;
        Ok(Self {
            plots: settings.plots,
            starting_seeds: settings.starting_seeds,
            planner: settings.planner,
        })
    }

    fn resolve(game: &GameArg, search: &SearchArg, settings: &mut Settings) -> anyhow::Result<()> {
        if let Some(plots) = &game.plots {
            settings.plots = parse_plot_list(plots)?;
        }
        if let Some(starting_seeds) = game.starting_seeds {
            settings.starting_seeds = starting_seeds;
        }
        search.apply(&mut settings.planner);
        Ok(())
    }

    pub fn initial_state(&self) -> anyhow::Result<GameState> {
        if self.plots.is_empty() {
            anyhow::bail!("No plots given; use --plots or a --config file");
        }
        GameState::from_config(&self.plots, self.starting_seeds).context("Invalid plot setup")
    }

    pub fn planner(&self) -> anyhow::Result<Planner> {
        Planner::new(self.planner).context("Invalid planner settings")
    }
}

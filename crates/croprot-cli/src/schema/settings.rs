use croprot_engine::{DEFAULT_STARTING_SEEDS, PlotConfig};
use croprot_planner::config::PlannerConfig;
use serde::{Deserialize, Serialize};

/// Contents of a `--config` file. Every key is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub plots: Vec<PlotConfig>,
    pub starting_seeds: u32,
    pub planner: PlannerConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            plots: Vec::new(),
            starting_seeds: DEFAULT_STARTING_SEEDS,
            planner: PlannerConfig::default(),
        }
    }
}

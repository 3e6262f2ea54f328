use std::path::Path;

use anyhow::Context;
use chrono::{DateTime, Utc};
use croprot_engine::{ActivationRecord, GameState, History, PlotConfig};
use serde::{Deserialize, Serialize};

use crate::util::{self, Output};

/// A saved `play` session: enough to rebuild the history and continue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Timestamp when the session was saved (ISO 8601 format)
    pub saved_at: DateTime<Utc>,
    pub starting_seeds: u32,
    pub plots: Vec<PlotConfig>,
    /// Confirmed rounds, oldest first
    pub records: Vec<ActivationRecord>,
}

impl SessionRecord {
    pub fn from_history(plots: &[PlotConfig], history: &History) -> Self {
        Self {
            saved_at: Utc::now(),
            starting_seeds: history.initial().starting_seeds(),
            plots: plots.to_vec(),
            records: history.records().to_vec(),
        }
    }

    pub fn open<P>(path: P) -> anyhow::Result<Self>
    where
        P: AsRef<Path>,
    {
        util::read_json_file("session", path)
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        Output::save_json(self, Some(path))
    }

    /// Replays the saved rounds on a fresh initial state.
    pub fn to_history(&self) -> anyhow::Result<History> {
        let initial = GameState::from_config(&self.plots, self.starting_seeds)
            .context("Invalid plots in session file")?;
        History::from_records(initial, self.records.clone())
            .context("Session file does not replay on its plots")
    }
}

use serde::{Deserialize, Serialize};

use crate::PlannerConfigError;

/// Deepest lookahead the planner accepts.
///
/// The evaluator recurses once per step, and outcome lists double per step.
pub const MAX_LOOKAHEAD_DEPTH: usize = 8;

/// Search settings for one planning round.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// How many activations ahead to plan (1..=[`MAX_LOOKAHEAD_DEPTH`]).
    pub lookahead_depth: usize,
    /// Hard cap on generated and evaluated sequences per decision.
    pub max_branching_factor: usize,
    /// Multi-step search; when off, every legal activation is scored alone.
    pub enable_deep_search: bool,
    /// Chance nodes whose absolute probability falls below this are scored
    /// statically instead of expanded. `0.0` disables pruning.
    pub probability_threshold: f64,
    /// Sort sequences by the static heuristic before evaluation. Only the
    /// evaluation order changes; the set of sequences is fixed by the cap.
    pub heuristic_ordering: bool,
    /// Credit unused fields of open plots with their latent value at the end
    /// of a sequence.
    pub future_potential: bool,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            lookahead_depth: 3,
            max_branching_factor: 500,
            enable_deep_search: true,
            probability_threshold: 0.0,
            heuristic_ordering: true,
            future_potential: true,
        }
    }
}

impl PlannerConfig {
    pub fn validate(&self) -> Result<(), PlannerConfigError> {
        if !(1..=MAX_LOOKAHEAD_DEPTH).contains(&self.lookahead_depth) {
            return Err(PlannerConfigError::LookaheadDepth {
                depth: self.lookahead_depth,
                max: MAX_LOOKAHEAD_DEPTH,
            });
        }
        if self.max_branching_factor == 0 {
            return Err(PlannerConfigError::BranchingFactor);
        }
        if !(0.0..1.0).contains(&self.probability_threshold) {
            return Err(PlannerConfigError::ProbabilityThreshold {
                value: self.probability_threshold,
            });
        }
        Ok(())
    }

    /// Lookahead actually searched: deep search off means single steps.
    #[must_use]
    pub const fn effective_depth(&self) -> usize {
        if self.enable_deep_search {
            self.lookahead_depth
        } else {
            1
        }
    }
}

//! Play-outs of the planner's recommendations against random outcomes.
//!
//! Each step follows the planner's recommendation, rolls success with the
//! game's fixed probability, and upgrades seeds by sampling every migration.
//! The planner itself never sees the randomness.

use croprot_engine::{Activation, GameState, Outcome, SeedTiers};
use rand::Rng;
use serde::Serialize;

use crate::{
    PlanError,
    evaluator::{SUCCESS_PROBABILITY, T3_SCORE, T4_SCORE},
    planner::Planner,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SimulatedStep {
    pub activation: Activation,
    pub outcome: Outcome,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulatedGame {
    pub steps: Vec<SimulatedStep>,
    pub totals: SeedTiers,
    pub score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct SimulationSummary {
    pub games: usize,
    pub mean_score: f64,
    pub min_score: f64,
    pub max_score: f64,
    pub mean_t3: f64,
    pub mean_t4: f64,
    pub mean_activations: f64,
    pub success_rate: f64,
}

impl SimulationSummary {
    #[must_use]
    #[expect(clippy::cast_precision_loss)]
    pub fn from_games(games: &[SimulatedGame]) -> Self {
        if games.is_empty() {
            return Self::default();
        }
        let n = games.len() as f64;
        let steps: usize = games.iter().map(|g| g.steps.len()).sum();
        let successes = games
            .iter()
            .flat_map(|g| &g.steps)
            .filter(|s| s.outcome.is_success())
            .count();
        Self {
            games: games.len(),
            mean_score: games.iter().map(|g| g.score).sum::<f64>() / n,
            min_score: games.iter().map(|g| g.score).fold(f64::INFINITY, f64::min),
            max_score: games
                .iter()
                .map(|g| g.score)
                .fold(f64::NEG_INFINITY, f64::max),
            mean_t3: games.iter().map(|g| f64::from(g.totals.t3)).sum::<f64>() / n,
            mean_t4: games.iter().map(|g| f64::from(g.totals.t4)).sum::<f64>() / n,
            mean_activations: steps as f64 / n,
            success_rate: if steps == 0 {
                0.0
            } else {
                successes as f64 / steps as f64
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct GameSimulator {
    planner: Planner,
}

impl GameSimulator {
    #[must_use]
    pub const fn new(planner: Planner) -> Self {
        Self { planner }
    }

    /// Plays one game from `initial` until no activation is left.
    pub fn play<R>(&self, initial: &GameState, rng: &mut R) -> Result<SimulatedGame, PlanError>
    where
        R: Rng + ?Sized,
    {
        let mut state = initial.clone();
        let mut steps = Vec::new();
        loop {
            let plan = self.planner.plan(&state)?;
            let Some(activation) = plan.next_activation else {
                break;
            };
            let outcome = Outcome::from_success(rng.random_bool(SUCCESS_PROBABILITY));
            state = state.apply_activation_sampled(&activation, outcome, rng)?;
            tracing::trace!(%activation, %outcome, "simulated step");
            steps.push(SimulatedStep {
                activation,
                outcome,
            });
        }

        let totals = state.totals();
        Ok(SimulatedGame {
            steps,
            totals,
            score: f64::from(totals.t3) * T3_SCORE + f64::from(totals.t4) * T4_SCORE,
        })
    }

    pub fn run<R>(
        &self,
        initial: &GameState,
        games: usize,
        rng: &mut R,
    ) -> Result<SimulationSummary, PlanError>
    where
        R: Rng + ?Sized,
    {
        let played = (0..games)
            .map(|game| {
                let result = self.play(initial, rng)?;
                tracing::debug!(game, score = result.score, "game finished");
                Ok(result)
            })
            .collect::<Result<Vec<_>, PlanError>>()?;
        Ok(SimulationSummary::from_games(&played))
    }
}

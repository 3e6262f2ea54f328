//! Expected outcome of an activation sequence: expectimax over chance nodes.
//!
//! There is no opponent. Each step of a sequence is a chance node with two
//! branches, success (60%) and failure (40%), and both branches continue with
//! the rest of the sequence:
//!
//! ```text
//! evaluate([a, rest..], s, m) = evaluate(rest, success(s, a), 0.6·m)
//!                             + evaluate(rest, failure(s, a), 0.4·m)
//!                             − 0.4·m · stranded_field_cost(s, a)
//! evaluate([], s, m)          = m · (10·T3 − 5·T4 + future_potential(s))
//! ```
//!
//! Steps that are no longer legal when reached (their plot closed or field
//! used by an earlier step of the same plan) are skipped.
//!
//! # Memoization
//!
//! Results are cached per `(state, remaining sequence)` with probability mass
//! normalized to 1.0 and rescaled on every hit. An [`Evaluator`] owns its
//! cache, so a fresh evaluator is created for each planning round; cached
//! results are never shared between different root states.

use std::collections::HashMap;

use croprot_engine::{Activation, ActivationError, GameState, Outcome};
use serde::Serialize;

use crate::opportunity_cost::stranded_field_cost;

pub const SUCCESS_PROBABILITY: f64 = 0.6;
pub const FAILURE_PROBABILITY: f64 = 0.4;

pub const T3_SCORE: f64 = 10.0;
pub const T4_SCORE: f64 = -5.0;

const FUTURE_T2_WEIGHT: f64 = 0.15 * T3_SCORE;
const FUTURE_T1_WEIGHT: f64 = 0.25 * FUTURE_T2_WEIGHT;
const FUTURE_ACTIVATION_CHANCE: f64 = 0.5;

/// One leaf of the outcome tree.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OutcomeLeaf {
    pub probability: f64,
    pub total_t3: u32,
    pub total_t4: u32,
}

/// Probability-weighted result of evaluating a sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpectedOutcome {
    pub expected_score: f64,
    pub expected_t3: f64,
    pub expected_t4: f64,
    pub probability: f64,
    pub outcomes: Vec<OutcomeLeaf>,
}

impl ExpectedOutcome {
    #[must_use]
    pub fn scaled(mut self, factor: f64) -> Self {
        self.expected_score *= factor;
        self.expected_t3 *= factor;
        self.expected_t4 *= factor;
        self.probability *= factor;
        for leaf in &mut self.outcomes {
            leaf.probability *= factor;
        }
        self
    }

    /// Sums two branches; `failure_cost` only lowers the score.
    fn combine(success: Self, failure: Self, failure_cost: f64) -> Self {
        let mut outcomes = success.outcomes;
        outcomes.extend(failure.outcomes);
        Self {
            expected_score: success.expected_score + (failure.expected_score - failure_cost),
            expected_t3: success.expected_t3 + failure.expected_t3,
            expected_t4: success.expected_t4 + failure.expected_t4,
            probability: success.probability + failure.probability,
            outcomes,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvaluatorOptions {
    pub future_potential: bool,
    pub probability_threshold: f64,
}

impl Default for EvaluatorOptions {
    fn default() -> Self {
        Self {
            future_potential: true,
            probability_threshold: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    state: GameState,
    suffix: Vec<Activation>,
    // Pruning depends on the absolute mass, so it becomes part of the key
    // whenever a threshold is set.
    mass_bits: Option<u64>,
}

#[derive(Debug, Default)]
pub struct Evaluator {
    options: EvaluatorOptions,
    cache: HashMap<CacheKey, ExpectedOutcome>,
    cache_hits: usize,
    pruned_nodes: usize,
}

impl Evaluator {
    #[must_use]
    pub fn new(options: EvaluatorOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    #[must_use]
    pub const fn cache_hits(&self) -> usize {
        self.cache_hits
    }

    #[must_use]
    pub const fn pruned_nodes(&self) -> usize {
        self.pruned_nodes
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
        self.cache_hits = 0;
        self.pruned_nodes = 0;
    }

    /// Expected outcome of playing `sequence` from `state`, weighted by
    /// `probability`.
    ///
    /// Fails only when a step names a field that does not exist in the
    /// state it is applied to.
    pub fn evaluate(
        &mut self,
        sequence: &[Activation],
        state: &GameState,
        probability: f64,
    ) -> Result<ExpectedOutcome, ActivationError> {
        Ok(self
            .evaluate_normalized(sequence, state, probability)?
            .scaled(probability))
    }

    /// Same as [`evaluate`](Self::evaluate) with probability mass 1.0;
    /// `mass` is the absolute mass of this node, used for pruning only.
    fn evaluate_normalized(
        &mut self,
        sequence: &[Activation],
        state: &GameState,
        mass: f64,
    ) -> Result<ExpectedOutcome, ActivationError> {
        let Some((head, tail)) = sequence.split_first() else {
            return Ok(self.terminal(state));
        };

        let key = CacheKey {
            state: state.clone(),
            suffix: sequence.to_vec(),
            mass_bits: (self.options.probability_threshold > 0.0).then_some(mass.to_bits()),
        };
        if let Some(cached) = self.cache.get(&key) {
            self.cache_hits += 1;
            return Ok(cached.clone());
        }

        let result = if !state.is_available(head)? {
            self.evaluate_normalized(tail, state, mass)?
        } else if mass < self.options.probability_threshold {
            self.pruned_nodes += 1;
            self.terminal(state)
        } else {
            let success_state = state.apply_activation(head, Outcome::Success, None)?;
            let failure_state = state.apply_activation(head, Outcome::Failure, None)?;

            let success = self
                .evaluate_normalized(tail, &success_state, mass * SUCCESS_PROBABILITY)?
                .scaled(SUCCESS_PROBABILITY);
            let failure = self
                .evaluate_normalized(tail, &failure_state, mass * FAILURE_PROBABILITY)?
                .scaled(FAILURE_PROBABILITY);
            let cost = stranded_field_cost(state, &failure_state, head) * FAILURE_PROBABILITY;

            ExpectedOutcome::combine(success, failure, cost)
        };

        self.cache.insert(key, result.clone());
        Ok(result)
    }

    fn terminal(&self, state: &GameState) -> ExpectedOutcome {
        let totals = state.totals();
        let mut score = f64::from(totals.t3) * T3_SCORE + f64::from(totals.t4) * T4_SCORE;
        if self.options.future_potential {
            score += future_potential(state);
        }
        ExpectedOutcome {
            expected_score: score,
            expected_t3: f64::from(totals.t3),
            expected_t4: f64::from(totals.t4),
            probability: 1.0,
            outcomes: vec![OutcomeLeaf {
                probability: 1.0,
                total_t3: totals.t3,
                total_t4: totals.t4,
            }],
        }
    }
}

/// Latent value of unused fields in open plots.
///
/// T2 seeds are worth their T3 chance, T1 seeds are discounted once more for
/// the T1→T2 step, and each field is assumed to be used half of the time.
#[must_use]
pub fn future_potential(state: &GameState) -> f64 {
    state
        .plots()
        .iter()
        .filter(|plot| plot.is_active())
        .flat_map(|plot| plot.unused_fields())
        .map(|field| {
            let seeds = field.seeds();
            FUTURE_ACTIVATION_CHANCE
                * (f64::from(seeds.t2) * FUTURE_T2_WEIGHT + f64::from(seeds.t1) * FUTURE_T1_WEIGHT)
        })
        .sum()
}

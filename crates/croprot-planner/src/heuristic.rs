//! Cheap static ranking of candidate sequences.
//!
//! The score only decides the order in which sequences are evaluated, which
//! matters when the evaluation cap is hit. It never feeds into the expected
//! score of a sequence.

use std::cmp::Ordering;

use croprot_engine::{Activation, GameState, UpgradeProbabilities};

use crate::sequence_generator::Sequence;

const TARGET_T2_WEIGHT: f64 = 2.0;
const TARGET_T3_WEIGHT: f64 = 10.0;
const TARGET_T4_WEIGHT: f64 = -5.0;
const UPGRADE_POTENTIAL_SCALE: f64 = 0.5;
const T3_VALUE: f64 = 10.0;
const LENGTH_BONUS: f64 = 0.5;

/// Static score of `sequence` in `state`; higher is more promising.
#[must_use]
#[expect(clippy::cast_precision_loss)]
pub fn heuristic_score(sequence: &[Activation], state: &GameState) -> f64 {
    let Some(first) = sequence.first() else {
        return 0.0;
    };
    let Some(target) = state.field(first.field_id()) else {
        return f64::NEG_INFINITY;
    };

    let seeds = target.seeds();
    let target_value = f64::from(seeds.t2) * TARGET_T2_WEIGHT
        + f64::from(seeds.t3) * TARGET_T3_WEIGHT
        + f64::from(seeds.t4) * TARGET_T4_WEIGHT;

    // fields the first step would upgrade, valued by the T3 they may yield soon
    let p = UpgradeProbabilities::DEFAULT;
    let upgrade_potential: f64 = state
        .fields()
        .filter(|f| !f.is_used() && f.id() != target.id() && f.color() != target.color())
        .map(|f| {
            let s = f.seeds();
            (f64::from(s.t2) * p.t2_to_t3 + f64::from(s.t1) * p.t1_to_t2 * p.t2_to_t3) * T3_VALUE
        })
        .sum();

    target_value + upgrade_potential * UPGRADE_POTENTIAL_SCALE + sequence.len() as f64 * LENGTH_BONUS
}

/// Sorts sequences by descending heuristic score; equal scores keep their
/// generation order.
pub fn sort_by_heuristic(sequences: &mut [Sequence], state: &GameState) {
    let mut scored: Vec<(f64, Sequence)> = sequences
        .iter_mut()
        .map(|s| (heuristic_score(s, state), std::mem::take(s)))
        .collect();
    scored.sort_by(|(a, _), (b, _)| b.partial_cmp(a).unwrap_or(Ordering::Equal));
    for (slot, (_, sequence)) in sequences.iter_mut().zip(scored) {
        *slot = sequence;
    }
}

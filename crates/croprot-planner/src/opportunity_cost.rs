//! Value lost when a failure strands the sibling field of a plot.
//!
//! A failed activation closes its plot even if the other field was never
//! used. The cost of that stranded field is
//!
//! ```text
//! cost = scarcity × quality × intrinsic
//! ```
//!
//! - `intrinsic`: `T2 × 0.20 × 10 + T3 × 10`, the field's own near-term value
//! - `scarcity`: 2.0 / 1.5 / 1.0 / 0.7 / 0.5 for 0 / 1 / 2 / 3 / 4+ unused
//!   fields of the same color left in other open plots
//! - `quality`: stranded value over the mean of those alternatives, clamped
//!   to \[1.0, 1.5\]; 1.5 when there are no alternatives
//!
//! The evaluator scales the cost by the failure branch probability and
//! subtracts it from the failure score only; seed expectations are untouched.

use croprot_engine::{Activation, Field, GameState, UpgradeProbabilities};

const T3_VALUE: f64 = 10.0;
const MIN_QUALITY_BONUS: f64 = 1.0;
const MAX_QUALITY_BONUS: f64 = 1.5;

/// Unscaled cost of the field stranded by a failed `activation`.
///
/// `before` is the state the activation was applied to and `failure` the
/// resulting failure state. Zero when the plot had no unused sibling, since
/// then success would have closed it too.
#[must_use]
pub fn stranded_field_cost(before: &GameState, failure: &GameState, activation: &Activation) -> f64 {
    let sibling = activation.field_id().sibling();
    let had_open_sibling = before.field(sibling).is_some_and(|f| !f.is_used());
    if !had_open_sibling {
        return 0.0;
    }
    let Some(stranded) = failure.field(sibling) else {
        return 0.0;
    };

    let alternatives: Vec<f64> = failure
        .plots()
        .iter()
        .filter(|plot| plot.is_active() && plot.index() != activation.plot)
        .flat_map(|plot| plot.unused_fields())
        .filter(|f| f.color() == stranded.color())
        .map(intrinsic_value)
        .collect();

    let value = intrinsic_value(stranded);
    scarcity_multiplier(alternatives.len()) * quality_bonus(value, &alternatives) * value
}

/// Near-term value of a field: its T3 plus what its T2 should turn into.
#[must_use]
pub fn intrinsic_value(field: &Field) -> f64 {
    let seeds = field.seeds();
    f64::from(seeds.t2) * UpgradeProbabilities::DEFAULT.t2_to_t3 * T3_VALUE
        + f64::from(seeds.t3) * T3_VALUE
}

#[must_use]
pub const fn scarcity_multiplier(alternatives: usize) -> f64 {
    match alternatives {
        0 => 2.0,
        1 => 1.5,
        2 => 1.0,
        3 => 0.7,
        _ => 0.5,
    }
}

#[expect(clippy::cast_precision_loss)]
fn quality_bonus(value: f64, alternatives: &[f64]) -> f64 {
    if alternatives.is_empty() {
        return MAX_QUALITY_BONUS;
    }
    let mean = alternatives.iter().sum::<f64>() / alternatives.len() as f64;
    if mean <= 0.0 {
        return if value > 0.0 {
            MAX_QUALITY_BONUS
        } else {
            MIN_QUALITY_BONUS
        };
    }
    (value / mean).clamp(MIN_QUALITY_BONUS, MAX_QUALITY_BONUS)
}

//! Tie-breaking bonus for layouts with several identical plots.
//!
//! When three or more plots share a color pair, activating the same color in
//! any of them looks equally good to the evaluator. The bonus steers the
//! planner toward the weakest copy so the strongest one keeps collecting
//! upgrades. It is added to a sequence's first step only.

use std::collections::BTreeMap;

use croprot_engine::{Activation, Color, FieldId, GameState};

const MIN_DUPLICATE_PLOTS: usize = 3;
const BONUS_STEP: f64 = 5.0;

#[derive(Debug, Clone, Default)]
pub struct StrategicBonuses {
    bonuses: BTreeMap<FieldId, f64>,
}

impl StrategicBonuses {
    /// Computes bonuses for the `available` activations of `state`.
    #[must_use]
    #[expect(clippy::cast_precision_loss)]
    pub fn compute(state: &GameState, available: &[Activation]) -> Self {
        let mut groups: BTreeMap<((Color, Color), Color), Vec<(FieldId, u64)>> = BTreeMap::new();
        for activation in available {
            let Some(plot) = state.plot(activation.plot) else {
                continue;
            };
            let Some(field) = plot.field(activation.field) else {
                continue;
            };
            let seeds = field.seeds();
            groups
                .entry((plot.colors().signature(), activation.color))
                .or_default()
                .push((field.id(), u64::from(seeds.t2) + u64::from(seeds.t3) * 5));
        }

        let mut bonuses = BTreeMap::new();
        for mut fields in groups.into_values() {
            let mut plots: Vec<usize> = fields.iter().map(|(id, _)| id.plot).collect();
            plots.dedup();
            if plots.len() < MIN_DUPLICATE_PLOTS {
                continue;
            }
            fields.sort_by_key(|&(_, value)| value);
            let count = fields.len();
            for (rank, (id, _)) in fields.into_iter().enumerate() {
                bonuses.insert(id, BONUS_STEP * (count - rank - 1) as f64);
            }
        }
        Self { bonuses }
    }

    /// Bonus for activating `field` first; zero when it has none.
    #[must_use]
    pub fn get(&self, field: FieldId) -> f64 {
        self.bonuses.get(&field).copied().unwrap_or(0.0)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bonuses.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use croprot_engine::{ActualUpgrades, ColorPair, ObservedTiers, Outcome};

    use super::*;

    fn bonuses(state: &GameState) -> StrategicBonuses {
        StrategicBonuses::compute(state, &state.available_activations())
    }

    #[test]
    fn test_three_identical_plots_get_descending_bonuses() {
        let state = GameState::new(&[ColorPair(Color::Yellow, Color::Red); 3], 23).unwrap();
        let bonuses = bonuses(&state);
        let yellow: Vec<f64> = (0..3).map(|p| bonuses.get(FieldId::new(p, 0))).collect();
        assert_eq!(yellow, vec![10.0, 5.0, 0.0]);
        let red: Vec<f64> = (0..3).map(|p| bonuses.get(FieldId::new(p, 1))).collect();
        assert_eq!(red, vec![10.0, 5.0, 0.0]);
    }

    #[test]
    fn test_slot_order_does_not_split_groups() {
        let state = GameState::new(
            &[
                ColorPair(Color::Yellow, Color::Red),
                ColorPair(Color::Red, Color::Yellow),
                ColorPair(Color::Yellow, Color::Red),
            ],
            23,
        )
        .unwrap();
        let bonuses = bonuses(&state);
        assert!((bonuses.get(FieldId::new(1, 1)) - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_strongest_copy_gets_no_bonus() {
        let state = GameState::new(
            &[
                ColorPair(Color::Yellow, Color::Red),
                ColorPair(Color::Yellow, Color::Red),
                ColorPair(Color::Yellow, Color::Red),
                ColorPair(Color::Blue, Color::Blue),
            ],
            23,
        )
        .unwrap();
        let mut observed = ActualUpgrades::new();
        observed.insert(
            FieldId::new(1, 0),
            ObservedTiers {
                t2: 8,
                t3: 1,
                t4: 0,
            },
        );
        let state = state
            .apply_activation(&Activation::new(3, Color::Blue, 0), Outcome::Success, Some(&observed))
            .unwrap();
        let bonuses = bonuses(&state);
        // plot 1 yellow: 8 + 1·5 beats 6 in the other two copies
        assert!(bonuses.get(FieldId::new(1, 0)).abs() < f64::EPSILON);
        assert!((bonuses.get(FieldId::new(0, 0)) - 10.0).abs() < f64::EPSILON);
        assert!((bonuses.get(FieldId::new(2, 0)) - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_two_copies_get_nothing() {
        let state = GameState::new(&[ColorPair(Color::Blue, Color::Red); 2], 23).unwrap();
        assert!(bonuses(&state).is_empty());
    }
}

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    core::{Color, ObservedTiers},
    engine::{game_state::GameState, plot::FieldId},
};

/// A candidate move: activate the field of `color` in slot `field` of `plot`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Activation {
    pub plot: usize,
    pub color: Color,
    pub field: usize,
}

impl Activation {
    #[must_use]
    pub const fn new(plot: usize, color: Color, field: usize) -> Self {
        Self { plot, color, field }
    }

    #[must_use]
    pub const fn field_id(&self) -> FieldId {
        FieldId::new(self.plot, self.field)
    }
}

impl fmt::Display for Activation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "plot {} {} (field {})",
            self.plot + 1,
            self.color,
            self.field + 1
        )
    }
}

/// Result of an activation as reported by the game.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::IsVariant,
)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Success,
    Failure,
}

impl Outcome {
    #[must_use]
    pub const fn from_success(success: bool) -> Self {
        if success { Self::Success } else { Self::Failure }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Success => "success",
            Self::Failure => "failure",
        })
    }
}

/// Observed totals for one field after a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldObservation {
    pub field: FieldId,
    pub tiers: ObservedTiers,
}

/// Seed totals the player read off the game after a round.
///
/// Fields listed here take the observed values instead of the expected-value
/// upgrade; every other upgraded field is computed as usual.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActualUpgrades {
    observations: Vec<FieldObservation>,
}

impl ActualUpgrades {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            observations: Vec::new(),
        }
    }

    /// Records totals for `field`, replacing an earlier entry for the same field.
    pub fn insert(&mut self, field: FieldId, tiers: ObservedTiers) {
        match self.observations.iter_mut().find(|o| o.field == field) {
            Some(existing) => existing.tiers = tiers,
            None => self.observations.push(FieldObservation { field, tiers }),
        }
    }

    #[must_use]
    pub fn get(&self, field: FieldId) -> Option<ObservedTiers> {
        self.observations
            .iter()
            .find(|o| o.field == field)
            .map(|o| o.tiers)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}

impl FromIterator<FieldObservation> for ActualUpgrades {
    fn from_iter<I: IntoIterator<Item = FieldObservation>>(iter: I) -> Self {
        let mut upgrades = Self::new();
        for o in iter {
            upgrades.insert(o.field, o.tiers);
        }
        upgrades
    }
}

/// Lists every legal move: unused fields of active plots, in plot then slot
/// order. An empty list means the game is complete.
#[must_use]
pub fn available_activations(state: &GameState) -> Vec<Activation> {
    state
        .plots()
        .iter()
        .filter(|plot| plot.is_active())
        .flat_map(|plot| plot.unused_fields())
        .map(|field| Activation::new(field.id().plot, field.color(), field.id().slot))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::plot::ColorPair;

    #[test]
    fn test_available_in_plot_then_slot_order() {
        let state = GameState::new(
            &[
                ColorPair(Color::Yellow, Color::Red),
                ColorPair(Color::Blue, Color::Red),
            ],
            23,
        )
        .unwrap();
        let failed = state
            .apply_activation(&Activation::new(0, Color::Red, 1), Outcome::Failure, None)
            .unwrap();
        assert_eq!(
            available_activations(&failed),
            vec![
                Activation::new(1, Color::Blue, 0),
                Activation::new(1, Color::Red, 1),
            ]
        );
    }

    #[test]
    fn test_later_observation_replaces_earlier() {
        let field = FieldId::new(0, 1);
        let upgrades: ActualUpgrades = [
            FieldObservation {
                field,
                tiers: ObservedTiers { t2: 1, t3: 0, t4: 0 },
            },
            FieldObservation {
                field,
                tiers: ObservedTiers { t2: 5, t3: 2, t4: 0 },
            },
        ]
        .into_iter()
        .collect();
        assert_eq!(upgrades.get(field).map(|t| (t.t2, t.t3)), Some((5, 2)));
        assert!(upgrades.get(FieldId::new(0, 0)).is_none());
        assert!(!upgrades.is_empty());
    }
}

use serde::{Deserialize, Serialize};

use crate::{
    ActivationError,
    engine::{
        activation::{Activation, ActualUpgrades, Outcome},
        game_state::GameState,
        plot::Field,
    },
};

/// One confirmed round: what was activated, how it went, and the fields as
/// they were just before.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivationRecord {
    pub activation: Activation,
    pub outcome: Outcome,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual: Option<ActualUpgrades>,
    pub fields_before: Vec<Field>,
}

/// Append-only log of confirmed rounds over a fixed initial state.
///
/// The current state is always the result of replaying every record from the
/// initial state. Undo never reverses a transition; observed upgrades cannot
/// be inverted, so the remaining records are replayed instead.
#[derive(Debug, Clone)]
pub struct History {
    initial: GameState,
    records: Vec<ActivationRecord>,
    current: GameState,
}

impl History {
    #[must_use]
    pub fn new(initial: GameState) -> Self {
        Self {
            current: initial.clone(),
            initial,
            records: Vec::new(),
        }
    }

    /// Rebuilds a history from saved records, checking that each one still
    /// applies.
    pub fn from_records(
        initial: GameState,
        records: Vec<ActivationRecord>,
    ) -> Result<Self, ActivationError> {
        let current = replay(&initial, &records)?;
        Ok(Self {
            initial,
            records,
            current,
        })
    }

    #[must_use]
    pub fn initial(&self) -> &GameState {
        &self.initial
    }

    #[must_use]
    pub fn current(&self) -> &GameState {
        &self.current
    }

    #[must_use]
    pub fn records(&self) -> &[ActivationRecord] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Applies a confirmed round to the current state and appends it.
    pub fn record(
        &mut self,
        activation: Activation,
        outcome: Outcome,
        actual: Option<ActualUpgrades>,
    ) -> Result<&GameState, ActivationError> {
        let next = self
            .current
            .apply_activation(&activation, outcome, actual.as_ref())?;
        let fields_before = self.current.fields().copied().collect();
        self.records.push(ActivationRecord {
            activation,
            outcome,
            actual,
            fields_before,
        });
        self.current = next;
        tracing::debug!(%activation, %outcome, rounds = self.records.len(), "round recorded");
        Ok(&self.current)
    }

    /// Drops the last round and rebuilds the current state from the rest.
    ///
    /// Returns the removed record, or `None` when there is nothing to undo.
    pub fn undo(&mut self) -> Result<Option<ActivationRecord>, ActivationError> {
        let Some(removed) = self.records.pop() else {
            return Ok(None);
        };
        self.current = replay(&self.initial, &self.records)?;
        tracing::debug!(activation = %removed.activation, rounds = self.records.len(), "round undone");
        Ok(Some(removed))
    }
}

/// Applies `records` in order, starting from `initial`.
pub fn replay(
    initial: &GameState,
    records: &[ActivationRecord],
) -> Result<GameState, ActivationError> {
    records.iter().try_fold(initial.clone(), |state, record| {
        state.apply_activation(&record.activation, record.outcome, record.actual.as_ref())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::{Color, DEFAULT_STARTING_SEEDS, ObservedTiers},
        engine::plot::{ColorPair, FieldId},
    };

    fn initial() -> GameState {
        GameState::new(
            &[
                ColorPair(Color::Yellow, Color::Red),
                ColorPair(Color::Blue, Color::Red),
                ColorPair(Color::Yellow, Color::Blue),
            ],
            DEFAULT_STARTING_SEEDS,
        )
        .unwrap()
    }

    fn rounds() -> Vec<(Activation, Outcome, Option<ActualUpgrades>)> {
        let mut observed = ActualUpgrades::new();
        observed.insert(
            FieldId::new(2, 0),
            ObservedTiers {
                t2: 7,
                t3: 1,
                t4: 0,
            },
        );
        vec![
            (Activation::new(1, Color::Blue, 0), Outcome::Success, None),
            (Activation::new(0, Color::Red, 1), Outcome::Failure, Some(observed)),
            (Activation::new(2, Color::Yellow, 0), Outcome::Success, None),
        ]
    }

    #[test]
    fn test_undo_matches_direct_prefix() {
        let mut history = History::new(initial());
        for (activation, outcome, actual) in rounds() {
            history.record(activation, outcome, actual).unwrap();
        }
        assert_eq!(history.len(), 3);

        let removed = history.undo().unwrap().unwrap();
        assert_eq!(removed.activation, Activation::new(2, Color::Yellow, 0));

        let mut direct = initial();
        for (activation, outcome, actual) in rounds().into_iter().take(2) {
            direct = direct
                .apply_activation(&activation, outcome, actual.as_ref())
                .unwrap();
        }
        assert_eq!(history.current(), &direct);
    }

    #[test]
    fn test_undo_to_initial_and_past_it() {
        let mut history = History::new(initial());
        let (activation, outcome, actual) = rounds().remove(0);
        history.record(activation, outcome, actual).unwrap();
        assert!(history.undo().unwrap().is_some());
        assert_eq!(history.current(), history.initial());
        assert!(history.undo().unwrap().is_none());
        assert!(history.is_empty());
    }

    #[test]
    fn test_record_snapshots_fields_before_round() {
        let mut history = History::new(initial());
        let (activation, outcome, actual) = rounds().remove(0);
        history.record(activation, outcome, actual).unwrap();
        let record = &history.records()[0];
        assert_eq!(record.fields_before.len(), 6);
        assert!(record.fields_before.iter().all(|f| !f.is_used()));
        assert!(record.fields_before.iter().all(|f| f.seeds().t1 == 23));
    }

    #[test]
    fn test_rejected_round_leaves_history_untouched() {
        let mut history = History::new(initial());
        let (activation, outcome, actual) = rounds().remove(0);
        history.record(activation, outcome, actual).unwrap();
        let before = history.current().clone();
        assert!(
            history
                .record(Activation::new(1, Color::Blue, 0), Outcome::Success, None)
                .is_err()
        );
        assert_eq!(history.len(), 1);
        assert_eq!(history.current(), &before);
    }

    #[test]
    fn test_records_round_trip_through_json() {
        let mut history = History::new(initial());
        for (activation, outcome, actual) in rounds() {
            history.record(activation, outcome, actual).unwrap();
        }
        let json = serde_json::to_string(history.records()).unwrap();
        let records: Vec<ActivationRecord> = serde_json::from_str(&json).unwrap();
        let restored = History::from_records(initial(), records).unwrap();
        assert_eq!(restored.current(), history.current());
    }
}

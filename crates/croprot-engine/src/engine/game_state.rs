use arrayvec::ArrayVec;
use rand::Rng;
use serde::Serialize;

use crate::{
    ActivationError, ConfigError,
    core::{MAX_STARTING_SEEDS, SeedTiers, UpgradeProbabilities},
    engine::{
        activation::{self, Activation, ActualUpgrades, Outcome},
        config::{self, PlotConfig},
        plot::{ColorPair, Field, FieldId, Plot},
    },
};

/// Largest number of plots a harvest can have.
pub const MAX_PLOTS: usize = 12;

/// Immutable snapshot of a harvest.
///
/// Plots are stored inline, so cloning a state for a transition never
/// touches the heap. Every transition returns a new state and leaves `self`
/// untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct GameState {
    plots: ArrayVec<Plot, MAX_PLOTS>,
    starting_seeds: u32,
}

impl GameState {
    /// Creates the starting state: every plot active, every field unused
    /// with `starting_seeds` T1 seeds.
    pub fn new(pairs: &[ColorPair], starting_seeds: u32) -> Result<Self, ConfigError> {
        if pairs.is_empty() {
            return Err(ConfigError::NoPlots);
        }
        if pairs.len() > MAX_PLOTS {
            return Err(ConfigError::TooManyPlots {
                count: pairs.len(),
                max: MAX_PLOTS,
            });
        }
        if starting_seeds > MAX_STARTING_SEEDS {
            return Err(ConfigError::TooManySeeds {
                seeds: starting_seeds,
                max: MAX_STARTING_SEEDS,
            });
        }
        let plots = pairs
            .iter()
            .enumerate()
            .map(|(index, colors)| Plot::new(index, *colors, starting_seeds))
            .collect();
        Ok(Self {
            plots,
            starting_seeds,
        })
    }

    /// Validates the plot form and creates the starting state.
    ///
    /// Nothing is built when any plot is missing a color.
    pub fn from_config(plots: &[PlotConfig], starting_seeds: u32) -> Result<Self, ConfigError> {
        let pairs = config::color_pairs(plots)?;
        Self::new(&pairs, starting_seeds)
    }

    #[must_use]
    pub fn plots(&self) -> &[Plot] {
        &self.plots
    }

    #[must_use]
    pub fn plot(&self, index: usize) -> Option<&Plot> {
        self.plots.get(index)
    }

    pub fn fields(&self) -> impl Iterator<Item = &Field> + '_ {
        self.plots.iter().flat_map(|plot| plot.fields().iter())
    }

    #[must_use]
    pub fn field(&self, id: FieldId) -> Option<&Field> {
        self.plots.get(id.plot).and_then(|plot| plot.field(id.slot))
    }

    #[must_use]
    pub const fn starting_seeds(&self) -> u32 {
        self.starting_seeds
    }

    /// Seed totals over every field, used or not.
    #[must_use]
    pub fn totals(&self) -> SeedTiers {
        self.fields().map(|field| *field.seeds()).sum()
    }

    #[must_use]
    pub fn available_activations(&self) -> Vec<Activation> {
        activation::available_activations(self)
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.plots
            .iter()
            .all(|plot| !plot.is_active() || plot.unused_fields().next().is_none())
    }

    /// Finds the field an activation targets.
    ///
    /// Fails when the field does not exist or holds a different color, both of
    /// which mean the activation was not produced from this state.
    pub fn locate(&self, activation: &Activation) -> Result<&Field, ActivationError> {
        let id = activation.field_id();
        let field = self
            .field(id)
            .ok_or(ActivationError::UnknownField { field: id })?;
        if field.color() != activation.color {
            return Err(ActivationError::ColorMismatch {
                field: id,
                expected: activation.color,
                actual: field.color(),
            });
        }
        Ok(field)
    }

    /// Whether the activation is legal now: its plot is active and its field
    /// unused.
    pub fn is_available(&self, activation: &Activation) -> Result<bool, ActivationError> {
        let field = self.locate(activation)?;
        let plot_active = self
            .plot(activation.plot)
            .is_some_and(Plot::is_active);
        Ok(plot_active && !field.is_used())
    }

    /// Applies an activation with expected-value upgrades.
    ///
    /// Fields listed in `actual` take the observed totals instead. Upgrades
    /// are the same for both outcomes; only the plot's availability differs.
    pub fn apply_activation(
        &self,
        activation: &Activation,
        outcome: Outcome,
        actual: Option<&ActualUpgrades>,
    ) -> Result<Self, ActivationError> {
        let probabilities = UpgradeProbabilities::DEFAULT;
        let starting_seeds = self.starting_seeds;
        self.transition(activation, outcome, |field| {
            match actual.and_then(|actual| actual.get(field.id())) {
                Some(observed) => SeedTiers::from_observed(observed, starting_seeds),
                None => field.seeds().upgraded_expected(&probabilities),
            }
        })
    }

    /// Applies an activation where every seed rolls its upgrade independently.
    ///
    /// Only used to play out a single realized game; planning always uses
    /// [`apply_activation`](Self::apply_activation).
    pub fn apply_activation_sampled<R>(
        &self,
        activation: &Activation,
        outcome: Outcome,
        rng: &mut R,
    ) -> Result<Self, ActivationError>
    where
        R: Rng + ?Sized,
    {
        let probabilities = UpgradeProbabilities::DEFAULT;
        self.transition(activation, outcome, |field| {
            field.seeds().upgraded_sampled(&probabilities, &mut *rng)
        })
    }

    fn transition<F>(
        &self,
        activation: &Activation,
        outcome: Outcome,
        mut upgrade: F,
    ) -> Result<Self, ActivationError>
    where
        F: FnMut(&Field) -> SeedTiers,
    {
        if !self.is_available(activation)? {
            return Err(ActivationError::Unavailable {
                field: activation.field_id(),
            });
        }
        let target = activation.field_id();

        let mut next = self.clone();
        for field in next.plots.iter_mut().flat_map(Plot::fields_mut) {
            if field.id() == target {
                field.mark_used();
            } else if !field.is_used() && field.color() != activation.color {
                let seeds = upgrade(&*field);
                field.set_seeds(seeds);
            }
        }
        if let Some(plot) = next.plots.get_mut(activation.plot) {
            plot.close_after(outcome.is_success());
        }
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg64Mcg;

    use super::*;
    use crate::core::{Color, DEFAULT_STARTING_SEEDS, ObservedTiers};

    fn state(pairs: &[(Color, Color)]) -> GameState {
        let pairs: Vec<_> = pairs.iter().map(|&(a, b)| ColorPair(a, b)).collect();
        GameState::new(&pairs, DEFAULT_STARTING_SEEDS).unwrap()
    }

    #[test]
    fn test_single_plot_success_upgrades_other_color() {
        let initial = state(&[(Color::Yellow, Color::Red)]);
        let yellow = Activation::new(0, Color::Yellow, 0);
        let next = initial
            .apply_activation(&yellow, Outcome::Success, None)
            .unwrap();

        let red = next.field(FieldId::new(0, 1)).unwrap();
        assert_eq!(
            *red.seeds(),
            SeedTiers {
                t1: 17,
                t2: 6,
                t3: 0,
                t4: 0
            }
        );
        assert!(!red.is_used());
        assert!(next.field(FieldId::new(0, 0)).unwrap().is_used());
        assert!(next.plot(0).unwrap().is_active());
        // the input state is untouched
        assert_eq!(initial.field(FieldId::new(0, 1)).unwrap().seeds().t1, 23);
    }

    #[test]
    fn test_failure_upgrades_identically_but_closes_plot() {
        let initial = state(&[(Color::Yellow, Color::Red), (Color::Blue, Color::Red)]);
        let yellow = Activation::new(0, Color::Yellow, 0);
        let success = initial
            .apply_activation(&yellow, Outcome::Success, None)
            .unwrap();
        let failure = initial
            .apply_activation(&yellow, Outcome::Failure, None)
            .unwrap();

        let seeds = |s: &GameState| s.fields().map(|f| *f.seeds()).collect::<Vec<_>>();
        assert_eq!(seeds(&success), seeds(&failure));
        assert!(success.plot(0).unwrap().is_active());
        assert!(!failure.plot(0).unwrap().is_active());
        assert!(failure.plot(0).unwrap().has_failed());
        // the stranded sibling can no longer be activated
        assert!(
            !failure
                .is_available(&Activation::new(0, Color::Red, 1))
                .unwrap()
        );
    }

    #[test]
    fn test_same_color_fields_are_not_upgraded() {
        let initial = state(&[(Color::Yellow, Color::Red), (Color::Yellow, Color::Blue)]);
        let next = initial
            .apply_activation(&Activation::new(0, Color::Yellow, 0), Outcome::Success, None)
            .unwrap();
        assert_eq!(next.field(FieldId::new(1, 0)).unwrap().seeds().t1, 23);
        assert_eq!(next.field(FieldId::new(1, 1)).unwrap().seeds().t2, 6);
    }

    #[test]
    fn test_last_field_success_closes_plot() {
        let initial = state(&[(Color::Yellow, Color::Red)]);
        let s1 = initial
            .apply_activation(&Activation::new(0, Color::Yellow, 0), Outcome::Success, None)
            .unwrap();
        let s2 = s1
            .apply_activation(&Activation::new(0, Color::Red, 1), Outcome::Success, None)
            .unwrap();
        assert!(!s2.plot(0).unwrap().is_active());
        assert!(!s2.plot(0).unwrap().has_failed());
        assert!(s2.is_complete());
        assert!(s2.available_activations().is_empty());
    }

    #[test]
    fn test_actual_upgrades_override_expected_values() {
        let initial = state(&[(Color::Yellow, Color::Red), (Color::Blue, Color::Red)]);
        let mut actual = ActualUpgrades::new();
        actual.insert(
            FieldId::new(0, 1),
            ObservedTiers {
                t2: 4,
                t3: 1,
                t4: 0,
            },
        );
        let next = initial
            .apply_activation(&Activation::new(0, Color::Yellow, 0), Outcome::Success, Some(&actual))
            .unwrap();
        assert_eq!(
            *next.field(FieldId::new(0, 1)).unwrap().seeds(),
            SeedTiers {
                t1: 18,
                t2: 4,
                t3: 1,
                t4: 0
            }
        );
        // fields without an observation still get the expected upgrade
        assert_eq!(next.field(FieldId::new(1, 0)).unwrap().seeds().t2, 6);
    }

    #[test]
    fn test_huge_observed_totals_do_not_overflow() {
        let initial = GameState::new(
            &vec![ColorPair(Color::Yellow, Color::Red); MAX_PLOTS],
            crate::core::MAX_STARTING_SEEDS,
        )
        .unwrap();
        let mut actual = ActualUpgrades::new();
        actual.insert(
            FieldId::new(0, 1),
            ObservedTiers::parse_lenient("4000000000/4000000000/0"),
        );
        let next = initial
            .apply_activation(&Activation::new(0, Color::Yellow, 0), Outcome::Success, Some(&actual))
            .unwrap();
        let seeds = *next.field(FieldId::new(0, 1)).unwrap().seeds();
        assert_eq!(seeds.t1, 0);
        assert_eq!(seeds.t2, 4_000_000_000);
        assert_eq!(next.totals().total(), u32::MAX);
    }

    #[test]
    fn test_expected_round_conserves_every_field() {
        let mut current = state(&[
            (Color::Yellow, Color::Red),
            (Color::Blue, Color::Red),
            (Color::Yellow, Color::Blue),
        ]);
        while let Some(next) = current.available_activations().first().copied() {
            current = current
                .apply_activation(&next, Outcome::Success, None)
                .unwrap();
            for field in current.fields() {
                assert_eq!(field.seeds().total(), DEFAULT_STARTING_SEEDS);
            }
        }
        assert!(current.is_complete());
    }

    #[test]
    fn test_sampled_transition_conserves_and_closes() {
        let mut rng = Pcg64Mcg::seed_from_u64(42);
        let initial = state(&[(Color::Yellow, Color::Red), (Color::Blue, Color::Red)]);
        let next = initial
            .apply_activation_sampled(&Activation::new(1, Color::Blue, 0), Outcome::Failure, &mut rng)
            .unwrap();
        assert!(!next.plot(1).unwrap().is_active());
        for field in next.fields() {
            assert_eq!(field.seeds().total(), DEFAULT_STARTING_SEEDS);
        }
    }

    #[test]
    fn test_illegal_activations_are_rejected() {
        let initial = state(&[(Color::Yellow, Color::Red)]);
        assert_eq!(
            initial.locate(&Activation::new(4, Color::Yellow, 0)),
            Err(ActivationError::UnknownField {
                field: FieldId::new(4, 0)
            })
        );
        assert!(matches!(
            initial.locate(&Activation::new(0, Color::Blue, 0)),
            Err(ActivationError::ColorMismatch { .. })
        ));

        let used = initial
            .apply_activation(&Activation::new(0, Color::Yellow, 0), Outcome::Success, None)
            .unwrap();
        assert_eq!(
            used.apply_activation(&Activation::new(0, Color::Yellow, 0), Outcome::Success, None),
            Err(ActivationError::Unavailable {
                field: FieldId::new(0, 0)
            })
        );
    }

    #[test]
    fn test_configuration_faults() {
        assert_eq!(
            GameState::new(&[], DEFAULT_STARTING_SEEDS),
            Err(ConfigError::NoPlots)
        );
        let too_many = vec![ColorPair(Color::Yellow, Color::Red); MAX_PLOTS + 1];
        assert!(matches!(
            GameState::new(&too_many, DEFAULT_STARTING_SEEDS),
            Err(ConfigError::TooManyPlots { .. })
        ));
        let incomplete = [PlotConfig {
            color1: None,
            color2: Some(Color::Red),
        }];
        assert_eq!(
            GameState::from_config(&incomplete, DEFAULT_STARTING_SEEDS),
            Err(ConfigError::MissingColor { plot: 0, slot: 0 })
        );
        assert_eq!(
            GameState::new(&[ColorPair(Color::Yellow, Color::Red)], 3_000_000_000),
            Err(ConfigError::TooManySeeds {
                seeds: 3_000_000_000,
                max: crate::core::MAX_STARTING_SEEDS,
            })
        );
        // the largest allowed setup still totals without overflow
        let largest = GameState::new(
            &vec![ColorPair(Color::Yellow, Color::Red); MAX_PLOTS],
            crate::core::MAX_STARTING_SEEDS,
        )
        .unwrap();
        assert_eq!(largest.totals().t1, 24 * crate::core::MAX_STARTING_SEEDS);
    }
}

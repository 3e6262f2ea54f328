use std::{iter::Sum, ops::Add, str::FromStr};

use rand::Rng;
use rand_distr::{Binomial, Distribution as _};
use serde::{Deserialize, Serialize};

/// Number of T1 seeds every field starts with.
pub const DEFAULT_STARTING_SEEDS: u32 = 23;

/// Largest starting count a field may be configured with.
pub const MAX_STARTING_SEEDS: u32 = 1_000_000;

/// Per-round probability that a single seed moves up one tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UpgradeProbabilities {
    pub t1_to_t2: f64,
    pub t2_to_t3: f64,
    pub t3_to_t4: f64,
}

impl UpgradeProbabilities {
    pub const DEFAULT: Self = Self {
        t1_to_t2: 0.25,
        t2_to_t3: 0.20,
        t3_to_t4: 0.05,
    };
}

impl Default for UpgradeProbabilities {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Seed counts of a field, one per tier.
///
/// Upgrade rounds only move seeds between adjacent tiers, so
/// [`total`](Self::total) is preserved by both [`upgraded_expected`](Self::upgraded_expected)
/// and [`upgraded_sampled`](Self::upgraded_sampled).
///
/// Observed totals are taken as reported, so counts may be arbitrarily
/// large; all arithmetic saturates at `u32::MAX`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeedTiers {
    pub t1: u32,
    pub t2: u32,
    pub t3: u32,
    pub t4: u32,
}

impl SeedTiers {
    pub const EMPTY: Self = Self {
        t1: 0,
        t2: 0,
        t3: 0,
        t4: 0,
    };

    #[must_use]
    pub const fn starting(t1: u32) -> Self {
        Self { t1, ..Self::EMPTY }
    }

    #[must_use]
    pub const fn total(&self) -> u32 {
        self.t1
            .saturating_add(self.t2)
            .saturating_add(self.t3)
            .saturating_add(self.t4)
    }

    /// Applies one deterministic upgrade round using `round(count × p)` per tier.
    #[must_use]
    pub fn upgraded_expected(&self, probabilities: &UpgradeProbabilities) -> Self {
        self.upgraded_with(probabilities, expected_migrations)
    }

    /// Applies one upgrade round where every seed rolls independently.
    #[must_use]
    pub fn upgraded_sampled<R>(&self, probabilities: &UpgradeProbabilities, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        self.upgraded_with(probabilities, |count, p| sampled_migrations(count, p, rng))
    }

    /// Tiers are processed top-down so seeds promoted in this round are not
    /// promoted a second time.
    fn upgraded_with<F>(&self, probabilities: &UpgradeProbabilities, mut migrate: F) -> Self
    where
        F: FnMut(u32, f64) -> u32,
    {
        let mut next = *self;

        let t3_to_t4 = migrate(next.t3, probabilities.t3_to_t4).min(next.t3);
        next.t3 -= t3_to_t4;
        next.t4 = next.t4.saturating_add(t3_to_t4);

        let t2_to_t3 = migrate(next.t2, probabilities.t2_to_t3).min(next.t2);
        next.t2 -= t2_to_t3;
        next.t3 = next.t3.saturating_add(t2_to_t3);

        let t1_to_t2 = migrate(next.t1, probabilities.t1_to_t2).min(next.t1);
        next.t1 -= t1_to_t2;
        next.t2 = next.t2.saturating_add(t1_to_t2);

        next
    }

    /// Replaces the counts with totals observed in the game.
    ///
    /// T1 is whatever remains of `starting_seeds`, never negative.
    #[must_use]
    pub fn from_observed(observed: ObservedTiers, starting_seeds: u32) -> Self {
        let upper = observed
            .t2
            .saturating_add(observed.t3)
            .saturating_add(observed.t4);
        Self {
            t1: starting_seeds.saturating_sub(upper),
            t2: observed.t2,
            t3: observed.t3,
            t4: observed.t4,
        }
    }
}

impl Add for SeedTiers {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            t1: self.t1.saturating_add(rhs.t1),
            t2: self.t2.saturating_add(rhs.t2),
            t3: self.t3.saturating_add(rhs.t3),
            t4: self.t4.saturating_add(rhs.t4),
        }
    }
}

impl Sum for SeedTiers {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::EMPTY, Add::add)
    }
}

#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn expected_migrations(count: u32, probability: f64) -> u32 {
    if count == 0 {
        return 0;
    }
    let expected = (f64::from(count) * probability).round();
    if expected <= 0.0 {
        0
    } else {
        expected as u32
    }
}

fn sampled_migrations<R>(count: u32, probability: f64, rng: &mut R) -> u32
where
    R: Rng + ?Sized,
{
    if count == 0 {
        return 0;
    }
    match Binomial::new(u64::from(count), probability) {
        Ok(binomial) => u32::try_from(binomial.sample(rng)).unwrap_or(count),
        Err(_) => expected_migrations(count, probability),
    }
}

/// Upper-tier totals reported by the player after a round.
///
/// T1 is not part of the observation; it is recomputed from the starting
/// count by [`SeedTiers::from_observed`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObservedTiers {
    pub t2: u32,
    pub t3: u32,
    pub t4: u32,
}

impl ObservedTiers {
    /// Parses `t2/t3/t4`.
    ///
    /// Missing or unparseable components count as zero; a warning is logged
    /// for each one that was present but could not be read.
    #[must_use]
    pub fn parse_lenient(input: &str) -> Self {
        let mut parts = input.split(['/', ',']).map(str::trim);
        let mut next = |tier: &str| -> u32 {
            match parts.next() {
                None | Some("") => 0,
                Some(raw) => raw.parse().unwrap_or_else(|_| {
                    tracing::warn!(tier, value = raw, "unreadable observed seed count, using 0");
                    0
                }),
            }
        };
        let t2 = next("t2");
        let t3 = next("t3");
        let t4 = next("t4");
        Self { t2, t3, t4 }
    }
}

impl FromStr for ObservedTiers {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse_lenient(s))
    }
}

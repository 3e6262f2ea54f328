use std::{cmp::Ordering, fmt};

use serde::Serialize;

use crate::evaluator::OutcomeLeaf;

/// Number of outcomes reported for a plan.
pub const TOP_OUTCOMES: usize = 10;

/// How spread out the outcomes of a plan are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, derive_more::IsVariant)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

impl RiskLevel {
    /// Judged by the most likely outcome: the less dominant it is, the riskier
    /// the plan.
    #[must_use]
    pub fn from_outcomes(outcomes: &[OutcomeLeaf]) -> Self {
        if outcomes.len() <= 1 {
            return Self::Low;
        }
        let most_likely = outcomes
            .iter()
            .map(|o| o.probability)
            .fold(0.0, f64::max);
        if most_likely > 0.6 {
            Self::Low
        } else if most_likely > 0.3 {
            Self::Moderate
        } else {
            Self::High
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Low => "low",
            Self::Moderate => "moderate",
            Self::High => "high",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioLabel {
    HighSuccess,
    ModerateSuccess,
    LowProbability,
}

impl ScenarioLabel {
    #[must_use]
    pub fn from_probability(probability: f64) -> Self {
        if probability > 0.3 {
            Self::HighSuccess
        } else if probability > 0.1 {
            Self::ModerateSuccess
        } else {
            Self::LowProbability
        }
    }
}

impl fmt::Display for ScenarioLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::HighSuccess => "high success",
            Self::ModerateSuccess => "moderate success",
            Self::LowProbability => "low probability",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Scenario {
    pub probability: f64,
    pub total_t3: u32,
    pub total_t4: u32,
    pub label: ScenarioLabel,
}

/// Outcome record of the recommended plan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutcomeSummary {
    pub expected_t3: f64,
    pub expected_t4: f64,
    pub risk: RiskLevel,
    /// Most likely outcomes first, at most [`TOP_OUTCOMES`].
    pub scenarios: Vec<Scenario>,
}

impl OutcomeSummary {
    #[must_use]
    pub fn new(expected_t3: f64, expected_t4: f64, outcomes: &[OutcomeLeaf]) -> Self {
        Self {
            expected_t3,
            expected_t4,
            risk: RiskLevel::from_outcomes(outcomes),
            scenarios: top_outcomes(outcomes, TOP_OUTCOMES)
                .into_iter()
                .map(|leaf| Scenario {
                    probability: leaf.probability,
                    total_t3: leaf.total_t3,
                    total_t4: leaf.total_t4,
                    label: ScenarioLabel::from_probability(leaf.probability),
                })
                .collect(),
        }
    }
}

/// The `limit` most likely outcomes; equally likely ones keep tree order.
#[must_use]
pub fn top_outcomes(outcomes: &[OutcomeLeaf], limit: usize) -> Vec<OutcomeLeaf> {
    let mut sorted = outcomes.to_vec();
    sorted.sort_by(|a, b| {
        b.probability
            .partial_cmp(&a.probability)
            .unwrap_or(Ordering::Equal)
    });
    sorted.truncate(limit);
    sorted
}

//! One planning round: from a game state to a recommended activation.
//!
//! # Algorithm
//!
//! 1. List the legal activations. None left means the game is over and a
//!    terminal result is returned.
//! 2. Compute strategic bonuses for duplicate plots.
//! 3. Build candidate sequences: every sequence up to the lookahead depth
//!    (deep search) or every single activation (shallow search), capped at
//!    `max_branching_factor`. The cap is applied while generating, so the
//!    optional heuristic sort only changes the order in which the same set of
//!    sequences is evaluated.
//! 4. Evaluate each sequence with a fresh [`Evaluator`] and add the bonus of
//!    its first step.
//! 5. Keep the best sequence per first activation (the score table) and the
//!    best overall.
//!
//! Equal scores are broken by the smaller activation (plot, then slot) and
//! then by the smaller sequence, so the recommendation does not depend on
//! the order in which sequences are evaluated.

use std::{cmp::Ordering, collections::BTreeMap};

use croprot_engine::{Activation, GameState};
use serde::Serialize;

use crate::{
    PlanError, PlannerConfigError,
    config::PlannerConfig,
    evaluator::{Evaluator, EvaluatorOptions, ExpectedOutcome},
    heuristic,
    outcome_summary::OutcomeSummary,
    sequence_generator::{Sequence, SequenceGenerator},
    strategic_bonus::StrategicBonuses,
};

/// Best score found for sequences starting with one activation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivationScore {
    pub activation: Activation,
    /// Human-readable name of the activation, e.g. `plot 1 yellow (field 1)`.
    pub label: String,
    /// Expected score of the best sequence, bonus included.
    pub score: f64,
    pub bonus: f64,
    /// Sequences evaluated that start with this activation.
    pub evaluations: usize,
    pub best_sequence: Sequence,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PlanDiagnostics {
    pub sequences_generated: usize,
    pub sequences_evaluated: usize,
    pub truncated: bool,
    pub cache_size: usize,
    pub cache_hits: usize,
    pub pruned_nodes: usize,
    pub lookahead_depth: usize,
    pub deep_search: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanResult {
    pub is_complete: bool,
    pub next_activation: Option<Activation>,
    pub best_sequence: Sequence,
    pub expected_score: f64,
    /// One entry per evaluated first activation, best first.
    pub score_table: Vec<ActivationScore>,
    pub available_activations: Vec<Activation>,
    pub state: GameState,
    pub outcome: OutcomeSummary,
    pub diagnostics: PlanDiagnostics,
}

#[derive(Debug, Clone)]
struct Candidate {
    score: f64,
    bonus: f64,
    sequence: Sequence,
    outcome: ExpectedOutcome,
}

impl Candidate {
    fn first(&self) -> Option<&Activation> {
        self.sequence.first()
    }

    /// `Greater` means `self` is the better choice.
    fn rank(&self, other: &Self) -> Ordering {
        self.score
            .total_cmp(&other.score)
            .then_with(|| other.first().cmp(&self.first()))
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

#[derive(Debug, Clone)]
struct TableEntry {
    best: Candidate,
    evaluations: usize,
}

#[derive(Debug, Clone)]
pub struct Planner {
    config: PlannerConfig,
}

impl Planner {
    pub fn new(config: PlannerConfig) -> Result<Self, PlannerConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    #[must_use]
    pub const fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Recommends the next activation for `state`.
    ///
    /// Fails only on an internal consistency fault: a candidate activation
    /// that names a field missing from the state.
    pub fn plan(&self, state: &GameState) -> Result<PlanResult, PlanError> {
        let mut evaluator = Evaluator::new(EvaluatorOptions {
            future_potential: self.config.future_potential,
            probability_threshold: self.config.probability_threshold,
        });
        let depth = self.config.effective_depth();
        let mut diagnostics = PlanDiagnostics {
            lookahead_depth: depth,
            deep_search: self.config.enable_deep_search,
            ..PlanDiagnostics::default()
        };

        let available = state.available_activations();
        if available.is_empty() {
            let outcome = evaluator.evaluate(&[], state, 1.0)?;
            tracing::debug!(score = outcome.expected_score, "no activations left");
            return Ok(PlanResult {
                is_complete: true,
                next_activation: None,
                best_sequence: Vec::new(),
                expected_score: outcome.expected_score,
                score_table: Vec::new(),
                available_activations: available,
                state: state.clone(),
                outcome: OutcomeSummary::new(
                    outcome.expected_t3,
                    outcome.expected_t4,
                    &outcome.outcomes,
                ),
                diagnostics,
            });
        }

        let bonuses = StrategicBonuses::compute(state, &available);
        let generated =
            SequenceGenerator::new(depth, self.config.max_branching_factor).generate(&available);
        let mut sequences = generated.sequences;
        diagnostics.sequences_generated = sequences.len();
        diagnostics.truncated = generated.truncated;
        if self.config.heuristic_ordering {
            heuristic::sort_by_heuristic(&mut sequences, state);
        }

        let mut table: BTreeMap<Activation, TableEntry> = BTreeMap::new();
        let mut best: Option<Candidate> = None;
        for sequence in sequences {
            let Some(first) = sequence.first().copied() else {
                continue;
            };
            let outcome = evaluator.evaluate(&sequence, state, 1.0)?;
            diagnostics.sequences_evaluated += 1;

            let bonus = bonuses.get(first.field_id());
            let candidate = Candidate {
                score: outcome.expected_score + bonus,
                bonus,
                sequence,
                outcome,
            };

            match table.get_mut(&first) {
                Some(entry) => {
                    entry.evaluations += 1;
                    if candidate.rank(&entry.best).is_gt() {
                        entry.best = candidate.clone();
                    }
                }
                None => {
                    table.insert(
                        first,
                        TableEntry {
                            best: candidate.clone(),
                            evaluations: 1,
                        },
                    );
                }
            }
            if best.as_ref().is_none_or(|b| candidate.rank(b).is_gt()) {
                best = Some(candidate);
            }
        }

        diagnostics.cache_size = evaluator.cache_len();
        diagnostics.cache_hits = evaluator.cache_hits();
        diagnostics.pruned_nodes = evaluator.pruned_nodes();

        let mut entries: Vec<TableEntry> = table.into_values().collect();
        entries.sort_by(|a, b| b.best.rank(&a.best));
        let score_table = entries
            .into_iter()
            .map(|entry| ActivationScore {
                activation: entry.best.sequence[0],
                label: entry.best.sequence[0].to_string(),
                score: entry.best.score,
                bonus: entry.best.bonus,
                evaluations: entry.evaluations,
                best_sequence: entry.best.sequence,
            })
            .collect();

        let best = best.expect("single-step sequences should always be generated");
        let next_activation = best.first().copied();
        tracing::info!(
            next = ?next_activation,
            score = best.score,
            evaluated = diagnostics.sequences_evaluated,
            truncated = diagnostics.truncated,
            "planning round finished"
        );

        Ok(PlanResult {
            is_complete: false,
            next_activation,
            expected_score: best.score,
            score_table,
            available_activations: available,
            state: state.clone(),
            outcome: OutcomeSummary::new(
                best.outcome.expected_t3,
                best.outcome.expected_t4,
                &best.outcome.outcomes,
            ),
            best_sequence: best.sequence,
            diagnostics,
        })
    }
}

#[cfg(test)]
mod tests {
    use croprot_engine::{Color, ColorPair, Outcome};

    use super::*;

    fn planner(config: PlannerConfig) -> Planner {
        Planner::new(config).unwrap()
    }

    fn three_plots() -> GameState {
        GameState::new(
            &[
                ColorPair(Color::Yellow, Color::Red),
                ColorPair(Color::Blue, Color::Red),
                ColorPair(Color::Yellow, Color::Blue),
            ],
            23,
        )
        .unwrap()
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = PlannerConfig {
            lookahead_depth: 9,
            ..PlannerConfig::default()
        };
        assert!(matches!(
            Planner::new(config),
            Err(PlannerConfigError::LookaheadDepth { depth: 9, .. })
        ));
    }

    #[test]
    fn test_complete_game_gives_terminal_result() {
        let mut state = GameState::new(&[ColorPair(Color::Yellow, Color::Red)], 23).unwrap();
        state = state
            .apply_activation(&Activation::new(0, Color::Yellow, 0), Outcome::Failure, None)
            .unwrap();
        let result = planner(PlannerConfig::default()).plan(&state).unwrap();
        assert!(result.is_complete);
        assert_eq!(result.next_activation, None);
        assert!(result.score_table.is_empty());
        assert!(result.expected_score.abs() < f64::EPSILON);
        assert!(result.outcome.risk.is_low());
    }

    #[test]
    fn test_recommends_a_legal_activation() {
        let state = three_plots();
        let result = planner(PlannerConfig::default()).plan(&state).unwrap();
        let next = result.next_activation.unwrap();
        assert!(result.available_activations.contains(&next));
        assert_eq!(result.best_sequence[0], next);
        assert_eq!(result.score_table[0].activation, next);
        assert!((result.score_table[0].score - result.expected_score).abs() < f64::EPSILON);
        // every legal activation is covered by the table
        assert_eq!(result.score_table.len(), result.available_activations.len());
        assert!(result.diagnostics.cache_hits > 0);
        assert!(!result.outcome.scenarios.is_empty());
    }

    #[test]
    fn test_heuristic_ordering_only_changes_evaluation_order() {
        let state = three_plots();
        for max_branching_factor in [500, 20] {
            let ordered = planner(PlannerConfig {
                max_branching_factor,
                ..PlannerConfig::default()
            })
            .plan(&state)
            .unwrap();
            let unordered = planner(PlannerConfig {
                max_branching_factor,
                heuristic_ordering: false,
                ..PlannerConfig::default()
            })
            .plan(&state)
            .unwrap();
            assert_eq!(
                ordered.diagnostics.sequences_evaluated,
                unordered.diagnostics.sequences_evaluated
            );
            assert_eq!(ordered.next_activation, unordered.next_activation);
            assert_eq!(ordered.best_sequence, unordered.best_sequence);
            assert_eq!(
                ordered.expected_score.to_bits(),
                unordered.expected_score.to_bits()
            );
        }
    }

    #[test]
    fn test_planning_is_deterministic() {
        let state = three_plots();
        let planner = planner(PlannerConfig::default());
        assert_eq!(planner.plan(&state).unwrap(), planner.plan(&state).unwrap());
    }

    #[test]
    fn test_branching_cap_bounds_evaluations() {
        let state = three_plots();
        let result = planner(PlannerConfig {
            max_branching_factor: 10,
            ..PlannerConfig::default()
        })
        .plan(&state)
        .unwrap();
        assert!(result.diagnostics.truncated);
        assert_eq!(result.diagnostics.sequences_evaluated, 10);
    }

    #[test]
    fn test_shallow_search_scores_single_steps() {
        let state = three_plots();
        let result = planner(PlannerConfig {
            enable_deep_search: false,
            ..PlannerConfig::default()
        })
        .plan(&state)
        .unwrap();
        assert_eq!(result.diagnostics.lookahead_depth, 1);
        assert_eq!(result.diagnostics.sequences_evaluated, 6);
        assert_eq!(result.best_sequence.len(), 1);
        assert!(result.score_table.iter().all(|s| s.evaluations == 1));
    }

    #[test]
    fn test_duplicate_plots_prefer_the_bonus_copy() {
        let state = GameState::new(&[ColorPair(Color::Yellow, Color::Red); 3], 23).unwrap();
        let result = planner(PlannerConfig {
            lookahead_depth: 2,
            ..PlannerConfig::default()
        })
        .plan(&state)
        .unwrap();
        let next = result.next_activation.unwrap();
        // identical copies only differ by their bonus
        assert_eq!(next.plot, 0);
        assert!(result.score_table[0].bonus > 0.0);
        let last_copy = result
            .score_table
            .iter()
            .find(|s| s.activation == Activation::new(2, next.color, next.field))
            .unwrap();
        assert!(last_copy.bonus.abs() < f64::EPSILON);
        assert!(last_copy.score < result.expected_score);
    }

    #[test]
    fn test_result_serializes_to_json() {
        let state = three_plots();
        let result = planner(PlannerConfig {
            lookahead_depth: 1,
            ..PlannerConfig::default()
        })
        .plan(&state)
        .unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["is_complete"], false);
        assert!(json["score_table"].as_array().is_some_and(|t| t.len() == 6));
        let first = &result.score_table[0];
        assert_eq!(json["score_table"][0]["label"], first.activation.to_string());
        assert!(first.label.starts_with(&format!("plot {}", first.activation.plot + 1)));
        assert!(json["diagnostics"]["cache_size"].is_u64());
    }
}

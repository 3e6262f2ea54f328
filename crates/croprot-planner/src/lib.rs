//! Expected-value planner for crop rotation harvests.
//!
//! Given a [`GameState`](croprot_engine::GameState), the planner recommends
//! the next activation by scoring short activation sequences with an
//! expectimax search over success and failure.
//!
//! # Architecture
//!
//! ```text
//! Planner (one recommendation + score table)
//!     ↓ uses
//! Sequence Generator → Heuristic ordering → Strategic bonuses
//!     ↓ feeds
//! Evaluator (expectimax with memoization)
//!     ↓ uses
//! Opportunity cost of stranded fields
//! ```
//!
//! - [`sequence_generator`] - Bounded enumeration of candidate sequences
//! - [`heuristic`] - Static score deciding evaluation order only
//! - [`evaluator`] - Expected score, T3/T4 counts and outcome list of a sequence
//! - [`opportunity_cost`] - Penalty for fields stranded by a failure
//! - [`strategic_bonus`] - Tie-breaker for duplicate plot layouts
//! - [`planner`] - Orchestration and result record
//! - [`outcome_summary`] - Risk level and scenario labels of a plan
//! - [`simulator`] - Random play-outs of the planner's recommendations
//!
//! # Example
//!
//! ```rust
//! use croprot_engine::{Color, ColorPair, GameState};
//! use croprot_planner::{config::PlannerConfig, planner::Planner};
//!
//! let state = GameState::new(&[ColorPair(Color::Yellow, Color::Red)], 23)?;
//! let planner = Planner::new(PlannerConfig::default())?;
//! let result = planner.plan(&state)?;
//! assert!(result.next_activation.is_some());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Determinism
//!
//! Planning uses no randomness. Every call builds its own evaluator, so
//! results never depend on earlier calls or on evaluation order.

use croprot_engine::ActivationError;

pub mod config;
pub mod evaluator;
pub mod heuristic;
pub mod opportunity_cost;
pub mod outcome_summary;
pub mod planner;
pub mod sequence_generator;
pub mod simulator;
pub mod strategic_bonus;

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum PlannerConfigError {
    #[display("lookahead depth must be between 1 and {max}, got {depth}")]
    LookaheadDepth { depth: usize, max: usize },
    #[display("max branching factor must be at least 1")]
    BranchingFactor,
    #[display("probability threshold must be in [0, 1), got {value}")]
    ProbabilityThreshold { value: f64 },
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum PlanError {
    #[display("internal consistency fault while planning: {_0}")]
    Evaluation(ActivationError),
}

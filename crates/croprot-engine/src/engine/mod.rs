//! Game state and transition logic.
//!
//! This module models a harvest and the single way it changes:
//!
//! - [`GameState`] - Immutable snapshot of every plot and field
//! - [`Plot`] / [`Field`] - A plot owns two colored fields of tiered seeds
//! - [`Activation`] - A move, and [`available_activations`] to list the legal ones
//! - [`History`] - Confirmed rounds with replay-based undo
//! - [`PlotConfig`] - Plot colors as entered by the player
//!
//! # Game Flow
//!
//! 1. Build the starting state from the plot colors ([`GameState::from_config`])
//! 2. Pick an activation from [`GameState::available_activations`]
//! 3. Apply it with the reported outcome ([`GameState::apply_activation`]);
//!    every unused field of another color gets one upgrade round
//! 4. On failure the plot closes for good; on success it stays open while it
//!    still has an unused field
//! 5. Repeat until no activation is left
//!
//! # Example
//!
//! ```
//! use croprot_engine::{Activation, Color, ColorPair, FieldId, GameState, Outcome};
//!
//! let state = GameState::new(&[ColorPair(Color::Yellow, Color::Red)], 23).unwrap();
//! let next = state
//!     .apply_activation(&Activation::new(0, Color::Yellow, 0), Outcome::Success, None)
//!     .unwrap();
//!
//! let red = next.field(FieldId::new(0, 1)).unwrap();
//! assert_eq!((red.seeds().t1, red.seeds().t2), (17, 6));
//! assert!(next.plot(0).unwrap().is_active());
//! ```

pub use self::{activation::*, config::*, game_state::*, history::*, plot::*};

mod activation;
mod config;
mod game_state;
mod history;
mod plot;

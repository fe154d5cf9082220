//! Tabular Q-learning core
//!
//! This module holds everything the learning agent needs to turn percepts
//! into actions and rewards into values.
//!
//! ## Components
//!
//! | Component | Responsibility |
//! |-----------|----------------|
//! | [`StateEncoder`] | percept + heading to a canonical [`StateKey`] |
//! | [`ValueStore`] | Q-table and N-table, one fixed row per state |
//! | [`Policy`] | explore uniformly or exploit arg-max Q |
//! | [`ExplorationSchedule`] | `epsilon * deadline / max(1, max_n)`, capped at 1 |
//! | [`QLearningAgent`] | one-step TD update on the previous transition |
//!
//! The update for a transition runs on the tick *after* it, once the
//! successor state has been sensed:
//!
//! ```text
//! Q(s,a) <- (1 - alpha) Q(s,a) + alpha [r + gamma max_a' Q(s',a')]
//! ```
//!
//! ## Usage Example
//!
//! ```no_run
//! use smartcab::q_learning::{QLearningAgent, StateEncoding, TieBreak};
//!
//! let agent = QLearningAgent::new(
//!     0.5, // alpha
//!     0.5, // gamma
//!     0.5, // epsilon
//! )?
//! .with_tie_break(TieBreak::First)
//! .with_encoding(StateEncoding::Full)
//! .with_seed(42);
//! # Ok::<(), smartcab::Error>(())
//! ```

pub mod agent;
pub mod exploration;
pub mod policy;
pub mod serialization;
pub mod state;
pub mod value_store;

// Public re-exports
pub use agent::QLearningAgent;
pub use exploration::ExplorationSchedule;
pub use policy::{Policy, TieBreak};
pub use serialization::{SavedQAgent, TrainingMetadata};
pub use state::{State, StateEncoder, StateEncoding, StateKey};
pub use value_store::ValueStore;

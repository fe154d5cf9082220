//! Traffic vocabulary shared by the learning core and the simulation
//!
//! Actions, traffic lights, percepts and the right-of-way rules live here so
//! the learning core, the baseline drivers and the reference world all agree
//! on what a legal move is.

pub mod action;
pub mod percept;
pub mod rules;

pub use action::{ACTION_COUNT, Action};
pub use percept::{Light, Percept, RawPercept};
pub use rules::{is_legal, legal_actions};

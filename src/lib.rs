//! smartcab: a tabular Q-learning driver for a grid-world traffic simulation
//!
//! This crate provides:
//! - The Q-learning core: state encoding, Q and N tables, the exploration
//!   schedule, the policy and the one-step update
//! - Ports for the environment, drivers, observers and agent persistence
//! - A small reference grid world with traffic lights and background cars
//! - An experiment pipeline with trial bookkeeping and CSV reports
//! - Baseline drivers, run summaries and a hyper-parameter grid search

pub mod adapters;
pub mod analysis;
pub mod app;
pub mod cli;
pub mod error;
pub mod export;
pub mod pipeline;
pub mod ports;
pub mod q_learning;
pub mod sim;
pub mod traffic;

pub use error::{Error, Result};
pub use q_learning::{QLearningAgent, StateKey, ValueStore};
pub use traffic::{Action, Light, Percept};

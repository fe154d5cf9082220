//! Analysis tools for studying experiment runs
//!
//! This module summarizes trial logs, scores runs by how late they still
//! make mistakes, and searches hyper-parameters by that score.

pub mod grid_search;
pub mod penalty;
pub mod summary;

pub use grid_search::{DEFAULT_SEARCH_VALUES, GridPoint, GridSearch, GridSearchResult};
pub use penalty::penalty_score;
pub use summary::{SeriesStats, TrialSummary};

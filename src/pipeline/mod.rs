//! Experiment pipeline abstractions
//!
//! This module provides composable pipelines for:
//! - Running a driver through consecutive trials of an environment
//! - Tracking per-trial statistics and the trial log
//! - Comparing the learning agent against baseline drivers
//! - Recording observations during a run

pub mod comparison;
pub mod experiment;
pub mod observers;
pub mod trials;

pub use comparison::{
    ComparisonFramework, ComparisonResult, DriverOutcome, InformedDriver, NaiveDriver,
    RandomDriver,
};
pub use experiment::{ExperimentConfig, ExperimentPipeline, ExperimentResult};
pub use observers::{CsvReportObserver, JsonlObserver, ProgressObserver, StepObservation};
pub use trials::{
    DEFAULT_ARRIVAL_THRESHOLD, TrialBook, TrialLog, TrialRecord, TrialStatus, TrialTracker,
};

pub use crate::ports::{Driver, Observer};

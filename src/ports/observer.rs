//! Observer port - abstraction for experiment observation and data collection
//!
//! This port defines the interface for observing experiment events,
//! allowing composable data collection without coupling the trial loop
//! to specific output formats or metrics.

use crate::{
    Result,
    pipeline::TrialRecord,
    ports::Sensation,
    q_learning::ValueStore,
    traffic::Action,
};

/// One executed tick.
#[derive(Debug, Clone, Copy)]
pub struct StepEvent {
    /// Trial index (0-based)
    pub trial: usize,
    /// Tick within the trial (0-based)
    pub step: usize,
    /// What the driver was given
    pub sensation: Sensation,
    /// What the driver chose
    pub action: Action,
    /// What the environment paid
    pub reward: f64,
}

/// Read-only view handed to observers when an export is due.
#[derive(Debug, Clone, Copy)]
pub struct ExportSnapshot<'a> {
    /// Trials completed so far
    pub completed_trials: usize,
    /// Trial log in completion order
    pub trials: &'a [TrialRecord],
    /// Learned tables, when the driver has them
    pub values: Option<&'a ValueStore>,
}

/// Observer trait for monitoring experiments
///
/// # Event Sequence
///
/// 1. `on_run_start(total_trials)` - Once at the beginning
/// 2. For each trial:
///    - `on_trial_start(trial)`
///    - `on_step(event)` - For each tick
///    - `on_trial_end(record)`
///    - `on_export(snapshot)` - When the export cadence is reached
/// 3. `on_run_end()` - Once at the end
///
/// # Examples
///
/// ```no_run
/// use smartcab::{pipeline::TrialRecord, ports::Observer};
///
/// struct SuccessCounter {
///     successes: usize,
/// }
///
/// impl Observer for SuccessCounter {
///     fn on_trial_end(&mut self, record: &TrialRecord) -> smartcab::Result<()> {
///         if record.reached_destination {
///             self.successes += 1;
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait Observer: Send {
    /// Called when the run starts.
    fn on_run_start(&mut self, _total_trials: usize) -> Result<()> {
        Ok(())
    }

    /// Called when a trial starts.
    fn on_trial_start(&mut self, _trial: usize) -> Result<()> {
        Ok(())
    }

    /// Called after every tick, once the reward is known.
    fn on_step(&mut self, _event: &StepEvent) -> Result<()> {
        Ok(())
    }

    /// Called with the completed trial record.
    fn on_trial_end(&mut self, _record: &TrialRecord) -> Result<()> {
        Ok(())
    }

    /// Called every time the configured number of trials has completed.
    ///
    /// Report writers persist the snapshot here.
    fn on_export(&mut self, _snapshot: &ExportSnapshot<'_>) -> Result<()> {
        Ok(())
    }

    /// Called when the run completes.
    fn on_run_end(&mut self) -> Result<()> {
        Ok(())
    }
}

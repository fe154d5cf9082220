//! Observer pattern for experiment pipelines
//!
//! Observers allow composable data collection during a run without coupling
//! the trial loop to specific output formats.

use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use serde::{Deserialize, Serialize};

use super::trials::TrialRecord;
use crate::{
    Error, Result,
    export::{TrialLogCsv, ValueTableCsv, ValueTableKind},
    ports::{ExportSnapshot, Observer, StepEvent},
};

/// Observation of a single tick, as written by [`JsonlObserver`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepObservation {
    pub trial: usize,
    pub step: usize,
    pub deadline: i64,
    pub light: String,
    pub oncoming: Option<String>,
    pub left: Option<String>,
    pub right: Option<String>,
    pub waypoint: String,
    pub action: String,
    pub reward: f64,
}

impl From<&StepEvent> for StepObservation {
    fn from(event: &StepEvent) -> Self {
        let percept = event.sensation.percept;
        let name = |car: Option<crate::traffic::Action>| car.map(|a| a.name().to_string());
        Self {
            trial: event.trial,
            step: event.step,
            deadline: event.sensation.deadline,
            light: percept.light.name().to_string(),
            oncoming: name(percept.oncoming),
            left: name(percept.left),
            right: name(percept.right),
            waypoint: event.sensation.waypoint.name().to_string(),
            action: event.action.name().to_string(),
            reward: event.reward,
        }
    }
}

/// Progress bar observer - Shows run progress
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    successes: usize,
    completed: usize,
}

impl ProgressObserver {
    /// Create a new progress observer
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            successes: 0,
            completed: 0,
        }
    }

    fn message(&self) -> String {
        format!("{}/{}", self.successes, self.completed)
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for ProgressObserver {
    fn on_run_start(&mut self, total_trials: usize) -> Result<()> {
        let pb = ProgressBar::new(total_trials as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} trials (arrived: {msg})")
                .map_err(|e| Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_trial_end(&mut self, record: &TrialRecord) -> Result<()> {
        self.completed += 1;
        if record.reached_destination {
            self.successes += 1;
        }

        if let Some(pb) = &self.progress_bar {
            pb.set_position(self.completed as u64);
            pb.set_message(self.message());
        }
        Ok(())
    }

    fn on_run_end(&mut self) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(self.message());
        }
        Ok(())
    }
}

/// JSONL observer - Writes one JSON object per tick
pub struct JsonlObserver {
    writer: BufWriter<File>,
}

impl JsonlObserver {
    /// Create a new JSONL observer
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
        })
    }
}

impl Observer for JsonlObserver {
    fn on_step(&mut self, event: &StepEvent) -> Result<()> {
        serde_json::to_writer(&mut self.writer, &StepObservation::from(event))?;
        writeln!(&mut self.writer)?;
        Ok(())
    }

    fn on_trial_end(&mut self, _record: &TrialRecord) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    fn on_run_end(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// CSV report observer - Writes Q, N and trial-stats files on every export
///
/// Files are named `Q_{label}.csv`, `N_{label}.csv` and
/// `trial_stats_{label}.csv` and are replaced on each export, so the
/// directory always holds the latest snapshot.
pub struct CsvReportObserver {
    directory: PathBuf,
    label: String,
    exports: usize,
}

impl CsvReportObserver {
    /// Create the observer, creating the output directory if needed
    pub fn new<P: AsRef<Path>>(directory: P, label: impl Into<String>) -> Result<Self> {
        let directory = directory.as_ref().to_path_buf();
        fs::create_dir_all(&directory).map_err(|source| Error::Io {
            operation: format!("create report directory {}", directory.display()),
            source,
        })?;
        Ok(Self {
            directory,
            label: label.into(),
            exports: 0,
        })
    }

    pub fn table_path(&self, kind: ValueTableKind) -> PathBuf {
        self.directory
            .join(format!("{}_{}.csv", kind.prefix(), self.label))
    }

    pub fn trial_stats_path(&self) -> PathBuf {
        self.directory.join(format!("trial_stats_{}.csv", self.label))
    }

    /// Number of exports written so far
    pub fn exports(&self) -> usize {
        self.exports
    }
}

impl Observer for CsvReportObserver {
    fn on_export(&mut self, snapshot: &ExportSnapshot<'_>) -> Result<()> {
        if let Some(store) = snapshot.values {
            ValueTableCsv::save(store, ValueTableKind::Q, self.table_path(ValueTableKind::Q))?;
            ValueTableCsv::save(store, ValueTableKind::N, self.table_path(ValueTableKind::N))?;
        }
        TrialLogCsv::save(snapshot.trials, self.trial_stats_path())?;
        self.exports += 1;
        info!(
            "exported report after {} trials to {}",
            snapshot.completed_trials,
            self.directory.display()
        );
        Ok(())
    }
}

//! Per-trial bookkeeping and the trial log.

use log::info;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Default reward above which a tick counts as arriving at the destination.
pub const DEFAULT_ARRIVAL_THRESHOLD: f64 = 2.0;

/// Outcome of one completed trial.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrialRecord {
    /// Trial index (0-based)
    pub trial: usize,
    /// Sum of every reward in the trial
    pub total_reward: f64,
    /// Sum of the negative rewards only
    pub negative_reward: f64,
    /// Ticks taken, including the final one
    pub trial_length: usize,
    pub reached_destination: bool,
}

/// Trial lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrialStatus {
    InProgress,
    Completed { reached_destination: bool },
}

/// Accumulates rewards for the trial in progress.
#[derive(Debug, Clone)]
pub struct TrialTracker {
    trial: usize,
    arrival_threshold: f64,
    total_reward: f64,
    negative_reward: f64,
    steps: usize,
    status: TrialStatus,
}

impl TrialTracker {
    pub fn new(trial: usize, arrival_threshold: f64) -> Self {
        Self {
            trial,
            arrival_threshold,
            total_reward: 0.0,
            negative_reward: 0.0,
            steps: 0,
            status: TrialStatus::InProgress,
        }
    }

    /// Record one tick's reward and the deadline left after it.
    ///
    /// The trial completes when the reward exceeds the arrival threshold
    /// (success) or the deadline has run out (failure).
    ///
    /// # Errors
    ///
    /// Returns [`Error::TrialAlreadyCompleted`] once the trial is over.
    pub fn record(&mut self, reward: f64, deadline_after: i64) -> Result<TrialStatus> {
        if let TrialStatus::Completed { .. } = self.status {
            return Err(Error::TrialAlreadyCompleted { steps: self.steps });
        }
        self.steps += 1;
        self.total_reward += reward;
        if reward < 0.0 {
            self.negative_reward += reward;
        }

        if reward > self.arrival_threshold {
            self.status = TrialStatus::Completed {
                reached_destination: true,
            };
        } else if deadline_after <= 0 {
            self.status = TrialStatus::Completed {
                reached_destination: false,
            };
        }
        Ok(self.status)
    }

    pub fn status(&self) -> TrialStatus {
        self.status
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    /// The record as it stands; final once the trial has completed.
    pub fn snapshot(&self) -> TrialRecord {
        TrialRecord {
            trial: self.trial,
            total_reward: self.total_reward,
            negative_reward: self.negative_reward,
            trial_length: self.steps,
            reached_destination: matches!(
                self.status,
                TrialStatus::Completed {
                    reached_destination: true
                }
            ),
        }
    }
}

/// Ordered, append-only log of completed trials.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrialLog {
    records: Vec<TrialRecord>,
}

impl TrialLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<TrialRecord>) -> Self {
        Self { records }
    }

    pub fn push(&mut self, record: TrialRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[TrialRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn last(&self) -> Option<&TrialRecord> {
        self.records.last()
    }

    pub fn successes(&self) -> usize {
        self.records.iter().filter(|r| r.reached_destination).count()
    }

    pub fn into_records(self) -> Vec<TrialRecord> {
        self.records
    }
}

/// Trial bookkeeping for a run: the tracker in progress, the log and the
/// export cadence.
#[derive(Debug, Clone)]
pub struct TrialBook {
    arrival_threshold: f64,
    export_every: Option<usize>,
    current: Option<TrialTracker>,
    log: TrialLog,
}

impl TrialBook {
    pub fn new(arrival_threshold: f64, export_every: Option<usize>) -> Self {
        Self {
            arrival_threshold,
            export_every: export_every.filter(|&n| n > 0),
            current: None,
            log: TrialLog::new(),
        }
    }

    /// Open a new trial and return its index.
    pub fn start(&mut self) -> usize {
        let trial = self.log.len();
        self.current = Some(TrialTracker::new(trial, self.arrival_threshold));
        trial
    }

    /// Record a tick for the open trial. On completion the record is appended
    /// to the log and the trial is closed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoTrialInProgress`] if no trial is open.
    pub fn record(&mut self, reward: f64, deadline_after: i64) -> Result<TrialStatus> {
        let tracker = self.current.as_mut().ok_or(Error::NoTrialInProgress)?;
        let status = tracker.record(reward, deadline_after)?;
        if let TrialStatus::Completed { .. } = status {
            let record = tracker.snapshot();
            info!(
                "trial {} finished: reached={} steps={} reward={:.1} penalties={:.1}",
                record.trial,
                record.reached_destination,
                record.trial_length,
                record.total_reward,
                record.negative_reward
            );
            self.log.push(record);
            self.current = None;
        }
        Ok(status)
    }

    /// Whether the most recent completion hit the export cadence.
    pub fn export_due(&self) -> bool {
        match self.export_every {
            Some(every) => !self.log.is_empty() && self.log.len() % every == 0,
            None => false,
        }
    }

    pub fn in_progress(&self) -> bool {
        self.current.is_some()
    }

    pub fn log(&self) -> &TrialLog {
        &self.log
    }

    pub fn into_log(self) -> TrialLog {
        self.log
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arrival_completes_trial() {
        let mut tracker = TrialTracker::new(0, DEFAULT_ARRIVAL_THRESHOLD);
        assert_eq!(tracker.record(2.0, 10).unwrap(), TrialStatus::InProgress);
        assert_eq!(
            tracker.record(12.0, 9).unwrap(),
            TrialStatus::Completed {
                reached_destination: true
            }
        );
        let record = tracker.snapshot();
        assert_eq!(record.trial_length, 2);
        assert_eq!(record.total_reward, 14.0);
        assert!(record.reached_destination);
    }

    #[test]
    fn test_deadline_fails_trial() {
        let mut tracker = TrialTracker::new(3, DEFAULT_ARRIVAL_THRESHOLD);
        tracker.record(-1.0, 1).unwrap();
        let status = tracker.record(-0.5, 0).unwrap();
        assert_eq!(
            status,
            TrialStatus::Completed {
                reached_destination: false
            }
        );
        let record = tracker.snapshot();
        assert_eq!(record.negative_reward, -1.5);
        assert!(!record.reached_destination);
    }

    #[test]
    fn test_positive_rewards_do_not_count_as_penalties() {
        let mut tracker = TrialTracker::new(0, DEFAULT_ARRIVAL_THRESHOLD);
        tracker.record(2.0, 5).unwrap();
        tracker.record(0.0, 4).unwrap();
        tracker.record(-0.5, 3).unwrap();
        let record = tracker.snapshot();
        assert_eq!(record.negative_reward, -0.5);
        assert_eq!(record.total_reward, 1.5);
    }

    #[test]
    fn test_completed_tracker_rejects_rewards() {
        let mut tracker = TrialTracker::new(0, DEFAULT_ARRIVAL_THRESHOLD);
        tracker.record(0.0, 0).unwrap();
        assert!(matches!(
            tracker.record(1.0, 0),
            Err(Error::TrialAlreadyCompleted { steps: 1 })
        ));
    }

    #[test]
    fn test_book_appends_and_triggers_export() {
        let mut book = TrialBook::new(DEFAULT_ARRIVAL_THRESHOLD, Some(2));
        for trial in 0..4 {
            assert_eq!(book.start(), trial);
            book.record(12.0, 5).unwrap();
            assert!(!book.in_progress());
            assert_eq!(book.export_due(), (trial + 1) % 2 == 0);
        }
        assert_eq!(book.log().len(), 4);
        assert_eq!(book.log().successes(), 4);
    }

    #[test]
    fn test_book_without_open_trial() {
        let mut book = TrialBook::new(DEFAULT_ARRIVAL_THRESHOLD, None);
        assert!(matches!(book.record(1.0, 3), Err(Error::NoTrialInProgress)));
        assert!(!book.export_due());
    }
}

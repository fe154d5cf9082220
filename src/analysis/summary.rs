//! Descriptive statistics over a trial log

use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

use crate::pipeline::TrialRecord;

/// Mean, spread and range of one per-trial quantity
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SeriesStats {
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

impl SeriesStats {
    /// Statistics of a sample; all zero when empty. The standard deviation is
    /// the sample one and is zero for fewer than two values.
    pub fn from_samples(samples: &[f64]) -> Self {
        if samples.is_empty() {
            return Self::default();
        }
        let std_dev = if samples.len() < 2 {
            0.0
        } else {
            Statistics::std_dev(samples)
        };
        Self {
            mean: Statistics::mean(samples),
            std_dev,
            min: Statistics::min(samples),
            max: Statistics::max(samples),
        }
    }
}

/// Summary of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialSummary {
    pub trials: usize,
    pub successes: usize,
    pub success_rate: f64,
    /// Trials with at least one penalty
    pub penalized_trials: usize,
    pub total_reward: SeriesStats,
    pub negative_reward: SeriesStats,
    pub trial_length: SeriesStats,
}

impl TrialSummary {
    pub fn from_records(records: &[TrialRecord]) -> Self {
        let trials = records.len();
        let successes = records.iter().filter(|r| r.reached_destination).count();
        let series = |f: fn(&TrialRecord) -> f64| -> SeriesStats {
            let samples: Vec<f64> = records.iter().map(f).collect();
            SeriesStats::from_samples(&samples)
        };

        Self {
            trials,
            successes,
            success_rate: if trials == 0 {
                0.0
            } else {
                successes as f64 / trials as f64
            },
            penalized_trials: records.iter().filter(|r| r.negative_reward < 0.0).count(),
            total_reward: series(|r| r.total_reward),
            negative_reward: series(|r| r.negative_reward),
            trial_length: series(|r| r.trial_length as f64),
        }
    }

    /// Summary of the last `n` trials only
    pub fn tail(records: &[TrialRecord], n: usize) -> Self {
        let start = records.len().saturating_sub(n);
        Self::from_records(&records[start..])
    }
}

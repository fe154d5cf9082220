//! Experiment pipeline: runs trials of a driver in an environment

use log::debug;
use serde::{Deserialize, Serialize};

use super::trials::{DEFAULT_ARRIVAL_THRESHOLD, TrialBook, TrialLog, TrialRecord, TrialStatus};
use crate::{
    Error, Result,
    ports::{Driver, Environment, ExportSnapshot, Observer, Sensation, StepEvent},
};

/// Experiment configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    /// Number of trials to run
    pub num_trials: usize,

    /// Random seed for the driver
    pub seed: Option<u64>,

    /// Reward above which a tick counts as arriving
    pub arrival_threshold: f64,

    /// Export cadence in completed trials; `None` disables exports
    pub export_every: Option<usize>,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            num_trials: 100,
            seed: None,
            arrival_threshold: DEFAULT_ARRIVAL_THRESHOLD,
            export_every: Some(100),
        }
    }
}

impl ExperimentConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.arrival_threshold.is_finite() {
            return Err(Error::InvalidConfiguration {
                message: format!(
                    "arrival threshold must be finite, got {}",
                    self.arrival_threshold
                ),
            });
        }
        if self.export_every == Some(0) {
            return Err(Error::InvalidConfiguration {
                message: "export cadence must be positive; use none to disable".to_string(),
            });
        }
        Ok(())
    }
}

/// Result of an experiment run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentResult {
    /// Driver name
    pub driver: String,

    /// Total trials run
    pub total_trials: usize,

    /// Trials that reached the destination
    pub successes: usize,

    /// Success rate
    pub success_rate: f64,

    /// Per-trial records in completion order
    pub trials: Vec<TrialRecord>,
}

impl ExperimentResult {
    /// Build a result from a finished trial log
    pub fn new(driver: impl Into<String>, log: TrialLog) -> Self {
        let total_trials = log.len();
        let successes = log.successes();
        let success_rate = if total_trials > 0 {
            successes as f64 / total_trials as f64
        } else {
            0.0
        };
        Self {
            driver: driver.into(),
            total_trials,
            successes,
            success_rate,
            trials: log.into_records(),
        }
    }

    /// Sum of negative rewards over the run
    pub fn total_penalty(&self) -> f64 {
        self.trials.iter().map(|t| t.negative_reward).sum()
    }

    /// Save result to JSON file
    pub fn save<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load result from JSON file
    pub fn load<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let result = serde_json::from_reader(file)?;
        Ok(result)
    }
}

/// Runs a driver through consecutive trials of one environment
pub struct ExperimentPipeline {
    config: ExperimentConfig,
    observers: Vec<Box<dyn Observer>>,
}

impl ExperimentPipeline {
    /// Create a new experiment pipeline
    pub fn new(config: ExperimentConfig) -> Self {
        Self {
            config,
            observers: Vec::new(),
        }
    }

    /// Add an observer to the pipeline
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn config(&self) -> &ExperimentConfig {
        &self.config
    }

    /// Run the configured number of trials
    ///
    /// The driver keeps whatever it learns across trials; the environment is
    /// reset at the start of each one.
    pub fn run(
        &mut self,
        driver: &mut dyn Driver,
        environment: &mut dyn Environment,
    ) -> Result<ExperimentResult> {
        self.config.validate()?;
        if let Some(seed) = self.config.seed {
            driver.set_rng_seed(seed)?;
        }

        let mut book = TrialBook::new(self.config.arrival_threshold, self.config.export_every);

        for observer in &mut self.observers {
            observer.on_run_start(self.config.num_trials)?;
        }

        for _ in 0..self.config.num_trials {
            self.run_trial(&mut book, driver, environment)?;

            if book.export_due() {
                let snapshot = ExportSnapshot {
                    completed_trials: book.log().len(),
                    trials: book.log().records(),
                    values: driver.value_store(),
                };
                for observer in &mut self.observers {
                    observer.on_export(&snapshot)?;
                }
            }
        }

        for observer in &mut self.observers {
            observer.on_run_end()?;
        }

        Ok(ExperimentResult::new(driver.name(), book.into_log()))
    }

    fn run_trial(
        &mut self,
        book: &mut TrialBook,
        driver: &mut dyn Driver,
        environment: &mut dyn Environment,
    ) -> Result<()> {
        environment.reset()?;
        driver.begin_trial()?;
        let trial = book.start();

        for observer in &mut self.observers {
            observer.on_trial_start(trial)?;
        }

        let mut step = 0;
        loop {
            let sensation = Sensation {
                percept: environment.sense(),
                waypoint: environment.next_waypoint(),
                deadline: environment.deadline(),
            };

            let action = driver.choose_action(&sensation)?;
            let reward = environment.act(action)?;
            driver.observe_reward(reward)?;

            debug!(
                "trial {trial} step {step}: deadline={} percept=[{}] waypoint={} action={action} reward={reward}",
                sensation.deadline, sensation.percept, sensation.waypoint
            );

            let event = StepEvent {
                trial,
                step,
                sensation,
                action,
                reward,
            };
            for observer in &mut self.observers {
                observer.on_step(&event)?;
            }
            step += 1;

            if let TrialStatus::Completed {
                reached_destination,
            } = book.record(reward, environment.deadline())?
            {
                driver.end_trial(reached_destination)?;
                if let Some(record) = book.log().last() {
                    for observer in &mut self.observers {
                        observer.on_trial_end(record)?;
                    }
                }
                return Ok(());
            }
        }
    }
}

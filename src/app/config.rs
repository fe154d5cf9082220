//! Configuration types for agent creation and experiment runs.

use std::{fs::File, io::BufReader, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    pipeline::ExperimentConfig,
    q_learning::{ExplorationSchedule, StateEncoding, TieBreak},
    sim::WorldConfig,
};

/// Configuration for creating a Q-learning agent.
///
/// This type provides a type-safe, builder-style API for configuring agents
/// before creation through the dependency injection container.
///
/// # Examples
///
/// ```
/// use smartcab::app::AgentConfig;
/// use smartcab::q_learning::TieBreak;
///
/// let config = AgentConfig::new()
///     .with_alpha(0.3)
///     .with_epsilon(0.1)
///     .with_tie_break(TieBreak::First)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Learning rate
    pub alpha: f64,
    /// Discount factor
    pub gamma: f64,
    /// Exploration scale
    pub epsilon: f64,
    /// How arg-max ties are broken
    pub tie_break: TieBreak,
    /// How percepts are turned into state keys
    pub encoding: StateEncoding,
    /// Learn the last transition of a trial with a terminal target
    pub terminal_update: bool,
    /// Random seed for reproducibility
    pub seed: Option<u64>,
}

impl AgentConfig {
    /// Create a new agent configuration.
    ///
    /// Uses default values:
    /// - alpha, gamma, epsilon: 0.5
    /// - Tie break: `TieBreak::Random`
    /// - Encoding: `StateEncoding::Full`
    /// - Terminal update: off
    /// - Seed: None (non-deterministic)
    pub fn new() -> Self {
        Self {
            alpha: 0.5,
            gamma: 0.5,
            epsilon: ExplorationSchedule::default().epsilon(),
            tie_break: TieBreak::default(),
            encoding: StateEncoding::default(),
            terminal_update: false,
            seed: None,
        }
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_gamma(mut self, gamma: f64) -> Self {
        self.gamma = gamma;
        self
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    pub fn with_encoding(mut self, encoding: StateEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn with_terminal_update(mut self, enabled: bool) -> Self {
        self.terminal_update = enabled;
        self
    }

    /// Set the random seed for deterministic behavior.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check that every hyper-parameter lies in (0, 1].
    pub fn validate(&self) -> Result<()> {
        for (parameter, value) in [
            ("alpha", self.alpha),
            ("gamma", self.gamma),
            ("epsilon", self.epsilon),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(Error::ParameterOutOfRange {
                    parameter: parameter.to_string(),
                    value,
                });
            }
        }
        Ok(())
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Agent, world and experiment settings for one run, as stored in a JSON file.
///
/// Missing sections and fields take their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub agent: AgentConfig,
    pub world: WorldConfig,
    pub experiment: ExperimentConfig,
}

impl RunConfig {
    /// Load and validate a configuration file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| Error::Io {
            operation: format!("open config {}", path.display()),
            source,
        })?;
        let config: Self = serde_json::from_reader(BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.agent.validate()?;
        self.world.validate()?;
        self.experiment.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AgentConfig::default();
        assert_eq!(config.alpha, 0.5);
        assert_eq!(config.gamma, 0.5);
        assert_eq!(config.epsilon, 0.5);
        assert_eq!(config.tie_break, TieBreak::Random);
        assert_eq!(config.encoding, StateEncoding::Full);
        assert!(!config.terminal_update);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        assert!(AgentConfig::new().with_alpha(0.0).validate().is_err());
        assert!(AgentConfig::new().with_gamma(1.5).validate().is_err());
        assert!(AgentConfig::new().with_epsilon(f64::NAN).validate().is_err());
        assert!(AgentConfig::new().with_alpha(1.0).validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{"agent": {"alpha": 0.1, "tie_break": "least-visited"}, "experiment": {"num_trials": 7}}"#;
        let config: RunConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.agent.alpha, 0.1);
        assert_eq!(config.agent.gamma, 0.5);
        assert_eq!(config.agent.tie_break, TieBreak::LeastVisited);
        assert!(!config.agent.terminal_update);
        assert_eq!(config.experiment.num_trials, 7);
        assert_eq!(config.experiment.export_every, Some(100));
        assert_eq!(config.world, WorldConfig::default());
    }
}

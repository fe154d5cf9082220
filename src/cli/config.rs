//! Shared configuration flags for CLI commands

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use crate::{
    app::RunConfig,
    q_learning::{StateEncoding, TieBreak},
};

/// Flags that override a run configuration file
///
/// Every flag is optional; anything not given keeps the value from
/// `--config`, or the built-in default when no file is given.
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// JSON run configuration (agent, world and experiment sections)
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Number of trials
    #[arg(long, short = 't')]
    pub trials: Option<usize>,

    /// Random seed for reproducibility (the world uses seed + 1)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Learning rate α (0.0-1.0]
    #[arg(long)]
    pub alpha: Option<f64>,

    /// Discount factor γ (0.0-1.0]
    #[arg(long)]
    pub gamma: Option<f64>,

    /// Exploration scale ε (0.0-1.0]
    #[arg(long)]
    pub epsilon: Option<f64>,

    /// Arg-max tie-breaking (first, random, least-visited)
    #[arg(long)]
    pub tie_break: Option<TieBreak>,

    /// State key encoding (full or reduced)
    #[arg(long)]
    pub encoding: Option<StateEncoding>,

    /// Learn the last transition of each trial with a terminal target
    #[arg(long, default_value_t = false)]
    pub terminal_update: bool,

    /// Reward above which a tick counts as arriving
    #[arg(long)]
    pub arrival_threshold: Option<f64>,

    /// Export reports every N completed trials
    #[arg(long)]
    pub export_every: Option<usize>,

    /// Disable periodic exports
    #[arg(long, default_value_t = false, conflicts_with = "export_every")]
    pub no_export: bool,

    /// Background cars in the world
    #[arg(long)]
    pub dummy_cars: Option<usize>,
}

impl RunArgs {
    /// Load the configuration file, if any, then apply the flags.
    pub fn resolve(&self) -> Result<RunConfig> {
        let mut config = match &self.config {
            Some(path) => RunConfig::from_json_file(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => RunConfig::default(),
        };

        if let Some(trials) = self.trials {
            config.experiment.num_trials = trials;
        }
        if let Some(seed) = self.seed {
            config.experiment.seed = Some(seed);
            config.agent.seed = Some(seed);
        }
        if let Some(alpha) = self.alpha {
            config.agent.alpha = alpha;
        }
        if let Some(gamma) = self.gamma {
            config.agent.gamma = gamma;
        }
        if let Some(epsilon) = self.epsilon {
            config.agent.epsilon = epsilon;
        }
        if let Some(tie_break) = self.tie_break {
            config.agent.tie_break = tie_break;
        }
        if let Some(encoding) = self.encoding {
            config.agent.encoding = encoding;
        }
        if self.terminal_update {
            config.agent.terminal_update = true;
        }
        if let Some(threshold) = self.arrival_threshold {
            config.experiment.arrival_threshold = threshold;
        }
        if let Some(every) = self.export_every {
            config.experiment.export_every = Some(every);
        }
        if self.no_export {
            config.experiment.export_every = None;
        }
        if let Some(dummy_cars) = self.dummy_cars {
            config.world.dummy_cars = dummy_cars;
        }

        config.validate().context("invalid run configuration")?;
        Ok(config)
    }

    /// Names of the agent flags that were given on the command line.
    pub fn agent_overrides(&self) -> Vec<&'static str> {
        [
            ("--alpha", self.alpha.is_some()),
            ("--gamma", self.gamma.is_some()),
            ("--epsilon", self.epsilon.is_some()),
            ("--tie-break", self.tie_break.is_some()),
            ("--encoding", self.encoding.is_some()),
            ("--terminal-update", self.terminal_update),
        ]
        .into_iter()
        .filter_map(|(flag, given)| given.then_some(flag))
        .collect()
    }

    /// Seed for the grid world, derived from the experiment seed.
    pub fn world_seed(config: &RunConfig) -> Option<u64> {
        config.experiment.seed.map(|seed| seed.wrapping_add(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_defaults() {
        let args = RunArgs {
            trials: Some(12),
            seed: Some(7),
            alpha: Some(0.1),
            no_export: true,
            ..RunArgs::default()
        };
        let config = args.resolve().unwrap();
        assert_eq!(config.experiment.num_trials, 12);
        assert_eq!(config.experiment.seed, Some(7));
        assert_eq!(config.agent.seed, Some(7));
        assert_eq!(config.agent.alpha, 0.1);
        assert_eq!(config.experiment.export_every, None);
        assert_eq!(RunArgs::world_seed(&config), Some(8));
    }

    #[test]
    fn test_agent_overrides_lists_given_agent_flags() {
        assert!(RunArgs::default().agent_overrides().is_empty());

        let world_only = RunArgs {
            trials: Some(3),
            seed: Some(1),
            dummy_cars: Some(0),
            ..RunArgs::default()
        };
        assert!(world_only.agent_overrides().is_empty());

        let args = RunArgs {
            alpha: Some(0.1),
            tie_break: Some(TieBreak::First),
            terminal_update: true,
            ..RunArgs::default()
        };
        assert_eq!(
            args.agent_overrides(),
            vec!["--alpha", "--tie-break", "--terminal-update"]
        );
        assert!(args.resolve().unwrap().agent.terminal_update);
    }

    #[test]
    fn test_invalid_override_fails() {
        let args = RunArgs {
            epsilon: Some(0.0),
            ..RunArgs::default()
        };
        assert!(args.resolve().is_err());
    }
}

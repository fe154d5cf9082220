//! Comparison framework for evaluating multiple drivers
//!
//! This module provides the baseline drivers used as reference points for the
//! learning agent, and a framework that runs several drivers through the same
//! seeded worlds:
//! - Random baseline
//! - Naive waypoint follower
//! - Informed waypoint follower that respects the traffic rules

use rand::{SeedableRng, random, rngs::StdRng, seq::IndexedRandom};
use serde::{Deserialize, Serialize};

use super::experiment::{ExperimentConfig, ExperimentPipeline, ExperimentResult};
use crate::{
    Result,
    ports::{Driver, Sensation},
    sim::{GridWorld, WorldConfig},
    traffic::{Action, is_legal},
};

/// Random policy driver (baseline)
pub struct RandomDriver {
    name: String,
    rng: StdRng,
}

impl RandomDriver {
    /// Create a new random driver
    pub fn new() -> Self {
        Self {
            name: "Random".to_string(),
            rng: StdRng::seed_from_u64(random()),
        }
    }

    /// Create a new random driver with a deterministic seed
    pub fn with_seed(seed: u64) -> Self {
        Self {
            name: "Random".to_string(),
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl Driver for RandomDriver {
    fn choose_action(&mut self, _sensation: &Sensation) -> Result<Action> {
        Ok(*Action::ALL.choose(&mut self.rng).unwrap_or(&Action::None))
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn set_rng_seed(&mut self, seed: u64) -> Result<()> {
        self.rng = StdRng::seed_from_u64(seed);
        Ok(())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

/// Always follows the planner's waypoint, ignoring lights and traffic
#[derive(Debug, Default)]
pub struct NaiveDriver;

impl NaiveDriver {
    pub fn new() -> Self {
        Self
    }
}

impl Driver for NaiveDriver {
    fn choose_action(&mut self, sensation: &Sensation) -> Result<Action> {
        Ok(sensation.waypoint)
    }

    fn name(&self) -> &str {
        "Naive"
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

/// Follows the waypoint when the move is legal, otherwise waits
///
/// This is the hand-written policy a well-trained agent should converge to.
#[derive(Debug, Default)]
pub struct InformedDriver;

impl InformedDriver {
    pub fn new() -> Self {
        Self
    }
}

impl Driver for InformedDriver {
    fn choose_action(&mut self, sensation: &Sensation) -> Result<Action> {
        sensation.percept.validate()?;
        if is_legal(&sensation.percept, sensation.waypoint) {
            Ok(sensation.waypoint)
        } else {
            Ok(Action::None)
        }
    }

    fn name(&self) -> &str {
        "Informed"
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

/// Aggregate outcome of one driver in a comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverOutcome {
    pub name: String,
    pub trials: usize,
    pub successes: usize,
    pub success_rate: f64,
    pub mean_reward: f64,
    pub total_penalty: f64,
}

impl DriverOutcome {
    fn from_result(result: &ExperimentResult) -> Self {
        let mean_reward = if result.trials.is_empty() {
            0.0
        } else {
            result.trials.iter().map(|t| t.total_reward).sum::<f64>() / result.trials.len() as f64
        };
        Self {
            name: result.driver.clone(),
            trials: result.total_trials,
            successes: result.successes,
            success_rate: result.success_rate,
            mean_reward,
            total_penalty: result.total_penalty(),
        }
    }
}

/// Result of comparing multiple drivers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonResult {
    /// Per-driver outcomes in the order the drivers were given
    pub outcomes: Vec<DriverOutcome>,

    /// World seed every driver was run against
    pub world_seed: u64,
}

impl ComparisonResult {
    /// The driver with the highest success rate, penalties breaking ties
    pub fn best(&self) -> Option<&DriverOutcome> {
        self.outcomes.iter().max_by(|a, b| {
            a.success_rate
                .total_cmp(&b.success_rate)
                .then(a.total_penalty.total_cmp(&b.total_penalty))
        })
    }
}

/// Framework for comparing multiple drivers
pub struct ComparisonFramework {
    drivers: Vec<Box<dyn Driver>>,
    world: WorldConfig,
    experiment: ExperimentConfig,
    world_seed: u64,
}

impl ComparisonFramework {
    /// Create a new comparison framework
    pub fn new(drivers: Vec<Box<dyn Driver>>, world: WorldConfig) -> Self {
        Self {
            drivers,
            world,
            experiment: ExperimentConfig {
                export_every: None,
                ..ExperimentConfig::default()
            },
            world_seed: 0,
        }
    }

    /// Configure trial count, driver seed and arrival threshold
    pub fn with_experiment(mut self, experiment: ExperimentConfig) -> Self {
        self.experiment = experiment;
        self
    }

    /// Seed shared by every driver's world
    pub fn with_world_seed(mut self, seed: u64) -> Self {
        self.world_seed = seed;
        self
    }

    /// Run every driver for the configured number of trials
    pub fn compare(&mut self) -> Result<ComparisonResult> {
        let mut outcomes = Vec::with_capacity(self.drivers.len());
        for driver in &mut self.drivers {
            let mut world = GridWorld::new(self.world)?.with_seed(self.world_seed);
            let mut pipeline = ExperimentPipeline::new(self.experiment.clone());
            let result = pipeline.run(driver.as_mut(), &mut world)?;
            outcomes.push(DriverOutcome::from_result(&result));
        }
        Ok(ComparisonResult {
            outcomes,
            world_seed: self.world_seed,
        })
    }

    /// Access the drivers after a comparison, e.g. to export a learned table
    pub fn drivers(&self) -> &[Box<dyn Driver>] {
        &self.drivers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traffic::{Light, Percept};

    fn sensation(light: Light, waypoint: Action) -> Sensation {
        Sensation {
            percept: Percept::clear(light),
            waypoint,
            deadline: 10,
        }
    }

    #[test]
    fn test_naive_driver_follows_waypoint() {
        let mut driver = NaiveDriver::new();
        let action = driver
            .choose_action(&sensation(Light::Red, Action::Forward))
            .unwrap();
        assert_eq!(action, Action::Forward);
    }

    #[test]
    fn test_informed_driver_waits_at_red() {
        let mut driver = InformedDriver::new();
        assert_eq!(
            driver
                .choose_action(&sensation(Light::Red, Action::Forward))
                .unwrap(),
            Action::None
        );
        assert_eq!(
            driver
                .choose_action(&sensation(Light::Red, Action::Right))
                .unwrap(),
            Action::Right
        );
        assert_eq!(
            driver
                .choose_action(&sensation(Light::Green, Action::Left))
                .unwrap(),
            Action::Left
        );
    }

    #[test]
    fn test_random_driver_is_reproducible() {
        let mut a = RandomDriver::with_seed(9);
        let mut b = RandomDriver::with_seed(9);
        let s = sensation(Light::Green, Action::Forward);
        for _ in 0..20 {
            assert_eq!(a.choose_action(&s).unwrap(), b.choose_action(&s).unwrap());
        }
    }

    #[test]
    fn test_comparison_runs_every_driver() {
        let drivers: Vec<Box<dyn Driver>> = vec![
            Box::new(RandomDriver::with_seed(1)),
            Box::new(InformedDriver::new()),
        ];
        let mut framework = ComparisonFramework::new(drivers, WorldConfig::default())
            .with_experiment(ExperimentConfig {
                num_trials: 10,
                seed: Some(3),
                export_every: None,
                ..ExperimentConfig::default()
            })
            .with_world_seed(11);

        let result = framework.compare().unwrap();

        assert_eq!(result.outcomes.len(), 2);
        assert_eq!(result.outcomes[0].name, "Random");
        assert_eq!(result.outcomes[1].name, "Informed");
        assert!(result.outcomes.iter().all(|o| o.trials == 10));
        assert!(result.best().is_some());
    }
}

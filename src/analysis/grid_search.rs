//! Hyper-parameter grid search ranked by penalty score

use log::info;
use serde::{Deserialize, Serialize};

use super::penalty::penalty_score;
use crate::{
    Result,
    app::AgentConfig,
    pipeline::{ExperimentConfig, ExperimentPipeline},
    q_learning::QLearningAgent,
    sim::{GridWorld, WorldConfig},
};

/// Values tried for each of alpha, gamma and epsilon by default
pub const DEFAULT_SEARCH_VALUES: [f64; 8] = [0.01, 0.03, 0.05, 0.07, 0.1, 0.3, 0.5, 0.7];

/// Outcome of one grid point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridPoint {
    pub alpha: f64,
    pub gamma: f64,
    pub epsilon: f64,
    pub penalty: f64,
    pub success_rate: f64,
}

/// All grid points in search order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GridSearchResult {
    pub points: Vec<GridPoint>,
}

impl GridSearchResult {
    /// Point with the lowest penalty; the earliest wins a tie
    pub fn best(&self) -> Option<&GridPoint> {
        self.points.iter().reduce(|best, point| {
            if point.penalty < best.penalty {
                point
            } else {
                best
            }
        })
    }
}

/// One experiment per (alpha, gamma, epsilon) combination
#[derive(Debug, Clone)]
pub struct GridSearch {
    values: Vec<f64>,
    agent: AgentConfig,
    world: WorldConfig,
    experiment: ExperimentConfig,
    world_seed: u64,
}

impl GridSearch {
    /// Search over [`DEFAULT_SEARCH_VALUES`] with default settings
    pub fn new() -> Self {
        Self {
            values: DEFAULT_SEARCH_VALUES.to_vec(),
            agent: AgentConfig::default(),
            world: WorldConfig::default(),
            experiment: ExperimentConfig {
                export_every: None,
                ..ExperimentConfig::default()
            },
            world_seed: 0,
        }
    }

    pub fn with_values(mut self, values: Vec<f64>) -> Self {
        self.values = values;
        self
    }

    /// Template for every agent; alpha, gamma and epsilon are overridden
    pub fn with_agent(mut self, agent: AgentConfig) -> Self {
        self.agent = agent;
        self
    }

    pub fn with_world(mut self, world: WorldConfig) -> Self {
        self.world = world;
        self
    }

    pub fn with_experiment(mut self, experiment: ExperimentConfig) -> Self {
        self.experiment = experiment;
        self
    }

    pub fn with_world_seed(mut self, seed: u64) -> Self {
        self.world_seed = seed;
        self
    }

    /// Number of experiments [`GridSearch::run`] will perform
    pub fn size(&self) -> usize {
        self.values.len().pow(3)
    }

    /// Run every combination; `on_point` is called after each one
    pub fn run(&self, mut on_point: impl FnMut(&GridPoint)) -> Result<GridSearchResult> {
        let mut result = GridSearchResult::default();
        for &alpha in &self.values {
            for &gamma in &self.values {
                for &epsilon in &self.values {
                    let point = self.run_point(alpha, gamma, epsilon)?;
                    on_point(&point);
                    result.points.push(point);
                }
            }
        }
        if let Some(best) = result.best() {
            info!(
                "grid search best: alpha={} gamma={} epsilon={} penalty={}",
                best.alpha, best.gamma, best.epsilon, best.penalty
            );
        }
        Ok(result)
    }

    fn run_point(&self, alpha: f64, gamma: f64, epsilon: f64) -> Result<GridPoint> {
        let config = self
            .agent
            .clone()
            .with_alpha(alpha)
            .with_gamma(gamma)
            .with_epsilon(epsilon);
        let mut agent = QLearningAgent::from_config(&config)?;
        let mut world = GridWorld::new(self.world)?.with_seed(self.world_seed);
        let run = ExperimentPipeline::new(self.experiment.clone()).run(&mut agent, &mut world)?;
        Ok(GridPoint {
            alpha,
            gamma,
            epsilon,
            penalty: penalty_score(&run.trials),
            success_rate: run.success_rate,
        })
    }
}

impl Default for GridSearch {
    fn default() -> Self {
        Self::new()
    }
}

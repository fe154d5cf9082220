//! Serialization support for trained Q-learning agents.

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    q_learning::agent::{QAgentState, QLearningAgent},
};

/// Training provenance stored next to the tables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingMetadata {
    /// Number of trials trained
    pub trials_trained: Option<usize>,
    /// Trials that reached the destination
    pub successes: Option<usize>,
    /// Random seed used (if any)
    pub seed: Option<u64>,
}

/// Versioned dump of an agent's tables and hyper-parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedQAgent {
    pub version: u32,
    state: QAgentState,
    pub metadata: TrainingMetadata,
}

impl SavedQAgent {
    pub const VERSION: u32 = 1;

    pub fn from_agent(agent: &QLearningAgent, metadata: TrainingMetadata) -> Self {
        Self {
            version: Self::VERSION,
            state: agent.export_state(),
            metadata,
        }
    }

    /// Rebuild the agent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] for an unknown format version
    /// and [`Error::ParameterOutOfRange`] when a saved hyper-parameter falls
    /// outside its range.
    pub fn to_agent(&self) -> Result<QLearningAgent> {
        if self.version != Self::VERSION {
            return Err(Error::InvalidConfiguration {
                message: format!(
                    "unsupported agent save format version: {}. Expected {}",
                    self.version,
                    Self::VERSION
                ),
            });
        }
        QLearningAgent::from_state(self.state.clone())
    }

    /// Number of states in the saved Q-table.
    pub fn state_count(&self) -> usize {
        self.state.store.state_count()
    }
}

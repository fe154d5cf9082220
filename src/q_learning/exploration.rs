//! Deadline- and visit-driven exploration probability.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Exploration probability schedule.
///
/// `p = clamp(epsilon * deadline / max(1, max_n), 0, 1)`: more time left
/// means more room to experiment, more visits means less need to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExplorationSchedule {
    epsilon: f64,
}

impl ExplorationSchedule {
    /// # Errors
    ///
    /// Returns [`Error::ParameterOutOfRange`] unless `0 < epsilon <= 1`.
    pub fn new(epsilon: f64) -> Result<Self> {
        if epsilon > 0.0 && epsilon <= 1.0 {
            Ok(Self { epsilon })
        } else {
            Err(Error::ParameterOutOfRange {
                parameter: "epsilon".to_string(),
                value: epsilon,
            })
        }
    }

    /// A schedule that never explores.
    pub const fn greedy() -> Self {
        Self { epsilon: 0.0 }
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Probability of exploring in a state whose best-visited action has
    /// been tried `max_n` times, with `deadline` ticks remaining.
    pub fn probability(&self, deadline: i64, max_n: u32) -> f64 {
        let visits = f64::from(max_n.max(1));
        let p = self.epsilon * deadline as f64 / visits;
        p.clamp(0.0, 1.0)
    }
}

impl Default for ExplorationSchedule {
    fn default() -> Self {
        Self { epsilon: 0.5 }
    }
}

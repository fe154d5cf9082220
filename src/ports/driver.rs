//! Driver port - abstraction for anything that can steer the cab
//!
//! This port defines the interface shared by the learning agent and the
//! baseline drivers, so the experiment pipeline can run and compare them
//! without knowing which one it holds.

use serde::{Deserialize, Serialize};

use crate::{
    Result,
    q_learning::ValueStore,
    traffic::{Action, Percept},
};

/// Everything the environment hands a driver on one tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sensation {
    /// Light and surrounding traffic
    pub percept: Percept,
    /// Heading suggested by the route planner
    pub waypoint: Action,
    /// Ticks remaining before the trial is failed
    pub deadline: i64,
}

/// Driver trait - Unified interface for all driving strategies
///
/// # Tick Sequence
///
/// 1. `begin_trial()` - Once when a trial starts
/// 2. For each tick:
///    - `choose_action(sensation)`
///    - `observe_reward(reward)` - Reward returned by the environment
/// 3. `end_trial(reached_destination)` - Once when the trial completes
///
/// # Examples
///
/// ```no_run
/// use smartcab::{
///     ports::{Driver, Sensation},
///     traffic::Action,
/// };
///
/// struct AlwaysWait;
///
/// impl Driver for AlwaysWait {
///     fn choose_action(&mut self, _sensation: &Sensation) -> smartcab::Result<Action> {
///         Ok(Action::None)
///     }
///
///     fn name(&self) -> &str {
///         "AlwaysWait"
///     }
///
///     fn as_any(&self) -> &dyn std::any::Any {
///         self
///     }
/// }
/// ```
pub trait Driver: Send {
    /// Prepare for a new trip.
    ///
    /// # Default Implementation
    ///
    /// Does nothing, suitable for memoryless drivers.
    fn begin_trial(&mut self) -> Result<()> {
        Ok(())
    }

    /// Pick the action for this tick.
    ///
    /// # Errors
    ///
    /// Returns an error if the sensation is malformed.
    fn choose_action(&mut self, sensation: &Sensation) -> Result<Action>;

    /// Receive the reward for the action just chosen.
    fn observe_reward(&mut self, _reward: f64) -> Result<()> {
        Ok(())
    }

    /// Called once the trial has completed.
    ///
    /// Adaptive drivers use this to learn from the final transition.
    fn end_trial(&mut self, _reached_destination: bool) -> Result<()> {
        Ok(())
    }

    /// Get the driver's name.
    ///
    /// Used for identification in comparisons and logging.
    fn name(&self) -> &str;

    /// Seed the driver's internal random number generator.
    ///
    /// # Default Implementation
    ///
    /// Does nothing and returns `Ok(())`.
    fn set_rng_seed(&mut self, _seed: u64) -> Result<()> {
        Ok(())
    }

    /// Enable downcasting to concrete types.
    fn as_any(&self) -> &dyn std::any::Any;

    /// Read-only view of the learned tables, if the driver has any.
    fn value_store(&self) -> Option<&ValueStore> {
        None
    }
}

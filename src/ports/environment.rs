//! Environment port - the simulation the cab drives in
//!
//! The learning core never depends on a concrete world. Anything that can
//! report a percept, a deadline and a waypoint, and score an action, can host
//! a trial.

use crate::{
    Result,
    traffic::{Action, Percept},
};

/// Reward for a legal move along the planned route.
pub const REWARD_ON_ROUTE: f64 = 2.0;
/// Reward for a legal move off the planned route.
pub const REWARD_OFF_ROUTE: f64 = -0.5;
/// Reward for a legal wait.
pub const REWARD_WAIT: f64 = 0.0;
/// Reward for breaking a traffic rule.
pub const REWARD_ILLEGAL: f64 = -1.0;
/// Bonus added when the destination is reached in time.
pub const REWARD_ARRIVAL_BONUS: f64 = 10.0;

/// Sensing/acting interface consumed by the experiment pipeline.
///
/// # Reward contract
///
/// [`Environment::act`] returns [`REWARD_ON_ROUTE`], [`REWARD_OFF_ROUTE`],
/// [`REWARD_WAIT`] or [`REWARD_ILLEGAL`], plus [`REWARD_ARRIVAL_BONUS`] on the
/// tick the destination is reached. Any reward above the arrival threshold
/// (2.0 by default) therefore signals arrival.
pub trait Environment {
    /// Start a new trip with a fresh start, destination and deadline.
    fn reset(&mut self) -> Result<()>;

    /// What the cab senses at its current intersection.
    fn sense(&self) -> Percept;

    /// Ticks remaining before the trip is failed.
    fn deadline(&self) -> i64;

    /// Heading suggested by the route planner; [`Action::None`] at the
    /// destination.
    fn next_waypoint(&self) -> Action;

    /// Execute the cab's action, advance the world one tick and return the
    /// reward.
    fn act(&mut self, action: Action) -> Result<f64>;
}

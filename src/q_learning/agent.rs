//! Q-learning driver
//!
//! Owns the value tables and the hyper-parameters for one run, and applies
//! the one-step Q-learning update to the previous transition as soon as the
//! successor state is known.

use log::debug;
use rand::{SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    app::AgentConfig,
    ports::{Driver, Sensation},
    q_learning::{
        exploration::ExplorationSchedule,
        policy::{Policy, TieBreak},
        state::{StateEncoder, StateEncoding, StateKey},
        value_store::ValueStore,
    },
    traffic::Action,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct QAgentState {
    pub store: ValueStore,
    pub alpha: f64,
    pub gamma: f64,
    pub schedule: ExplorationSchedule,
    pub policy: Policy,
    pub encoder: StateEncoder,
    #[serde(default)]
    pub terminal_update: bool,
    pub rng_seed: Option<u64>,
}

/// A state-action pair whose reward has been observed but whose successor
/// state is not yet known.
#[derive(Debug, Clone, PartialEq)]
struct Transition {
    state: StateKey,
    action: Action,
    reward: f64,
}

fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

pub(crate) fn check_unit_interval(parameter: &str, value: f64) -> Result<f64> {
    if value > 0.0 && value <= 1.0 {
        Ok(value)
    } else {
        Err(Error::ParameterOutOfRange {
            parameter: parameter.to_string(),
            value,
        })
    }
}

/// Q-learning agent (off-policy TD control)
///
/// Learns by always updating toward the maximum next-state value,
/// regardless of the action actually taken next.
#[derive(Debug, Clone)]
pub struct QLearningAgent {
    store: ValueStore,
    alpha: f64,
    gamma: f64,
    schedule: ExplorationSchedule,
    policy: Policy,
    encoder: StateEncoder,
    terminal_update: bool,
    learning: bool,
    awaiting_reward: Option<(StateKey, Action)>,
    previous: Option<Transition>,
    rng: StdRng,
    rng_seed: Option<u64>,
}

impl QLearningAgent {
    /// Create a new Q-learning agent
    ///
    /// # Arguments
    ///
    /// * `alpha` - learning rate, in (0, 1]
    /// * `gamma` - discount factor, in (0, 1]
    /// * `epsilon` - exploration scale, in (0, 1]
    ///
    /// # Errors
    ///
    /// Returns [`Error::ParameterOutOfRange`] for a parameter outside (0, 1].
    pub fn new(alpha: f64, gamma: f64, epsilon: f64) -> Result<Self> {
        Ok(Self {
            store: ValueStore::new(),
            alpha: check_unit_interval("alpha", alpha)?,
            gamma: check_unit_interval("gamma", gamma)?,
            schedule: ExplorationSchedule::new(epsilon)?,
            policy: Policy::default(),
            encoder: StateEncoder::default(),
            terminal_update: false,
            learning: true,
            awaiting_reward: None,
            previous: None,
            rng: build_rng(None),
            rng_seed: None,
        })
    }

    /// Build an agent from a validated configuration.
    pub fn from_config(config: &AgentConfig) -> Result<Self> {
        let mut agent = Self::new(config.alpha, config.gamma, config.epsilon)?
            .with_tie_break(config.tie_break)
            .with_encoding(config.encoding)
            .with_terminal_update(config.terminal_update);
        if let Some(seed) = config.seed {
            agent = agent.with_seed(seed);
        }
        Ok(agent)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self.rng_seed = Some(seed);
        self
    }

    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.policy = Policy::new(tie_break);
        self
    }

    pub fn with_encoding(mut self, encoding: StateEncoding) -> Self {
        self.encoder = StateEncoder::new(encoding);
        self
    }

    /// Also learn the last transition of a trial, with no successor value.
    ///
    /// Off by default: the pending transition is dropped when a trial ends.
    pub fn with_terminal_update(mut self, enabled: bool) -> Self {
        self.terminal_update = enabled;
        self
    }

    /// Stop learning and exploring; the agent only exploits its tables.
    pub fn frozen(mut self) -> Self {
        self.learning = false;
        self.schedule = ExplorationSchedule::greedy();
        self
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    pub fn epsilon(&self) -> f64 {
        self.schedule.epsilon()
    }

    pub fn is_learning(&self) -> bool {
        self.learning
    }

    pub fn encoding(&self) -> StateEncoding {
        self.encoder.encoding()
    }

    pub fn tie_break(&self) -> TieBreak {
        self.policy.tie_break()
    }

    pub fn terminal_update(&self) -> bool {
        self.terminal_update
    }

    pub fn store(&self) -> &ValueStore {
        &self.store
    }

    /// Exploration probability for a state given the remaining deadline.
    pub fn exploration_probability(&self, state: &StateKey, deadline: i64) -> f64 {
        self.schedule.probability(deadline, self.store.max_n(state))
    }

    /// One-step Q-learning update of `(state, action)` toward
    /// `reward + gamma * max_q(next_state)`.
    ///
    /// A `next_state` of `None` marks a terminal transition whose successor is
    /// worth nothing. Returns the new Q-value.
    pub fn learning_update(
        &mut self,
        state: StateKey,
        action: Action,
        reward: f64,
        next_state: Option<&StateKey>,
    ) -> f64 {
        let visits = self.store.increment_n(state.clone(), action);
        let old_q = self.store.get_q(&state, action);
        let next_value = next_state.map_or(0.0, |next| self.store.max_q(next));
        let target = reward + self.gamma * next_value;
        let new_q = (1.0 - self.alpha) * old_q + self.alpha * target;
        debug!(
            "update Q({state}, {action}) {old_q:.4} -> {new_q:.4} (reward {reward}, n {visits})"
        );
        self.store.set_q(state, action, new_q);
        new_q
    }

    pub(crate) fn export_state(&self) -> QAgentState {
        QAgentState {
            store: self.store.clone(),
            alpha: self.alpha,
            gamma: self.gamma,
            schedule: self.schedule,
            policy: self.policy,
            encoder: self.encoder,
            terminal_update: self.terminal_update,
            rng_seed: self.rng_seed,
        }
    }

    /// Rebuild an agent from saved state, re-checking the hyper-parameters.
    ///
    /// A saved epsilon of 0 is accepted: it is what a frozen agent stores.
    pub(crate) fn from_state(state: QAgentState) -> Result<Self> {
        let alpha = check_unit_interval("alpha", state.alpha)?;
        let gamma = check_unit_interval("gamma", state.gamma)?;
        let epsilon = state.schedule.epsilon();
        if !(0.0..=1.0).contains(&epsilon) {
            return Err(Error::ParameterOutOfRange {
                parameter: "epsilon".to_string(),
                value: epsilon,
            });
        }
        Ok(Self {
            store: state.store,
            alpha,
            gamma,
            schedule: state.schedule,
            policy: state.policy,
            encoder: state.encoder,
            terminal_update: state.terminal_update,
            learning: true,
            awaiting_reward: None,
            previous: None,
            rng: build_rng(state.rng_seed),
            rng_seed: state.rng_seed,
        })
    }
}

impl Driver for QLearningAgent {
    fn begin_trial(&mut self) -> Result<()> {
        self.awaiting_reward = None;
        self.previous = None;
        Ok(())
    }

    fn choose_action(&mut self, sensation: &Sensation) -> Result<Action> {
        let (_, key) = self
            .encoder
            .encode_key(&sensation.percept, sensation.waypoint)?;

        // The previous transition can only be learned once its successor is known
        if let Some(prev) = self.previous.take() {
            if self.learning {
                self.learning_update(prev.state, prev.action, prev.reward, Some(&key));
            }
        }

        let exploration = self.exploration_probability(&key, sensation.deadline);
        let action = self
            .policy
            .choose(&self.store, &key, exploration, &mut self.rng);
        debug!(
            "deadline = {}, inputs = {}, state = {key}, p_explore = {exploration:.3}, action = {action}",
            sensation.deadline, sensation.percept
        );

        self.awaiting_reward = Some((key, action));
        Ok(action)
    }

    fn observe_reward(&mut self, reward: f64) -> Result<()> {
        let (state, action) = self.awaiting_reward.take().ok_or(Error::NoPendingAction)?;
        debug!("reward = {reward}");
        self.previous = Some(Transition {
            state,
            action,
            reward,
        });
        Ok(())
    }

    fn end_trial(&mut self, _reached_destination: bool) -> Result<()> {
        self.awaiting_reward = None;
        if let Some(last) = self.previous.take() {
            if self.learning && self.terminal_update {
                self.learning_update(last.state, last.action, last.reward, None);
            } else {
                debug!("dropping final transition of the trial");
            }
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "Q-Learning"
    }

    fn set_rng_seed(&mut self, seed: u64) -> Result<()> {
        self.rng = StdRng::seed_from_u64(seed);
        self.rng_seed = Some(seed);
        Ok(())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn value_store(&self) -> Option<&ValueStore> {
        Some(&self.store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traffic::{Light, Percept};

    fn sensation(light: Light, waypoint: Action, deadline: i64) -> Sensation {
        Sensation {
            percept: Percept::clear(light),
            waypoint,
            deadline,
        }
    }

    fn key_for(agent: &QLearningAgent, s: &Sensation) -> StateKey {
        agent
            .encoder
            .encode_key(&s.percept, s.waypoint)
            .unwrap()
            .1
    }

    #[test]
    fn test_update_correctness() {
        let mut agent = QLearningAgent::new(0.5, 0.5, 0.5).unwrap();
        let prev = key_for(&agent, &sensation(Light::Green, Action::Forward, 10));
        let next = key_for(&agent, &sensation(Light::Red, Action::Left, 10));
        agent.store.set_q(next.clone(), Action::Right, 4.0);

        let new_q = agent.learning_update(prev.clone(), Action::Forward, 10.0, Some(&next));

        assert!((new_q - 6.0).abs() < 1e-12);
        assert_eq!(agent.store().get_q(&prev, Action::Forward), new_q);
        assert_eq!(agent.store().get_n(&prev, Action::Forward), 1);
    }

    #[test]
    fn test_update_bootstraps_from_max_not_taken_action() {
        let mut agent = QLearningAgent::new(1.0, 0.5, 0.5).unwrap();
        let prev = key_for(&agent, &sensation(Light::Green, Action::Forward, 10));
        let next = key_for(&agent, &sensation(Light::Green, Action::Right, 10));
        agent.store.set_q(next.clone(), Action::Left, 8.0);
        agent.store.set_q(next.clone(), Action::None, -3.0);

        let new_q = agent.learning_update(prev, Action::Forward, 1.0, Some(&next));
        assert!((new_q - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_first_tick_does_not_learn() {
        let mut agent = QLearningAgent::new(0.5, 0.5, 0.5).unwrap().with_seed(1);
        agent.begin_trial().unwrap();
        agent
            .choose_action(&sensation(Light::Green, Action::Forward, 20))
            .unwrap();
        assert_eq!(agent.store().total_visits(), 0);
        assert_eq!(agent.store().state_count(), 0);
    }

    #[test]
    fn test_second_tick_learns_previous_transition() {
        let mut agent = QLearningAgent::new(0.5, 0.5, 0.5).unwrap().with_seed(2);
        let first = sensation(Light::Green, Action::Forward, 20);
        let first_key = key_for(&agent, &first);

        agent.begin_trial().unwrap();
        let action = agent.choose_action(&first).unwrap();
        agent.observe_reward(2.0).unwrap();
        agent
            .choose_action(&sensation(Light::Red, Action::Forward, 19))
            .unwrap();

        assert_eq!(agent.store().get_n(&first_key, action), 1);
        assert!((agent.store().get_q(&first_key, action) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_end_trial_drops_last_transition_by_default() {
        let mut agent = QLearningAgent::new(0.5, 0.5, 0.5).unwrap().with_seed(3);
        let only = sensation(Light::Green, Action::Forward, 5);

        agent.begin_trial().unwrap();
        agent.choose_action(&only).unwrap();
        agent.observe_reward(12.0).unwrap();
        agent.end_trial(true).unwrap();

        assert_eq!(agent.store().total_visits(), 0);
        assert_eq!(agent.store().state_count(), 0);
    }

    #[test]
    fn test_end_trial_flushes_terminal_transition() {
        let mut agent = QLearningAgent::new(0.5, 0.5, 0.5)
            .unwrap()
            .with_seed(3)
            .with_terminal_update(true);
        let only = sensation(Light::Green, Action::Forward, 5);
        let key = key_for(&agent, &only);

        agent.begin_trial().unwrap();
        let action = agent.choose_action(&only).unwrap();
        agent.observe_reward(12.0).unwrap();
        agent.end_trial(true).unwrap();

        assert!((agent.store().get_q(&key, action) - 6.0).abs() < 1e-12);
        assert_eq!(agent.store().get_n(&key, action), 1);
    }

    #[test]
    fn test_reward_without_action_is_an_error() {
        let mut agent = QLearningAgent::new(0.5, 0.5, 0.5).unwrap();
        assert!(matches!(agent.observe_reward(1.0), Err(Error::NoPendingAction)));
    }

    #[test]
    fn test_frozen_agent_does_not_learn() {
        let mut agent = QLearningAgent::new(0.5, 0.5, 0.5)
            .unwrap()
            .with_seed(4)
            .frozen();
        agent.begin_trial().unwrap();
        for deadline in (1..=5).rev() {
            agent
                .choose_action(&sensation(Light::Green, Action::Forward, deadline))
                .unwrap();
            agent.observe_reward(2.0).unwrap();
        }
        agent.end_trial(false).unwrap();
        assert_eq!(agent.store().total_visits(), 0);
    }

    #[test]
    fn test_parameter_validation() {
        assert!(QLearningAgent::new(0.0, 0.5, 0.5).is_err());
        assert!(QLearningAgent::new(0.5, 1.5, 0.5).is_err());
        assert!(QLearningAgent::new(0.5, 0.5, -0.1).is_err());
        assert!(QLearningAgent::new(1.0, 1.0, 1.0).is_ok());
    }
}

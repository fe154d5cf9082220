//! Common test utilities for the smartcab test suite.
//!
//! Provides a scripted environment so the learning core and the pipeline can
//! be driven with synthetic percepts and rewards, independent of the grid
//! world.

#![allow(dead_code)]

use smartcab::{
    Result,
    ports::Environment,
    traffic::{Action, Light, Percept},
};

/// One scripted tick: what the cab senses and what the move pays.
#[derive(Debug, Clone, Copy)]
pub struct Tick {
    pub percept: Percept,
    pub waypoint: Action,
    pub reward: f64,
}

impl Tick {
    pub fn new(percept: Percept, waypoint: Action, reward: f64) -> Self {
        Self {
            percept,
            waypoint,
            reward,
        }
    }

    /// Green light, no traffic, heading forward.
    pub fn green_forward(reward: f64) -> Self {
        Self::new(Percept::clear(Light::Green), Action::Forward, reward)
    }
}

/// Environment that replays the same script on every trial.
///
/// Once the script is exhausted the last tick repeats. The deadline counts
/// down by one per action from `deadline`.
#[derive(Debug, Clone)]
pub struct ScriptedEnvironment {
    ticks: Vec<Tick>,
    deadline: i64,
    index: usize,
    remaining: i64,
    pub resets: usize,
    pub actions: Vec<Action>,
}

impl ScriptedEnvironment {
    pub fn new(ticks: Vec<Tick>, deadline: i64) -> Self {
        assert!(!ticks.is_empty(), "script needs at least one tick");
        Self {
            ticks,
            deadline,
            index: 0,
            remaining: deadline,
            resets: 0,
            actions: Vec::new(),
        }
    }

    fn current(&self) -> &Tick {
        &self.ticks[self.index.min(self.ticks.len() - 1)]
    }
}

impl Environment for ScriptedEnvironment {
    fn reset(&mut self) -> Result<()> {
        self.index = 0;
        self.remaining = self.deadline;
        self.resets += 1;
        Ok(())
    }

    fn sense(&self) -> Percept {
        self.current().percept
    }

    fn deadline(&self) -> i64 {
        self.remaining
    }

    fn next_waypoint(&self) -> Action {
        self.current().waypoint
    }

    fn act(&mut self, action: Action) -> Result<f64> {
        let reward = self.current().reward;
        self.actions.push(action);
        self.index += 1;
        self.remaining -= 1;
        Ok(reward)
    }
}

/// Script for the canonical successful trip: five +5 ticks, then +10.
pub fn arrival_script() -> Vec<Tick> {
    let mut ticks = vec![Tick::green_forward(5.0); 5];
    ticks.push(Tick::green_forward(10.0));
    ticks
}

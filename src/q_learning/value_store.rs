//! Q-table and N-table keyed by canonical state.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{
    q_learning::state::StateKey,
    traffic::{ACTION_COUNT, Action},
};

/// Action values and visit counts for every state seen during a run.
///
/// Each state owns one fixed-size row per table, indexed by
/// [`Action::index`]. Unseen pairs read as zero; rows are created on first
/// write and never removed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValueStore {
    /// Expected discounted return per state-action pair
    q_values: HashMap<StateKey, [f64; ACTION_COUNT]>,
    /// Times each state-action pair has been learned from
    visits: HashMap<StateKey, [u32; ACTION_COUNT]>,
}

impl ValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get Q-value for a state-action pair
    pub fn get_q(&self, state: &StateKey, action: Action) -> f64 {
        self.q_values
            .get(state)
            .map_or(0.0, |row| row[action.index()])
    }

    /// Set Q-value for a state-action pair
    pub fn set_q(&mut self, state: StateKey, action: Action, value: f64) {
        self.q_values.entry(state).or_insert([0.0; ACTION_COUNT])[action.index()] = value;
    }

    /// All four Q-values for a state, zeros if unseen
    pub fn q_row(&self, state: &StateKey) -> [f64; ACTION_COUNT] {
        self.q_values
            .get(state)
            .copied()
            .unwrap_or([0.0; ACTION_COUNT])
    }

    /// Maximum Q-value over every action in a state
    pub fn max_q(&self, state: &StateKey) -> f64 {
        self.q_row(state)
            .into_iter()
            .fold(f64::NEG_INFINITY, f64::max)
    }

    pub fn get_n(&self, state: &StateKey, action: Action) -> u32 {
        self.visits.get(state).map_or(0, |row| row[action.index()])
    }

    /// Increment the visit count and return the new value
    pub fn increment_n(&mut self, state: StateKey, action: Action) -> u32 {
        let count = &mut self.visits.entry(state).or_insert([0; ACTION_COUNT])[action.index()];
        *count = count.saturating_add(1);
        *count
    }

    pub fn n_row(&self, state: &StateKey) -> [u32; ACTION_COUNT] {
        self.visits
            .get(state)
            .copied()
            .unwrap_or([0; ACTION_COUNT])
    }

    /// Largest visit count across the actions of a state
    pub fn max_n(&self, state: &StateKey) -> u32 {
        self.n_row(state).into_iter().max().unwrap_or(0)
    }

    /// Q rows sorted by state key.
    pub fn q_rows(&self) -> Vec<(&StateKey, &[f64; ACTION_COUNT])> {
        let mut rows: Vec<_> = self.q_values.iter().collect();
        rows.sort_by(|(a, _), (b, _)| a.cmp(b));
        rows
    }

    /// N rows sorted by state key.
    pub fn n_rows(&self) -> Vec<(&StateKey, &[u32; ACTION_COUNT])> {
        let mut rows: Vec<_> = self.visits.iter().collect();
        rows.sort_by(|(a, _), (b, _)| a.cmp(b));
        rows
    }

    /// Number of states with a Q row
    pub fn state_count(&self) -> usize {
        self.q_values.len()
    }

    /// Sum of all visit counts
    pub fn total_visits(&self) -> u64 {
        self.visits
            .values()
            .flat_map(|row| row.iter())
            .map(|&n| u64::from(n))
            .sum()
    }
}

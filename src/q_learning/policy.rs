//! Explore/exploit action selection over a [`ValueStore`].

use std::{fmt, str::FromStr};

use rand::{Rng, seq::IndexedRandom};
use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    q_learning::{state::StateKey, value_store::ValueStore},
    traffic::Action,
};

/// How exploitation resolves several actions sharing the maximum Q-value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TieBreak {
    /// First maximiser in [`Action::ALL`] order.
    First,
    /// Uniformly random among the maximisers.
    #[default]
    Random,
    /// Any action never tried in this state first, uniformly among them.
    /// Once all have been tried, the least visited of the maximisers;
    /// uniformly random if still tied.
    LeastVisited,
}

impl TieBreak {
    pub fn as_str(self) -> &'static str {
        match self {
            TieBreak::First => "first",
            TieBreak::Random => "random",
            TieBreak::LeastVisited => "least-visited",
        }
    }
}

impl fmt::Display for TieBreak {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TieBreak {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "first" => Ok(TieBreak::First),
            "random" => Ok(TieBreak::Random),
            "least-visited" => Ok(TieBreak::LeastVisited),
            other => Err(Error::ParseTieBreak {
                input: other.to_string(),
                expected: "first, random, least-visited".to_string(),
            }),
        }
    }
}

/// Stateless action selector; the exploration probability is always injected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policy {
    tie_break: TieBreak,
}

impl Policy {
    pub fn new(tie_break: TieBreak) -> Self {
        Self { tie_break }
    }

    pub fn tie_break(&self) -> TieBreak {
        self.tie_break
    }

    /// Explore with probability `exploration_probability`, otherwise exploit.
    pub fn choose<R: Rng + ?Sized>(
        &self,
        store: &ValueStore,
        state: &StateKey,
        exploration_probability: f64,
        rng: &mut R,
    ) -> Action {
        if rng.random::<f64>() < exploration_probability {
            Self::explore(rng)
        } else {
            self.exploit(store, state, rng)
        }
    }

    /// Uniformly random action from the full set.
    pub fn explore<R: Rng + ?Sized>(rng: &mut R) -> Action {
        *Action::ALL.choose(rng).unwrap_or(&Action::None)
    }

    /// Arg-max Q action with the configured tie-break.
    ///
    /// Under [`TieBreak::LeastVisited`] untried actions take precedence over
    /// the arg-max.
    pub fn exploit<R: Rng + ?Sized>(&self, store: &ValueStore, state: &StateKey, rng: &mut R) -> Action {
        if self.tie_break == TieBreak::LeastVisited {
            let untried = Self::untried(store, state);
            if let Some(action) = untried.choose(rng) {
                return *action;
            }
        }
        let candidates = Self::maximizers(store, state);
        let candidates = match self.tie_break {
            TieBreak::First => return candidates.first().copied().unwrap_or(Action::None),
            TieBreak::Random => candidates,
            TieBreak::LeastVisited => {
                let fewest = candidates
                    .iter()
                    .map(|&a| store.get_n(state, a))
                    .min()
                    .unwrap_or(0);
                candidates
                    .into_iter()
                    .filter(|&a| store.get_n(state, a) == fewest)
                    .collect()
            }
        };
        *candidates.choose(rng).unwrap_or(&Action::None)
    }

    /// Actions with no recorded visit in `state`, in table order.
    pub fn untried(store: &ValueStore, state: &StateKey) -> Vec<Action> {
        let visits = store.n_row(state);
        Action::ALL
            .into_iter()
            .filter(|a| visits[a.index()] == 0)
            .collect()
    }

    /// Every action whose Q-value equals the state's maximum, in table order.
    ///
    /// Never empty.
    pub fn maximizers(store: &ValueStore, state: &StateKey) -> Vec<Action> {
        let row = store.q_row(state);
        let best = row.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Action::ALL
            .into_iter()
            .filter(|a| row[a.index()] == best)
            .collect()
    }
}

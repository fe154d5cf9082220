//! State encoding: percept + desired heading to a canonical table key.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    traffic::{Action, Light, Percept, action::optional_name, is_legal},
};

/// How a [`State`] is flattened into a [`StateKey`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateEncoding {
    /// Every percept field plus the desired heading. Distinct states never
    /// share a key.
    #[default]
    Full,
    /// Which turns are currently legal plus the desired heading. Deliberately
    /// coarse: states with the same legal moves share a key.
    Reduced,
}

impl StateEncoding {
    pub fn as_str(self) -> &'static str {
        match self {
            StateEncoding::Full => "full",
            StateEncoding::Reduced => "reduced",
        }
    }
}

impl fmt::Display for StateEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StateEncoding {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full" => Ok(StateEncoding::Full),
            "reduced" => Ok(StateEncoding::Reduced),
            other => Err(Error::ParseEncoding {
                input: other.to_string(),
                expected: "full, reduced".to_string(),
            }),
        }
    }
}

/// Everything the agent conditions on during one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct State {
    pub light: Light,
    pub oncoming: Option<Action>,
    pub left: Option<Action>,
    pub right: Option<Action>,
    pub desired_direction: Action,
}

impl State {
    /// The percept this state was built from.
    pub fn percept(&self) -> Percept {
        Percept {
            light: self.light,
            oncoming: self.oncoming,
            left: self.left,
            right: self.right,
        }
    }

    /// Canonical key under the given encoding.
    pub fn key(&self, encoding: StateEncoding) -> StateKey {
        let encoded = match encoding {
            StateEncoding::Full => format!(
                "tl:{},o:{},r:{},l:{},dd:{}",
                self.light,
                optional_name(self.oncoming),
                optional_name(self.right),
                optional_name(self.left),
                self.desired_direction
            ),
            StateEncoding::Reduced => {
                let percept = self.percept();
                format!(
                    "f:{},r:{},l:{},dd:{}",
                    is_legal(&percept, Action::Forward),
                    is_legal(&percept, Action::Right),
                    is_legal(&percept, Action::Left),
                    self.desired_direction
                )
            }
        };
        StateKey(encoded)
    }
}

/// Canonical string key into the value tables.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StateKey(String);

impl StateKey {
    /// Get the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for StateKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl AsRef<str> for StateKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Builds [`State`] values and their keys from fresh percepts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateEncoder {
    encoding: StateEncoding,
}

impl StateEncoder {
    pub fn new(encoding: StateEncoding) -> Self {
        Self { encoding }
    }

    pub fn encoding(&self) -> StateEncoding {
        self.encoding
    }

    /// Encode a percept and the planner's heading into a state.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPercept`] if a traffic field announces
    /// [`Action::None`].
    pub fn encode(&self, percept: &Percept, desired_direction: Action) -> Result<State> {
        percept.validate()?;
        Ok(State {
            light: percept.light,
            oncoming: percept.oncoming,
            left: percept.left,
            right: percept.right,
            desired_direction,
        })
    }

    /// Encode and key in one step.
    pub fn encode_key(&self, percept: &Percept, desired_direction: Action) -> Result<(State, StateKey)> {
        let state = self.encode(percept, desired_direction)?;
        let key = state.key(self.encoding);
        Ok((state, key))
    }
}

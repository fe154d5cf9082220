//! The closed set of driving actions.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::Error;

/// Number of actions in [`Action::ALL`].
pub const ACTION_COUNT: usize = 4;

/// A driving action at an intersection.
///
/// The declaration order is significant: it fixes table column order, array
/// indices and the deterministic tie-break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Action {
    Forward,
    Right,
    Left,
    /// Stay put for one tick.
    None,
}

impl Action {
    /// Every action, in table order.
    pub const ALL: [Action; ACTION_COUNT] =
        [Action::Forward, Action::Right, Action::Left, Action::None];

    /// Position of this action in [`Action::ALL`].
    pub const fn index(self) -> usize {
        match self {
            Action::Forward => 0,
            Action::Right => 1,
            Action::Left => 2,
            Action::None => 3,
        }
    }

    /// Inverse of [`Action::index`].
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Name used in state keys and CSV headers.
    pub const fn name(self) -> &'static str {
        match self {
            Action::Forward => "forward",
            Action::Right => "right",
            Action::Left => "left",
            Action::None => "None",
        }
    }

    /// Whether the action moves the car out of the intersection.
    pub fn is_move(self) -> bool {
        self != Action::None
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Action {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "forward" => Ok(Action::Forward),
            "right" => Ok(Action::Right),
            "left" => Ok(Action::Left),
            "none" | "wait" => Ok(Action::None),
            other => Err(Error::ParseAction {
                input: other.to_string(),
                expected: "forward, right, left, none".to_string(),
            }),
        }
    }
}

/// Formats an optional action the way state keys print it: `None` when absent.
pub(crate) fn optional_name(action: Option<Action>) -> &'static str {
    action.map_or("None", Action::name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_roundtrip() {
        for (i, action) in Action::ALL.iter().enumerate() {
            assert_eq!(action.index(), i);
            assert_eq!(Action::from_index(i), Some(*action));
        }
        assert_eq!(Action::from_index(ACTION_COUNT), None);
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("Forward".parse::<Action>().unwrap(), Action::Forward);
        assert_eq!(" LEFT ".parse::<Action>().unwrap(), Action::Left);
        assert_eq!("None".parse::<Action>().unwrap(), Action::None);
        assert!("reverse".parse::<Action>().is_err());
    }

    #[test]
    fn test_names_match_table_headers() {
        let names: Vec<_> = Action::ALL.iter().map(|a| a.name()).collect();
        assert_eq!(names, vec!["forward", "right", "left", "None"]);
    }
}

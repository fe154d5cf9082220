//! What the cab senses at an intersection.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::action::{Action, optional_name};
use crate::{Error, Result};

/// Traffic light colour as seen from the cab's heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Light {
    Green,
    Red,
}

impl Light {
    pub const fn name(self) -> &'static str {
        match self {
            Light::Green => "green",
            Light::Red => "red",
        }
    }
}

impl fmt::Display for Light {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Light {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "green" => Ok(Light::Green),
            "red" => Ok(Light::Red),
            _ => Err(Error::InvalidPercept {
                field: "light".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// Typed percept: light colour plus the intended action of any car waiting
/// on each of the other approaches. `None` means the approach is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Percept {
    pub light: Light,
    pub oncoming: Option<Action>,
    pub left: Option<Action>,
    pub right: Option<Action>,
}

impl Percept {
    /// A percept with the given light and no surrounding traffic.
    pub fn clear(light: Light) -> Self {
        Self {
            light,
            oncoming: None,
            left: None,
            right: None,
        }
    }

    pub fn with_oncoming(mut self, action: Action) -> Self {
        self.oncoming = Some(action);
        self
    }

    pub fn with_left(mut self, action: Action) -> Self {
        self.left = Some(action);
        self
    }

    pub fn with_right(mut self, action: Action) -> Self {
        self.right = Some(action);
        self
    }

    /// Check that every traffic field names a real movement.
    ///
    /// A car reported as announcing [`Action::None`] would print identically
    /// to an empty approach, so it is rejected rather than folded into one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPercept`] naming the offending field.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("oncoming", self.oncoming),
            ("left", self.left),
            ("right", self.right),
        ] {
            if value == Some(Action::None) {
                return Err(Error::InvalidPercept {
                    field: field.to_string(),
                    value: "None (a present car must announce a movement)".to_string(),
                });
            }
        }
        Ok(())
    }
}

impl fmt::Display for Percept {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{light: {}, oncoming: {}, left: {}, right: {}}}",
            self.light,
            optional_name(self.oncoming),
            optional_name(self.left),
            optional_name(self.right)
        )
    }
}

/// Untyped percept as delivered by an external simulator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPercept {
    pub light: String,
    #[serde(default)]
    pub oncoming: Option<String>,
    #[serde(default)]
    pub left: Option<String>,
    #[serde(default)]
    pub right: Option<String>,
}

impl RawPercept {
    /// Parse into a typed [`Percept`].
    ///
    /// Absent fields and the literal `"None"` mean an empty approach. Anything
    /// other than `forward`, `right` or `left` is rejected.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPercept`] for an unknown light or traffic value.
    pub fn parse(&self) -> Result<Percept> {
        let percept = Percept {
            light: self.light.parse()?,
            oncoming: parse_traffic("oncoming", self.oncoming.as_deref())?,
            left: parse_traffic("left", self.left.as_deref())?,
            right: parse_traffic("right", self.right.as_deref())?,
        };
        percept.validate()?;
        Ok(percept)
    }
}

impl TryFrom<&RawPercept> for Percept {
    type Error = Error;

    fn try_from(raw: &RawPercept) -> Result<Self> {
        raw.parse()
    }
}

fn parse_traffic(field: &str, value: Option<&str>) -> Result<Option<Action>> {
    let Some(value) = value else {
        return Ok(None);
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "none" | "" => Ok(None),
        "forward" => Ok(Some(Action::Forward)),
        "right" => Ok(Some(Action::Right)),
        "left" => Ok(Some(Action::Left)),
        _ => Err(Error::InvalidPercept {
            field: field.to_string(),
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(light: &str) -> RawPercept {
        RawPercept {
            light: light.to_string(),
            ..RawPercept::default()
        }
    }

    #[test]
    fn test_parse_minimal_percept() {
        let percept = raw("green").parse().unwrap();
        assert_eq!(percept, Percept::clear(Light::Green));
    }

    #[test]
    fn test_parse_traffic_fields() {
        let mut input = raw("Red");
        input.oncoming = Some("left".to_string());
        input.left = Some("None".to_string());
        input.right = Some("forward".to_string());

        let percept = input.parse().unwrap();
        assert_eq!(percept.light, Light::Red);
        assert_eq!(percept.oncoming, Some(Action::Left));
        assert_eq!(percept.left, None);
        assert_eq!(percept.right, Some(Action::Forward));
    }

    #[test]
    fn test_unknown_light_fails_fast() {
        let err = raw("yellow").parse().unwrap_err();
        match err {
            Error::InvalidPercept { field, value } => {
                assert_eq!(field, "light");
                assert_eq!(value, "yellow");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unknown_traffic_value_fails_fast() {
        let mut input = raw("green");
        input.right = Some("u-turn".to_string());
        assert!(matches!(
            input.parse(),
            Err(Error::InvalidPercept { ref field, .. }) if field == "right"
        ));
    }

    #[test]
    fn test_waiting_car_is_rejected() {
        let percept = Percept::clear(Light::Green).with_oncoming(Action::None);
        assert!(percept.validate().is_err());
    }

    #[test]
    fn test_raw_percept_from_json() {
        let input: RawPercept =
            serde_json::from_str(r#"{"light":"green","oncoming":null,"left":"forward"}"#).unwrap();
        let percept = Percept::try_from(&input).unwrap();
        assert_eq!(percept.left, Some(Action::Forward));
        assert_eq!(percept.right, None);
    }
}

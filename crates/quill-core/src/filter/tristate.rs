use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// On / off / don't care.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriState {
    Off,
    On,
    #[default]
    Neutral,
}

impl TriState {
    pub fn is_neutral(self) -> bool {
        self == TriState::Neutral
    }

    pub fn label(self) -> &'static str {
        match self {
            TriState::Off => "off",
            TriState::On => "on",
            TriState::Neutral => "any",
        }
    }
}

impl From<Option<bool>> for TriState {
    fn from(value: Option<bool>) -> Self {
        match value {
            Some(true) => TriState::On,
            Some(false) => TriState::Off,
            None => TriState::Neutral,
        }
    }
}

impl fmt::Display for TriState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TriState {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "on" | "yes" | "true" => Ok(TriState::On),
            "off" | "no" | "false" => Ok(TriState::Off),
            "any" | "neutral" => Ok(TriState::Neutral),
            other => Err(CoreError::InvalidTriState(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::TriState;

    #[test]
    fn default_is_neutral() {
        assert!(TriState::default().is_neutral());
    }

    #[test]
    fn parse_labels() {
        assert_eq!("ON".parse::<TriState>().unwrap(), TriState::On);
        assert_eq!("off".parse::<TriState>().unwrap(), TriState::Off);
        assert_eq!(" any ".parse::<TriState>().unwrap(), TriState::Neutral);
        assert!("maybe".parse::<TriState>().is_err());
    }

    #[test]
    fn from_optional_bool() {
        assert_eq!(TriState::from(Some(true)), TriState::On);
        assert_eq!(TriState::from(None), TriState::Neutral);
    }
}

//! Qualitative grade levels.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One of the three qualitative grade levels, from lowest to highest:
/// MANA (goal not met), MPA (goal partially met), MA (goal met).
///
/// The desirability order is implied by the default weights, not enforced
/// structurally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Grade {
    Mana,
    Mpa,
    Ma,
}

impl Grade {
    /// All grade levels in ascending order of desirability.
    pub const ALL: [Grade; 3] = [Grade::Mana, Grade::Mpa, Grade::Ma];

    /// Numeric weight used when a specification has no weight for this level.
    pub fn default_weight(self) -> f64 {
        match self {
            Grade::Ma => 10.0,
            Grade::Mpa => 7.0,
            Grade::Mana => 0.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Grade::Mana => "MANA",
            Grade::Mpa => "MPA",
            Grade::Ma => "MA",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("not a grade: {0:?}")]
pub struct ParseGradeError(pub String);

impl FromStr for Grade {
    type Err = ParseGradeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "MANA" => Ok(Grade::Mana),
            "MPA" => Ok(Grade::Mpa),
            "MA" => Ok(Grade::Ma),
            other => Err(ParseGradeError(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all_levels() {
        assert_eq!("MANA".parse::<Grade>().unwrap(), Grade::Mana);
        assert_eq!("MPA".parse::<Grade>().unwrap(), Grade::Mpa);
        assert_eq!("MA".parse::<Grade>().unwrap(), Grade::Ma);
    }

    #[test]
    fn test_parse_trims_whitespace() {
        assert_eq!(" MA ".parse::<Grade>().unwrap(), Grade::Ma);
    }

    #[test]
    fn test_parse_rejects_unknown_values() {
        assert!("X".parse::<Grade>().is_err());
        assert!("ma".parse::<Grade>().is_err());
        assert!("".parse::<Grade>().is_err());
    }

    #[test]
    fn test_serde_uses_uppercase_strings() {
        assert_eq!(serde_json::to_string(&Grade::Mpa).unwrap(), "\"MPA\"");
        let back: Grade = serde_json::from_str("\"MANA\"").unwrap();
        assert_eq!(back, Grade::Mana);
    }

    #[test]
    fn test_default_weights() {
        assert_eq!(Grade::Ma.default_weight(), 10.0);
        assert_eq!(Grade::Mpa.default_weight(), 7.0);
        assert_eq!(Grade::Mana.default_weight(), 0.0);
    }
}

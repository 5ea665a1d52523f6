//! Reroll placement policy

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Where a regenerated assistant reply goes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RerollMode {
    /// Insert the new reply right after the rerolled turn; the old reply stays as history.
    #[default]
    Insert,
    /// Overwrite the rerolled turn.
    Replace,
}

impl RerollMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RerollMode::Insert => "insert",
            RerollMode::Replace => "replace",
        }
    }
}

impl fmt::Display for RerollMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RerollMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "insert" => Ok(RerollMode::Insert),
            "replace" => Ok(RerollMode::Replace),
            other => Err(DomainError::UnknownRerollMode(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!("insert".parse::<RerollMode>(), Ok(RerollMode::Insert));
        assert_eq!(" Replace ".parse::<RerollMode>(), Ok(RerollMode::Replace));
        assert!("branch".parse::<RerollMode>().is_err());
    }

    #[test]
    fn test_default_is_insert() {
        assert_eq!(RerollMode::default(), RerollMode::Insert);
    }
}

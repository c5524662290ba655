//! Import pipeline settings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{ImportError, Result};

/// What to do when a row cannot be given coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Stop at the first failing row. Rows before it are still reported.
    #[default]
    Abort,
    /// Record the failure and continue with the next row.
    Skip,
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "abort" => Ok(FailurePolicy::Abort),
            "skip" => Ok(FailurePolicy::Skip),
            other => Err(format!("unknown failure policy '{}' (expected abort or skip)", other)),
        }
    }
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailurePolicy::Abort => f.write_str("abort"),
            FailurePolicy::Skip => f.write_str("skip"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportConfig {
    /// Maximum geocoding requests in flight. 1 keeps the provider's rate
    /// limit safe.
    pub geocode_concurrency: usize,
    pub failure_policy: FailurePolicy,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            geocode_concurrency: 1,
            failure_policy: FailurePolicy::Abort,
        }
    }
}

impl ImportConfig {
    pub fn validate(&self) -> Result<()> {
        if self.geocode_concurrency == 0 {
            return Err(ImportError::InvalidConfig(
                "geocode_concurrency must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_from_str() {
        assert_eq!("Skip".parse::<FailurePolicy>().unwrap(), FailurePolicy::Skip);
        assert_eq!("abort".parse::<FailurePolicy>().unwrap(), FailurePolicy::Abort);
        assert!("retry".parse::<FailurePolicy>().is_err());
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let config = ImportConfig {
            geocode_concurrency: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}

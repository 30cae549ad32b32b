//! Structured error types shared across lumi crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`LumiError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (lengths, bin indices, paths, etc.).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional hint that may help the caller resolve the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Canonical error type for the lumi toolkit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum LumiError {
    /// Probability mass function construction and validation errors.
    #[error("pmf error: {0}")]
    Pmf(ErrorInfo),
    /// Interaction mixture table errors.
    #[error("mixture error: {0}")]
    Mixture(ErrorInfo),
    /// Fit model and minimizer errors.
    #[error("fit error: {0}")]
    Fit(ErrorInfo),
    /// Serialization and schema errors.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
    /// Randomness and seeding errors.
    #[error("rng error: {0}")]
    Rng(ErrorInfo),
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            write!(f, " | context: [")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, "]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " | hint: {hint}")?;
        }
        Ok(())
    }
}

impl LumiError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            LumiError::Pmf(info)
            | LumiError::Mixture(info)
            | LumiError::Fit(info)
            | LumiError::Serde(info)
            | LumiError::Rng(info) => info,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_info_renders_context_and_hint() {
        let info = ErrorInfo::new("length-mismatch", "pmf lengths differ")
            .with_context("left", "201")
            .with_context("right", "81")
            .with_hint("rebuild the table with a single configuration");
        let rendered = format!("{}", LumiError::Pmf(info));
        assert!(rendered.contains("length-mismatch"));
        assert!(rendered.contains("left=201"));
        assert!(rendered.contains("hint"));
    }

    #[test]
    fn error_round_trips_through_json() {
        let err = LumiError::Mixture(ErrorInfo::new("invalid-mu", "mu must be non-negative"));
        let json = serde_json::to_string(&err).unwrap();
        let restored: LumiError = serde_json::from_str(&json).unwrap();
        assert_eq!(err, restored);
    }
}

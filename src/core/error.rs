//! Error types for Pramana.
//!
//! Expected, user-facing failures never appear here: they are recorded as
//! [`Issue`]s on the dataset. The types in this module cover programming and
//! environment errors (bad configuration, unreadable files) and the error
//! returned by the throwing `parse` entry points.

use crate::core::issue::Issue;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Top-level error type for Pramana.
#[derive(Error, Debug)]
pub enum PramanaError {
    /// Invalid or unreadable configuration.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Input rejected by a schema.
    #[error("Validation failed: {0}")]
    Parse(#[from] ParseError),

    /// Input text that is not valid JSON.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors raised while building or loading a configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Malformed TOML document.
    #[error("Invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    /// Abort policy name not recognized.
    #[error("Unknown abort policy '{0}' (expected collect, early or pipe_early)")]
    UnknownAbortPolicy(String),

    /// Language tag that is empty or has invalid characters.
    #[error("Invalid language tag '{0}'")]
    InvalidLanguage(String),

    /// Configuration file that could not be read.
    #[error("Failed to read config file {path}: {error}")]
    Read {
        /// File that was read.
        path: String,
        /// Underlying I/O error.
        error: std::io::Error,
    },
}

/// Error returned by `parse` when the input does not satisfy the schema.
///
/// Carries the complete, ordered issue list of the failed run.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
#[error("{}", describe(.issues))]
pub struct ParseError {
    /// Issues in execution order. Never empty.
    pub issues: Vec<Issue>,
}

impl ParseError {
    /// Create a parse error from the issues of a failed run.
    pub fn new(issues: Vec<Issue>) -> Self {
        Self { issues }
    }

    /// The first issue, which is the one that triggered an early abort.
    pub fn first(&self) -> Option<&Issue> {
        self.issues.first()
    }
}

fn describe(issues: &[Issue]) -> String {
    match issues {
        [] => "no issues recorded".to_string(),
        [only] => only.message.clone(),
        [first, rest @ ..] => format!("{} (and {} more)", first.message, rest.len()),
    }
}

/// Result type alias for Pramana operations.
pub type PramanaResult<T> = Result<T, PramanaError>;

/// Result type alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::issue::IssueKind;
    use crate::core::types::Value;

    fn issue(message: &str) -> Issue {
        Issue {
            kind: IssueKind::Validation,
            type_name: "min_length".to_string(),
            input: Value::from(""),
            expected: Some(">=1".to_string()),
            received: "0".to_string(),
            message: message.to_string(),
            requirement: None,
            path: Vec::new(),
            lang: None,
            abort_early: false,
            abort_pipe_early: false,
        }
    }

    #[test]
    fn test_parse_error_display() {
        let single = ParseError::new(vec![issue("too short")]);
        assert_eq!(single.to_string(), "too short");

        let many = ParseError::new(vec![issue("too short"), issue("not decimal"), issue("x")]);
        assert_eq!(many.to_string(), "too short (and 2 more)");
        assert_eq!(many.first().unwrap().message, "too short");
    }

    #[test]
    fn test_error_conversion() {
        let error: PramanaError = ConfigError::UnknownAbortPolicy("sometimes".into()).into();
        assert!(error.to_string().contains("sometimes"));

        let error: PramanaError = ParseError::new(vec![issue("bad")]).into();
        assert_eq!(error.to_string(), "Validation failed: bad");

        let json = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error: PramanaError = json.into();
        assert!(error.to_string().starts_with("Serialization error:"));
    }
}

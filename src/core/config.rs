//! Run configuration.
//!
//! A [`Config`] is passed to every unit of a run. Callers either build one
//! per call or fall back to the process-wide [`GlobalConfig`], which can be
//! loaded from TOML:
//!
//! ```toml
//! lang = "de"
//! abort = "pipe_early"
//! ```

use crate::core::error::{ConfigError, ConfigResult};
use crate::core::issue::PathItem;
use crate::core::message::ErrorMessage;
use log::debug;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

/// When a run stops collecting issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbortPolicy {
    /// Collect every issue.
    #[default]
    Collect,
    /// Stop the entire run at the first issue.
    Early,
    /// Stop only the current pipe at the first issue.
    PipeEarly,
}

impl FromStr for AbortPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "collect" => Ok(AbortPolicy::Collect),
            "early" => Ok(AbortPolicy::Early),
            "pipe_early" | "pipe-early" => Ok(AbortPolicy::PipeEarly),
            other => Err(ConfigError::UnknownAbortPolicy(other.to_string())),
        }
    }
}

/// Configuration of one run.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Language used for message lookup.
    pub lang: Option<String>,
    /// Message used when neither the unit nor a specific store provides one.
    pub message: Option<ErrorMessage>,
    /// Abort policy.
    pub abort: AbortPolicy,
    /// Path prefix added to every issue returned by `execute`.
    pub path: Vec<PathItem>,
}

impl Config {
    /// Create a configuration that collects every issue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the language.
    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = Some(lang.into());
        self
    }

    /// Set the fallback message.
    pub fn with_message(mut self, message: impl Into<ErrorMessage>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Set the abort policy.
    pub fn with_abort(mut self, abort: AbortPolicy) -> Self {
        self.abort = abort;
        self
    }

    /// Stop the entire run at the first issue.
    pub fn with_abort_early(self) -> Self {
        self.with_abort(AbortPolicy::Early)
    }

    /// Stop only the current pipe at the first issue.
    pub fn with_abort_pipe_early(self) -> Self {
        self.with_abort(AbortPolicy::PipeEarly)
    }

    /// Set the path prefix for a nested invocation.
    pub fn with_path(mut self, path: Vec<PathItem>) -> Self {
        self.path = path;
        self
    }

    /// Whether the whole run stops at the first issue.
    pub fn abort_early(&self) -> bool {
        self.abort == AbortPolicy::Early
    }

    /// Whether the current pipe stops at the first issue.
    pub fn abort_pipe_early(&self) -> bool {
        self.abort == AbortPolicy::PipeEarly
    }

    /// Whether any abort policy is active.
    pub fn aborts(&self) -> bool {
        self.abort != AbortPolicy::Collect
    }
}

// ============================================================================
// Global Configuration
// ============================================================================

/// Process-wide defaults used when a run is started without a [`Config`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Default language.
    pub lang: Option<String>,
    /// Default abort policy.
    pub abort: Option<AbortPolicy>,
}

impl GlobalConfig {
    /// Parse a global configuration from TOML text.
    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        let config: GlobalConfig = toml::from_str(text)?;
        if let Some(lang) = &config.lang {
            validate_lang(lang)?;
        }
        Ok(config)
    }

    /// Load a global configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|error| ConfigError::Read {
            path: path.display().to_string(),
            error,
        })?;
        debug!("loaded global config from {}", path.display());
        Self::from_toml_str(&text)
    }

    /// Build a run configuration from these defaults.
    pub fn to_config(&self) -> Config {
        Config {
            lang: self.lang.clone(),
            abort: self.abort.unwrap_or_default(),
            ..Config::default()
        }
    }
}

/// Check that a language tag looks like `en`, `de-CH` or `zh-Hant-TW`.
pub fn validate_lang(lang: &str) -> ConfigResult<()> {
    let valid = !lang.is_empty()
        && lang.split('-').all(|part| {
            !part.is_empty() && part.len() <= 8 && part.chars().all(|c| c.is_ascii_alphanumeric())
        });
    if valid {
        Ok(())
    } else {
        Err(ConfigError::InvalidLanguage(lang.to_string()))
    }
}

static GLOBAL_CONFIG: Lazy<RwLock<Option<GlobalConfig>>> = Lazy::new(|| RwLock::new(None));

/// Replace the global configuration.
pub fn set_global_config(config: GlobalConfig) {
    debug!("global config set: {:?}", config);
    *GLOBAL_CONFIG.write() = Some(config);
}

/// Run configuration derived from the global configuration.
pub fn global_config() -> Config {
    GLOBAL_CONFIG
        .read()
        .as_ref()
        .map(GlobalConfig::to_config)
        .unwrap_or_default()
}

/// Clear the global configuration.
pub fn delete_global_config() {
    *GLOBAL_CONFIG.write() = None;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_builder_sets_single_abort_policy() {
        let config = Config::new().with_abort_early().with_abort_pipe_early();
        assert!(!config.abort_early());
        assert!(config.abort_pipe_early());
        assert!(config.aborts());
        assert!(!Config::new().aborts());
    }

    #[test]
    fn test_abort_policy_from_str() {
        assert_eq!("early".parse::<AbortPolicy>().unwrap(), AbortPolicy::Early);
        assert_eq!("pipe-early".parse::<AbortPolicy>().unwrap(), AbortPolicy::PipeEarly);
        assert!(matches!(
            "never".parse::<AbortPolicy>(),
            Err(ConfigError::UnknownAbortPolicy(_))
        ));
    }

    #[test]
    fn test_global_config_from_toml() {
        let config = GlobalConfig::from_toml_str("lang = \"de-CH\"\nabort = \"pipe_early\"\n").unwrap();
        assert_eq!(config.lang.as_deref(), Some("de-CH"));
        assert_eq!(config.abort, Some(AbortPolicy::PipeEarly));

        let run = config.to_config();
        assert!(run.abort_pipe_early());
        assert_eq!(run.lang.as_deref(), Some("de-CH"));
    }

    #[test]
    fn test_global_config_rejects_bad_input() {
        assert!(matches!(
            GlobalConfig::from_toml_str("abort = \"sometimes\""),
            Err(ConfigError::Toml(_))
        ));
        assert!(matches!(
            GlobalConfig::from_toml_str("lang = \"not a tag\""),
            Err(ConfigError::InvalidLanguage(_))
        ));
    }

    #[test]
    fn test_global_config_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "lang = \"fr\"").unwrap();

        let config = GlobalConfig::load(file.path()).unwrap();
        assert_eq!(config.lang.as_deref(), Some("fr"));
        assert_eq!(config.abort, None);

        let missing = GlobalConfig::load(file.path().with_extension("missing"));
        assert!(matches!(missing, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn test_validate_lang() {
        assert!(validate_lang("en").is_ok());
        assert!(validate_lang("zh-Hant-TW").is_ok());
        assert!(validate_lang("").is_err());
        assert!(validate_lang("en--US").is_err());
    }
}

//! Engine configuration
//!
//! Loaded from TOML; every key is optional:
//!
//! ```toml
//! input_error_policy = "abort-transaction"   # or "reject-field"
//! require_distinct_copy_name = true
//! tcont_auto_name_token = "-1"
//! log_filter = "info"
//! log_format = "text"                         # or "json"
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// What an unreadable field input does to its transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InputErrorPolicy {
    /// Abort the whole transaction; nothing is committed
    #[default]
    AbortTransaction,
    /// Reject the one input and keep the field's previous value
    RejectField,
}

/// Log output encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Handling of unreadable field input
    pub input_error_policy: InputErrorPolicy,
    /// Refuse a copy name equal to the original even for unused profiles
    pub require_distinct_copy_name: bool,
    /// Copy name that asks for a generated T-CONT name
    pub tcont_auto_name_token: String,
    /// `tracing` filter directive used when `RUST_LOG` is unset
    pub log_filter: String,
    /// Log encoding
    pub log_format: LogFormat,
}

impl EngineConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With input error policy
    #[inline]
    #[must_use]
    pub fn with_input_error_policy(mut self, policy: InputErrorPolicy) -> Self {
        self.input_error_policy = policy;
        self
    }

    /// With distinct copy name requirement
    #[inline]
    #[must_use]
    pub fn with_require_distinct_copy_name(mut self, required: bool) -> Self {
        self.require_distinct_copy_name = required;
        self
    }

    /// With T-CONT auto-name token
    #[inline]
    #[must_use]
    pub fn with_tcont_auto_name_token(mut self, token: impl Into<String>) -> Self {
        self.tcont_auto_name_token = token.into();
        self
    }

    /// With log filter
    #[inline]
    #[must_use]
    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = filter.into();
        self
    }

    /// With log format
    #[inline]
    #[must_use]
    pub fn with_log_format(mut self, format: LogFormat) -> Self {
        self.log_format = format;
        self
    }

    /// Parse TOML text
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] on invalid TOML or unknown values.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load a TOML file
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            input_error_policy: InputErrorPolicy::AbortTransaction,
            require_distinct_copy_name: true,
            tcont_auto_name_token: "-1".to_string(),
            log_filter: "info".to_string(),
            log_format: LogFormat::Text,
        }
    }
}

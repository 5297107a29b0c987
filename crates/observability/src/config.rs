//! Environment-driven logging configuration.

use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const FILTER_VAR: &str = "RUST_LOG";
pub const FORMAT_VAR: &str = "TELLR_LOG_FORMAT";
pub const TARGET_VAR: &str = "TELLR_LOG_TARGET";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown log format: {0} (expected json, pretty or compact)")]
    UnknownFormat(String),

    #[error("invalid boolean for {var}: {value}")]
    InvalidBool { var: &'static str, value: String },
}

/// Output format of the fmt subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
    Compact,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" => Ok(Self::Pretty),
            "compact" => Ok(Self::Compact),
            other => Err(ConfigError::UnknownFormat(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// `EnvFilter` directives, e.g. `info,tellr_account=debug`.
    pub filter: String,
    pub format: LogFormat,
    pub with_target: bool,
    /// Values that could not be parsed and were replaced by defaults.
    ///
    /// Collected instead of logged: the subscriber does not exist yet while
    /// the configuration is read. `init` logs them once it is installed.
    #[serde(skip)]
    pub warnings: Vec<ConfigError>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            format: LogFormat::default(),
            with_target: false,
            warnings: Vec::new(),
        }
    }
}

impl ObservabilityConfig {
    /// Read from the process environment. Bad values fall back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup (the environment in production, a map in tests).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(filter) = lookup(FILTER_VAR).filter(|f| !f.trim().is_empty()) {
            config.filter = filter;
        }

        if let Some(raw) = lookup(FORMAT_VAR) {
            match raw.parse() {
                Ok(format) => config.format = format,
                Err(e) => config.warnings.push(e),
            }
        }

        if let Some(raw) = lookup(TARGET_VAR) {
            match parse_bool(TARGET_VAR, &raw) {
                Ok(v) => config.with_target = v,
                Err(e) => config.warnings.push(e),
            }
        }

        config
    }
}

fn parse_bool(var: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            var,
            value: raw.to_string(),
        }),
    }
}

//! Typed view of the merged configuration

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use playkit_tree::Tree;
use serde::Serialize;

use super::defaults::BuiltinDefaults;
use super::effective::ConfigError;
use crate::engine::GatePolicy;
use crate::model::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }

    pub fn as_tracing_level(&self) -> tracing::Level {
        match self {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            other => Err(format!("Invalid log level: {}", other)),
        }
    }
}

/// Settings the CLI and library callers act on
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Settings {
    pub playkit_dir: PathBuf,
    pub default_role: Role,
    pub empty_gate: GatePolicy,
    pub log_level: LogLevel,
    pub pretty: bool,
}

impl Default for Settings {
    fn default() -> Self {
        let defaults = BuiltinDefaults::default();
        Self {
            playkit_dir: PathBuf::from(defaults.playkit_dir),
            default_role: defaults.default_role,
            empty_gate: defaults.empty_gate,
            log_level: LogLevel::Info,
            pretty: defaults.pretty,
        }
    }
}

impl Settings {
    /// Read settings from a merged config tree. Absent keys keep their
    /// built-in value; present keys must be well-formed.
    pub fn from_tree(config: &Tree) -> Result<Self, ConfigError> {
        let mut settings = Settings::default();

        if let Some(dir) = string_at(config, "playkit_dir")? {
            if dir.trim().is_empty() {
                return Err(ConfigError::ValidationError("playkit_dir can't be blank".to_string()));
            }
            settings.playkit_dir = PathBuf::from(dir);
        }

        if let Some(role) = string_at(config, "default_role")? {
            settings.default_role = role.parse().map_err(|e: String| {
                ConfigError::ValidationError(format!("default_role: {}", e))
            })?;
        }

        if let Some(policy) = string_at(config, "fragments.empty_gate")? {
            settings.empty_gate = policy.parse().map_err(|e: String| {
                ConfigError::ValidationError(format!("fragments.empty_gate: {}", e))
            })?;
        }

        if let Some(level) = string_at(config, "log.level")? {
            settings.log_level = level
                .parse()
                .map_err(|e: String| ConfigError::ValidationError(format!("log.level: {}", e)))?;
        }

        if let Some(value) = config.get_path("output.pretty") {
            settings.pretty = value.as_bool().ok_or_else(|| {
                ConfigError::ValidationError(format!(
                    "output.pretty must be a boolean, got {}",
                    value.kind_name()
                ))
            })?;
        }

        Ok(settings)
    }
}

fn string_at<'a>(config: &'a Tree, path: &str) -> Result<Option<&'a str>, ConfigError> {
    match config.get_path(path) {
        None => Ok(None),
        Some(value) => value.as_str().map(Some).ok_or_else(|| {
            ConfigError::ValidationError(format!("{} must be a string, got {}", path, value.kind_name()))
        }),
    }
}

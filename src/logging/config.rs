//! Logger configuration and the partial options used to reconfigure it.
use super::LogLevel;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;

/// The complete configuration read by every log call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggerConfig {
    pub level: LogLevel,
    pub show_timestamp: bool,
    pub show_module: bool,
    pub compact_mode: bool,
    /// Modules that are never shown, whatever the level.
    pub filtered_modules: BTreeSet<String>,
    /// Modules whose DEBUG and TRACE output is always dropped.
    pub verbose_modules: BTreeSet<String>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            show_timestamp: true,
            show_module: true,
            compact_mode: false,
            filtered_modules: BTreeSet::new(),
            verbose_modules: ["HCS-11", "ConnectionTool"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

/// A level given either by name (`"debug"`) or by numeric rank (`3`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum LevelSpec {
    /// Any integer is accepted here; out-of-range ranks fail to resolve.
    Rank(i64),
    Name(String),
}

impl LevelSpec {
    pub fn resolve(&self) -> Option<LogLevel> {
        match self {
            LevelSpec::Rank(rank) => u8::try_from(*rank).ok().and_then(LogLevel::from_rank),
            LevelSpec::Name(name) => name.parse().ok(),
        }
    }
}

impl fmt::Display for LevelSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelSpec::Rank(rank) => write!(f, "{}", rank),
            LevelSpec::Name(name) => write!(f, "'{}'", name),
        }
    }
}

impl From<LogLevel> for LevelSpec {
    fn from(level: LogLevel) -> Self {
        LevelSpec::Rank(i64::from(level.rank()))
    }
}

impl From<&str> for LevelSpec {
    fn from(name: &str) -> Self {
        LevelSpec::Name(name.to_string())
    }
}

/// A partial configuration. Unset fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggerOptions {
    pub level: Option<LevelSpec>,
    pub show_timestamp: Option<bool>,
    pub show_module: Option<bool>,
    pub compact_mode: Option<bool>,
    pub filtered_modules: Option<BTreeSet<String>>,
    pub verbose_modules: Option<BTreeSet<String>>,
}

impl LoggerOptions {
    pub fn with_level(level: impl Into<LevelSpec>) -> Self {
        Self {
            level: Some(level.into()),
            ..Self::default()
        }
    }

    /// Reads options from a JSON file such as `{"level": "debug", "showModule": false}`.
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// Result of merging options over a config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Merged {
    pub config: LoggerConfig,
    /// The level value that could not be resolved, if any. The previous level is kept.
    pub rejected_level: Option<LevelSpec>,
}

impl LoggerConfig {
    /// Shallow-merges `options` over `self`.
    pub fn merged(&self, options: LoggerOptions) -> Merged {
        let mut config = self.clone();
        let mut rejected_level = None;

        if let Some(spec) = options.level {
            match spec.resolve() {
                Some(level) => config.level = level,
                None => rejected_level = Some(spec),
            }
        }
        if let Some(show) = options.show_timestamp {
            config.show_timestamp = show;
        }
        if let Some(show) = options.show_module {
            config.show_module = show;
        }
        if let Some(compact) = options.compact_mode {
            config.compact_mode = compact;
        }
        if let Some(modules) = options.filtered_modules {
            config.filtered_modules = modules;
        }
        if let Some(modules) = options.verbose_modules {
            config.verbose_modules = modules;
        }

        Merged {
            config,
            rejected_level,
        }
    }
}

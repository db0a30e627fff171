//! This module defines the structure for a single log record.
use super::LogLevel;
use chrono::{DateTime, Utc};

/// A single log call: created at the call site and consumed by the formatter.
#[derive(Debug, Clone)]
pub struct LogRecord {
    /// The wall-clock instant of the call.
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    /// Short label for the originating subsystem, if known.
    pub module: Option<String>,
    pub message: String,
}

impl LogRecord {
    pub fn new(level: LogLevel, module: Option<&str>, message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            level,
            module: module.map(str::to_string),
            message: message.into(),
        }
    }

    #[cfg(test)]
    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }
}

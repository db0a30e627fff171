//! This module contains the logging infrastructure for the application.
//!
//! It covers the leveled logger, the classifier that labels and filters raw
//! lines, the console relay for output produced by other crates, and the
//! sinks everything is finally written to.
pub mod buffer;
pub mod classify;
pub mod config;
pub mod format;
pub mod layer;
pub mod level;
pub mod logger;
pub mod record;
pub mod relay;
pub mod sink;

pub use buffer::LogBuffer;
pub use classify::Classifier;
pub use config::{LoggerConfig, LoggerOptions};
pub use format::{AnsiPalette, Formatter, Tint};
pub use layer::RelayLayer;
pub use level::LogLevel;
pub use logger::Logger;
pub use record::LogRecord;
pub use relay::ConsoleRelay;
pub use sink::{Channel, LogSink, StdioSink, TeeSink};

#[cfg(test)]
pub use sink::MemorySink;

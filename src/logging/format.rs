//! Line rendering: `[HH:MM:SS] [LEVEL] [Module] message`.
//!
//! Colour is supplied by a [`Palette`]. `AnsiPalette` is used on terminals,
//! `PlainPalette` everywhere else, so rendered text can be asserted on.
use super::{LogLevel, LogRecord, LoggerConfig};
use colored::{Color, Colorize};

/// Colour roles used by the formatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tint {
    Timestamp,
    Level(LogLevel),
    Module,
    Heading,
    Muted,
}

pub trait Palette: Send + Sync {
    fn paint(&self, text: &str, tint: Tint) -> String;
}

/// Leaves text untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainPalette;

impl Palette for PlainPalette {
    fn paint(&self, text: &str, _tint: Tint) -> String {
        text.to_string()
    }
}

/// ANSI colours via the `colored` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnsiPalette;

impl Palette for AnsiPalette {
    fn paint(&self, text: &str, tint: Tint) -> String {
        let color = match tint {
            Tint::Timestamp | Tint::Muted => Color::BrightBlack,
            Tint::Module => Color::Cyan,
            Tint::Heading => return text.bold().to_string(),
            Tint::Level(level) => match level {
                LogLevel::Error => Color::Red,
                LogLevel::Warn => Color::Yellow,
                LogLevel::Info => Color::Green,
                LogLevel::Debug => Color::Blue,
                LogLevel::Trace => Color::BrightBlack,
            },
        };
        text.color(color).to_string()
    }
}

pub struct Formatter {
    palette: Box<dyn Palette>,
}

impl Formatter {
    pub fn new(palette: Box<dyn Palette>) -> Self {
        Self { palette }
    }

    pub fn plain() -> Self {
        Self::new(Box::new(PlainPalette))
    }

    pub fn palette(&self) -> &dyn Palette {
        self.palette.as_ref()
    }

    pub fn format(&self, record: &LogRecord, config: &LoggerConfig) -> String {
        let mut line = String::new();

        if config.show_timestamp {
            let stamp = format!("[{}]", record.timestamp.format("%H:%M:%S"));
            line.push_str(&self.palette.paint(&stamp, Tint::Timestamp));
            line.push(' ');
        }

        let level = format!("[{}]", record.level);
        line.push_str(&self.palette.paint(&level, Tint::Level(record.level)));
        line.push(' ');

        if config.show_module {
            if let Some(module) = record.module.as_deref().filter(|m| !m.is_empty()) {
                let module = format!("[{}]", module);
                line.push_str(&self.palette.paint(&module, Tint::Module));
                line.push(' ');
            }
        }

        if config.compact_mode {
            line.push_str(&collapse_whitespace(&record.message));
        } else {
            line.push_str(&record.message);
        }

        line
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn record(level: LogLevel, module: Option<&str>, message: &str) -> LogRecord {
        LogRecord::new(level, module, message).at(Utc.with_ymd_and_hms(2024, 5, 1, 9, 4, 7).unwrap())
    }

    #[test]
    fn renders_all_segments() {
        let line = Formatter::plain().format(
            &record(LogLevel::Error, Some("Connection"), "Connection failed: timeout"),
            &LoggerConfig::default(),
        );
        assert_eq!(line, "[09:04:07] [ERROR] [Connection] Connection failed: timeout");
    }

    #[test]
    fn segments_are_individually_omittable() {
        let formatter = Formatter::plain();
        let entry = record(LogLevel::Info, Some("Search"), "found 3");

        let no_time = LoggerConfig {
            show_timestamp: false,
            ..LoggerConfig::default()
        };
        assert_eq!(formatter.format(&entry, &no_time), "[INFO] [Search] found 3");

        let no_module = LoggerConfig {
            show_module: false,
            ..LoggerConfig::default()
        };
        assert_eq!(formatter.format(&entry, &no_module), "[09:04:07] [INFO] found 3");

        let bare = record(LogLevel::Warn, None, "no module");
        assert_eq!(formatter.format(&bare, &no_time), "[WARN] no module");
    }

    #[test]
    fn compact_mode_collapses_whitespace() {
        let config = LoggerConfig {
            compact_mode: true,
            show_timestamp: false,
            ..LoggerConfig::default()
        };
        let line = Formatter::plain().format(&record(LogLevel::Debug, None, "a\n  b\tc"), &config);
        assert_eq!(line, "[DEBUG] a b c");
    }

    #[test]
    fn ansi_palette_wraps_text() {
        colored::control::set_override(true);
        let painted = AnsiPalette.paint("[ERROR]", Tint::Level(LogLevel::Error));
        assert!(painted.contains("[ERROR]"));
        assert!(painted.starts_with('\u{1b}'));
    }
}

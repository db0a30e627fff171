//! The console relay routes output this program does not format itself
//! through the classification policy.
//!
//! Dependency output reaches the relay either through [`ConsoleRelay::emit`]
//! or through the `tracing` bridge in [`super::layer`]. While installed, the
//! relay drops suppressed lines and labels recognised ones, unless the label
//! is a filtered module. Everything else is written unchanged. All writes go to the sink captured when the relay
//! was built. The logger's own calls write to that same sink directly and
//! never pass through the relay.
use super::{logger::channel_for, Channel, LogLevel, LogRecord, LogSink, Logger};
use serde_json::Value;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// One positional argument of a console write.
#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleArg {
    Text(String),
    Structured(Value),
}

impl fmt::Display for ConsoleArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConsoleArg::Text(text) => f.write_str(text),
            ConsoleArg::Structured(Value::String(text)) => f.write_str(text),
            ConsoleArg::Structured(value) => write!(f, "{}", value),
        }
    }
}

impl From<&str> for ConsoleArg {
    fn from(text: &str) -> Self {
        ConsoleArg::Text(text.to_string())
    }
}

impl From<String> for ConsoleArg {
    fn from(text: String) -> Self {
        ConsoleArg::Text(text)
    }
}

impl From<Value> for ConsoleArg {
    fn from(value: Value) -> Self {
        ConsoleArg::Structured(value)
    }
}

pub struct ConsoleRelay {
    logger: Arc<Logger>,
    original: Arc<dyn LogSink>,
    installed: AtomicBool,
}

impl ConsoleRelay {
    /// Captures the logger's sink as the original channel. This happens once;
    /// later installs cannot replace it.
    pub fn new(logger: Arc<Logger>) -> Self {
        let original = logger.sink();
        Self {
            logger,
            original,
            installed: AtomicBool::new(false),
        }
    }

    /// Starts classifying relayed output. Returns `false` if already installed.
    pub fn install(&self) -> bool {
        let newly = !self.installed.swap(true, Ordering::SeqCst);
        if newly {
            self.original.write(
                Channel::Log,
                "Console relay installed; library output is classified",
            );
        }
        newly
    }

    /// Returns to verbatim passthrough. Returns `false` if it was not installed.
    pub fn uninstall(&self) -> bool {
        let was = self.installed.swap(false, Ordering::SeqCst);
        if was {
            self.original.write(Channel::Log, "Console relay removed");
        }
        was
    }

    pub fn is_installed(&self) -> bool {
        self.installed.load(Ordering::SeqCst)
    }

    /// Relays one console write. Arguments are joined with single spaces.
    pub fn emit(&self, channel: Channel, args: &[ConsoleArg]) {
        self.relay(level_for(channel), channel, &join_args(args));
    }

    /// Relays a single line at the channel matching `level`.
    ///
    /// Unlike raw console writes the line carries its own level, so it is
    /// held to the logger's current minimum level.
    pub fn emit_text(&self, level: LogLevel, text: &str) {
        if !self.logger.should_emit(level, None) {
            return;
        }
        self.relay(level, channel_for(level), text);
    }

    fn relay(&self, level: LogLevel, channel: Channel, text: &str) {
        if !self.is_installed() {
            self.original.write(channel, text);
            return;
        }

        let classifier = self.logger.classifier();
        if classifier.should_suppress(text) {
            return;
        }

        match classifier.detect_module(text) {
            Some(module) => {
                let config = self.logger.config();
                if config.filtered_modules.contains(&module) {
                    return;
                }
                let record = LogRecord::new(level, Some(&module), classifier.clean_message(text));
                let line = self.logger.formatter().format(&record, &config);
                self.original.write(channel, &line);
            }
            None => self.original.write(channel, text),
        }
    }
}

fn join_args(args: &[ConsoleArg]) -> String {
    args.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

fn level_for(channel: Channel) -> LogLevel {
    match channel {
        Channel::Log => LogLevel::Info,
        Channel::Warn => LogLevel::Warn,
        Channel::Error => LogLevel::Error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::{Classifier, Formatter, LoggerConfig, LoggerOptions, MemorySink};
    use regex::Regex;
    use serde_json::json;

    fn relay() -> (ConsoleRelay, Arc<MemorySink>) {
        let sink = Arc::new(MemorySink::new());
        let logger = Arc::new(Logger::new(
            LoggerConfig::default(),
            Classifier::builtin(false).unwrap(),
            Formatter::plain(),
            sink.clone(),
        ));
        (ConsoleRelay::new(logger), sink)
    }

    fn installed() -> (ConsoleRelay, Arc<MemorySink>) {
        let (relay, sink) = relay();
        relay.install();
        sink.clear();
        (relay, sink)
    }

    #[test]
    fn recognised_output_is_labelled() {
        let (relay, sink) = installed();
        relay.emit(Channel::Log, &["HCS-10 connection established".into()]);

        let lines = sink.lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].0, Channel::Log);
        let shape =
            Regex::new(r"^\[\d{2}:\d{2}:\d{2}\] \[INFO\] \[HCS\] HCS-10 connection established$")
                .unwrap();
        assert!(shape.is_match(&lines[0].1), "got {:?}", lines[0].1);
    }

    #[test]
    fn unrecognised_output_passes_unmodified() {
        let (relay, sink) = installed();
        relay.emit(Channel::Warn, &["plain".into(), json!({"retry": 2}).into()]);
        assert_eq!(
            sink.lines(),
            vec![(Channel::Warn, "plain {\"retry\":2}".to_string())]
        );
    }

    #[test]
    fn suppressed_output_produces_nothing() {
        let (relay, sink) = installed();
        relay.emit(Channel::Log, &["Running register_agent with args".into(), json!({"name": "x"}).into()]);
        relay.emit(Channel::Log, &[json!({}).into()]);
        relay.emit(Channel::Error, &["[llm:ChatOpenAI] Entering LLM run".into()]);
        assert!(sink.lines().is_empty());
    }

    #[test]
    fn module_token_is_used_and_removed() {
        let (relay, sink) = installed();
        relay.emit(Channel::Error, &["{ module: 'HCS-11' }".into(), "profile fetch failed".into()]);

        let lines = sink.lines();
        assert_eq!(lines[0].0, Channel::Error);
        assert!(lines[0].1.ends_with("[ERROR] [HCS-11] profile fetch failed"));
    }

    #[test]
    fn passthrough_when_not_installed() {
        let (relay, sink) = relay();
        relay.emit(Channel::Log, &["HCS-10 raw".into()]);
        relay.emit(Channel::Log, &["Got output".into()]);
        assert_eq!(sink.texts(), vec!["HCS-10 raw".to_string(), "Got output".to_string()]);
    }

    #[test]
    fn double_install_then_uninstall_restores_original() {
        let (relay, sink) = relay();
        assert!(relay.install());
        assert!(!relay.install());
        assert!(relay.uninstall());
        assert!(!relay.is_installed());
        assert!(!relay.uninstall());
        sink.clear();

        relay.emit(Channel::Log, &["HCS-10 after restore".into()]);
        assert_eq!(sink.texts(), vec!["HCS-10 after restore".to_string()]);
    }

    #[test]
    fn logger_writes_bypass_relay() {
        let (relay, sink) = installed();
        relay.logger.info("Got output from logger", None);
        assert_eq!(sink.lines().len(), 1);
    }

    #[test]
    fn structured_args_render_as_json() {
        let args: [ConsoleArg; 3] = [
            json!("quoted? no").into(),
            json!({"ids": [1, 2], "ok": null}).into(),
            String::from("tail").into(),
        ];
        assert_eq!(join_args(&args), r#"quoted? no {"ids":[1,2],"ok":null} tail"#);
    }

    #[test]
    fn filtered_modules_drop_relayed_lines() {
        let (relay, sink) = installed();
        relay.logger.configure(LoggerOptions {
            filtered_modules: Some(["HCS".to_string()].into_iter().collect()),
            ..LoggerOptions::default()
        });
        sink.clear();

        relay.emit(Channel::Log, &["HCS-10 connection request sent".into()]);
        relay.emit(Channel::Error, &["HCS-10 inbound topic failed".into()]);
        assert!(sink.lines().is_empty());

        relay.emit(Channel::Log, &["Monitoring topic 0.0.12".into()]);
        assert_eq!(sink.lines().len(), 1);
    }

    #[test]
    fn leveled_text_follows_current_level() {
        let (relay, sink) = installed();
        relay.logger.configure(LoggerOptions::with_level("error"));
        sink.clear();

        relay.emit_text(LogLevel::Info, "HCS-10 connection request sent");
        relay.emit_text(LogLevel::Debug, "unlabelled detail");
        assert!(sink.lines().is_empty());

        relay.emit_text(LogLevel::Error, "HCS-10 submit failed");
        let lines = sink.lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].0, Channel::Error);
        assert!(lines[0].1.ends_with("[ERROR] [HCS] HCS-10 submit failed"));

        relay.logger.configure(LoggerOptions::with_level("debug"));
        relay.emit_text(LogLevel::Debug, "Monitoring topic tick");
        assert!(sink.lines()[1].1.ends_with("[DEBUG] [Monitor] Monitoring topic tick"));
    }
}

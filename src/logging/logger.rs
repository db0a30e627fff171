//! The leveled logger owned by the application.
//!
//! One `Logger` is created during setup and shared as `Arc<Logger>`. Its
//! configuration changes only through [`Logger::configure`]; every log call
//! reads the current snapshot.
use super::{
    Channel, Classifier, Formatter, LogLevel, LogRecord, LogSink, LoggerConfig, LoggerOptions,
    Tint,
};
use crate::network::AgentProfile;
use std::sync::{Arc, RwLock};

const DESCRIPTION_PREVIEW: usize = 60;

pub struct Logger {
    config: RwLock<LoggerConfig>,
    classifier: Classifier,
    formatter: Formatter,
    sink: Arc<dyn LogSink>,
}

impl Logger {
    pub fn new(
        config: LoggerConfig,
        classifier: Classifier,
        formatter: Formatter,
        sink: Arc<dyn LogSink>,
    ) -> Self {
        Self {
            config: RwLock::new(config),
            classifier,
            formatter,
            sink,
        }
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    pub fn formatter(&self) -> &Formatter {
        &self.formatter
    }

    /// The sink this logger writes to. The console relay captures it as the
    /// original channel.
    pub fn sink(&self) -> Arc<dyn LogSink> {
        self.sink.clone()
    }

    /// Returns a copy of the current configuration.
    pub fn config(&self) -> LoggerConfig {
        self.config
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Merges `options` over the current configuration and returns the result.
    ///
    /// A level that does not name a known level keeps the previous one and is
    /// reported with a single warning.
    pub fn configure(&self, options: LoggerOptions) -> LoggerConfig {
        let merged = {
            let mut config = self
                .config
                .write()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            let merged = config.merged(options);
            *config = merged.config.clone();
            merged
        };

        if let Some(rejected) = merged.rejected_level {
            self.warn(
                &format!(
                    "Ignoring unknown log level {}; keeping {}",
                    rejected, merged.config.level
                ),
                Some("Logger"),
            );
        }

        merged.config
    }

    /// Whether a record at `level` from `module` passes the current config.
    ///
    /// Modules listed as verbose never show DEBUG or TRACE output, even when
    /// the global level allows it.
    pub fn should_emit(&self, level: LogLevel, module: Option<&str>) -> bool {
        let config = self
            .config
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        emits(&config, level, module)
    }

    pub fn log(&self, level: LogLevel, message: &str, module: Option<&str>) {
        let config = self.config();
        if !emits(&config, level, module) {
            return;
        }

        let line = self
            .formatter
            .format(&LogRecord::new(level, module, message), &config);
        self.sink.write(channel_for(level), &line);
    }

    pub fn error(&self, message: &str, module: Option<&str>) {
        self.log(LogLevel::Error, message, module);
    }

    pub fn warn(&self, message: &str, module: Option<&str>) {
        self.log(LogLevel::Warn, message, module);
    }

    pub fn info(&self, message: &str, module: Option<&str>) {
        self.log(LogLevel::Info, message, module);
    }

    pub fn debug(&self, message: &str, module: Option<&str>) {
        self.log(LogLevel::Debug, message, module);
    }

    pub fn trace(&self, message: &str, module: Option<&str>) {
        self.log(LogLevel::Trace, message, module);
    }

    /// Prints a summary line and a table-like block of agent search results.
    pub fn search_results(&self, results: &[AgentProfile], query: &str) {
        if results.is_empty() {
            self.info(&format!("No results found for query: {}", query), Some("Search"));
            return;
        }

        self.info(
            &format!("Found {} agents matching \"{}\":", results.len(), query),
            Some("Search"),
        );

        let palette = self.formatter.palette();
        let compact = self.config().compact_mode;

        if compact {
            for (index, agent) in results.iter().enumerate() {
                self.sink.write(
                    Channel::Log,
                    &format!(
                        "{}. {} {}",
                        index + 1,
                        agent.display_name(),
                        palette.paint(&format!("({})", agent.account_id), Tint::Module)
                    ),
                );
            }
            return;
        }

        self.sink.write(
            Channel::Log,
            &format!("\n{}", palette.paint("=== AGENT SEARCH RESULTS ===", Tint::Heading)),
        );

        for (index, agent) in results.iter().enumerate() {
            let heading = palette.paint(
                &format!("{}. {}", index + 1, agent.display_name()),
                Tint::Heading,
            );
            self.sink.write(
                Channel::Log,
                &format!(
                    "{} {}",
                    heading,
                    palette.paint(&format!("({})", agent.account_id), Tint::Module)
                ),
            );

            if let Some(description) = agent.description.as_deref().filter(|d| !d.is_empty()) {
                self.sink
                    .write(Channel::Log, &format!("   {}", preview(description)));
            }

            let mut details = Vec::new();
            if let Some(kind) = agent.agent_type.as_deref() {
                details.push(format!("Type: {}", kind));
            }
            if !agent.capabilities.is_empty() {
                details.push(format!("Capabilities: {}", agent.capabilities.join(", ")));
            }
            if !details.is_empty() {
                self.sink.write(
                    Channel::Log,
                    &format!("   {}", palette.paint(&details.join(" | "), Tint::Muted)),
                );
            }
        }

        self.sink.write(
            Channel::Log,
            &format!("{}\n", palette.paint("===========================", Tint::Heading)),
        );
    }
}

fn emits(config: &LoggerConfig, level: LogLevel, module: Option<&str>) -> bool {
    if level.rank() > config.level.rank() {
        return false;
    }

    if let Some(module) = module {
        if config.filtered_modules.contains(module) {
            return false;
        }
        if config.verbose_modules.contains(module) && level >= LogLevel::Debug {
            return false;
        }
    }

    true
}

pub(crate) fn channel_for(level: LogLevel) -> Channel {
    match level {
        LogLevel::Error => Channel::Error,
        LogLevel::Warn => Channel::Warn,
        LogLevel::Info | LogLevel::Debug | LogLevel::Trace => Channel::Log,
    }
}

fn preview(text: &str) -> String {
    if text.chars().count() > DESCRIPTION_PREVIEW {
        let cut: String = text.chars().take(DESCRIPTION_PREVIEW).collect();
        format!("{}...", cut)
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::MemorySink;
    use regex::Regex;

    fn logger() -> (Logger, Arc<MemorySink>) {
        let sink = Arc::new(MemorySink::new());
        let logger = Logger::new(
            LoggerConfig::default(),
            Classifier::builtin(false).unwrap(),
            Formatter::plain(),
            sink.clone(),
        );
        (logger, sink)
    }

    #[test]
    fn error_line_has_expected_shape() {
        let (logger, sink) = logger();
        logger.log(LogLevel::Error, "Connection failed: timeout", Some("Connection"));

        let lines = sink.lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].0, Channel::Error);
        let shape =
            Regex::new(r"^\[\d{2}:\d{2}:\d{2}\] \[ERROR\] \[Connection\] Connection failed: timeout$")
                .unwrap();
        assert!(shape.is_match(&lines[0].1), "got {:?}", lines[0].1);
    }

    #[test]
    fn level_gates_output() {
        let (logger, sink) = logger();
        logger.debug("hidden", None);
        logger.info("shown", None);
        logger.warn("warned", None);

        let lines = sink.lines();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].0, Channel::Log);
        assert_eq!(lines[1].0, Channel::Warn);
    }

    #[test]
    fn verbose_modules_cap_debug_regardless_of_level() {
        let (logger, sink) = logger();
        logger.configure(LoggerOptions::with_level("DEBUG"));

        logger.debug("profile internals", Some("HCS-11"));
        assert!(sink.lines().is_empty());

        logger.debug("search internals", Some("Search"));
        assert_eq!(sink.lines().len(), 1);

        // Info from a verbose module still shows.
        logger.info("profile ready", Some("HCS-11"));
        assert_eq!(sink.lines().len(), 2);
    }

    #[test]
    fn filtered_modules_are_silenced() {
        let (logger, sink) = logger();
        logger.configure(LoggerOptions {
            filtered_modules: Some(["Topic".to_string()].into_iter().collect()),
            ..LoggerOptions::default()
        });

        logger.error("topic failure", Some("Topic"));
        assert!(sink.lines().is_empty());
        assert!(!logger.should_emit(LogLevel::Error, Some("Topic")));
        assert!(logger.should_emit(LogLevel::Error, None));
    }

    #[test]
    fn configure_round_trips_through_config() {
        let (logger, _sink) = logger();
        let before = logger.config();

        let returned = logger.configure(LoggerOptions {
            level: Some("trace".into()),
            compact_mode: Some(true),
            ..LoggerOptions::default()
        });

        let after = logger.config();
        assert_eq!(returned, after);
        assert_eq!(after.level, LogLevel::Trace);
        assert!(after.compact_mode);
        assert_eq!(after.show_timestamp, before.show_timestamp);
        assert_eq!(after.show_module, before.show_module);
        assert_eq!(after.verbose_modules, before.verbose_modules);
    }

    #[test]
    fn unknown_level_keeps_previous_and_warns() {
        let (logger, sink) = logger();
        let config = logger.configure(LoggerOptions::with_level("shouty"));

        assert_eq!(config.level, LogLevel::Info);
        let lines = sink.lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].0, Channel::Warn);
        assert!(lines[0].1.contains("[Logger]"));
        assert!(lines[0].1.contains("shouty"));
    }

    #[test]
    fn search_results_render_block() {
        let (logger, sink) = logger();
        let agents = vec![AgentProfile {
            account_id: "0.0.1001".into(),
            name: Some("WeatherBot".into()),
            description: Some("x".repeat(70)),
            agent_type: Some("autonomous".into()),
            capabilities: vec!["weather".into(), "chat".into()],
        }];

        logger.search_results(&agents, "weather");

        let text = sink.texts().join("\n");
        assert!(text.contains("[Search] Found 1 agents matching \"weather\":"));
        assert!(text.contains("=== AGENT SEARCH RESULTS ==="));
        assert!(text.contains("1. WeatherBot (0.0.1001)"));
        assert!(text.contains(&format!("   {}...", "x".repeat(60))));
        assert!(text.contains("Type: autonomous | Capabilities: weather, chat"));
    }

    #[test]
    fn empty_search_results_report_query() {
        let (logger, sink) = logger();
        logger.search_results(&[], "nobody");
        let texts = sink.texts();
        assert_eq!(texts.len(), 1);
        assert!(texts[0].ends_with("[Search] No results found for query: nobody"));
    }
}

//! Output sinks: the destinations formatted lines are written to.
use std::io::Write;
use std::sync::Arc;

/// The three standard output channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Log,
    Warn,
    Error,
}

/// A destination for formatted log text.
pub trait LogSink: Send + Sync {
    fn write(&self, channel: Channel, line: &str);
}

/// Writes `Log` to stdout and `Warn`/`Error` to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdioSink;

impl LogSink for StdioSink {
    fn write(&self, channel: Channel, line: &str) {
        // A closed pipe must not take the process down with it.
        let _ = match channel {
            Channel::Log => writeln!(std::io::stdout().lock(), "{}", line),
            Channel::Warn | Channel::Error => writeln!(std::io::stderr().lock(), "{}", line),
        };
    }
}

/// Keeps every written line in memory.
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    lines: Arc<std::sync::Mutex<Vec<(Channel, String)>>>,
}

#[cfg(test)]
impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<(Channel, String)> {
        self.lines
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn texts(&self) -> Vec<String> {
        self.lines().into_iter().map(|(_, line)| line).collect()
    }

    pub fn clear(&self) {
        self.lines
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }
}

#[cfg(test)]
impl LogSink for MemorySink {
    fn write(&self, channel: Channel, line: &str) {
        self.lines
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push((channel, line.to_string()));
    }
}

/// Writes every line to both sinks.
pub struct TeeSink {
    primary: Arc<dyn LogSink>,
    secondary: Arc<dyn LogSink>,
}

impl TeeSink {
    pub fn new(primary: Arc<dyn LogSink>, secondary: Arc<dyn LogSink>) -> Self {
        Self { primary, secondary }
    }
}

impl LogSink for TeeSink {
    fn write(&self, channel: Channel, line: &str) {
        self.primary.write(channel, line);
        self.secondary.write(channel, line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tee_writes_to_both() {
        let a = Arc::new(MemorySink::new());
        let b = Arc::new(MemorySink::new());
        let tee = TeeSink::new(a.clone(), b.clone());

        tee.write(Channel::Warn, "careful");

        assert_eq!(a.lines(), vec![(Channel::Warn, "careful".to_string())]);
        assert_eq!(b.texts(), vec!["careful".to_string()]);
    }
}

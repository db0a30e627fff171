//! This module provides a `tracing` layer that forwards events from any crate
//! into the console relay.
use super::ConsoleRelay;
use super::LogLevel;
use std::sync::Arc;
use tracing::{Event, Subscriber};
use tracing_subscriber::{
    layer::{Context, SubscriberExt},
    registry::LookupSpan,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

/// A `tracing` layer that hands every event to a [`ConsoleRelay`].
pub struct RelayLayer {
    relay: Arc<ConsoleRelay>,
}

impl RelayLayer {
    /// Creates a new `RelayLayer`.
    ///
    /// # Arguments
    ///
    /// * `relay` - The relay that classifies and writes the events.
    pub fn new(relay: Arc<ConsoleRelay>) -> Self {
        Self { relay }
    }

    /// Installs the layer as the global default subscriber.
    ///
    /// `directives` is an `EnvFilter` string such as `"info,hcs_agent=debug"`.
    /// Events it lets through are still held to the logger's current level.
    ///
    /// # Errors
    ///
    /// This function will return an error if the filter cannot be parsed or a
    /// global default subscriber is already set.
    pub fn init_subscriber(
        relay: Arc<ConsoleRelay>,
        directives: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let filter = EnvFilter::try_new(directives)?;
        let layer = RelayLayer::new(relay).with_filter(filter);

        tracing_subscriber::registry().with(layer).try_init()?;
        Ok(())
    }
}

impl<S> Layer<S> for RelayLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut message = String::new();
        let mut visitor = MessageVisitor::new(&mut message);
        event.record(&mut visitor);
        visitor.finish();

        let level = LogLevel::from(*event.metadata().level());
        self.relay.emit_text(level, &message);
    }
}

/// A `tracing::field::Visit` implementation that renders the message
/// followed by `key=value` pairs for the remaining fields.
struct MessageVisitor<'a> {
    out: &'a mut String,
    message: Option<String>,
    fields: Vec<String>,
}

impl<'a> MessageVisitor<'a> {
    fn new(out: &'a mut String) -> Self {
        Self {
            out,
            message: None,
            fields: Vec::new(),
        }
    }

    fn finish(self) {
        let mut parts = Vec::with_capacity(self.fields.len() + 1);
        if let Some(message) = self.message {
            parts.push(message);
        }
        parts.extend(self.fields);
        *self.out = parts.join(" ");
    }
}

impl<'a> tracing::field::Visit for MessageVisitor<'a> {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = Some(format!("{:?}", value));
        } else {
            self.fields.push(format!("{}={:?}", field.name(), value));
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        } else {
            self.fields.push(format!("{}={}", field.name(), value));
        }
    }
}

//! This module defines the `CommandContext`, which gives command handlers
//! access to the application's services and its output.
use std::path::PathBuf;
use std::sync::Arc;

use serde_json::Value;

use crate::logging::{Channel, ConsoleRelay, LogBuffer, Logger};
use crate::network::AgentNetwork;
use crate::tools::{ToolError, ToolRegistry};

/// Shared services for command handlers.
#[derive(Clone)]
pub struct CommandContext {
    logger: Arc<Logger>,
    relay: Arc<ConsoleRelay>,
    buffer: Arc<LogBuffer>,
    network: Arc<dyn AgentNetwork>,
    tools: Arc<ToolRegistry>,
    data_dir: PathBuf,
}

impl CommandContext {
    /// Creates a new `CommandContext`.
    pub fn new(
        logger: Arc<Logger>,
        relay: Arc<ConsoleRelay>,
        buffer: Arc<LogBuffer>,
        network: Arc<dyn AgentNetwork>,
        tools: Arc<ToolRegistry>,
        data_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            logger,
            relay,
            buffer,
            network,
            tools,
            data_dir: data_dir.into(),
        }
    }

    pub fn logger(&self) -> &Arc<Logger> {
        &self.logger
    }

    pub fn relay(&self) -> &Arc<ConsoleRelay> {
        &self.relay
    }

    pub fn buffer(&self) -> &Arc<LogBuffer> {
        &self.buffer
    }

    pub fn network(&self) -> &Arc<dyn AgentNetwork> {
        &self.network
    }

    pub fn tools(&self) -> &Arc<ToolRegistry> {
        &self.tools
    }

    pub fn data_dir(&self) -> &PathBuf {
        &self.data_dir
    }

    /// Calls a registered tool.
    ///
    /// The invocation and its output are announced on the console the way an
    /// agent framework reports tool runs, so they pass through the relay.
    pub async fn call_tool(&self, name: &str, input: Value) -> Result<String, ToolError> {
        self.relay.emit(
            Channel::Log,
            &[format!("Running {} with args", name).into(), input.clone().into()],
        );
        let output = self.tools.call(name, input).await?;
        self.relay
            .emit(Channel::Log, &["Got output".into(), output.as_str().into()]);
        Ok(output)
    }

    /// Writes command output as-is, without level or module decoration.
    ///
    /// # Arguments
    ///
    /// * `text` - The output; multi-line text is written line by line.
    pub fn say<S: AsRef<str>>(&self, text: S) {
        let sink = self.logger.sink();
        for line in text.as_ref().lines() {
            sink.write(Channel::Log, line);
        }
    }
}

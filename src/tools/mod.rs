//! Tools the agent can invoke with JSON arguments.
mod connection;
mod weather;

pub use connection::InitiateConnectionTool;
pub use weather::WeatherTool;

use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("tool '{0}' not found")]
    NotFound(String),
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Network(#[from] crate::network::NetworkError),
    #[error("could not encode tool output: {0}")]
    Encode(#[from] serde_json::Error),
}

/// A tool callable by name with a JSON argument object.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &'static str;

    /// Guidance shown to whoever decides when to call the tool.
    fn description(&self) -> &str;

    async fn call(&self, input: Value) -> Result<String, ToolError>;
}

/// Registry of available tools, keyed by name.
#[derive(Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a tool, replacing any tool with the same name.
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    /// Name and description of every tool, sorted by name.
    pub fn descriptions(&self) -> Vec<(String, String)> {
        self.tools
            .iter()
            .map(|(name, tool)| (name.clone(), tool.description().to_string()))
            .collect()
    }

    pub async fn call(&self, name: &str, input: Value) -> Result<String, ToolError> {
        let tool = self
            .tools
            .get(name)
            .ok_or_else(|| ToolError::NotFound(name.to_string()))?;
        tool.call(input).await
    }
}

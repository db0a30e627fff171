//! Connection requests with lenient argument handling.
//!
//! Callers name the target in several ways (`targetAgentId`, `accountId`,
//! a bare string, ...). The parameters are normalised and validated before
//! the network is called.
use super::{Tool, ToolError};
use crate::logging::Logger;
use crate::network::AgentNetwork;
use crate::types::is_account_id;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

const TARGET_KEYS: &[&str] = &[
    "targetAccountId",
    "targetAgentId",
    "accountId",
    "target_account_id",
    "target",
];
const MEMO_KEYS: &[&str] = &["memo", "message"];

const DESCRIPTION: &str = "Use this tool to initiate a connection with another agent. \
You'll need the target agent's accountId. You can optionally include a message with \
your connection request.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionParams {
    pub target_account_id: String,
    pub memo: Option<String>,
}

impl ConnectionParams {
    /// Normalises tool input into connection parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::InvalidArguments`] when no target is given or it
    /// is not an account id.
    pub fn from_input(input: &Value) -> Result<Self, ToolError> {
        let (target, memo) = match input {
            Value::String(target) => (Some(target.as_str()), None),
            Value::Object(map) => (
                first_text(map, TARGET_KEYS),
                first_text(map, MEMO_KEYS),
            ),
            _ => (None, None),
        };

        let target = target
            .map(|t| t.trim().trim_matches(|c| c == '"' || c == '\''))
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                ToolError::InvalidArguments("targetAccountId is required".to_string())
            })?;

        if !is_account_id(target) {
            return Err(ToolError::InvalidArguments(format!(
                "'{}' is not an account id (expected e.g. 0.0.1234)",
                target
            )));
        }

        Ok(Self {
            target_account_id: target.to_string(),
            memo: memo
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .map(str::to_string),
        })
    }
}

fn first_text<'a>(map: &'a serde_json::Map<String, Value>, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .find_map(|key| map.get(*key).and_then(Value::as_str))
}

pub struct InitiateConnectionTool {
    network: Arc<dyn AgentNetwork>,
    logger: Arc<Logger>,
}

impl InitiateConnectionTool {
    pub fn new(network: Arc<dyn AgentNetwork>, logger: Arc<Logger>) -> Self {
        Self { network, logger }
    }
}

#[async_trait]
impl Tool for InitiateConnectionTool {
    fn name(&self) -> &'static str {
        "initiate_connection"
    }

    fn description(&self) -> &str {
        DESCRIPTION
    }

    async fn call(&self, input: Value) -> Result<String, ToolError> {
        let params = ConnectionParams::from_input(&input)?;
        self.logger.info(
            &format!("Initiating connection to agent: {}", params.target_account_id),
            Some("Connection"),
        );

        match self
            .network
            .initiate_connection(&params.target_account_id, params.memo.as_deref())
            .await
        {
            Ok(connection) => {
                self.logger
                    .info("Connection request sent successfully", Some("Connection"));
                Ok(serde_json::to_string_pretty(&connection)?)
            }
            Err(e) => {
                self.logger.error(
                    &format!("Connection initiation failed: {}", e),
                    Some("Connection"),
                );
                Err(e.into())
            }
        }
    }
}

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Key material for an agent account, as written to `<name>-credentials.json`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AgentCredentials {
    pub account_id: String,
    pub private_key: String,
}

/// A directory entry returned by agent search.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AgentProfile {
    pub account_id: String,
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub agent_type: Option<String>,
    #[serde(default)]
    pub capabilities: Vec<String>,
}

impl AgentProfile {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Unnamed Agent")
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    Pending,
    Established,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    /// Menu-facing connection number, starting at 1.
    pub number: u32,
    pub target_account_id: String,
    pub target_name: Option<String>,
    pub status: ConnectionStatus,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: Uuid,
    pub sender: String,
    pub content: String,
    pub timestamp: i64,
}

/// Checks the `shard.realm.num` shape of an account id, e.g. `0.0.1234`.
pub fn is_account_id(candidate: &str) -> bool {
    let parts: Vec<&str> = candidate.split('.').collect();
    parts.len() == 3
        && parts
            .iter()
            .all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_digit()))
}

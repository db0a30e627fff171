//! The agent network seam.
//!
//! Registration, search, the connection handshake and message transport all
//! belong to the network. The menu only talks to [`AgentNetwork`].
mod error;
mod memory;

pub use crate::types::{AgentCredentials, AgentProfile, ChatMessage, Connection, ConnectionStatus};
pub use error::NetworkError;
pub use memory::InMemoryNetwork;

use async_trait::async_trait;
use uuid::Uuid;

pub type NetworkResult<T> = Result<T, NetworkError>;

/// Operations offered by an agent network.
#[async_trait]
pub trait AgentNetwork: Send + Sync {
    /// The network name, e.g. `testnet`.
    fn network_name(&self) -> &str;

    /// The account currently acting as this agent, if any.
    async fn active_account(&self) -> Option<String>;

    /// Registers a new agent and makes it the active identity.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::EmptyName`] for a blank name.
    async fn register_agent(
        &self,
        name: &str,
        description: Option<&str>,
    ) -> NetworkResult<AgentCredentials>;

    /// Searches the agent directory by name, description and capabilities.
    async fn find_agents(&self, query: &str) -> NetworkResult<Vec<AgentProfile>>;

    /// Sends a connection request to `target_account_id`.
    async fn initiate_connection(
        &self,
        target_account_id: &str,
        memo: Option<&str>,
    ) -> NetworkResult<Connection>;

    async fn connections(&self) -> NetworkResult<Vec<Connection>>;

    /// Sends `content` over an established connection.
    async fn send_message(&self, connection: u32, content: &str) -> NetworkResult<Uuid>;

    /// Takes all messages received on a connection since the last fetch.
    async fn fetch_messages(&self, connection: u32) -> NetworkResult<Vec<ChatMessage>>;
}

//! An in-process agent network.
//!
//! It keeps a small directory of resident agents that accept connections
//! straight away and echo every message back. Agents registered from the
//! menu join the same directory. Log output imitates an agent SDK so it
//! exercises the console relay.
use super::{
    AgentCredentials, AgentNetwork, AgentProfile, ChatMessage, Connection, ConnectionStatus,
    NetworkError, NetworkResult,
};
use crate::types::is_account_id;
use async_trait::async_trait;
use chrono::Utc;
use rand::RngCore;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

const FIRST_ACCOUNT_NUM: u64 = 4_500_000;

struct DirectoryEntry {
    profile: AgentProfile,
    /// Resident agents accept connections and echo messages.
    resident: bool,
}

struct ConnectionSlot {
    connection: Connection,
    inbox: Vec<ChatMessage>,
}

struct State {
    next_account: u64,
    active: Option<AgentCredentials>,
    directory: Vec<DirectoryEntry>,
    connections: Vec<ConnectionSlot>,
}

pub struct InMemoryNetwork {
    network: String,
    state: Mutex<State>,
}

impl InMemoryNetwork {
    /// Creates a network with no resident agents.
    pub fn new(network: impl Into<String>, operator: Option<AgentCredentials>) -> Self {
        Self::from_state(network.into(), State::new(operator))
    }

    /// Creates a network populated with a few resident demo agents.
    pub fn with_residents(network: impl Into<String>, operator: Option<AgentCredentials>) -> Self {
        let mut state = State::new(operator);
        for (name, description, kind, capabilities) in RESIDENTS {
            let account_id = state.allocate_account();
            state.directory.push(DirectoryEntry {
                profile: AgentProfile {
                    account_id,
                    name: Some(name.to_string()),
                    description: Some(description.to_string()),
                    agent_type: Some(kind.to_string()),
                    capabilities: capabilities.iter().map(|c| c.to_string()).collect(),
                },
                resident: true,
            });
        }
        Self::from_state(network.into(), state)
    }

    fn from_state(network: String, state: State) -> Self {
        Self {
            network,
            state: Mutex::new(state),
        }
    }
}

const RESIDENTS: &[(&str, &str, &str, &[&str])] = &[
    (
        "EchoAgent",
        "Replies to every message with the same text, handy for checking a connection end to end",
        "autonomous",
        &["text-generation", "testing"],
    ),
    (
        "WeatherOracle",
        "Answers questions about current conditions in any city",
        "autonomous",
        &["weather", "knowledge-retrieval"],
    ),
    (
        "LedgerScribe",
        "Summarises account activity and transaction history",
        "manual",
        &["data-integration", "summarization"],
    ),
];

impl State {
    fn new(operator: Option<AgentCredentials>) -> Self {
        Self {
            next_account: FIRST_ACCOUNT_NUM,
            active: operator,
            directory: Vec::new(),
            connections: Vec::new(),
        }
    }

    fn allocate_account(&mut self) -> String {
        let account = format!("0.0.{}", self.next_account);
        self.next_account += 1;
        account
    }

    fn require_active(&self) -> NetworkResult<&AgentCredentials> {
        self.active.as_ref().ok_or(NetworkError::NotRegistered)
    }

    fn slot_mut(&mut self, number: u32) -> NetworkResult<&mut ConnectionSlot> {
        self.connections
            .iter_mut()
            .find(|slot| slot.connection.number == number)
            .ok_or(NetworkError::UnknownConnection(number))
    }
}

fn generate_private_key() -> String {
    let mut key = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut key);
    format!("302e020100300506032b657004220420{}", hex::encode(key))
}

#[async_trait]
impl AgentNetwork for InMemoryNetwork {
    fn network_name(&self) -> &str {
        &self.network
    }

    async fn active_account(&self) -> Option<String> {
        self.state
            .lock()
            .await
            .active
            .as_ref()
            .map(|creds| creds.account_id.clone())
    }

    async fn register_agent(
        &self,
        name: &str,
        description: Option<&str>,
    ) -> NetworkResult<AgentCredentials> {
        let name = name.trim();
        if name.is_empty() {
            return Err(NetworkError::EmptyName);
        }

        let mut state = self.state.lock().await;
        let credentials = AgentCredentials {
            account_id: state.allocate_account(),
            private_key: generate_private_key(),
        };

        info!("{{ module: 'HCS-11' }} Creating profile for agent {}", name);
        debug!(
            "HCS-10 inbound and outbound topics created for {}",
            credentials.account_id
        );

        state.directory.push(DirectoryEntry {
            profile: AgentProfile {
                account_id: credentials.account_id.clone(),
                name: Some(name.to_string()),
                description: description.map(str::to_string),
                agent_type: Some("autonomous".to_string()),
                capabilities: vec!["text-generation".to_string()],
            },
            resident: false,
        });
        state.active = Some(credentials.clone());

        info!(
            "HCS-10 agent {} registered on {} as {}",
            name, self.network, credentials.account_id
        );
        Ok(credentials)
    }

    async fn find_agents(&self, query: &str) -> NetworkResult<Vec<AgentProfile>> {
        let needle = query.trim().to_lowercase();
        let state = self.state.lock().await;

        let matches = state
            .directory
            .iter()
            .map(|entry| &entry.profile)
            .filter(|profile| {
                needle.is_empty()
                    || profile.account_id == needle
                    || [profile.name.as_deref(), profile.description.as_deref()]
                        .into_iter()
                        .flatten()
                        .chain(profile.capabilities.iter().map(String::as_str))
                        .any(|text| text.to_lowercase().contains(&needle))
            })
            .cloned()
            .collect::<Vec<_>>();

        debug!("Registry search for '{}' returned {} agents", query, matches.len());
        Ok(matches)
    }

    async fn initiate_connection(
        &self,
        target_account_id: &str,
        memo: Option<&str>,
    ) -> NetworkResult<Connection> {
        if !is_account_id(target_account_id) {
            return Err(NetworkError::InvalidAccountId(target_account_id.to_string()));
        }

        let mut state = self.state.lock().await;
        let me = state.require_active()?.account_id.clone();

        let (target_name, resident) = state
            .directory
            .iter()
            .find(|entry| entry.profile.account_id == target_account_id)
            .map(|entry| (entry.profile.name.clone(), entry.resident))
            .ok_or_else(|| NetworkError::AgentNotFound(target_account_id.to_string()))?;

        let status = if resident {
            ConnectionStatus::Established
        } else {
            ConnectionStatus::Pending
        };
        let connection = Connection {
            number: state.connections.len() as u32 + 1,
            target_account_id: target_account_id.to_string(),
            target_name,
            status,
        };

        info!(
            "HCS-10 connection request sent from {} to {}{}",
            me,
            target_account_id,
            memo.map(|m| format!(" (memo: {})", m)).unwrap_or_default()
        );
        if status == ConnectionStatus::Established {
            info!("Monitoring topic confirmed connection #{}", connection.number);
        } else {
            warn!(
                "ConnectionTool: {} has not accepted the request yet",
                target_account_id
            );
        }

        state.connections.push(ConnectionSlot {
            connection: connection.clone(),
            inbox: Vec::new(),
        });
        Ok(connection)
    }

    async fn connections(&self) -> NetworkResult<Vec<Connection>> {
        let state = self.state.lock().await;
        Ok(state
            .connections
            .iter()
            .map(|slot| slot.connection.clone())
            .collect())
    }

    async fn send_message(&self, connection: u32, content: &str) -> NetworkResult<Uuid> {
        let mut state = self.state.lock().await;
        state.require_active()?;

        let slot = state.slot_mut(connection)?;
        if slot.connection.status != ConnectionStatus::Established {
            return Err(NetworkError::ConnectionPending(connection));
        }

        let id = Uuid::new_v4();
        debug!(
            "Submitting message {} to connection topic for {}",
            id, slot.connection.target_account_id
        );

        // Only resident agents are reachable from here, and they all echo.
        slot.inbox.push(ChatMessage {
            id: Uuid::new_v4(),
            sender: slot.connection.target_account_id.clone(),
            content: format!("Received: {}", content),
            timestamp: Utc::now().timestamp_millis(),
        });

        Ok(id)
    }

    async fn fetch_messages(&self, connection: u32) -> NetworkResult<Vec<ChatMessage>> {
        let mut state = self.state.lock().await;
        let slot = state.slot_mut(connection)?;
        let messages = std::mem::take(&mut slot.inbox);
        debug!(
            "Fetched {} messages from connection #{}",
            messages.len(),
            connection
        );
        Ok(messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn network() -> InMemoryNetwork {
        InMemoryNetwork::with_residents("testnet", None)
    }

    #[tokio::test]
    async fn register_issues_credentials_and_activates() {
        let net = network();
        assert_eq!(net.active_account().await, None);

        let creds = net.register_agent("FaustoAgent", Some("demo")).await.unwrap();
        assert!(is_account_id(&creds.account_id));
        assert!(!creds.private_key.is_empty());
        assert_eq!(net.active_account().await, Some(creds.account_id.clone()));

        let found = net.find_agents("fausto").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].account_id, creds.account_id);
    }

    #[tokio::test]
    async fn register_rejects_blank_name() {
        assert_eq!(
            network().register_agent("  ", None).await,
            Err(NetworkError::EmptyName)
        );
    }

    #[tokio::test]
    async fn search_matches_capabilities() {
        let found = network().find_agents("WEATHER").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].display_name(), "WeatherOracle");
        assert_eq!(network().find_agents("").await.unwrap().len(), RESIDENTS.len());
    }

    #[tokio::test]
    async fn connect_send_and_receive_echo() {
        let net = network();
        net.register_agent("Me", None).await.unwrap();
        let echo = net.find_agents("EchoAgent").await.unwrap().remove(0);

        let conn = net
            .initiate_connection(&echo.account_id, Some("hello"))
            .await
            .unwrap();
        assert_eq!(conn.number, 1);
        assert_eq!(conn.status, ConnectionStatus::Established);

        net.send_message(conn.number, "ping").await.unwrap();
        let inbox = net.fetch_messages(conn.number).await.unwrap();
        assert_eq!(inbox.len(), 1);
        assert_eq!(inbox[0].content, "Received: ping");
        assert_eq!(inbox[0].sender, echo.account_id);
        assert!(net.fetch_messages(conn.number).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn connecting_requires_identity_and_known_target() {
        let net = network();
        let echo = net.find_agents("EchoAgent").await.unwrap().remove(0);
        assert_eq!(
            net.initiate_connection(&echo.account_id, None).await,
            Err(NetworkError::NotRegistered)
        );

        net.register_agent("Me", None).await.unwrap();
        assert_eq!(
            net.initiate_connection("0.0.1", None).await,
            Err(NetworkError::AgentNotFound("0.0.1".into()))
        );
        assert_eq!(
            net.initiate_connection("alice", None).await,
            Err(NetworkError::InvalidAccountId("alice".into()))
        );
    }

    #[tokio::test]
    async fn pending_connections_refuse_messages() {
        let net = network();
        let other = net.register_agent("Other", None).await.unwrap();
        net.register_agent("Me", None).await.unwrap();

        let conn = net
            .initiate_connection(&other.account_id, None)
            .await
            .unwrap();
        assert_eq!(conn.status, ConnectionStatus::Pending);
        assert_eq!(
            net.send_message(conn.number, "hi").await,
            Err(NetworkError::ConnectionPending(conn.number))
        );
        assert_eq!(
            net.send_message(42, "hi").await,
            Err(NetworkError::UnknownConnection(42))
        );
    }

    #[tokio::test]
    async fn operator_credentials_act_as_identity() {
        let net = InMemoryNetwork::with_residents(
            "testnet",
            Some(AgentCredentials {
                account_id: "0.0.777".into(),
                private_key: "k".into(),
            }),
        );
        assert_eq!(net.active_account().await.as_deref(), Some("0.0.777"));
        assert_eq!(net.connections().await.unwrap().len(), 0);
    }

    #[tokio::test]
    async fn bare_network_has_empty_directory() {
        let net = InMemoryNetwork::new("previewnet", None);
        assert_eq!(net.network_name(), "previewnet");
        assert!(net.find_agents("").await.unwrap().is_empty());
    }
}

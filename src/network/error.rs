use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NetworkError {
    #[error("no active agent identity; register an agent or supply operator credentials")]
    NotRegistered,
    #[error("agent name must not be empty")]
    EmptyName,
    #[error("'{0}' is not an account id (expected shard.realm.num, e.g. 0.0.1234)")]
    InvalidAccountId(String),
    #[error("no agent registered under account {0}")]
    AgentNotFound(String),
    #[error("no connection #{0}")]
    UnknownConnection(u32),
    #[error("connection #{0} has not been accepted yet")]
    ConnectionPending(u32),
}

use seirx_core::AgentId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("self-loop on agent {0} — agents do not contact themselves")]
    SelfLoop(AgentId),

    #[error("duplicate contact between {0} and {1} — one label per pair")]
    DuplicateContact(AgentId, AgentId),

    #[error("contact references agent {agent} but only {node_count} nodes exist")]
    UnknownNode { agent: AgentId, node_count: usize },

    #[error("contact network has no nodes")]
    Empty,
}

pub type NetworkResult<T> = Result<T, NetworkError>;

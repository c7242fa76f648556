//! Error types for the node client.

use cadence_core::EngineError;
use thiserror::Error;

/// Errors that can occur when talking to a Lavalink node.
#[derive(Error, Debug)]
pub enum NodeClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Node returned an error response
    #[error("Node error ({status}): {message}")]
    NodeError { status: u16, message: String },

    /// Node is offline or unreachable
    #[error("Node unreachable: {0}")]
    NodeUnreachable(String),

    /// No node session id yet; the node's ready event has not been seen
    #[error("Node session not established")]
    NoSession,

    /// Invalid node URL
    #[error("Invalid node URL: {0}")]
    InvalidUrl(String),

    /// Failed to parse node response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Node reported that loading the identifier failed
    #[error("Track loading failed: {0}")]
    LoadFailed(String),
}

/// Result type for node client operations.
pub type Result<T> = std::result::Result<T, NodeClientError>;

impl NodeClientError {
    /// Classify a send failure
    pub(crate) fn from_send(e: reqwest::Error) -> Self {
        if e.is_connect() || e.is_timeout() {
            NodeClientError::NodeUnreachable(e.to_string())
        } else {
            NodeClientError::Request(e)
        }
    }
}

impl From<NodeClientError> for EngineError {
    fn from(err: NodeClientError) -> Self {
        match err {
            NodeClientError::NodeError { status, message } => EngineError::Node { status, message },
            NodeClientError::ParseError(msg) => EngineError::decode(msg),
            NodeClientError::LoadFailed(msg) => EngineError::resolve(msg),
            other => EngineError::unavailable(other.to_string()),
        }
    }
}

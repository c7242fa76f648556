/// Engine error types for Cadence
use thiserror::Error;

/// Result type alias using `EngineError`
pub type Result<T> = std::result::Result<T, EngineError>;

/// Failures reported by a `PlaybackEngine` or one of its player handles
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The node could not be reached, or has no usable session yet
    #[error("Engine unavailable: {0}")]
    Unavailable(String),

    /// The node answered with a non-success status
    #[error("Node error ({status}): {message}")]
    Node {
        /// HTTP status returned by the node
        status: u16,
        /// Body or reason supplied by the node
        message: String,
    },

    /// The node failed to load a query
    #[error("Resolve failed: {0}")]
    Resolve(String),

    /// The node answered with a payload we could not decode
    #[error("Decode error: {0}")]
    Decode(String),
}

impl EngineError {
    /// Create an unavailable error
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    /// Create a resolve error
    pub fn resolve(msg: impl Into<String>) -> Self {
        Self::Resolve(msg.into())
    }

    /// Create a decode error
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }
}

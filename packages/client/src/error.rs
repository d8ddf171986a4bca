//! Error types for the chat client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// Connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Presence query failed; the roster keeps its last known contents
    #[error("Presence query failed: {0}")]
    PresenceQueryFailed(String),
}

//! Error types for the terminal client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// The connection could not be established or was lost
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// A message could not be encoded for the server
    #[error("Failed to encode message: {0}")]
    EncodeError(#[from] serde_json::Error),
}

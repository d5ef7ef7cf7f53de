//! Server startup errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ServerError {
    /// `true` when another process already listens on the address
    pub fn is_addr_in_use(&self) -> bool {
        matches!(
            self,
            ServerError::Bind { source, .. } if source.kind() == std::io::ErrorKind::AddrInUse
        )
    }
}

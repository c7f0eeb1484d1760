use std::net::SocketAddr;

use thiserror::Error;
use tile_engine_edit::EngineError;

/// Error type for the network bridge and command handling
#[derive(Debug, Error)]
pub enum LinkError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to spawn thread: {0}")]
    ThreadSpawn(String),

    #[error("Malformed command: {0:?}")]
    MalformedCommand(String),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Result type alias for tile_link operations
pub type Result<T> = std::result::Result<T, LinkError>;

use std::time::Duration;

/// Errors that can occur in transport operations.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Failed to connect to the device.
    #[error("failed to connect to {addr}: {source}")]
    Connect {
        addr: String,
        source: std::io::Error,
    },

    /// Failed to bind a local socket.
    #[error("failed to bind to {addr}: {source}")]
    Bind {
        addr: String,
        source: std::io::Error,
    },

    /// The connection attempt did not finish in time.
    #[error("connection to {addr} timed out after {after:?}")]
    Timeout { addr: String, after: Duration },

    /// An I/O error occurred on an established socket.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An operation needed a connection that is not open.
    #[error("not connected")]
    NotConnected,

    /// `connect` was called on a client that is already connected.
    #[error("already connected")]
    AlreadyConnected,
}

pub type Result<T> = std::result::Result<T, TransportError>;

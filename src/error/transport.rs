//! Realtime transport errors.

use thiserror::Error;

/// Result alias for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// Connection-level failures of the realtime transport.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransportError {
    /// The socket could not be opened
    #[error("Connection failed: {0}")]
    ConnectFailed(String),

    /// The Engine.IO handshake was missing or malformed
    #[error("Handshake failed: {0}")]
    Handshake(String),

    /// A frame could not be decoded
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// The server refused the namespace connection
    #[error("Server rejected connection: {0}")]
    Server(String),

    /// An outgoing packet could not be written
    #[error("Send failed: {0}")]
    SendFailed(String),

    /// The configured URL cannot be turned into a socket endpoint
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// The transport has been closed
    #[error("Transport closed")]
    Closed,
}

impl TransportError {
    /// Short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            TransportError::ConnectFailed(_) => "E_RT_CONN",
            TransportError::Handshake(_) => "E_RT_HANDSHAKE",
            TransportError::Protocol(_) => "E_RT_PROTO",
            TransportError::Server(_) => "E_RT_SERVER",
            TransportError::SendFailed(_) => "E_RT_SEND",
            TransportError::InvalidEndpoint(_) => "E_RT_ENDPOINT",
            TransportError::Closed => "E_RT_CLOSED",
        }
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for TransportError {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        TransportError::ConnectFailed(err.to_string())
    }
}

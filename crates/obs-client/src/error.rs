use std::{io, result::Result as StdResult};

use thiserror::Error;
use tokio_tungstenite::tungstenite;

/// Errors talking to the remote control endpoint.
#[derive(Error, Debug)]
pub enum Error {
    /// Nothing is listening at the configured address.
    #[error("Connection refused by {addr}")]
    ConnectionRefused {
        /// `host:port` that refused the connection.
        addr: String,
    },

    /// Any other failure establishing the socket.
    #[error("Failed to connect to {addr}: {message}")]
    Connect {
        /// `host:port` we tried to reach.
        addr: String,
        /// Underlying failure.
        message: String,
    },

    /// The identify handshake did not complete.
    #[error("Handshake error: {0}")]
    Handshake(String),

    /// The server requires a password and none is configured.
    #[error("Server requires authentication but no password is configured")]
    AuthRequired,

    /// WebSocket transport failure on an established connection.
    #[error("Transport error: {0}")]
    Transport(#[from] tungstenite::Error),

    /// The server closed the connection.
    #[error("Connection closed by server")]
    Closed,

    /// A request did not receive a response in time.
    #[error("{request_type} timed out")]
    Timeout {
        /// Request type that timed out.
        request_type: &'static str,
    },

    /// The server answered a request with a failure status.
    #[error("{request_type} failed (code {code}): {}", .comment.as_deref().unwrap_or("no comment"))]
    RequestFailed {
        /// Request type that failed.
        request_type: &'static str,
        /// Status code reported by the server.
        code: u16,
        /// Optional failure detail.
        comment: Option<String>,
    },

    /// Malformed or unexpected frame.
    #[error("Protocol error: {0}")]
    Protocol(#[from] obs_protocol::Error),

    /// No connection is established.
    #[error("Not connected")]
    NotConnected,
}

impl Error {
    /// Classify a socket-level failure from the connect path.
    pub(crate) fn from_connect(addr: &str, err: tungstenite::Error) -> Self {
        match err {
            tungstenite::Error::Io(e) if e.kind() == io::ErrorKind::ConnectionRefused => {
                Self::ConnectionRefused {
                    addr: addr.to_string(),
                }
            }
            other => Self::Connect {
                addr: addr.to_string(),
                message: other.to_string(),
            },
        }
    }

    /// True when the error means the connection can no longer be used.
    pub fn is_connection_lost(&self) -> bool {
        matches!(
            self,
            Self::Transport(_) | Self::Closed | Self::Timeout { .. } | Self::NotConnected
        )
    }

    /// True for a request failure meaning "no such resource".
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::RequestFailed { code, .. } if *code == obs_protocol::STATUS_RESOURCE_NOT_FOUND
        )
    }
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = StdResult<T, Error>;

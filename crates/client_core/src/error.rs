use std::time::Duration;

use shared::{domain::GameStatus, error::ApiException};
use thiserror::Error;
use tokio_tungstenite::tungstenite;

/// Fatal problems with the required connection parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StartupConfigError {
    #[error("Parameter '--{name}=xxx' missing.")]
    Missing { name: &'static str },
    #[error("invalid port '{value}': {reason}")]
    InvalidPort { value: String, reason: String },
    #[error("invalid host '{host}': {reason}")]
    InvalidHost { host: String, reason: String },
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("invalid endpoint: {0}")]
    Endpoint(#[from] StartupConfigError),
    #[error("failed to connect websocket: {url}")]
    Connect {
        url: String,
        #[source]
        source: tungstenite::Error,
    },
    #[error("handshake timed out after {0:?}")]
    HandshakeTimeout(Duration),
    #[error("handshake failed: {0}")]
    Handshake(String),
    #[error("invalid server event: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("server error: {0}")]
    Server(#[from] ApiException),
    #[error("websocket receive failed: {0}")]
    Receive(#[source] tungstenite::Error),
    #[error("connection closed by server")]
    ClosedByPeer,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MirrorError {
    #[error("cell ({row}, {col}) is outside the {rows}x{cols} board")]
    OutOfRange {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },
    #[error("board is frozen after terminal status {0:?}")]
    Frozen(GameStatus),
    #[error("{rows}x{cols} is not a playable board")]
    InvalidDimensions { rows: usize, cols: usize },
    #[error("update carries {actual} cells, expected {expected}")]
    CellCountMismatch { expected: usize, actual: usize },
}

/// Local, recoverable rejection of a move intent. Display text is shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("WAIT YOUR TURN!")]
    OutOfTurn,
    #[error("INVALID MOVE")]
    IllegalMove,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session is already established")]
    AlreadyEstablished,
    #[error("session was closed before it was established")]
    Closed,
    #[error(transparent)]
    Mirror(#[from] MirrorError),
    #[error(transparent)]
    Transport(#[from] TransportError),
}

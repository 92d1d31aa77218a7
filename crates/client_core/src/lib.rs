//! Client side of a networked Reversi game.
//!
//! The server owns the game. This crate keeps a read-only mirror of its
//! state, checks move intents before they go out, and hands state changes
//! from the network delivery context to whichever thread renders the board.

pub mod board_mirror;
pub mod bridge;
pub mod config;
pub mod error;
pub mod rules;
pub mod session;
pub mod transport;
pub mod validator;

pub use board_mirror::{BoardMirror, BoardView};
pub use bridge::{notification_bridge, BridgeState, NotificationBridge, RenderDispatcher, RenderWaker};
pub use config::StartupConfig;
pub use error::{MirrorError, MoveError, SessionError, StartupConfigError, TransportError};
pub use rules::{RulesEngine, StandardRules};
pub use session::{SessionController, SessionPhase};
pub use transport::{
    GameTransport, Handshake, TransportConnector, TransportSettings, WebSocketConnector,
};

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;

use std::sync::Arc;

use client_core::SessionController;

pub enum UiEvent {
    Connected(Arc<SessionController>),
    ConnectFailed(String),
}

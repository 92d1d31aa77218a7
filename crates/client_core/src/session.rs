use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, OnceLock,
};

use tracing::{debug, info, warn};

use crate::{
    board_mirror::{BoardMirror, BoardView},
    bridge::{NotificationBridge, RenderDispatcher},
    config::StartupConfig,
    error::{MirrorError, MoveError, SessionError},
    rules::RulesEngine,
    transport::{GameTransport, Handshake, RemoteUpdate, RemoteUpdateSink, TransportConnector},
    validator,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Board dimensions not known yet.
    Connecting,
    Active,
    Terminal,
}

pub struct SessionController {
    transport: Arc<dyn GameTransport>,
    rules: Arc<dyn RulesEngine>,
    bridge: NotificationBridge,
    mirror: OnceLock<BoardMirror>,
    closed: AtomicBool,
}

impl SessionController {
    pub fn new(
        transport: Arc<dyn GameTransport>,
        rules: Arc<dyn RulesEngine>,
        bridge: NotificationBridge,
    ) -> Arc<Self> {
        Arc::new(Self {
            transport,
            rules,
            bridge,
            mirror: OnceLock::new(),
            closed: AtomicBool::new(false),
        })
    }

    /// Connects, establishes the board from the handshake and starts delivery.
    pub async fn connect(
        connector: &dyn TransportConnector,
        config: &StartupConfig,
        rules: Arc<dyn RulesEngine>,
        bridge: NotificationBridge,
    ) -> Result<Arc<Self>, SessionError> {
        let connection = connector.connect(config).await?;
        let controller = Self::new(connection.transport, rules, bridge);
        if let Err(err) = controller.establish(connection.handshake) {
            controller.close();
            return Err(err);
        }
        controller.start_delivery();
        Ok(controller)
    }

    /// Fixes the board dimensions and initial position; moves `Connecting` to `Active`.
    pub fn establish(&self, handshake: Handshake) -> Result<(), SessionError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(SessionError::Closed);
        }
        let mirror = BoardMirror::new(
            handshake.dimensions,
            handshake.local_player,
            handshake.initial,
        )?;
        self.mirror
            .set(mirror)
            .map_err(|_| SessionError::AlreadyEstablished)?;

        let view = self.current_view();
        info!(
            phase = ?self.phase(),
            local_turn = view.as_ref().is_some_and(|v| v.is_local_turn()),
            "session established"
        );
        self.bridge.notify_changed();
        if view.is_some_and(|v| v.status().is_terminal()) {
            self.transport.close();
        }
        Ok(())
    }

    /// Hands this controller to the transport as its update sink.
    pub fn start_delivery(self: &Arc<Self>) {
        let sink: Arc<dyn RemoteUpdateSink> = Arc::clone(self) as Arc<dyn RemoteUpdateSink>;
        self.transport.subscribe(sink);
    }

    pub fn phase(&self) -> SessionPhase {
        match self.mirror.get() {
            _ if self.closed.load(Ordering::Acquire) => SessionPhase::Terminal,
            None => SessionPhase::Connecting,
            Some(mirror) if mirror.snapshot().status().is_terminal() => SessionPhase::Terminal,
            Some(_) => SessionPhase::Active,
        }
    }

    /// Latest consistent board, `None` while connecting.
    pub fn snapshot(&self) -> Option<Arc<BoardView>> {
        self.current_view()
    }

    /// Installs `render` as the bridge's callback. It runs on the dispatcher's
    /// thread and always sees the newest snapshot at the time it runs.
    pub fn register_render_callback<F>(
        self: &Arc<Self>,
        dispatcher: &mut RenderDispatcher,
        mut render: F,
    ) where
        F: FnMut(&BoardView) + 'static,
    {
        let controller = Arc::clone(self);
        dispatcher.on_render_context(move || {
            if let Some(view) = controller.snapshot() {
                render(&view);
            }
        });
    }

    /// Entry point for UI event handlers.
    pub fn submit_move_intent(&self, row: usize, col: usize) -> Result<(), MoveError> {
        self.handle_move_intent(row, col)
    }

    pub fn handle_move_intent(&self, row: usize, col: usize) -> Result<(), MoveError> {
        if self.closed.load(Ordering::Acquire) {
            debug!(row, col, "move intent after close rejected");
            return Err(MoveError::OutOfTurn);
        }
        let Some(view) = self.current_view() else {
            debug!(row, col, "move intent while connecting rejected");
            return Err(MoveError::OutOfTurn);
        };
        if view.status().is_terminal() || !view.is_local_turn() {
            debug!(row, col, status = ?view.status(), "move intent out of turn");
            return Err(MoveError::OutOfTurn);
        }
        if !validator::is_legal(self.rules.as_ref(), &view, row, col) {
            debug!(row, col, version = view.version(), "illegal move intent");
            return Err(MoveError::IllegalMove);
        }

        debug!(row, col, version = view.version(), "forwarding move");
        self.transport.send_move(row, col);
        Ok(())
    }

    /// Applies a server push. Runs on the transport's delivery context.
    pub fn on_remote_update(&self, update: RemoteUpdate) {
        if self.closed.load(Ordering::Acquire) {
            debug!("remote update after close ignored");
            return;
        }
        let Some(mirror) = self.mirror.get() else {
            warn!("remote update before session established; dropped");
            return;
        };

        let applied = match update {
            RemoteUpdate::State(update) => match mirror.apply_remote_update(update) {
                Err(err @ MirrorError::CellCountMismatch { .. }) => {
                    warn!("malformed board update: {err}");
                    mirror.fail(format!("malformed board update: {err}"))
                }
                other => other,
            },
            RemoteUpdate::Failed(err) => mirror.fail(err.to_string()),
        };

        match applied {
            Ok(view) => {
                self.bridge.notify_changed();
                if view.status().is_terminal() {
                    info!(
                        status = ?view.status(),
                        detail = view.detail().unwrap_or_default(),
                        "game finished"
                    );
                    self.transport.close();
                }
            }
            Err(MirrorError::Frozen(status)) => {
                debug!(?status, "update after terminal status ignored");
            }
            Err(err) => warn!("remote update rejected: {err}"),
        }
    }

    /// Disconnects and silences further renders. Safe to call repeatedly and from any phase.
    pub fn close(&self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }
        info!("closing session");
        self.bridge.close();
        self.transport.close();
    }

    fn current_view(&self) -> Option<Arc<BoardView>> {
        self.mirror.get().map(BoardMirror::snapshot)
    }
}

impl RemoteUpdateSink for SessionController {
    fn deliver(&self, update: RemoteUpdate) {
        self.on_remote_update(update);
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;

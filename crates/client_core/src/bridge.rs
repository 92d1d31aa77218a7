use std::sync::{
    atomic::{AtomicU8, Ordering},
    Arc,
};

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use tracing::debug;

const IDLE: u8 = 0;
const PENDING_DISPATCH: u8 = 1;
const CLOSED: u8 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeState {
    Idle,
    PendingDispatch,
    Closed,
}

/// Nudges the render context's event loop after a dispatch was queued.
pub trait RenderWaker: Send + Sync {
    fn wake(&self);
}

impl<F> RenderWaker for F
where
    F: Fn() + Send + Sync,
{
    fn wake(&self) {
        self()
    }
}

/// For render loops that block on [`RenderDispatcher::wait_pending`] themselves.
pub struct NoopWaker;

impl RenderWaker for NoopWaker {
    fn wake(&self) {}
}

struct BridgeShared {
    state: AtomicU8,
}

impl BridgeShared {
    fn state(&self) -> BridgeState {
        match self.state.load(Ordering::Acquire) {
            IDLE => BridgeState::Idle,
            PENDING_DISPATCH => BridgeState::PendingDispatch,
            _ => BridgeState::Closed,
        }
    }
}

#[derive(Clone)]
pub struct NotificationBridge {
    shared: Arc<BridgeShared>,
    dispatch_tx: Sender<()>,
    waker: Arc<dyn RenderWaker>,
}

pub struct RenderDispatcher {
    shared: Arc<BridgeShared>,
    dispatch_rx: Receiver<()>,
    callback: Option<Box<dyn FnMut()>>,
    /// A dispatch arrived before any callback; the bridge stays pending.
    held: bool,
}

pub fn notification_bridge(waker: Arc<dyn RenderWaker>) -> (NotificationBridge, RenderDispatcher) {
    let (dispatch_tx, dispatch_rx) = bounded(1);
    let shared = Arc::new(BridgeShared {
        state: AtomicU8::new(IDLE),
    });

    (
        NotificationBridge {
            shared: Arc::clone(&shared),
            dispatch_tx,
            waker,
        },
        RenderDispatcher {
            shared,
            dispatch_rx,
            callback: None,
            held: false,
        },
    )
}

impl NotificationBridge {
    /// Ensures a render pass runs after this call. Never blocks and never
    /// fails; a torn-down render context turns this into a no-op.
    pub fn notify_changed(&self) {
        // Always a read-modify-write, even when coalescing, so the dispatch
        // that clears the pending flag acquires every write made before it.
        match self
            .shared
            .state
            .fetch_max(PENDING_DISPATCH, Ordering::AcqRel)
        {
            IDLE => {}
            PENDING_DISPATCH => {
                debug!("render already pending; notification coalesced");
                return;
            }
            _ => return,
        }

        match self.dispatch_tx.try_send(()) {
            Ok(()) => self.waker.wake(),
            // The queued token renders the latest state anyway.
            Err(TrySendError::Full(())) => {}
            Err(TrySendError::Disconnected(())) => {
                debug!("render context gone; notifications disabled");
                self.shared.state.store(CLOSED, Ordering::Release);
            }
        }
    }

    /// Turns every later notification into a no-op and drops queued dispatches.
    pub fn close(&self) {
        if self.shared.state.swap(CLOSED, Ordering::AcqRel) != CLOSED {
            debug!("notification bridge closed");
        }
    }

    pub fn state(&self) -> BridgeState {
        self.shared.state()
    }
}

impl RenderDispatcher {
    /// Registers the render callback, replacing any earlier one. A dispatch
    /// that arrived while no callback was registered runs on the next
    /// [`run_pending`](Self::run_pending).
    pub fn on_render_context<F>(&mut self, callback: F)
    where
        F: FnMut() + 'static,
    {
        self.callback = Some(Box::new(callback));
    }

    /// Runs the queued dispatch, if any. Returns whether the callback ran.
    ///
    /// The bridge is back in `Idle` before the callback starts, so a
    /// notification raised during the callback queues a fresh dispatch for
    /// the next call instead of being lost.
    pub fn run_pending(&mut self) -> bool {
        if !self.held && self.dispatch_rx.try_recv().is_err() {
            return false;
        }
        self.dispatch()
    }

    /// Blocks up to `timeout` for a dispatch and runs it.
    pub fn wait_pending(&mut self, timeout: std::time::Duration) -> bool {
        if !self.held && self.dispatch_rx.recv_timeout(timeout).is_err() {
            return false;
        }
        self.dispatch()
    }

    pub fn state(&self) -> BridgeState {
        self.shared.state()
    }

    fn dispatch(&mut self) -> bool {
        self.held = false;
        if self.callback.is_none() {
            if self.shared.state.load(Ordering::Acquire) == PENDING_DISPATCH {
                debug!("render dispatch held until a callback is registered");
                self.held = true;
            }
            return false;
        }

        if self
            .shared
            .state
            .compare_exchange(
                PENDING_DISPATCH,
                IDLE,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_err()
        {
            debug!("dropping dispatch after bridge close");
            return false;
        }

        match self.callback.as_mut() {
            Some(callback) => {
                callback();
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
#[path = "tests/bridge_tests.rs"]
mod tests;

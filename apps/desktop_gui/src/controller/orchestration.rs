use crossbeam_channel::{Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;

pub fn dispatch_backend_command(cmd_tx: &Sender<BackendCommand>, cmd: BackendCommand) {
    match cmd_tx.try_send(cmd) {
        Ok(()) => tracing::debug!(command = ?cmd, "queued ui->backend command"),
        Err(TrySendError::Full(_)) => {
            tracing::warn!(command = ?cmd, "backend command queue is full");
        }
        Err(TrySendError::Disconnected(_)) => {
            tracing::debug!(command = ?cmd, "backend worker already stopped");
        }
    }
}

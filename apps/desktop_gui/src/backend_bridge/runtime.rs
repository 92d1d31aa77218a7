use std::{sync::Arc, thread, time::Duration};

use client_core::{
    NotificationBridge, SessionController, StandardRules, StartupConfig, WebSocketConnector,
};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use tracing::{error, info};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;

/// Time given to the writer task to flush the `leave` frame before the runtime stops.
const LEAVE_GRACE: Duration = Duration::from_millis(250);

pub fn launch(
    config: StartupConfig,
    bridge: NotificationBridge,
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
    repaint: egui::Context,
) {
    thread::spawn(move || {
        let send = |event: UiEvent| {
            let _ = ui_tx.try_send(event);
            repaint.request_repaint();
        };

        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                error!("failed to build backend runtime: {err}");
                send(UiEvent::ConnectFailed(format!(
                    "backend startup failure: {err}"
                )));
                return;
            }
        };

        let connector = WebSocketConnector::default();
        let connected = runtime.block_on(SessionController::connect(
            &connector,
            &config,
            Arc::new(StandardRules),
            bridge,
        ));
        let session = match connected {
            Ok(session) => session,
            Err(err) => {
                error!(host = %config.host, port = config.port, "connection failed: {err}");
                send(UiEvent::ConnectFailed(err.to_string()));
                return;
            }
        };
        send(UiEvent::Connected(Arc::clone(&session)));

        // Runtime workers keep driving the socket while this thread waits.
        while let Ok(command) = cmd_rx.recv() {
            match command {
                BackendCommand::Shutdown => break,
            }
        }

        info!("backend shutting down");
        session.close();
        runtime.block_on(tokio::time::sleep(LEAVE_GRACE));
    });
}

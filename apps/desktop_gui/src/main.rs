use std::{process::ExitCode, sync::Arc};

mod backend_bridge;
mod controller;
mod ui;

use clap::Parser;
use client_core::{notification_bridge, RenderWaker, StartupConfig};
use crossbeam_channel::bounded;
use eframe::egui;
use tracing_subscriber::EnvFilter;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::ui::ReversiApp;

#[derive(Debug, Parser)]
#[command(name = "reversi", about = "Desktop client for a networked Reversi game")]
struct Args {
    /// Game server host name or address.
    #[arg(long)]
    host: Option<String>,
    /// Game server port.
    #[arg(long)]
    port: Option<String>,
    /// Tracing filter; falls back to RUST_LOG, then `info`.
    #[arg(long)]
    log_filter: Option<String>,
}

fn init_tracing(log_filter: Option<&str>) {
    let filter = match log_filter {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.log_filter.as_deref());

    let config = match StartupConfig::from_named(args.host.as_deref(), args.port.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::from(2);
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Reversi")
            .with_inner_size([520.0, 620.0])
            .with_resizable(false),
        ..Default::default()
    };
    let result = eframe::run_native(
        "Reversi",
        options,
        Box::new(move |cc| {
            let repaint = cc.egui_ctx.clone();
            let waker: Arc<dyn RenderWaker> = Arc::new(move || repaint.request_repaint());
            let (bridge, dispatcher) = notification_bridge(waker);

            let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(8);
            let (ui_tx, ui_rx) = bounded::<UiEvent>(8);
            let endpoint = config.endpoint("/ws").map(|url| url.to_string()).unwrap_or_default();
            backend_bridge::runtime::launch(config, bridge, cmd_rx, ui_tx, cc.egui_ctx.clone());

            Ok(Box::new(ReversiApp::new(endpoint, dispatcher, cmd_tx, ui_rx)))
        }),
    );

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("window closed with error: {err}");
            ExitCode::FAILURE
        }
    }
}

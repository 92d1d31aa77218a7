use std::{cell::Cell, io::BufRead, process::ExitCode, rc::Rc, sync::Arc, thread, time::Duration};

mod input;
mod render;

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{
    notification_bridge, RenderWaker, SessionController, StandardRules, StartupConfig,
    WebSocketConnector,
};
use crossbeam_channel::{unbounded, Sender};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::input::Command;

const LEAVE_GRACE: Duration = Duration::from_millis(250);

#[derive(Parser, Debug)]
#[command(name = "reversi-console", about = "Play networked Reversi from a terminal")]
struct Args {
    #[arg(long)]
    host: Option<String>,
    #[arg(long)]
    port: Option<String>,
    /// Tracing filter; falls back to RUST_LOG, then `info`.
    #[arg(long)]
    log_filter: Option<String>,
}

enum ConsoleEvent {
    Render,
    Line(String),
    InputClosed,
}

fn main() -> ExitCode {
    let args = Args::parse();
    let filter = match args.log_filter.as_deref() {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = match StartupConfig::from_named(args.host.as_deref(), args.port.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::from(2);
        }
    };

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &StartupConfig) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to build tokio runtime")?;

    let (events_tx, events_rx) = unbounded();
    let wake_tx = events_tx.clone();
    let waker: Arc<dyn RenderWaker> = Arc::new(move || {
        let _ = wake_tx.send(ConsoleEvent::Render);
    });
    let (bridge, mut dispatcher) = notification_bridge(waker);

    let session = runtime
        .block_on(SessionController::connect(
            &WebSocketConnector::default(),
            config,
            Arc::new(StandardRules),
            bridge,
        ))
        .with_context(|| format!("failed to join game at {}:{}", config.host, config.port))?;

    let finished = Rc::new(Cell::new(false));
    {
        let finished = Rc::clone(&finished);
        session.register_render_callback(&mut dispatcher, move |view| {
            println!("{}", render::board_text(view));
            if view.status().is_terminal() {
                finished.set(true);
            }
        });
    }

    println!("Enter moves as `row col`, or `quit` to leave.");
    spawn_stdin_reader(events_tx);

    while let Ok(event) = events_rx.recv() {
        match event {
            ConsoleEvent::Render => {
                dispatcher.run_pending();
                if finished.get() {
                    break;
                }
            }
            ConsoleEvent::Line(line) => match input::parse_command(&line) {
                Ok(None) => {}
                Ok(Some(Command::Quit)) => break,
                Ok(Some(Command::Move { row, col })) => {
                    if let Err(err) = session.submit_move_intent(row, col) {
                        println!("{err}");
                    }
                }
                Err(message) => println!("{message}"),
            },
            ConsoleEvent::InputClosed => {
                debug!("stdin closed");
                break;
            }
        }
    }

    info!("leaving game");
    session.close();
    runtime.block_on(tokio::time::sleep(LEAVE_GRACE));
    Ok(())
}

fn spawn_stdin_reader(events_tx: Sender<ConsoleEvent>) {
    thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else {
                break;
            };
            if events_tx.send(ConsoleEvent::Line(line)).is_err() {
                return;
            }
        }
        let _ = events_tx.send(ConsoleEvent::InputClosed);
    });
}

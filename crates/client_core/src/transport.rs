use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex, MutexGuard, PoisonError,
    },
    time::Duration,
};

use async_trait::async_trait;
use futures::{
    stream::{SplitSink, SplitStream},
    SinkExt, StreamExt,
};
use shared::{
    domain::{Dimensions, Player},
    protocol::{BoardUpdate, ClientRequest, ServerEvent},
};
use tokio::{
    net::TcpStream,
    runtime::Handle,
    sync::mpsc,
    task::JoinHandle,
};
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};

use crate::{config::StartupConfig, error::TransportError};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsReader = SplitStream<WsStream>;
type WsWriter = SplitSink<WsStream, Message>;

/// Board dimensions and starting position agreed when the connection opens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Handshake {
    pub dimensions: Dimensions,
    pub local_player: Player,
    pub initial: BoardUpdate,
}

#[derive(Debug)]
pub enum RemoteUpdate {
    State(BoardUpdate),
    Failed(TransportError),
}

/// Receives server pushes on the transport's delivery context.
pub trait RemoteUpdateSink: Send + Sync {
    fn deliver(&self, update: RemoteUpdate);
}

pub trait GameTransport: Send + Sync {
    /// Starts delivery of remote updates to `sink`. Only the first call has an effect.
    fn subscribe(&self, sink: Arc<dyn RemoteUpdateSink>);
    /// Queues a move request and returns immediately.
    fn send_move(&self, row: usize, col: usize);
    /// Stops delivery and disconnects. Idempotent.
    fn close(&self);
}

pub struct Connection {
    pub transport: Arc<dyn GameTransport>,
    pub handshake: Handshake,
}

#[async_trait]
pub trait TransportConnector: Send + Sync {
    async fn connect(&self, config: &StartupConfig) -> Result<Connection, TransportError>;
}

#[derive(Debug, Clone)]
pub struct TransportSettings {
    pub path: String,
    pub handshake_timeout: Duration,
}

impl Default for TransportSettings {
    fn default() -> Self {
        Self {
            path: "/ws".to_string(),
            handshake_timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct WebSocketConnector {
    settings: TransportSettings,
}

impl WebSocketConnector {
    pub fn new(settings: TransportSettings) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl TransportConnector for WebSocketConnector {
    async fn connect(&self, config: &StartupConfig) -> Result<Connection, TransportError> {
        let url = config.endpoint(&self.settings.path)?;
        let (ws_stream, _) = connect_async(url.as_str())
            .await
            .map_err(|source| TransportError::Connect {
                url: url.to_string(),
                source,
            })?;
        let (writer, mut reader) = ws_stream.split();

        let handshake = tokio::time::timeout(
            self.settings.handshake_timeout,
            read_handshake(&mut reader),
        )
        .await
        .map_err(|_| TransportError::HandshakeTimeout(self.settings.handshake_timeout))??;

        info!(
            url = %url,
            rows = handshake.dimensions.rows,
            cols = handshake.dimensions.cols,
            local_player = ?handshake.local_player,
            "connected to game server"
        );

        let transport: Arc<dyn GameTransport> = WebSocketTransport::start(writer, reader);
        Ok(Connection {
            transport,
            handshake,
        })
    }
}

async fn read_handshake(reader: &mut WsReader) -> Result<Handshake, TransportError> {
    while let Some(msg) = reader.next().await {
        match msg.map_err(TransportError::Receive)? {
            Message::Text(text) => {
                return match serde_json::from_str::<ServerEvent>(&text)? {
                    ServerEvent::Connected {
                        rows,
                        cols,
                        local_player,
                        state,
                    } => {
                        let dimensions = Dimensions::new(rows, cols);
                        if !dimensions.is_playable() {
                            return Err(TransportError::Handshake(format!(
                                "server announced a {rows}x{cols} board"
                            )));
                        }
                        Ok(Handshake {
                            dimensions,
                            local_player,
                            initial: state,
                        })
                    }
                    ServerEvent::Error(err) => Err(TransportError::Server(err.into())),
                    ServerEvent::BoardUpdated(_) => Err(TransportError::Handshake(
                        "board update received before connected event".to_string(),
                    )),
                };
            }
            Message::Close(_) => return Err(TransportError::ClosedByPeer),
            _ => {}
        }
    }
    Err(TransportError::ClosedByPeer)
}

pub struct WebSocketTransport {
    runtime: Handle,
    outbound: mpsc::UnboundedSender<ClientRequest>,
    reader: Mutex<Option<WsReader>>,
    reader_task: Mutex<Option<JoinHandle<()>>>,
    closed: Arc<AtomicBool>,
}

impl WebSocketTransport {
    /// Must be called from within a tokio runtime; later calls may come from any thread.
    fn start(writer: WsWriter, reader: WsReader) -> Arc<Self> {
        let runtime = Handle::current();
        let (outbound, requests) = mpsc::unbounded_channel();
        runtime.spawn(write_loop(writer, requests));

        Arc::new(Self {
            runtime,
            outbound,
            reader: Mutex::new(Some(reader)),
            reader_task: Mutex::new(None),
            closed: Arc::new(AtomicBool::new(false)),
        })
    }
}

impl GameTransport for WebSocketTransport {
    fn subscribe(&self, sink: Arc<dyn RemoteUpdateSink>) {
        // Held across the check and the store; `close` takes it after setting `closed`.
        let mut reader_task = lock(&self.reader_task);
        if self.closed.load(Ordering::Acquire) {
            debug!("subscribe after close ignored");
            return;
        }
        let Some(reader) = lock(&self.reader).take() else {
            warn!("game transport already has a subscriber");
            return;
        };

        *reader_task = Some(
            self.runtime
                .spawn(read_loop(reader, sink, Arc::clone(&self.closed))),
        );
    }

    fn send_move(&self, row: usize, col: usize) {
        if self.closed.load(Ordering::Acquire) {
            debug!(row, col, "move dropped after close");
            return;
        }
        if self
            .outbound
            .send(ClientRequest::MakeMove { row, col })
            .is_err()
        {
            warn!(row, col, "websocket writer stopped; move dropped");
        }
    }

    fn close(&self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }
        info!("closing game transport");
        let _ = self.outbound.send(ClientRequest::Leave);
        if let Some(task) = lock(&self.reader_task).take() {
            task.abort();
        }
        lock(&self.reader).take();
    }
}

async fn write_loop(mut writer: WsWriter, mut requests: mpsc::UnboundedReceiver<ClientRequest>) {
    while let Some(request) = requests.recv().await {
        let leaving = request == ClientRequest::Leave;
        let text = match serde_json::to_string(&request) {
            Ok(text) => text,
            Err(err) => {
                warn!("failed to encode client request: {err}");
                continue;
            }
        };
        if let Err(err) = writer.send(Message::Text(text)).await {
            warn!("websocket send failed: {err}");
            break;
        }
        if leaving {
            let _ = writer.close().await;
            break;
        }
    }
    debug!("websocket writer stopped");
}

async fn read_loop(mut reader: WsReader, sink: Arc<dyn RemoteUpdateSink>, closed: Arc<AtomicBool>) {
    let failure = loop {
        let Some(msg) = reader.next().await else {
            break TransportError::ClosedByPeer;
        };
        match msg {
            Ok(Message::Text(text)) => match serde_json::from_str::<ServerEvent>(&text) {
                Ok(ServerEvent::BoardUpdated(update)) => {
                    sink.deliver(RemoteUpdate::State(update));
                }
                Ok(ServerEvent::Error(err)) => break TransportError::Server(err.into()),
                Ok(ServerEvent::Connected { .. }) => {
                    warn!("ignoring repeated connected event");
                }
                Err(err) => break TransportError::Decode(err),
            },
            Ok(Message::Close(_)) => break TransportError::ClosedByPeer,
            Ok(_) => {}
            Err(err) => break TransportError::Receive(err),
        }
    };

    if closed.load(Ordering::Acquire) {
        debug!("reader stopped after local close: {failure}");
        return;
    }
    warn!("game connection lost: {failure}");
    sink.deliver(RemoteUpdate::Failed(failure));
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;

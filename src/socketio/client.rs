use async_trait::async_trait;
use reqwest::Url;
use tokio::sync::{mpsc, watch};
use tokio::time::{sleep, sleep_until, Instant};
use tracing::{debug, error, info, warn};

use super::events::{IncomingEvent, OutgoingEvent, TransportEvent};
use super::packet::{EnginePacket, SocketPacket};
use super::session::Session;
use crate::config::TransportOptions;
use crate::error::{TransportError, TransportResult};
use crate::traits::{Headers, Transport};

/// Where and how to reach the panel's Socket.IO server.
#[derive(Debug, Clone)]
pub struct Endpoint {
    pub base: Url,
    pub headers: Headers,
}

impl Endpoint {
    pub fn parse(base: &str) -> TransportResult<Self> {
        let base = Url::parse(base).map_err(|e| TransportError::InvalidEndpoint(e.to_string()))?;
        Ok(Self {
            base,
            headers: Headers::new(),
        })
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

/// Socket.IO client with its own reconnection loop.
///
/// The client connects in the background; results arrive as
/// [`TransportEvent`]s on the receiver returned by [`SocketIoClient::spawn`].
pub struct SocketIoClient {
    outgoing_tx: mpsc::Sender<OutgoingEvent>,
    state_rx: watch::Receiver<bool>,
    shutdown_tx: watch::Sender<bool>,
}

impl SocketIoClient {
    /// Start the connection loop. Must be called within a tokio runtime.
    pub fn spawn(
        endpoint: Endpoint,
        options: TransportOptions,
    ) -> (Self, mpsc::Receiver<TransportEvent>) {
        let (events_tx, events_rx) = mpsc::channel(100);
        let (outgoing_tx, outgoing_rx) = mpsc::channel(100);
        let (state_tx, state_rx) = watch::channel(false);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        tokio::spawn(run_connection_loop(
            endpoint,
            options,
            events_tx,
            outgoing_rx,
            state_tx,
            shutdown_rx,
        ));

        (
            Self {
                outgoing_tx,
                state_rx,
                shutdown_tx,
            },
            events_rx,
        )
    }
}

#[async_trait]
impl Transport for SocketIoClient {
    async fn emit(&self, event: OutgoingEvent) -> TransportResult<()> {
        if !self.is_connected() {
            return Err(TransportError::Closed);
        }
        self.outgoing_tx
            .send(event)
            .await
            .map_err(|e| TransportError::SendFailed(e.to_string()))
    }

    fn is_connected(&self) -> bool {
        *self.state_rx.borrow()
    }

    fn close(&self) {
        if !*self.shutdown_tx.borrow() {
            info!("Closing realtime transport");
        }
        let _ = self.shutdown_tx.send(true);
    }
}

impl Drop for SocketIoClient {
    fn drop(&mut self) {
        let _ = self.shutdown_tx.send(true);
    }
}

/// How a session ended.
#[derive(Debug)]
enum SessionEnd {
    /// Local close requested
    Shutdown,
    /// The server disconnected our namespace; no reconnect
    ServerDisconnect,
    /// The link dropped
    Lost(String),
    /// The server rejected the namespace connection
    Refused(TransportError),
}

async fn run_connection_loop(
    endpoint: Endpoint,
    options: TransportOptions,
    events_tx: mpsc::Sender<TransportEvent>,
    mut outgoing_rx: mpsc::Receiver<OutgoingEvent>,
    state_tx: watch::Sender<bool>,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    let mut attempt: u32 = 0;

    loop {
        if *shutdown_rx.borrow() {
            break;
        }

        let opened = tokio::select! {
            opened = Session::open(&endpoint.base, &endpoint.headers, &options.transports) => opened,
            _ = shutdown_rx.changed() => break,
        };

        match opened {
            Ok(mut session) => {
                info!(
                    "Engine.IO session open over {} (sid {})",
                    session.kind().as_query(),
                    session.handshake().sid
                );
                let (end, was_connected) = drive_session(
                    &mut session,
                    &events_tx,
                    &mut outgoing_rx,
                    &state_tx,
                    &mut shutdown_rx,
                )
                .await;
                let _ = state_tx.send(false);

                if was_connected {
                    attempt = 0;
                }

                let event = match &end {
                    SessionEnd::Shutdown => break,
                    SessionEnd::ServerDisconnect => TransportEvent::Disconnected {
                        reason: "io server disconnect".to_string(),
                    },
                    SessionEnd::Lost(reason) if was_connected => TransportEvent::Disconnected {
                        reason: reason.clone(),
                    },
                    SessionEnd::Lost(reason) => {
                        TransportEvent::ConnectError(TransportError::ConnectFailed(reason.clone()))
                    }
                    SessionEnd::Refused(err) => TransportEvent::ConnectError(err.clone()),
                };
                if events_tx.send(event).await.is_err() {
                    break;
                }
                if matches!(end, SessionEnd::ServerDisconnect) {
                    info!("Server closed the namespace, not reconnecting");
                    break;
                }
            }
            Err(e) => {
                warn!("Realtime connection failed: {}", e);
                if events_tx.send(TransportEvent::ConnectError(e)).await.is_err() {
                    break;
                }
            }
        }

        if !options.reconnection {
            break;
        }
        attempt += 1;
        if attempt > options.reconnection_attempts {
            error!(
                "Failed to reconnect after {} attempts, giving up",
                options.reconnection_attempts
            );
            break;
        }

        let delay = options.reconnect_delay(attempt);
        info!(
            "Reconnection attempt {} of {} in {:?}",
            attempt, options.reconnection_attempts, delay
        );
        tokio::select! {
            _ = sleep(delay) => {}
            _ = shutdown_rx.changed() => break,
        }
    }

    let _ = state_tx.send(false);
    info!("Realtime connection loop ended");
}

/// Drive one Engine.IO session until it ends. Returns whether the namespace
/// connection was established at some point.
async fn drive_session(
    session: &mut Session,
    events_tx: &mpsc::Sender<TransportEvent>,
    outgoing_rx: &mut mpsc::Receiver<OutgoingEvent>,
    state_tx: &watch::Sender<bool>,
    shutdown_rx: &mut watch::Receiver<bool>,
) -> (SessionEnd, bool) {
    let heartbeat = session.handshake().heartbeat_deadline();
    let mut deadline = Instant::now() + heartbeat;
    let mut connected = false;

    if let Err(e) = session.send(SocketPacket::connect_root().into_engine()).await {
        return (SessionEnd::Lost(e.to_string()), false);
    }

    loop {
        tokio::select! {
            frame = session.recv() => {
                match frame {
                    Some(Ok(EnginePacket::Ping(data))) => {
                        deadline = Instant::now() + heartbeat;
                        if let Err(e) = session.send(EnginePacket::Pong(data)).await {
                            return (SessionEnd::Lost(e.to_string()), connected);
                        }
                    }
                    Some(Ok(EnginePacket::Message(body))) => {
                        deadline = Instant::now() + heartbeat;
                        match SocketPacket::decode(&body) {
                            Ok(SocketPacket::Connect { .. }) => {
                                connected = true;
                                let _ = state_tx.send(true);
                                if events_tx.send(TransportEvent::Connected).await.is_err() {
                                    return (SessionEnd::Shutdown, connected);
                                }
                            }
                            Ok(SocketPacket::ConnectError { data, .. }) => {
                                let message = data
                                    .get("message")
                                    .and_then(|m| m.as_str())
                                    .map(str::to_string)
                                    .unwrap_or_else(|| data.to_string());
                                return (SessionEnd::Refused(TransportError::Server(message)), connected);
                            }
                            Ok(SocketPacket::Disconnect { .. }) => {
                                return (SessionEnd::ServerDisconnect, connected);
                            }
                            Ok(SocketPacket::Event { name, args, .. }) => {
                                let event = IncomingEvent::from_socket(&name, args);
                                if events_tx.send(TransportEvent::Event(event)).await.is_err() {
                                    return (SessionEnd::Shutdown, connected);
                                }
                            }
                            Ok(SocketPacket::Ack { id, .. }) => {
                                debug!("Ignoring ack {}", id);
                            }
                            Err(e) => {
                                warn!("Failed to parse socket packet: {} - {}", e, body);
                            }
                        }
                    }
                    Some(Ok(EnginePacket::Close)) => {
                        return (SessionEnd::Lost("transport close".to_string()), connected);
                    }
                    Some(Ok(other)) => {
                        debug!("Ignoring engine packet {:?}", other);
                    }
                    Some(Err(e)) => {
                        return (SessionEnd::Lost(e.to_string()), connected);
                    }
                    None => {
                        return (SessionEnd::Lost("transport closed".to_string()), connected);
                    }
                }
            }

            outgoing = outgoing_rx.recv() => {
                match outgoing {
                    Some(event) if connected => {
                        let packet = event.to_packet().into_engine();
                        debug!("Sending {}", packet.encode());
                        if let Err(e) = session.send(packet).await {
                            error!("Failed to send {}: {}", event.name(), e);
                        }
                    }
                    Some(event) => {
                        debug!("Dropping {} while not connected", event.name());
                    }
                    None => {
                        session.close().await;
                        return (SessionEnd::Shutdown, connected);
                    }
                }
            }

            _ = sleep_until(deadline) => {
                return (SessionEnd::Lost("ping timeout".to_string()), connected);
            }

            _ = shutdown_rx.changed() => {
                if connected {
                    let _ = session.send(SocketPacket::disconnect_root().into_engine()).await;
                }
                session.close().await;
                return (SessionEnd::Shutdown, connected);
            }
        }
    }
}

//! Engine.IO sessions over websocket or HTTP long-polling.

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use reqwest::Url;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::{HeaderName, HeaderValue};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, warn};

use super::packet::{EnginePacket, Handshake};
use super::polling::PollingSession;
use crate::config::TransportKind;
use crate::error::{TransportError, TransportResult};
use crate::traits::Headers;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Build the Engine.IO endpoint for a transport.
///
/// `http(s)` base URLs become `ws(s)` for the websocket transport.
pub fn engine_url(base: &Url, kind: TransportKind, sid: Option<&str>) -> TransportResult<Url> {
    let mut url = base.clone();
    url.set_path("/socket.io/");
    url.set_fragment(None);

    if kind == TransportKind::WebSocket {
        let scheme = match url.scheme() {
            "http" | "ws" => "ws",
            "https" | "wss" => "wss",
            other => {
                return Err(TransportError::InvalidEndpoint(format!(
                    "unsupported scheme '{}'",
                    other
                )))
            }
        };
        url.set_scheme(scheme)
            .map_err(|_| TransportError::InvalidEndpoint(base.to_string()))?;
    } else if !matches!(url.scheme(), "http" | "https") {
        return Err(TransportError::InvalidEndpoint(format!(
            "polling needs an http(s) URL, got '{}'",
            base
        )));
    }

    {
        let mut query = url.query_pairs_mut();
        query.clear();
        query.append_pair("EIO", "4");
        query.append_pair("transport", kind.as_query());
        if let Some(sid) = sid {
            query.append_pair("sid", sid);
        }
    }
    Ok(url)
}

/// Websocket-backed session.
pub struct WebSocketSession {
    sink: SplitSink<WsStream, Message>,
    stream: SplitStream<WsStream>,
    handshake: Handshake,
}

impl WebSocketSession {
    pub async fn open(base: &Url, headers: &Headers) -> TransportResult<Self> {
        let url = engine_url(base, TransportKind::WebSocket, None)?;
        let mut request = url.as_str().into_client_request()?;
        for (name, value) in headers {
            match (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                (Ok(name), Ok(value)) => {
                    request.headers_mut().insert(name, value);
                }
                _ => warn!("Skipping invalid header '{}'", name),
            }
        }

        let (socket, _) = connect_async(request).await?;
        let (sink, mut stream) = socket.split();

        let handshake = match stream.next().await {
            Some(Ok(Message::Text(text))) => match EnginePacket::decode(&text)? {
                EnginePacket::Open(handshake) => handshake,
                other => {
                    return Err(TransportError::Handshake(format!(
                        "expected open packet, got {:?}",
                        other
                    )))
                }
            },
            Some(Ok(other)) => {
                return Err(TransportError::Handshake(format!(
                    "unexpected frame during handshake: {:?}",
                    other
                )))
            }
            Some(Err(e)) => return Err(e.into()),
            None => {
                return Err(TransportError::ConnectFailed(
                    "socket closed during handshake".to_string(),
                ))
            }
        };

        debug!("Websocket session opened: sid={}", handshake.sid);
        Ok(Self {
            sink,
            stream,
            handshake,
        })
    }

    async fn recv(&mut self) -> Option<TransportResult<EnginePacket>> {
        loop {
            match self.stream.next().await {
                Some(Ok(Message::Text(text))) => return Some(EnginePacket::decode(&text)),
                Some(Ok(Message::Close(_))) => return Some(Ok(EnginePacket::Close)),
                // Websocket-level pings are answered by tungstenite itself
                Some(Ok(_)) => continue,
                Some(Err(e)) => return Some(Err(TransportError::ConnectFailed(e.to_string()))),
                None => return None,
            }
        }
    }

    async fn send(&mut self, packet: EnginePacket) -> TransportResult<()> {
        self.sink
            .send(Message::Text(packet.encode()))
            .await
            .map_err(|e| TransportError::SendFailed(e.to_string()))
    }

    async fn close(&mut self) {
        let _ = self.sink.close().await;
    }
}

/// An open Engine.IO session on either transport.
pub enum Session {
    WebSocket(WebSocketSession),
    Polling(PollingSession),
}

impl Session {
    /// Open a session, trying each transport in order.
    pub async fn open(
        base: &Url,
        headers: &Headers,
        transports: &[TransportKind],
    ) -> TransportResult<Self> {
        let mut last_error = None;
        for kind in transports {
            let opened = match kind {
                TransportKind::WebSocket => WebSocketSession::open(base, headers)
                    .await
                    .map(Session::WebSocket),
                TransportKind::Polling => PollingSession::open(base, headers)
                    .await
                    .map(Session::Polling),
            };
            match opened {
                Ok(session) => return Ok(session),
                Err(e) => {
                    warn!("{} transport failed: {}", kind.as_query(), e);
                    last_error = Some(e);
                }
            }
        }
        Err(last_error.unwrap_or_else(|| {
            TransportError::ConnectFailed("no transports configured".to_string())
        }))
    }

    pub fn kind(&self) -> TransportKind {
        match self {
            Session::WebSocket(_) => TransportKind::WebSocket,
            Session::Polling(_) => TransportKind::Polling,
        }
    }

    pub fn handshake(&self) -> &Handshake {
        match self {
            Session::WebSocket(s) => &s.handshake,
            Session::Polling(s) => s.handshake(),
        }
    }

    /// Next inbound frame; `None` once the session is gone. Cancel safe.
    pub async fn recv(&mut self) -> Option<TransportResult<EnginePacket>> {
        match self {
            Session::WebSocket(s) => s.recv().await,
            Session::Polling(s) => s.recv().await,
        }
    }

    pub async fn send(&mut self, packet: EnginePacket) -> TransportResult<()> {
        match self {
            Session::WebSocket(s) => s.send(packet).await,
            Session::Polling(s) => s.send(packet).await,
        }
    }

    pub async fn close(&mut self) {
        match self {
            Session::WebSocket(s) => s.close().await,
            Session::Polling(s) => s.close().await,
        }
    }
}

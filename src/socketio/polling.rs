//! HTTP long-polling Engine.IO session.
//!
//! A background task keeps one GET outstanding at a time and forwards every
//! decoded frame into a channel, so reading from the session is cancel safe.
//! Writes are individual POSTs.

use reqwest::Url;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use super::packet::{decode_payload, EnginePacket, Handshake};
use super::session::engine_url;
use crate::config::TransportKind;
use crate::error::{TransportError, TransportResult};
use crate::traits::Headers;

pub struct PollingSession {
    client: reqwest::Client,
    url: Url,
    headers: Headers,
    handshake: Handshake,
    incoming: mpsc::Receiver<TransportResult<EnginePacket>>,
    reader: JoinHandle<()>,
}

impl PollingSession {
    pub async fn open(base: &Url, headers: &Headers) -> TransportResult<Self> {
        let client = reqwest::Client::new();
        let url = engine_url(base, TransportKind::Polling, None)?;
        let body = poll(&client, &url, headers).await?;

        let mut packets = decode_payload(&body).into_iter();
        let handshake = match packets.next() {
            Some(Ok(EnginePacket::Open(handshake))) => handshake,
            Some(Ok(other)) => {
                return Err(TransportError::Handshake(format!(
                    "expected open packet, got {:?}",
                    other
                )))
            }
            Some(Err(e)) => return Err(e),
            None => return Err(TransportError::Handshake("empty handshake body".to_string())),
        };

        let url = engine_url(base, TransportKind::Polling, Some(&handshake.sid))?;
        let (tx, incoming) = mpsc::channel(100);
        for packet in packets {
            let _ = tx.try_send(packet);
        }

        let reader = tokio::spawn(read_loop(client.clone(), url.clone(), headers.clone(), tx));
        debug!("Polling session opened: sid={}", handshake.sid);

        Ok(Self {
            client,
            url,
            headers: headers.clone(),
            handshake,
            incoming,
            reader,
        })
    }

    pub fn handshake(&self) -> &Handshake {
        &self.handshake
    }

    pub async fn recv(&mut self) -> Option<TransportResult<EnginePacket>> {
        self.incoming.recv().await
    }

    pub async fn send(&mut self, packet: EnginePacket) -> TransportResult<()> {
        let mut builder = self
            .client
            .post(self.url.clone())
            .header("Content-Type", "text/plain;charset=UTF-8")
            .body(packet.encode());
        for (name, value) in &self.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        let response = builder
            .send()
            .await
            .map_err(|e| TransportError::SendFailed(e.to_string()))?;
        if !response.status().is_success() {
            return Err(TransportError::SendFailed(format!(
                "polling write returned {}",
                response.status()
            )));
        }
        Ok(())
    }

    pub async fn close(&mut self) {
        let _ = self.send(EnginePacket::Close).await;
        self.reader.abort();
    }
}

impl Drop for PollingSession {
    fn drop(&mut self) {
        self.reader.abort();
    }
}

async fn poll(client: &reqwest::Client, url: &Url, headers: &Headers) -> TransportResult<String> {
    let mut builder = client.get(url.clone());
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    let response = builder
        .send()
        .await
        .map_err(|e| TransportError::ConnectFailed(e.to_string()))?;
    if !response.status().is_success() {
        return Err(TransportError::ConnectFailed(format!(
            "polling request returned {}",
            response.status()
        )));
    }
    response
        .text()
        .await
        .map_err(|e| TransportError::Protocol(e.to_string()))
}

async fn read_loop(
    client: reqwest::Client,
    url: Url,
    headers: Headers,
    tx: mpsc::Sender<TransportResult<EnginePacket>>,
) {
    loop {
        match poll(&client, &url, &headers).await {
            Ok(body) => {
                for packet in decode_payload(&body) {
                    let closing = matches!(packet, Ok(EnginePacket::Close));
                    if tx.send(packet).await.is_err() || closing {
                        return;
                    }
                }
            }
            Err(e) => {
                let _ = tx.send(Err(e)).await;
                return;
            }
        }
    }
}

//! Mock realtime transport.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::config::TransportOptions;
use crate::error::{TransportError, TransportResult};
use crate::socketio::{IncomingEvent, OutgoingEvent, TransportEvent};
use crate::traits::{Connector, Transport, TransportHandle};

/// Mock transport for testing.
///
/// This mock allows:
/// - Injecting transport events (connects, errors, application events)
/// - Capturing emitted events
/// - Observing `close` calls
///
/// Clones share state.
#[derive(Clone)]
pub struct MockTransport {
    events_tx: mpsc::UnboundedSender<TransportEvent>,
    connected: Arc<AtomicBool>,
    closed: Arc<AtomicBool>,
    emitted: Arc<Mutex<Vec<OutgoingEvent>>>,
    emit_should_fail: Arc<AtomicBool>,
}

impl MockTransport {
    fn new(events_tx: mpsc::UnboundedSender<TransportEvent>) -> Self {
        Self {
            events_tx,
            connected: Arc::new(AtomicBool::new(false)),
            closed: Arc::new(AtomicBool::new(false)),
            emitted: Arc::new(Mutex::new(Vec::new())),
            emit_should_fail: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Inject a raw transport event.
    pub fn inject(&self, event: TransportEvent) {
        match event {
            TransportEvent::Connected => self.connected.store(true, Ordering::SeqCst),
            TransportEvent::Disconnected { .. } => self.connected.store(false, Ordering::SeqCst),
            _ => {}
        }
        let _ = self.events_tx.send(event);
    }

    pub fn simulate_connect(&self) {
        self.inject(TransportEvent::Connected);
    }

    pub fn simulate_disconnect(&self) {
        self.inject(TransportEvent::Disconnected {
            reason: "transport close".to_string(),
        });
    }

    pub fn simulate_connect_error(&self, message: &str) {
        self.inject(TransportEvent::ConnectError(TransportError::ConnectFailed(
            message.to_string(),
        )));
    }

    pub fn inject_event(&self, event: IncomingEvent) {
        self.inject(TransportEvent::Event(event));
    }

    /// Events emitted so far.
    pub fn emitted(&self) -> Vec<OutgoingEvent> {
        self.emitted.lock().map(|e| e.clone()).unwrap_or_default()
    }

    pub fn set_emit_should_fail(&self, should_fail: bool) {
        self.emit_should_fail.store(should_fail, Ordering::SeqCst);
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn emit(&self, event: OutgoingEvent) -> TransportResult<()> {
        if self.emit_should_fail.load(Ordering::SeqCst) {
            return Err(TransportError::SendFailed("Mock emit failure".to_string()));
        }
        if let Ok(mut emitted) = self.emitted.lock() {
            emitted.push(event);
        }
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst) && !self.is_closed()
    }

    fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        self.connected.store(false, Ordering::SeqCst);
    }
}

/// Connector handing out a single [`MockTransport`].
pub struct MockConnector {
    transport: MockTransport,
    events_rx: Mutex<Option<mpsc::UnboundedReceiver<TransportEvent>>>,
    connect_calls: AtomicUsize,
    options: Mutex<Option<TransportOptions>>,
}

impl MockConnector {
    pub fn new() -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            transport: MockTransport::new(events_tx),
            events_rx: Mutex::new(Some(events_rx)),
            connect_calls: AtomicUsize::new(0),
            options: Mutex::new(None),
        }
    }

    /// The transport this connector hands out.
    pub fn transport(&self) -> MockTransport {
        self.transport.clone()
    }

    pub fn connect_calls(&self) -> usize {
        self.connect_calls.load(Ordering::SeqCst)
    }

    /// Options passed to the last `connect`.
    pub fn last_options(&self) -> Option<TransportOptions> {
        self.options.lock().ok().and_then(|o| o.clone())
    }
}

impl Default for MockConnector {
    fn default() -> Self {
        Self::new()
    }
}

impl Connector for MockConnector {
    fn connect(&self, options: &TransportOptions) -> TransportResult<TransportHandle> {
        self.connect_calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut slot) = self.options.lock() {
            *slot = Some(options.clone());
        }

        let mut unbounded = self
            .events_rx
            .lock()
            .ok()
            .and_then(|mut rx| rx.take())
            .ok_or(TransportError::Closed)?;

        // Bridge onto the bounded channel the handle exposes
        let (tx, events) = mpsc::channel(100);
        tokio::spawn(async move {
            while let Some(event) = unbounded.recv().await {
                if tx.send(event).await.is_err() {
                    break;
                }
            }
        });

        Ok(TransportHandle {
            transport: Arc::new(self.transport.clone()),
            events,
        })
    }
}

//! Realtime transport trait abstraction.
//!
//! A [`Connector`] opens a [`Transport`] and hands back the receiving end of
//! its event channel. The transport runs its own background task; its owner
//! only ever sees [`TransportEvent`]s.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::config::TransportOptions;
use crate::error::TransportResult;
use crate::socketio::{OutgoingEvent, TransportEvent};

/// Trait for an open realtime connection.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Emit an application event.
    async fn emit(&self, event: OutgoingEvent) -> TransportResult<()>;

    /// Whether the namespace connection is currently established.
    fn is_connected(&self) -> bool;

    /// Close the connection and stop reconnecting. Safe to call more than once.
    fn close(&self);
}

/// An opened transport and its event stream.
pub struct TransportHandle {
    pub transport: Arc<dyn Transport>,
    pub events: mpsc::Receiver<TransportEvent>,
}

/// Factory for transports.
///
/// `connect` returns as soon as the background task is running; connection
/// outcomes arrive as events. It only fails when the endpoint itself is
/// unusable. Must be called from within a tokio runtime.
pub trait Connector: Send + Sync {
    fn connect(&self, options: &TransportOptions) -> TransportResult<TransportHandle>;
}

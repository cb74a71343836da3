//! Socket.IO connector.
//!
//! Opens a [`SocketIoClient`] against the panel and exposes it through the
//! [`Connector`] trait.

use std::sync::Arc;

use crate::config::TransportOptions;
use crate::error::TransportResult;
use crate::socketio::{Endpoint, SocketIoClient};
use crate::traits::{Connector, TransportHandle};

/// Production connector for the panel's Socket.IO endpoint.
///
/// # Example
///
/// ```ignore
/// use guild_dash::adapters::SocketIoConnector;
///
/// let connector = SocketIoConnector::new("http://localhost:8080")?
///     .with_session_cookie("s3ss10n");
/// let handle = connector.connect(&TransportOptions::default())?;
/// ```
#[derive(Debug, Clone)]
pub struct SocketIoConnector {
    endpoint: Endpoint,
}

impl SocketIoConnector {
    pub fn new(base_url: &str) -> TransportResult<Self> {
        Ok(Self {
            endpoint: Endpoint::parse(base_url)?,
        })
    }

    /// Attach the panel's session cookie to every handshake.
    pub fn with_session_cookie(mut self, cookie: &str) -> Self {
        self.endpoint = self
            .endpoint
            .with_header("Cookie", format!("session={}", cookie));
        self
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }
}

impl Connector for SocketIoConnector {
    fn connect(&self, options: &TransportOptions) -> TransportResult<TransportHandle> {
        let (client, events) = SocketIoClient::spawn(self.endpoint.clone(), options.clone());
        Ok(TransportHandle {
            transport: Arc::new(client),
            events,
        })
    }
}

//! Concrete implementations of trait abstractions.
//!
//! # Adapters
//!
//! - [`ReqwestHttpClient`] - HTTP client using reqwest
//! - [`SocketIoConnector`] - Socket.IO transport over tokio-tungstenite / reqwest
//! - [`LogSurface`] - display surface for headless runs, logs every change
//!
//! # Mock Implementations
//!
//! The [`mock`] submodule provides test doubles:
//! - [`mock::MockConnector`] / [`mock::MockTransport`] - event injection and emit capture
//! - [`mock::MockHttpClient`] - configurable HTTP responses
//! - [`mock::RecordingSurface`] - records every display write

pub mod log_surface;
pub mod mock;
pub mod reqwest_http;
pub mod socketio_transport;

pub use log_surface::LogSurface;
pub use mock::{MockConnector, MockHttpClient, MockTransport, RecordingSurface};
pub use reqwest_http::ReqwestHttpClient;
pub use socketio_transport::SocketIoConnector;

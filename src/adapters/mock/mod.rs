//! Mock implementations for testing.
//!
//! - [`MockConnector`] / [`MockTransport`] - inject transport events, capture emits
//! - [`MockHttpClient`] - configurable HTTP responses
//! - [`RecordingSurface`] - in-memory display surface that records writes

pub mod http;
pub mod surface;
pub mod transport;

pub use http::{MockHttpClient, MockResponse, RecordedRequest};
pub use surface::RecordingSurface;
pub use transport::{MockConnector, MockTransport};

//! Error types for guild-dash.
//!
//! Two families of errors exist, mirroring the two ways the dashboard talks
//! to the control panel:
//!
//! - [`TransportError`] - realtime connection failures. These are logged and
//!   reflected in the connection indicator, never returned to callers of the
//!   controller.
//! - [`RequestError`] - REST call failures. Loaders catch them, show a toast
//!   and hand back `None`.
//!
//! | Error | Surfaced as | Retryable |
//! |-------|-------------|-----------|
//! | `TransportError::ConnectFailed` | status indicator | yes (transport) |
//! | `TransportError::Server` | status indicator | yes (transport) |
//! | `RequestError::RequestFailed` | error toast | no |
//! | `RequestError::Connection` | error toast | no |

mod request;
mod transport;

pub use request::{RequestError, RequestResult};
pub use transport::{TransportError, TransportResult};

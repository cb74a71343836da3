//! Trait abstractions at the seams of the dashboard.
//!
//! - [`Transport`] / [`Connector`] - the realtime event stream
//! - [`HttpClient`] - REST calls to the control panel
//! - [`DisplaySurface`] - the addressable display elements the controller writes to

pub mod http;
pub mod surface;
pub mod transport;

pub use http::{Headers, HttpClient, HttpError, HttpRequest, Method, Response};
pub use surface::{DisplaySurface, ToastKind};
pub use transport::{Connector, Transport, TransportHandle};

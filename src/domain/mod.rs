//! Domain objects for the dashboard.
//!
//! ## Domain Objects
//!
//! - [`ConnectionState`] - Connected / disconnected status of the realtime link
//! - [`ReconnectCounter`] - Consecutive connect errors against a display ceiling
//! - [`Location`] - The current navigation path and the guild it points at

pub mod connection;
pub mod location;

pub use connection::{ConnectionState, ReconnectCounter};
pub use location::Location;

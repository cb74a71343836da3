//! Socket.IO client for the control panel's realtime channel.
//!
//! This module speaks Engine.IO v4 / Socket.IO v5 over a websocket, falling
//! back to HTTP long-polling, with bounded automatic reconnection. Incoming
//! application events are decoded into [`IncomingEvent`]s and reported,
//! together with connection changes, as [`TransportEvent`]s.

pub mod client;
pub mod events;
pub mod packet;
pub mod polling;
pub mod session;

pub use client::{Endpoint, SocketIoClient};
pub use events::{
    GuildUpdateEvent, IncomingEvent, OutgoingEvent, PingPayload, StatsSnapshot, TransportEvent,
};
pub use packet::{EnginePacket, Handshake, SocketPacket};

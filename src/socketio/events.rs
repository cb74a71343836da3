//! Typed realtime events exchanged with the control panel.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};
use tracing::warn;

use super::packet::SocketPacket;
use crate::error::TransportError;

/// Partial statistics update.
///
/// Each field is `None` when the key was absent and `Some(None)` when the
/// server sent an explicit `null`, so only keys present in the payload are
/// applied. Fields decode independently: a malformed value drops only its
/// own key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatsSnapshot {
    pub guilds: Option<Option<Number>>,
    pub users: Option<Option<u64>>,
    /// Milliseconds; the bot reports fractional values
    pub latency: Option<Option<Number>>,
    pub status: Option<Option<String>>,
}

impl StatsSnapshot {
    pub fn with_guilds(mut self, guilds: u64) -> Self {
        self.guilds = Some(Some(guilds.into()));
        self
    }

    pub fn with_users(mut self, users: u64) -> Self {
        self.users = Some(Some(users));
        self
    }

    pub fn with_latency(mut self, latency: u64) -> Self {
        self.latency = Some(Some(latency.into()));
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(Some(status.into()));
        self
    }

    /// True when no known field is present.
    pub fn is_empty(&self) -> bool {
        self.guilds.is_none()
            && self.users.is_none()
            && self.latency.is_none()
            && self.status.is_none()
    }
}

impl<'de> Deserialize<'de> for StatsSnapshot {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut fields = Map::<String, Value>::deserialize(deserializer)?;
        Ok(Self {
            guilds: take_field(&mut fields, "guilds"),
            users: take_field(&mut fields, "users"),
            latency: take_field(&mut fields, "latency"),
            status: take_field(&mut fields, "status"),
        })
    }
}

/// Remove and decode one key. `null` counts as present.
fn take_field<T: DeserializeOwned>(
    fields: &mut Map<String, Value>,
    key: &str,
) -> Option<Option<T>> {
    let value = fields.remove(key)?;
    match serde_json::from_value::<Option<T>>(value) {
        Ok(decoded) => Some(decoded),
        Err(e) => {
            warn!(field = key, error = %e, "Ignoring malformed stats field");
            None
        }
    }
}

/// Notification that a guild's settings changed.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GuildUpdateEvent {
    #[serde(default, deserialize_with = "string_or_number")]
    pub guild_id: String,
}

impl GuildUpdateEvent {
    pub fn new(guild_id: impl Into<String>) -> Self {
        Self {
            guild_id: guild_id.into(),
        }
    }
}

/// Snowflakes may arrive as strings or as bare numbers.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(serde::de::Error::custom(format!(
            "expected a guild id, got {}",
            other
        ))),
    }
}

/// Application events received from the server.
#[derive(Debug, Clone, PartialEq)]
pub enum IncomingEvent {
    Pong(Value),
    GuildUpdate(GuildUpdateEvent),
    StatsUpdate(StatsSnapshot),
    /// Any event this client has no handler for
    Other { name: String, data: Value },
}

impl IncomingEvent {
    /// Map a Socket.IO event to a typed event.
    ///
    /// Payloads that fail to decode are kept as [`IncomingEvent::Other`] so the
    /// caller can log them.
    pub fn from_socket(name: &str, mut args: Vec<Value>) -> Self {
        let data = if args.is_empty() {
            Value::Null
        } else {
            args.remove(0)
        };

        match name {
            "pong" => IncomingEvent::Pong(data),
            "guild_update" => match serde_json::from_value(data.clone()) {
                Ok(event) => IncomingEvent::GuildUpdate(event),
                Err(_) => IncomingEvent::Other {
                    name: name.to_string(),
                    data,
                },
            },
            "stats_update" => match serde_json::from_value(data.clone()) {
                Ok(snapshot) => IncomingEvent::StatsUpdate(snapshot),
                Err(_) => IncomingEvent::Other {
                    name: name.to_string(),
                    data,
                },
            },
            _ => IncomingEvent::Other {
                name: name.to_string(),
                data,
            },
        }
    }

    /// Wire name of the event.
    pub fn name(&self) -> &str {
        match self {
            IncomingEvent::Pong(_) => "pong",
            IncomingEvent::GuildUpdate(_) => "guild_update",
            IncomingEvent::StatsUpdate(_) => "stats_update",
            IncomingEvent::Other { name, .. } => name,
        }
    }
}

/// Payload of the liveness ping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PingPayload {
    /// Unix time in milliseconds
    pub timestamp: i64,
}

/// Application events sent to the server.
#[derive(Debug, Clone, PartialEq)]
pub enum OutgoingEvent {
    Ping(PingPayload),
}

impl OutgoingEvent {
    pub fn ping(timestamp: i64) -> Self {
        OutgoingEvent::Ping(PingPayload { timestamp })
    }

    pub fn name(&self) -> &'static str {
        match self {
            OutgoingEvent::Ping(_) => "ping",
        }
    }

    pub fn to_packet(&self) -> SocketPacket {
        let data = match self {
            OutgoingEvent::Ping(payload) => {
                serde_json::to_value(payload).unwrap_or(Value::Null)
            }
        };
        SocketPacket::event(self.name(), data)
    }
}

/// Everything the transport reports to its owner.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportEvent {
    Connected,
    Disconnected { reason: String },
    ConnectError(TransportError),
    Event(IncomingEvent),
}

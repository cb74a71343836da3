//! Engine.IO v4 and Socket.IO v5 packet codec.
//!
//! Engine.IO frames carry a single-digit type followed by an optional
//! payload. Message frames (`4`) wrap a Socket.IO packet, itself a type digit,
//! an optional namespace, an optional ack id and a JSON body:
//!
//! ```text
//! 0{"sid":"abc","upgrades":[],"pingInterval":25000,"pingTimeout":20000}
//! 40
//! 42["stats_update",{"guilds":12}]
//! ```
//!
//! Over HTTP long-polling several frames share one body, joined by the
//! record separator `\x1e`.

use serde::Deserialize;
use serde_json::Value;

use crate::error::{TransportError, TransportResult};

/// Separator between frames in a polling payload.
pub const RECORD_SEPARATOR: char = '\u{1e}';

/// Default namespace.
pub const ROOT_NAMESPACE: &str = "/";

/// Server handshake sent in the Engine.IO open packet.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Handshake {
    pub sid: String,
    #[serde(default)]
    pub upgrades: Vec<String>,
    /// Milliseconds between server pings
    #[serde(default = "default_ping_interval")]
    pub ping_interval: u64,
    /// Milliseconds the server waits for our pong
    #[serde(default = "default_ping_timeout")]
    pub ping_timeout: u64,
    #[serde(default)]
    pub max_payload: Option<u64>,
}

fn default_ping_interval() -> u64 {
    25_000
}

fn default_ping_timeout() -> u64 {
    20_000
}

impl Handshake {
    /// Longest silence tolerated before the connection counts as dead.
    pub fn heartbeat_deadline(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.ping_interval + self.ping_timeout)
    }
}

/// Engine.IO frame.
#[derive(Debug, Clone, PartialEq)]
pub enum EnginePacket {
    Open(Handshake),
    Close,
    Ping(Option<String>),
    Pong(Option<String>),
    /// Carries an encoded Socket.IO packet
    Message(String),
    Upgrade,
    Noop,
}

impl EnginePacket {
    pub fn decode(frame: &str) -> TransportResult<Self> {
        let mut chars = frame.chars();
        let kind = chars
            .next()
            .ok_or_else(|| TransportError::Protocol("empty frame".to_string()))?;
        let rest = chars.as_str();
        let data = || (!rest.is_empty()).then(|| rest.to_string());

        match kind {
            '0' => serde_json::from_str(rest)
                .map(EnginePacket::Open)
                .map_err(|e| TransportError::Handshake(e.to_string())),
            '1' => Ok(EnginePacket::Close),
            '2' => Ok(EnginePacket::Ping(data())),
            '3' => Ok(EnginePacket::Pong(data())),
            '4' => Ok(EnginePacket::Message(rest.to_string())),
            '5' => Ok(EnginePacket::Upgrade),
            '6' => Ok(EnginePacket::Noop),
            'b' => Err(TransportError::Protocol(
                "binary frames are not supported".to_string(),
            )),
            other => Err(TransportError::Protocol(format!(
                "unknown engine packet type '{}'",
                other
            ))),
        }
    }

    /// Encode for the wire. The open packet is server-only and encodes empty.
    pub fn encode(&self) -> String {
        match self {
            EnginePacket::Open(_) => "0".to_string(),
            EnginePacket::Close => "1".to_string(),
            EnginePacket::Ping(data) => format!("2{}", data.as_deref().unwrap_or("")),
            EnginePacket::Pong(data) => format!("3{}", data.as_deref().unwrap_or("")),
            EnginePacket::Message(body) => format!("4{}", body),
            EnginePacket::Upgrade => "5".to_string(),
            EnginePacket::Noop => "6".to_string(),
        }
    }
}

/// Split a polling body into frames.
pub fn decode_payload(body: &str) -> Vec<TransportResult<EnginePacket>> {
    body.split(RECORD_SEPARATOR)
        .filter(|frame| !frame.is_empty())
        .map(EnginePacket::decode)
        .collect()
}

/// Join frames into a polling body.
pub fn encode_payload(packets: &[EnginePacket]) -> String {
    packets
        .iter()
        .map(EnginePacket::encode)
        .collect::<Vec<_>>()
        .join(&RECORD_SEPARATOR.to_string())
}

/// Socket.IO packet carried inside an Engine.IO message.
#[derive(Debug, Clone, PartialEq)]
pub enum SocketPacket {
    Connect {
        namespace: String,
        data: Option<Value>,
    },
    Disconnect {
        namespace: String,
    },
    Event {
        namespace: String,
        id: Option<u64>,
        name: String,
        args: Vec<Value>,
    },
    Ack {
        namespace: String,
        id: u64,
        args: Vec<Value>,
    },
    ConnectError {
        namespace: String,
        data: Value,
    },
}

impl SocketPacket {
    /// Namespace connect request for the root namespace.
    pub fn connect_root() -> Self {
        SocketPacket::Connect {
            namespace: ROOT_NAMESPACE.to_string(),
            data: None,
        }
    }

    pub fn disconnect_root() -> Self {
        SocketPacket::Disconnect {
            namespace: ROOT_NAMESPACE.to_string(),
        }
    }

    /// Event on the root namespace without an ack.
    pub fn event(name: impl Into<String>, data: Value) -> Self {
        SocketPacket::Event {
            namespace: ROOT_NAMESPACE.to_string(),
            id: None,
            name: name.into(),
            args: vec![data],
        }
    }

    pub fn decode(body: &str) -> TransportResult<Self> {
        let mut chars = body.chars();
        let kind = chars
            .next()
            .ok_or_else(|| TransportError::Protocol("empty socket packet".to_string()))?;
        let mut rest = chars.as_str();

        let mut namespace = ROOT_NAMESPACE.to_string();
        if rest.starts_with('/') {
            match rest.find(',') {
                Some(end) => {
                    namespace = rest[..end].to_string();
                    rest = &rest[end + 1..];
                }
                None => {
                    namespace = rest.to_string();
                    rest = "";
                }
            }
        }

        let digits = rest.chars().take_while(|c| c.is_ascii_digit()).count();
        let id = if digits > 0 {
            let parsed = rest[..digits]
                .parse::<u64>()
                .map_err(|e| TransportError::Protocol(e.to_string()))?;
            rest = &rest[digits..];
            Some(parsed)
        } else {
            None
        };

        let json = if rest.is_empty() {
            None
        } else {
            Some(
                serde_json::from_str::<Value>(rest)
                    .map_err(|e| TransportError::Protocol(e.to_string()))?,
            )
        };

        match kind {
            '0' => Ok(SocketPacket::Connect {
                namespace,
                data: json,
            }),
            '1' => Ok(SocketPacket::Disconnect { namespace }),
            '2' => {
                let mut args = match json {
                    Some(Value::Array(items)) => items,
                    _ => {
                        return Err(TransportError::Protocol(
                            "event body must be an array".to_string(),
                        ))
                    }
                };
                if args.is_empty() {
                    return Err(TransportError::Protocol("event without a name".to_string()));
                }
                let name = match args.remove(0) {
                    Value::String(name) => name,
                    _ => {
                        return Err(TransportError::Protocol(
                            "event name must be a string".to_string(),
                        ))
                    }
                };
                Ok(SocketPacket::Event {
                    namespace,
                    id,
                    name,
                    args,
                })
            }
            '3' => {
                let id = id.ok_or_else(|| TransportError::Protocol("ack without id".to_string()))?;
                let args = match json {
                    Some(Value::Array(items)) => items,
                    _ => Vec::new(),
                };
                Ok(SocketPacket::Ack {
                    namespace,
                    id,
                    args,
                })
            }
            '4' => Ok(SocketPacket::ConnectError {
                namespace,
                data: json.unwrap_or(Value::Null),
            }),
            '5' | '6' => Err(TransportError::Protocol(
                "binary packets are not supported".to_string(),
            )),
            other => Err(TransportError::Protocol(format!(
                "unknown socket packet type '{}'",
                other
            ))),
        }
    }

    pub fn encode(&self) -> String {
        fn prefix(kind: char, namespace: &str) -> String {
            if namespace == ROOT_NAMESPACE {
                kind.to_string()
            } else {
                format!("{}{},", kind, namespace)
            }
        }

        match self {
            SocketPacket::Connect { namespace, data } => {
                let mut out = prefix('0', namespace);
                if let Some(data) = data {
                    out.push_str(&data.to_string());
                }
                out
            }
            SocketPacket::Disconnect { namespace } => prefix('1', namespace),
            SocketPacket::Event {
                namespace,
                id,
                name,
                args,
            } => {
                let mut out = prefix('2', namespace);
                if let Some(id) = id {
                    out.push_str(&id.to_string());
                }
                let mut items = Vec::with_capacity(args.len() + 1);
                items.push(Value::String(name.clone()));
                items.extend(args.iter().cloned());
                out.push_str(&Value::Array(items).to_string());
                out
            }
            SocketPacket::Ack {
                namespace,
                id,
                args,
            } => {
                let mut out = prefix('3', namespace);
                out.push_str(&id.to_string());
                out.push_str(&Value::Array(args.clone()).to_string());
                out
            }
            SocketPacket::ConnectError { namespace, data } => {
                format!("{}{}", prefix('4', namespace), data)
            }
        }
    }

    /// Wrap in an Engine.IO message frame.
    pub fn into_engine(self) -> EnginePacket {
        EnginePacket::Message(self.encode())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_open_packet() {
        let packet = EnginePacket::decode(
            r#"0{"sid":"lv_VI97HAXpY6yYWAAAC","upgrades":["websocket"],"pingInterval":25000,"pingTimeout":5000,"maxPayload":1000000}"#,
        )
        .unwrap();
        match packet {
            EnginePacket::Open(handshake) => {
                assert_eq!(handshake.sid, "lv_VI97HAXpY6yYWAAAC");
                assert_eq!(handshake.upgrades, vec!["websocket".to_string()]);
                assert_eq!(handshake.ping_interval, 25000);
                assert_eq!(handshake.ping_timeout, 5000);
                assert_eq!(
                    handshake.heartbeat_deadline(),
                    std::time::Duration::from_millis(30000)
                );
            }
            other => panic!("Expected Open, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_malformed_handshake() {
        let err = EnginePacket::decode("0{not json").unwrap_err();
        assert!(matches!(err, TransportError::Handshake(_)));
    }

    #[test]
    fn test_decode_heartbeats() {
        assert_eq!(EnginePacket::decode("2").unwrap(), EnginePacket::Ping(None));
        assert_eq!(
            EnginePacket::decode("3upgrade-check").unwrap(),
            EnginePacket::Pong(Some("upgrade-check".to_string()))
        );
        assert_eq!(EnginePacket::Pong(None).encode(), "3");
    }

    #[test]
    fn test_decode_rejects_empty_and_binary() {
        assert!(EnginePacket::decode("").is_err());
        assert!(EnginePacket::decode("bAQID").is_err());
        assert!(EnginePacket::decode("9").is_err());
    }

    #[test]
    fn test_polling_payload_split() {
        let body = "2\u{1e}42[\"stats_update\",{\"latency\":42}]\u{1e}6";
        let packets: Vec<_> = decode_payload(body)
            .into_iter()
            .map(|p| p.unwrap())
            .collect();
        assert_eq!(packets.len(), 3);
        assert_eq!(packets[0], EnginePacket::Ping(None));
        assert_eq!(
            packets[1],
            EnginePacket::Message("2[\"stats_update\",{\"latency\":42}]".to_string())
        );
        assert_eq!(packets[2], EnginePacket::Noop);
    }

    #[test]
    fn test_polling_payload_join() {
        let body = encode_payload(&[
            EnginePacket::Pong(None),
            SocketPacket::connect_root().into_engine(),
        ]);
        assert_eq!(body, "3\u{1e}40");
    }

    #[test]
    fn test_decode_connect_ack() {
        let packet = SocketPacket::decode(r#"0{"sid":"wZX3oN0bSVIhsaknAAAI"}"#).unwrap();
        assert_eq!(
            packet,
            SocketPacket::Connect {
                namespace: "/".to_string(),
                data: Some(json!({"sid": "wZX3oN0bSVIhsaknAAAI"})),
            }
        );
    }

    #[test]
    fn test_decode_event_with_namespace_and_id() {
        let packet = SocketPacket::decode(r#"2/admin,13["guild_update",{"guild_id":"42"}]"#).unwrap();
        assert_eq!(
            packet,
            SocketPacket::Event {
                namespace: "/admin".to_string(),
                id: Some(13),
                name: "guild_update".to_string(),
                args: vec![json!({"guild_id": "42"})],
            }
        );
    }

    #[test]
    fn test_decode_event_requires_string_name() {
        assert!(SocketPacket::decode("2[1,2]").is_err());
        assert!(SocketPacket::decode("2[]").is_err());
        assert!(SocketPacket::decode("2{}").is_err());
    }

    #[test]
    fn test_decode_connect_error() {
        let packet = SocketPacket::decode(r#"4{"message":"Not authorized"}"#).unwrap();
        assert_eq!(
            packet,
            SocketPacket::ConnectError {
                namespace: "/".to_string(),
                data: json!({"message": "Not authorized"}),
            }
        );
    }

    #[test]
    fn test_encode_ping_event() {
        let packet = SocketPacket::event("ping", json!({"timestamp": 1700000000000u64}));
        assert_eq!(
            packet.into_engine().encode(),
            r#"42["ping",{"timestamp":1700000000000}]"#
        );
    }

    #[test]
    fn test_encode_connect_and_disconnect() {
        assert_eq!(SocketPacket::connect_root().encode(), "0");
        assert_eq!(SocketPacket::disconnect_root().encode(), "1");
        let namespaced = SocketPacket::Disconnect {
            namespace: "/admin".to_string(),
        };
        assert_eq!(namespaced.encode(), "1/admin,");
    }

    #[test]
    fn test_namespace_without_body() {
        let packet = SocketPacket::decode("1/admin").unwrap();
        assert_eq!(
            packet,
            SocketPacket::Disconnect {
                namespace: "/admin".to_string()
            }
        );
    }
}

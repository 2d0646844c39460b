//! Socket-packet layer: the text embedded in a transport message frame.
//!
//! Grammar:
//!
//! ```text
//! <type digit>[<attachment digit>-]["/"<namespace>","][<ack digits>][<json payload>]
//! ```
//!
//! Binary packet types (and any non-zero attachment count) are rejected:
//! attachments arrive in separate binary frames this decoder never sees.

use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub enum SocketPacket {
    Connect {
        namespace: String,
        payload: Option<Map<String, Value>>,
    },
    Disconnect {
        namespace: String,
    },
    ConnectError {
        namespace: String,
        data: Option<Value>,
    },
    Event {
        namespace: String,
        ack_id: Option<u64>,
        payload: Vec<Value>,
    },
    Ack {
        namespace: String,
        ack_id: u64,
        payload: Vec<Value>,
    },
}

impl SocketPacket {
    pub fn namespace(&self) -> &str {
        match self {
            SocketPacket::Connect { namespace, .. }
            | SocketPacket::Disconnect { namespace }
            | SocketPacket::ConnectError { namespace, .. }
            | SocketPacket::Event { namespace, .. }
            | SocketPacket::Ack { namespace, .. } => namespace,
        }
    }
}

#[derive(Debug, Error)]
pub enum SocketError {
    #[error("malformed socket packet: {0}")]
    MalformedPacket(String),
    #[error("binary socket packets are not supported: {0}")]
    UnsupportedBinaryPacket(String),
    #[error("unknown socket packet type {0:?}")]
    UnknownPacketType(char),
    #[error("invalid payload shape: {0}")]
    InvalidPayloadShape(String),
}

/// Decodes the given encoded text into a [`SocketPacket`].
pub fn decode(encoded: &str) -> Result<SocketPacket, SocketError> {
    let mut chars = encoded.chars();
    let kind = chars
        .next()
        .ok_or_else(|| SocketError::MalformedPacket(encoded.to_owned()))?;
    if !kind.is_ascii_digit() {
        return Err(SocketError::MalformedPacket(encoded.to_owned()));
    }
    if !matches!(kind, '0'..='6') {
        return Err(SocketError::UnknownPacketType(kind));
    }
    let mut rest = chars.as_str();

    // Single-digit attachment count terminated by '-'. A digit run without the
    // dash is an ack id and must be left alone.
    let mut attachments = 0u8;
    let mut bytes = rest.bytes();
    if let (Some(first), Some(b'-')) = (bytes.next(), bytes.next()) {
        if first.is_ascii_digit() {
            attachments = first - b'0';
            rest = &rest[2..];
        }
    }

    let namespace = if let Some(after_slash) = rest.strip_prefix('/') {
        let comma = after_slash
            .find(',')
            .ok_or_else(|| SocketError::MalformedPacket(encoded.to_owned()))?;
        let namespace = format!("/{}", &after_slash[..comma]);
        if namespace == "/" {
            return Err(SocketError::MalformedPacket(encoded.to_owned()));
        }
        rest = &after_slash[comma + 1..];
        namespace
    } else {
        String::from("/")
    };

    let digits = rest.len() - rest.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    let ack_id = if digits > 0 {
        let parsed = rest[..digits]
            .parse::<u64>()
            .map_err(|_| SocketError::MalformedPacket(encoded.to_owned()))?;
        rest = &rest[digits..];
        Some(parsed)
    } else {
        None
    };

    // Binary variants bail out before payload parsing: their payload text is
    // only a placeholder for attachment frames.
    if attachments > 0 || matches!(kind, '5' | '6') {
        return Err(SocketError::UnsupportedBinaryPacket(encoded.to_owned()));
    }

    let payload = if rest.trim().is_empty() {
        None
    } else {
        let value: Value = serde_json::from_str(rest)
            .map_err(|_| SocketError::MalformedPacket(encoded.to_owned()))?;
        Some(value)
    };

    match kind {
        '0' => Ok(SocketPacket::Connect {
            namespace,
            payload: object_or_none(payload)?,
        }),
        '1' => Ok(SocketPacket::Disconnect { namespace }),
        '2' => Ok(SocketPacket::Event {
            namespace,
            ack_id,
            payload: non_empty_array(payload)?,
        }),
        '3' => Ok(SocketPacket::Ack {
            namespace,
            ack_id: ack_id.ok_or_else(|| SocketError::MalformedPacket(encoded.to_owned()))?,
            payload: non_empty_array(payload)?,
        }),
        '4' => Ok(SocketPacket::ConnectError {
            namespace,
            data: payload,
        }),
        '5' | '6' => Err(SocketError::UnsupportedBinaryPacket(encoded.to_owned())),
        other => Err(SocketError::UnknownPacketType(other)),
    }
}

fn object_or_none(payload: Option<Value>) -> Result<Option<Map<String, Value>>, SocketError> {
    match payload {
        None => Ok(None),
        Some(Value::Object(object)) => Ok(Some(object)),
        Some(other) => Err(SocketError::InvalidPayloadShape(format!(
            "connect payload must be a JSON object, got {other}"
        ))),
    }
}

fn non_empty_array(payload: Option<Value>) -> Result<Vec<Value>, SocketError> {
    match payload {
        Some(Value::Array(items)) if !items.is_empty() => Ok(items),
        Some(Value::Array(_)) => Err(SocketError::InvalidPayloadShape(
            "payload array must not be empty".to_owned(),
        )),
        Some(other) => Err(SocketError::InvalidPayloadShape(format!(
            "payload must be a JSON array, got {other}"
        ))),
        None => Err(SocketError::InvalidPayloadShape(
            "payload is mandatory".to_owned(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::{SocketError, SocketPacket, decode};
    use serde_json::json;

    #[test]
    fn event_with_namespace_and_ack_id() {
        let packet = decode("2/room,5[\"rsrch\",{\"presetId\":\"p1\"}]").unwrap();
        match packet {
            SocketPacket::Event {
                namespace,
                ack_id,
                payload,
            } => {
                assert_eq!(namespace, "/room");
                assert_eq!(ack_id, Some(5));
                assert_eq!(payload[0], json!("rsrch"));
                assert_eq!(payload[1], json!({"presetId": "p1"}));
            }
            other => panic!("expected event, got {other:?}"),
        }
    }

    #[test]
    fn namespace_defaults_to_root() {
        let packet = decode("2[\"connect.ok\"]").unwrap();
        assert_eq!(packet.namespace(), "/");
    }

    #[test]
    fn connect_accepts_object_or_absent_payload() {
        assert!(matches!(
            decode("0").unwrap(),
            SocketPacket::Connect { payload: None, .. }
        ));
        assert!(matches!(
            decode("0/game,{\"token\":\"t\"}").unwrap(),
            SocketPacket::Connect {
                payload: Some(_),
                ..
            }
        ));
        assert!(matches!(
            decode("0[1]"),
            Err(SocketError::InvalidPayloadShape(_))
        ));
    }

    #[test]
    fn unknown_type_digit() {
        assert!(matches!(
            decode("7abc"),
            Err(SocketError::UnknownPacketType('7'))
        ));
    }

    #[test]
    fn binary_attachments_rejected() {
        assert!(matches!(
            decode("21-/x,[]"),
            Err(SocketError::UnsupportedBinaryPacket(_))
        ));
        assert!(matches!(
            decode("51-[\"x\"]"),
            Err(SocketError::UnsupportedBinaryPacket(_))
        ));
        assert!(matches!(
            decode("6"),
            Err(SocketError::UnsupportedBinaryPacket(_))
        ));
    }

    #[test]
    fn event_payload_must_be_non_empty_array() {
        assert!(matches!(
            decode("2[]"),
            Err(SocketError::InvalidPayloadShape(_))
        ));
        assert!(matches!(
            decode("2{\"a\":1}"),
            Err(SocketError::InvalidPayloadShape(_))
        ));
        assert!(matches!(
            decode("2"),
            Err(SocketError::InvalidPayloadShape(_))
        ));
    }

    #[test]
    fn ack_requires_ack_id() {
        assert!(matches!(
            decode("3[\"ok\"]"),
            Err(SocketError::MalformedPacket(_))
        ));
        match decode("3/room,7[{\"status\":\"ok\"}]").unwrap() {
            SocketPacket::Ack {
                namespace, ack_id, ..
            } => {
                assert_eq!(namespace, "/room");
                assert_eq!(ack_id, 7);
            }
            other => panic!("expected ack, got {other:?}"),
        }
    }

    #[test]
    fn disconnect_ignores_payload() {
        assert!(matches!(
            decode("1/game,").unwrap(),
            SocketPacket::Disconnect { namespace } if namespace == "/game"
        ));
        assert!(matches!(
            decode("1{\"ignored\":true}").unwrap(),
            SocketPacket::Disconnect { .. }
        ));
    }

    #[test]
    fn namespace_without_comma_is_malformed() {
        assert!(matches!(
            decode("2/room[\"x\"]"),
            Err(SocketError::MalformedPacket(_))
        ));
    }

    #[test]
    fn connect_error_keeps_arbitrary_payload() {
        match decode("4\"denied\"").unwrap() {
            SocketPacket::ConnectError { data, .. } => assert_eq!(data, Some(json!("denied"))),
            other => panic!("expected connect error, got {other:?}"),
        }
    }
}

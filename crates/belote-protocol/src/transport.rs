//! Outer transport envelope, one packet per WebSocket text frame.
//!
//! The first ASCII digit of the frame selects the packet kind; only
//! [`TransportPacket::Message`] frames carry an embedded socket packet and
//! continue down the decoding pipeline.

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub enum TransportPacket {
    /// Session opening, carrying the handshake document.
    Open(Value),
    Close,
    /// Heartbeat, optionally carrying probe text.
    Ping(Option<String>),
    Pong(Option<String>),
    /// Embedded socket packet text, decoded by [`crate::socket`].
    Message(String),
    Upgrade,
    NoOp,
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("empty transport frame")]
    EmptyFrame,
    #[error("unknown transport frame type {0:?}")]
    UnknownFrameType(char),
    #[error("malformed open handshake: {0}")]
    BadHandshake(#[source] serde_json::Error),
}

/// Decodes one text frame into its transport packet.
pub fn decode(frame: &str) -> Result<TransportPacket, TransportError> {
    let mut chars = frame.chars();
    let kind = chars.next().ok_or(TransportError::EmptyFrame)?;
    let rest = chars.as_str();
    match kind {
        '0' => {
            let handshake = if rest.trim().is_empty() {
                Value::Null
            } else {
                serde_json::from_str(rest).map_err(TransportError::BadHandshake)?
            };
            Ok(TransportPacket::Open(handshake))
        }
        '1' => Ok(TransportPacket::Close),
        '2' => Ok(TransportPacket::Ping(non_empty(rest))),
        '3' => Ok(TransportPacket::Pong(non_empty(rest))),
        '4' => Ok(TransportPacket::Message(rest.to_owned())),
        '5' => Ok(TransportPacket::Upgrade),
        '6' => Ok(TransportPacket::NoOp),
        other => Err(TransportError::UnknownFrameType(other)),
    }
}

fn non_empty(text: &str) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text.to_owned())
    }
}

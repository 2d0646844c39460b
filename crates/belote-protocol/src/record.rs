//! Session-level decoding: one frame in, one outcome out.
//!
//! A [`SessionDecoder`] owns the correlation state for exactly one monitored
//! connection. Frames must be fed strictly in wire order; the direction and
//! timestamp of the source are forwarded unchanged onto the records.

use crate::decoder::{DecodeError, MessageDecoder};
use crate::messages::Message;
use crate::socket::{self, SocketError, SocketPacket};
use crate::transport::{self, TransportError, TransportPacket};
use core::fmt;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Sent,
    Received,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Sent => f.write_str("sent"),
            Direction::Received => f.write_str("received"),
        }
    }
}

/// One decoded application message with its source coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub direction: Direction,
    pub timestamp_ms: i64,
    pub namespace: String,
    pub message: Message,
}

/// What one frame decoded into.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameOutcome {
    /// Transport-level envelope without an application payload.
    Transport(TransportPacket),
    /// Socket-level connection management packet.
    Control(SocketPacket),
    /// An application message.
    Record(Record),
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Socket(#[from] SocketError),
    #[error(transparent)]
    Message(#[from] DecodeError),
}

/// Full-stack decoder for one monitored connection.
#[derive(Debug, Default)]
pub struct SessionDecoder {
    messages: MessageDecoder,
}

impl SessionDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn decode_frame(
        &mut self,
        direction: Direction,
        timestamp_ms: i64,
        frame: &str,
    ) -> Result<FrameOutcome, SessionError> {
        let packet = match transport::decode(frame)? {
            TransportPacket::Message(embedded) => socket::decode(&embedded)?,
            other => return Ok(FrameOutcome::Transport(other)),
        };
        let namespace = packet.namespace().to_owned();
        match self.messages.decode(&packet)? {
            Some(message) => Ok(FrameOutcome::Record(Record {
                direction,
                timestamp_ms,
                namespace,
                message,
            })),
            None => Ok(FrameOutcome::Control(packet)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Direction, FrameOutcome, SessionDecoder, SessionError};
    use crate::messages::Message;
    use crate::transport::TransportPacket;

    #[test]
    fn ping_frames_stay_at_the_transport_layer() {
        let mut decoder = SessionDecoder::new();
        let outcome = decoder.decode_frame(Direction::Received, 0, "2").unwrap();
        assert!(matches!(
            outcome,
            FrameOutcome::Transport(TransportPacket::Ping(None))
        ));
    }

    #[test]
    fn connect_packets_are_control_outcomes() {
        let mut decoder = SessionDecoder::new();
        let outcome = decoder
            .decode_frame(Direction::Received, 0, "40/game,")
            .unwrap();
        assert!(matches!(outcome, FrameOutcome::Control(_)));
    }

    #[test]
    fn event_frames_become_records_with_source_coordinates() {
        let mut decoder = SessionDecoder::new();
        let outcome = decoder
            .decode_frame(Direction::Received, 1234, "42/game,[\"connect.ok\"]")
            .unwrap();
        match outcome {
            FrameOutcome::Record(record) => {
                assert_eq!(record.direction, Direction::Received);
                assert_eq!(record.timestamp_ms, 1234);
                assert_eq!(record.namespace, "/game");
                assert_eq!(record.message, Message::ConnectOk);
            }
            other => panic!("expected record, got {other:?}"),
        }
    }

    #[test]
    fn correlation_spans_frames_within_one_session() {
        let mut decoder = SessionDecoder::new();
        decoder
            .decode_frame(Direction::Sent, 1, "42/room,5[\"rsrch\",{\"presetId\":\"p1\"}]")
            .unwrap();
        let outcome = decoder
            .decode_frame(
                Direction::Received,
                2,
                "43/room,5[{\"status\":\"ok\",\"data\":{\"avgAttempts\":1.0,\
                 \"avgSessionLifetime\":2.0,\"currentSize\":1,\"maxAttempts\":1,\
                 \"maxAttemptsMmr\":1,\"maxSessionLifetime\":10,\"totalMatches\":5}}]",
            )
            .unwrap();
        match outcome {
            FrameOutcome::Record(record) => {
                assert!(matches!(record.message, Message::RoomSearchResponse(_)));
            }
            other => panic!("expected record, got {other:?}"),
        }
    }

    #[test]
    fn transport_errors_propagate() {
        let mut decoder = SessionDecoder::new();
        let err = decoder
            .decode_frame(Direction::Received, 0, "9nope")
            .unwrap_err();
        assert!(matches!(err, SessionError::Transport(_)));
    }
}

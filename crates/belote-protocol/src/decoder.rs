//! Stateful event/ack decoder.
//!
//! One decoder instance per logical session: acknowledgement ids and command
//! ids are only unique within a single connection's namespaces, so the
//! pending-exchange table must never be shared. Entries are never evicted; a
//! reference to an id that was never registered is a hard decode error.

use crate::messages::{Message, game, general};
use crate::socket::SocketPacket;
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("malformed event payload: {0}")]
    MalformedEventShape(String),
    #[error("no pending command with id {id} in namespace {namespace}")]
    UnknownCommandReference { namespace: String, id: u64 },
    #[error("ack {ack_id} in namespace {namespace} does not match any pending event")]
    DanglingAck { namespace: String, ack_id: u64 },
    /// A command type reached the response path without a mapped response
    /// shape; the catalog itself is inconsistent.
    #[error("command {0} has no mapped response shape")]
    UnmappedCommandType(&'static str),
    /// An ack resolved to a stored message that is not a request.
    #[error("message {0} cannot be acknowledged")]
    UnmappedAckRequest(&'static str),
    #[error("payload does not match the catalogued shape: {0}")]
    BadPayload(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ExchangeKey {
    namespace: String,
    id: u64,
}

/// Decoder for the application layer, correlating two-phase exchanges.
#[derive(Debug, Default)]
pub struct MessageDecoder {
    pending: HashMap<ExchangeKey, Message>,
}

impl MessageDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes an event or ack packet; control packets yield `None`.
    pub fn decode(&mut self, packet: &SocketPacket) -> Result<Option<Message>, DecodeError> {
        match packet {
            SocketPacket::Event {
                namespace,
                ack_id,
                payload,
            } => self
                .decode_event(namespace, *ack_id, payload)
                .map(Some),
            SocketPacket::Ack {
                namespace,
                ack_id,
                payload,
            } => self.decode_ack(namespace, *ack_id, payload).map(Some),
            SocketPacket::Connect { .. }
            | SocketPacket::Disconnect { .. }
            | SocketPacket::ConnectError { .. } => Ok(None),
        }
    }

    /// Decodes an event payload into a catalogued message and registers any
    /// exchange it opens.
    pub fn decode_event(
        &mut self,
        namespace: &str,
        ack_id: Option<u64>,
        payload: &[Value],
    ) -> Result<Message, DecodeError> {
        let (tag, data) = split_event_payload(payload)?;
        let message = self.decode_tagged(namespace, tag, data)?;

        if let Some(id) = ack_id {
            debug!(namespace, id, "registering event awaiting ack");
            self.register(namespace, id, message.clone());
        }
        if let Some(cid) = message.command_id() {
            debug!(namespace, cid, "registering command awaiting response");
            self.register(namespace, cid, message.clone());
        }
        Ok(message)
    }

    /// Resolves an ack against the pending exchange it answers.
    pub fn decode_ack(
        &mut self,
        namespace: &str,
        ack_id: u64,
        payload: &[Value],
    ) -> Result<Message, DecodeError> {
        let request = self
            .lookup(namespace, ack_id)
            .ok_or_else(|| DecodeError::DanglingAck {
                namespace: namespace.to_owned(),
                ack_id,
            })?;
        let body = payload.first().cloned().unwrap_or(Value::Null);
        match request {
            Message::GetState => Ok(Message::GetStateResponse(serde_json::from_value(body)?)),
            Message::RoomSearch(_) => {
                Ok(Message::RoomSearchResponse(serde_json::from_value(body)?))
            }
            Message::RoomSearchCancel(_) => Ok(Message::RoomSearchCancelResponse(
                serde_json::from_value(body)?,
            )),
            other => Err(DecodeError::UnmappedAckRequest(variant_name(other))),
        }
    }

    fn decode_tagged(
        &mut self,
        namespace: &str,
        tag: &str,
        data: Value,
    ) -> Result<Message, DecodeError> {
        let message = match tag {
            "connect.ok" => Message::ConnectOk,
            "sscmd.touch" => Message::SessionTouch,
            "getst" => Message::GetState,
            // The event body is the bare chip amount.
            "chiching" => Message::ChipsDrop(general::ChipsDrop {
                amount: serde_json::from_value(data)?,
            }),
            "pactiveall" => match data {
                Value::Null => Message::ActiveUsersRequest,
                counters => Message::ActiveUsersUpdate(general::ActiveUsersUpdate {
                    active_users_by_game_type: serde_json::from_value(counters)?,
                }),
            },
            "rsrch" => Message::RoomSearch(serde_json::from_value(data)?),
            "rcancel" => Message::RoomSearchCancel(serde_json::from_value(data)?),
            "supd" => Message::SearchUpdate(serde_json::from_value(data)?),
            "rfound" => Message::RoomFound(serde_json::from_value(data)?),
            "rconn.ok" => Message::RoomConnectionOk(serde_json::from_value(data)?),
            "rupd" => Message::RoomUpdated(serde_json::from_value(data)?),
            "rdst" => Message::RoomDestroyed(serde_json::from_value(data)?),
            "rjoin" => Message::RoomJoin(serde_json::from_value(data)?),
            "rleav" => Message::RoomLeave(serde_json::from_value(data)?),
            "rrdy" => Message::RoomReady(serde_json::from_value(data)?),
            "rematch" => Message::Rematch(serde_json::from_value(data)?),
            "mygupd" => Message::TableUpdate(data),
            "chat.pub.msg" => Message::Chat(data),
            // The event body is the bare conversation id.
            "chat.pub.conv.del" => {
                Message::ChatConversationDeleted(general::ConversationDeleted {
                    id: serde_json::from_value(data)?,
                })
            }
            "notification" | "notification-v2" => Message::Notification(data),
            "premium.gift.notification" => Message::PremiumGift(data),
            "walletChipsUpdate" => Message::WalletUpdate(data),
            "cashbackBonusUpdate" => Message::CashbackUpdate(data),
            "bonusesUpdated" => Message::BonusesUpdated(data),
            "challengeProgressUpdatedEvent" => Message::ChallengeProgress(data),
            "xpUpdated" => Message::XpUpdate(data),
            "clmsg.in" | "clmsg.out" => Message::Reaction(serde_json::from_value(data)?),
            "gmsg.in" => {
                let envelope: game::ClientEnvelope = serde_json::from_value(data)?;
                Message::Game(game::decode_client(envelope)?)
            }
            "gmsg.out" => {
                let envelope: game::ServerEnvelope = serde_json::from_value(data)?;
                Message::Game(game::decode_server(envelope)?)
            }
            other => match other.parse::<u64>() {
                Ok(id) => self.command_response(namespace, id, data)?,
                Err(_) => Message::Unknown {
                    kind: other.to_owned(),
                    data,
                },
            },
        };
        Ok(message)
    }

    /// A numeric event tag refers back to a previously issued command; the
    /// command's own type selects the response shape.
    fn command_response(
        &mut self,
        namespace: &str,
        id: u64,
        data: Value,
    ) -> Result<Message, DecodeError> {
        let command = self
            .lookup(namespace, id)
            .ok_or_else(|| DecodeError::UnknownCommandReference {
                namespace: namespace.to_owned(),
                id,
            })?;
        match command {
            Message::RoomJoin(_) => Ok(Message::RoomJoinResponse(serde_json::from_value(data)?)),
            Message::RoomLeave(_) => Ok(Message::RoomLeaveResponse(serde_json::from_value(data)?)),
            Message::RoomReady(_) => Ok(Message::RoomReadyResponse(serde_json::from_value(data)?)),
            Message::Rematch(_) => Ok(Message::RematchResponse(serde_json::from_value(data)?)),
            other => Err(DecodeError::UnmappedCommandType(variant_name(other))),
        }
    }

    fn register(&mut self, namespace: &str, id: u64, message: Message) {
        self.pending.insert(
            ExchangeKey {
                namespace: namespace.to_owned(),
                id,
            },
            message,
        );
    }

    fn lookup(&self, namespace: &str, id: u64) -> Option<&Message> {
        self.pending.get(&ExchangeKey {
            namespace: namespace.to_owned(),
            id,
        })
    }
}

/// Relay tag pairs allowed to stretch the payload to 3 or 4 elements.
const RELAY_PAIRS: [(&str, &str); 2] = [
    ("clmsg.in", "clmsg.out"),
    ("notification", "notification-v2"),
];

/// Splits an event payload into its leading string tag and data element.
fn split_event_payload(payload: &[Value]) -> Result<(&str, Value), DecodeError> {
    let tag = payload
        .first()
        .and_then(Value::as_str)
        .ok_or_else(|| {
            DecodeError::MalformedEventShape(format!(
                "first element must be a string tag, got {:?}",
                payload.first()
            ))
        })?;
    let data = match payload.len() {
        1 => Value::Null,
        2 => payload[1].clone(),
        // Longer payloads repeat the tag through a relay pair; the data sits
        // right after it and a trailing fourth element carries no content.
        3 | 4 => {
            let second = payload[1].as_str().unwrap_or_default();
            if !RELAY_PAIRS.contains(&(tag, second)) {
                return Err(DecodeError::MalformedEventShape(format!(
                    "({tag:?}, {second:?}) is not a relay tag pair"
                )));
            }
            payload[2].clone()
        }
        len => {
            return Err(DecodeError::MalformedEventShape(format!(
                "expected 1 to 4 elements, got {len}"
            )));
        }
    };
    Ok((tag, data))
}

fn variant_name(message: &Message) -> &'static str {
    match message {
        Message::ConnectOk => "ConnectOk",
        Message::SessionTouch => "SessionTouch",
        Message::ChipsDrop(_) => "ChipsDrop",
        Message::GetState => "GetState",
        Message::GetStateResponse(_) => "GetStateResponse",
        Message::ActiveUsersRequest => "ActiveUsersRequest",
        Message::ActiveUsersUpdate(_) => "ActiveUsersUpdate",
        Message::RoomSearch(_) => "RoomSearch",
        Message::RoomSearchResponse(_) => "RoomSearchResponse",
        Message::RoomSearchCancel(_) => "RoomSearchCancel",
        Message::RoomSearchCancelResponse(_) => "RoomSearchCancelResponse",
        Message::SearchUpdate(_) => "SearchUpdate",
        Message::RoomFound(_) => "RoomFound",
        Message::RoomConnectionOk(_) => "RoomConnectionOk",
        Message::RoomUpdated(_) => "RoomUpdated",
        Message::RoomDestroyed(_) => "RoomDestroyed",
        Message::RoomJoin(_) => "RoomJoin",
        Message::RoomJoinResponse(_) => "RoomJoinResponse",
        Message::RoomLeave(_) => "RoomLeave",
        Message::RoomLeaveResponse(_) => "RoomLeaveResponse",
        Message::RoomReady(_) => "RoomReady",
        Message::RoomReadyResponse(_) => "RoomReadyResponse",
        Message::Rematch(_) => "Rematch",
        Message::RematchResponse(_) => "RematchResponse",
        Message::TableUpdate(_) => "TableUpdate",
        Message::Chat(_) => "Chat",
        Message::ChatConversationDeleted(_) => "ChatConversationDeleted",
        Message::Notification(_) => "Notification",
        Message::PremiumGift(_) => "PremiumGift",
        Message::WalletUpdate(_) => "WalletUpdate",
        Message::CashbackUpdate(_) => "CashbackUpdate",
        Message::BonusesUpdated(_) => "BonusesUpdated",
        Message::ChallengeProgress(_) => "ChallengeProgress",
        Message::XpUpdate(_) => "XpUpdate",
        Message::Reaction(_) => "Reaction",
        Message::Game(_) => "Game",
        Message::Unknown { .. } => "Unknown",
    }
}

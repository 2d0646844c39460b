//! Application message catalog.
//!
//! Every event tag the traffic is known to carry maps to one variant here.
//! Chat, notification and bonus bodies are deliberately kept as raw JSON:
//! they are recognized and routed but their vendor payloads are not part of
//! the reconstruction.

pub mod game;
pub mod general;
pub mod room;

use serde_json::Value;

pub use game::GameMessage;

#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    // Session-level exchanges.
    ConnectOk,
    SessionTouch,
    ChipsDrop(general::ChipsDrop),
    GetState,
    GetStateResponse(general::GetStateResponse),
    ActiveUsersRequest,
    ActiveUsersUpdate(general::ActiveUsersUpdate),

    // Matchmaking and room lifecycle.
    RoomSearch(room::RoomSearch),
    RoomSearchResponse(room::RoomSearchResponse),
    RoomSearchCancel(room::RoomSearchCancel),
    RoomSearchCancelResponse(room::RoomSearchCancelResponse),
    SearchUpdate(room::SearchUpdate),
    RoomFound(room::RoomSnapshot),
    RoomConnectionOk(room::RoomSnapshot),
    RoomUpdated(room::RoomUpdated),
    RoomDestroyed(room::RoomDestroyed),
    RoomJoin(room::RoomJoin),
    RoomJoinResponse(room::RoomJoinResponse),
    RoomLeave(room::RoomLeave),
    RoomLeaveResponse(room::CommandStatus<room::RoomLeave>),
    RoomReady(room::RoomReady),
    RoomReadyResponse(room::CommandStatus<room::RoomReady>),
    Rematch(room::Rematch),
    RematchResponse(room::CommandStatus<room::Rematch>),
    TableUpdate(Value),

    // Opaque pass-through families.
    Chat(Value),
    ChatConversationDeleted(general::ConversationDeleted),
    Notification(Value),
    PremiumGift(Value),
    WalletUpdate(Value),
    CashbackUpdate(Value),
    BonusesUpdated(Value),
    ChallengeProgress(Value),
    XpUpdate(Value),
    Reaction(general::Reaction),

    // Game traffic.
    Game(GameMessage),

    /// Tag not present in the catalog; ordinary data, never a failure.
    Unknown { kind: String, data: Value },
}

impl Message {
    /// Command id when this message opens a command exchange the server
    /// answers with a numeric-tagged event.
    pub fn command_id(&self) -> Option<u64> {
        match self {
            Message::RoomJoin(cmd) => Some(cmd.cid),
            Message::RoomLeave(cmd) => Some(cmd.cid),
            Message::RoomReady(cmd) => Some(cmd.cid),
            Message::Rematch(cmd) => Some(cmd.cid),
            _ => None,
        }
    }
}

//! Matchmaking and room lifecycle messages.
//!
//! Join/leave/ready/rematch are commands: they carry a client-chosen `cid`
//! that a later numeric-tagged event refers back to. The deep room/table
//! bodies stay raw JSON; the decoder only guarantees the envelope shape and
//! the correlation fields.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSearch {
    pub preset_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSearchCancel {
    pub preset_id: String,
}

/// Matchmaking pool statistics, sent standalone and inside search responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchUpdate {
    pub avg_attempts: f64,
    pub avg_session_lifetime: f64,
    pub current_size: u32,
    pub max_attempts: u32,
    pub max_attempts_mmr: u32,
    pub max_session_lifetime: u32,
    pub total_matches: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomSearchResponse {
    pub status: String,
    pub data: SearchUpdate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomSearchCancelResponse {
    pub status: String,
}

/// Full room snapshot, sent when a room is found or reconnected to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSnapshot {
    pub id: String,
    pub state: String,
    pub pool_id: String,
    pub created_at: i64,
    pub settings: Value,
    pub tables: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomUpdated {
    pub id: String,
    pub state: String,
    #[serde(default)]
    pub pool_id: Option<String>,
    pub tables: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomDestroyed {
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomJoin {
    pub cid: u64,
    pub table_id: String,
    pub seat_id: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomJoinResponse {
    pub cmd: RoomJoin,
    pub status: String,
    pub data: RoomJoinData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomJoinData {
    pub id: String,
    pub state: String,
    pub tables: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomLeave {
    pub cid: u64,
    pub current_client_table_state_name: String,
    pub current_client_room_state_name: String,
    #[serde(default)]
    pub only_leave_table: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomReady {
    pub cid: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rematch {
    pub cid: u64,
}

/// Response to a command that returns no body beyond the echoed command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandStatus<C> {
    pub cmd: C,
    pub status: String,
}

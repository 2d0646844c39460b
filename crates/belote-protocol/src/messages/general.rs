//! Session-level messages outside any game or room.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Chips dropped into the wallet; the event body is the bare amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChipsDrop {
    pub amount: i64,
}

/// Per-game-type active user counters; the event body is the bare map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveUsersUpdate {
    pub active_users_by_game_type: BTreeMap<String, u64>,
}

/// Response to the session state request; the body is vendor-shaped and
/// kept raw beyond the envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetStateResponse {
    pub status: String,
    pub data: Value,
}

/// Player emote/reaction relayed to table neighbours.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reaction {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
    pub payload: Value,
    pub user_id: String,
}

/// A deleted chat conversation; the event body is the bare conversation id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationDeleted {
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::{ActiveUsersUpdate, Reaction};
    use serde_json::json;

    #[test]
    fn reaction_renames_type_field() {
        let reaction: Reaction = serde_json::from_value(json!({
            "type": "emoji",
            "id": "r1",
            "payload": {"emoji": "wave"},
            "userId": "u1",
        }))
        .unwrap();
        assert_eq!(reaction.kind, "emoji");
        assert_eq!(reaction.user_id, "u1");
    }

    #[test]
    fn active_users_map_is_ordered() {
        let update = ActiveUsersUpdate {
            active_users_by_game_type: [("belote".to_owned(), 10), ("contree".to_owned(), 4)]
                .into_iter()
                .collect(),
        };
        let keys: Vec<_> = update.active_users_by_game_type.keys().collect();
        assert_eq!(keys, ["belote", "contree"]);
    }
}

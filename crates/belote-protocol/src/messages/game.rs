//! Game-namespace sub-catalog.
//!
//! Game traffic rides an inner envelope inside the `gmsg.in`/`gmsg.out`
//! events: client-to-server bodies are `{type, data}`, server-to-client
//! bodies add a sequence number as `{msgId, type, data}`. The small integer
//! `type` selects the variant; unrecognized integers become the non-failing
//! [`GameMessage::Unknown`].

use crate::cards::{Card, Suit};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// `announceType` value reserved for passing instead of bidding.
pub const PASS_BID: u16 = 1000;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ClientEnvelope {
    #[serde(rename = "type")]
    pub kind: u16,
    pub data: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerEnvelope {
    pub msg_id: u64,
    #[serde(rename = "type")]
    pub kind: u16,
    pub data: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GameMessage {
    Started(GameStarted),
    NewRound(NewRound),
    CardPlayed(CardPlayed),
    PlayOptions(PlayOptions),
    PlayerBid(PlayerBid),
    BidOptions(BidOptions),
    CardsDealt(CardsDealt),
    TopCardShown(TopCardShown),
    AvailableDeclarations(AvailableDeclarations),
    EndOfTrick(EndOfTrick),
    EndOfRound(EndOfRound),
    PlayerDeclared(PlayerDeclared),
    SelfDeclared(SelfDeclared),
    ComeBack(ComeBack),
    PlayerNotice(PlayerNotice),
    Resume(ResumeGame),
    PlayCardAction(PlayCardAction),
    BidAction(BidAction),
    Unknown(UnknownGame),
}

/// Decodes a client-to-server game body.
pub fn decode_client(envelope: ClientEnvelope) -> Result<GameMessage, serde_json::Error> {
    let data = Value::Object(envelope.data);
    Ok(match envelope.kind {
        0 => GameMessage::PlayCardAction(serde_json::from_value(data)?),
        1 | 4 => GameMessage::BidAction(serde_json::from_value(data)?),
        2 => GameMessage::SelfDeclared(serde_json::from_value(data)?),
        kind => GameMessage::Unknown(UnknownGame {
            kind,
            msg_id: None,
            data,
        }),
    })
}

/// Decodes a server-to-client game body.
pub fn decode_server(envelope: ServerEnvelope) -> Result<GameMessage, serde_json::Error> {
    let data = Value::Object(envelope.data);
    Ok(match envelope.kind {
        0 => GameMessage::Started(serde_json::from_value(data)?),
        1 => GameMessage::NewRound(serde_json::from_value(data)?),
        2 => GameMessage::CardPlayed(serde_json::from_value(data)?),
        3 => GameMessage::PlayOptions(serde_json::from_value(data)?),
        4 | 6 => GameMessage::PlayerBid(serde_json::from_value(data)?),
        5 | 7 => GameMessage::BidOptions(serde_json::from_value(data)?),
        8 => GameMessage::CardsDealt(serde_json::from_value(data)?),
        9 => GameMessage::TopCardShown(serde_json::from_value(data)?),
        10 => GameMessage::AvailableDeclarations(serde_json::from_value(data)?),
        11 => GameMessage::EndOfTrick(serde_json::from_value(data)?),
        12 => GameMessage::EndOfRound(serde_json::from_value(data)?),
        14 => GameMessage::PlayerDeclared(serde_json::from_value(data)?),
        15 => GameMessage::ComeBack(serde_json::from_value(data)?),
        16 | 18 | 19 => {
            let body: PlayerRef = serde_json::from_value(data)?;
            GameMessage::PlayerNotice(PlayerNotice {
                kind: envelope.kind,
                player_id: body.player_id,
            })
        }
        17 => GameMessage::Resume(serde_json::from_value(data)?),
        kind => GameMessage::Unknown(UnknownGame {
            kind,
            msg_id: Some(envelope.msg_id),
            data,
        }),
    })
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlayerRef {
    player_id: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnknownGame {
    pub kind: u16,
    pub msg_id: Option<u64>,
    pub data: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStarted {
    pub start_player_id: String,
    pub player_positions: std::collections::BTreeMap<String, u32>,
    pub player_teams: std::collections::BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRound {
    pub start_player_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardsDealt {
    pub announce_player_id: Option<String>,
    pub cards: Vec<Card>,
}

/// Classic-variant only: the face-up card offered before bidding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopCardShown {
    pub card: Card,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BidOptions {
    pub player_id_to_announce: String,
    #[serde(default)]
    pub min_points: Option<u32>,
    pub available_announce_types: Option<Vec<u16>>,
    pub available_announce_variation_types: Option<Vec<u16>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BidAction {
    #[serde(default)]
    pub points: Option<u32>,
    pub announce_type: u16,
    pub announce_variation_type: Option<u16>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerBid {
    pub player_id: String,
    #[serde(default)]
    pub points: Option<u32>,
    /// Suit code, or [`PASS_BID`].
    pub announce_type: u16,
    pub announce_variation_type: Option<u16>,
}

impl PlayerBid {
    pub fn is_pass(&self) -> bool {
        self.announce_type == PASS_BID
    }

    /// The bid suit, when this is not a pass and the code maps to a suit.
    pub fn suit(&self) -> Option<Suit> {
        u8::try_from(self.announce_type)
            .ok()
            .and_then(Suit::from_wire_code)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayOptions {
    pub player_id: String,
    pub playable_cards: Option<Vec<Card>>,
    pub is_last_card: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardPlayed {
    pub player_id: String,
    pub card: Card,
    pub trick_index: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayCardAction {
    pub card: Card,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndOfTrick {
    /// The trick still on the table when the event fires.
    pub table: WireTrick,
    pub trick_index: u64,
    pub current_scores_by_team: ScoresByTeam,
    pub trick: WireTrick,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireTrick {
    pub cards: Vec<Card>,
    #[serde(default)]
    pub major_card: Option<Card>,
    #[serde(default)]
    pub major_card_owner: Option<WirePlayer>,
    #[serde(default)]
    pub prime_card: Option<Card>,
    #[serde(default)]
    pub prime_card_owner: Option<WirePlayer>,
    #[serde(default)]
    pub player_options: Option<WirePlayer>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WirePlayer {
    pub id: String,
    pub team_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoresByTeam {
    pub team1: i64,
    pub team2: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndOfRound {
    pub score_data: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComeBack {
    pub player_id: String,
    #[serde(rename = "comebackRemainingMS", default)]
    pub comeback_remaining_ms: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Declaration {
    /// For instance `"BELOTE:CLUBS"`.
    pub id: String,
    pub type_enum: u16,
    #[serde(default)]
    pub rank_enum: Option<u16>,
    pub suit_enum: u16,
    #[serde(default)]
    pub length: Option<u32>,
    pub valid: bool,
    pub score: u32,
    pub group_id: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableDeclarations {
    pub player_id: String,
    pub available_declarations: Vec<Declaration>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerDeclared {
    pub player_id: String,
    pub declarations: Vec<Declaration>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelfDeclared {
    pub declarations: Vec<Declaration>,
}

/// Server message carrying just a player id; types 16/18/19 whose exact
/// purpose is not modelled.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerNotice {
    pub kind: u16,
    pub player_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeGame {
    pub game_save_data: GameSave,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSave {
    pub game_view_model: GameView,
    pub current_player_id: String,
    pub start_player_id: String,
    pub my_player_id: String,
    pub player_positions: std::collections::BTreeMap<String, u32>,
    pub player_teams: std::collections::BTreeMap<String, String>,
    pub scores_by_team: ScoresByTeam,
    /// Phase the game was saved from, e.g. `"Announce"` or `"CardPlay"`.
    pub from_state_name: String,
    #[serde(default)]
    pub last_playable_cards: Option<Vec<Card>>,
    #[serde(default)]
    pub elapsed_time: i64,
    #[serde(default)]
    pub replaced_users: std::collections::BTreeMap<String, bool>,
    #[serde(rename = "comebackRemainingMS", default)]
    pub comeback_remaining_ms: Option<i64>,
    #[serde(rename = "winnerTeamID", default)]
    pub winner_team_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameView {
    pub players: Vec<SeatedPlayer>,
    pub table: WireTrick,
    pub announce: AnnounceState,
    pub current_player_index: i64,
    pub start_player_id: String,
    #[serde(default)]
    pub shown_card: Option<Card>,
    pub current_scores_by_team: ScoresByTeam,
    #[serde(default)]
    pub last_table: Option<WireTrick>,
    #[serde(default)]
    pub last_trick: Option<WireTrick>,
}

/// A seated player in a snapshot; opponents' cards are present as `null`
/// placeholders, only the observer's own cards are visible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatedPlayer {
    pub id: String,
    pub team_id: String,
    pub cards: Vec<Option<Card>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnounceState {
    #[serde(default)]
    pub pass_ann_counter: u32,
    #[serde(default)]
    pub top_announcer_player: Option<WirePlayer>,
    pub announce_data: AnnounceData,
    #[serde(default)]
    pub has_contract: bool,
    #[serde(default)]
    pub player_announces: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnounceData {
    /// Suit code, or [`PASS_BID`] when no contract stands.
    pub announce_type: u16,
    #[serde(default)]
    pub announce_variation_type: Option<u16>,
    #[serde(default)]
    pub points: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::{
        ClientEnvelope, GameMessage, PASS_BID, PlayerBid, ServerEnvelope, decode_client,
        decode_server,
    };
    use crate::cards::{Rank, Suit};
    use serde_json::json;

    fn server(kind: u16, data: serde_json::Value) -> ServerEnvelope {
        serde_json::from_value(json!({"msgId": 1, "type": kind, "data": data})).unwrap()
    }

    #[test]
    fn server_type_two_is_card_played() {
        let envelope = server(
            2,
            json!({
                "playerId": "p1",
                "card": {"rankEnum": 106, "suitEnum": 104},
                "trickIndex": 3,
            }),
        );
        match decode_server(envelope).unwrap() {
            GameMessage::CardPlayed(played) => {
                assert_eq!(played.player_id, "p1");
                assert_eq!(played.card.rank, Rank::Jack);
                assert_eq!(played.card.suit, Suit::Hearts);
                assert_eq!(played.trick_index, 3);
            }
            other => panic!("expected card played, got {other:?}"),
        }
    }

    #[test]
    fn client_types_one_and_four_are_bids() {
        for kind in [1, 4] {
            let envelope: ClientEnvelope = serde_json::from_value(json!({
                "type": kind,
                "data": {"points": 90, "announceType": 104, "announceVariationType": null},
            }))
            .unwrap();
            assert!(matches!(
                decode_client(envelope).unwrap(),
                GameMessage::BidAction(_)
            ));
        }
    }

    #[test]
    fn unrecognized_server_type_is_a_value_not_an_error() {
        let envelope = server(42, json!({"anything": true}));
        match decode_server(envelope).unwrap() {
            GameMessage::Unknown(unknown) => {
                assert_eq!(unknown.kind, 42);
                assert_eq!(unknown.msg_id, Some(1));
            }
            other => panic!("expected unknown, got {other:?}"),
        }
    }

    #[test]
    fn notice_types_collapse_to_player_notice() {
        for kind in [16, 18, 19] {
            let envelope = server(kind, json!({"playerId": "p2"}));
            match decode_server(envelope).unwrap() {
                GameMessage::PlayerNotice(notice) => {
                    assert_eq!(notice.kind, kind);
                    assert_eq!(notice.player_id, "p2");
                }
                other => panic!("expected notice, got {other:?}"),
            }
        }
    }

    #[test]
    fn pass_bid_has_no_suit() {
        let bid = PlayerBid {
            player_id: "p1".to_owned(),
            points: None,
            announce_type: PASS_BID,
            announce_variation_type: None,
        };
        assert!(bid.is_pass());
        assert_eq!(bid.suit(), None);

        let real = PlayerBid {
            announce_type: 115,
            ..bid
        };
        assert!(!real.is_pass());
        assert_eq!(real.suit(), Some(Suit::Spades));
    }
}

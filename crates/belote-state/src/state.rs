//! Reconstructed table state, one value per observed moment.

use crate::model::player::Player;
use crate::model::trick::Trick;
use belote_protocol::cards::Suit;
use core::fmt;
use std::collections::BTreeMap;

/// The standing contract: point target and trump suit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bid {
    pub points: Option<u32>,
    pub suit: Suit,
}

pub type Players = BTreeMap<String, Player>;

#[derive(Debug, Clone, PartialEq)]
pub enum GameState {
    /// No game observed yet on this session.
    Initial { self_player_id: String },
    /// Players are known, nobody has bid.
    BeforeBid {
        self_player_id: String,
        players: Players,
        start_player_id: String,
    },
    /// A contract stands, play has not started.
    WithBid {
        self_player_id: String,
        players: Players,
        bid: Bid,
    },
    /// Cards are hitting the table.
    Playing {
        self_player_id: String,
        players: Players,
        trump: Suit,
        past_tricks: Vec<Trick>,
        current_trick: Trick,
    },
}

impl GameState {
    pub fn new(self_player_id: impl Into<String>) -> Self {
        GameState::Initial {
            self_player_id: self_player_id.into(),
        }
    }

    pub fn self_player_id(&self) -> &str {
        match self {
            GameState::Initial { self_player_id }
            | GameState::BeforeBid { self_player_id, .. }
            | GameState::WithBid { self_player_id, .. }
            | GameState::Playing { self_player_id, .. } => self_player_id,
        }
    }

    pub fn players(&self) -> Option<&Players> {
        match self {
            GameState::Initial { .. } => None,
            GameState::BeforeBid { players, .. }
            | GameState::WithBid { players, .. }
            | GameState::Playing { players, .. } => Some(players),
        }
    }

    /// Short phase label used in errors and logs.
    pub const fn phase(&self) -> &'static str {
        match self {
            GameState::Initial { .. } => "Initial",
            GameState::BeforeBid { .. } => "BeforeBid",
            GameState::WithBid { .. } => "WithBid",
            GameState::Playing { .. } => "Playing",
        }
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameState::Initial { .. } => f.write_str("not started"),
            GameState::BeforeBid { players, .. } => {
                write!(f, "waiting for bids, players: ")?;
                list(f, players.keys())
            }
            GameState::WithBid { bid, .. } => match bid.points {
                Some(points) => write!(f, "bidding, current bid: {points} {}", bid.suit),
                None => write!(f, "bidding, current bid: {}", bid.suit),
            },
            GameState::Playing {
                players,
                current_trick,
                past_tricks,
                trump,
                ..
            } => {
                write!(f, "table ({trump} trump): ")?;
                list(f, current_trick.cards().iter())?;
                for player in players.values() {
                    write!(f, "\nplayer {}: ", player.id)?;
                    list(f, player.hand.certain().iter())?;
                    write!(f, ", maybe ")?;
                    list(f, player.hand.candidates().iter())?;
                }
                write!(f, "\npast tricks: {}", past_tricks.len())
            }
        }
    }
}

fn list<T: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    items: impl Iterator<Item = T>,
) -> fmt::Result {
    f.write_str("[")?;
    for (index, item) in items.enumerate() {
        if index > 0 {
            f.write_str(" ")?;
        }
        write!(f, "{item}")?;
    }
    f.write_str("]")
}

#[cfg(test)]
mod tests {
    use super::GameState;

    #[test]
    fn initial_state_has_no_players() {
        let state = GameState::new("me");
        assert_eq!(state.self_player_id(), "me");
        assert!(state.players().is_none());
        assert_eq!(state.phase(), "Initial");
        assert_eq!(state.to_string(), "not started");
    }
}

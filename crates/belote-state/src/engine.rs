//! The pure reducer deriving hidden hands from observed play.
//!
//! `next` maps (state, message) to the following state without mutating its
//! input. Messages that carry no information for hand reconstruction are
//! enumerated explicitly so that a new catalog variant fails to compile here
//! instead of being silently ignored.

use crate::model::hand::HandError;
use crate::model::player::Player;
use crate::model::trick::{PlayedCard, Trick};
use crate::state::{Bid, GameState, Players};
use belote_protocol::cards::{Card, Suit};
use belote_protocol::messages::game::{
    CardPlayed, CardsDealt, GameMessage, GameStarted, PASS_BID, ResumeGame, WirePlayer, WireTrick,
};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("message {message} is not legal in the {state} phase")]
    IllegalStateTransition {
        state: &'static str,
        message: &'static str,
    },
    #[error("player {player_id} played {card}, which their hand could not contain")]
    PlayedCardUntracked { player_id: String, card: Card },
    #[error("card {card} is certain for player {player_id} but must now be ruled out")]
    CertainCardConflict { player_id: String, card: Card },
    #[error("card {card} is certain for both {first} and {second}")]
    ConflictingCertainty {
        card: Card,
        first: String,
        second: String,
    },
    #[error("message references unknown player {0}")]
    UnknownPlayer(String),
    #[error("no team assignment for player {0}")]
    MissingTeam(String),
    #[error("announce code {0} does not map to a suit")]
    UnknownSuitCode(u16),
    #[error("trick carries cards but no owned major card")]
    InconsistentTrick,
    #[error("resume snapshot is in the play phase but carries no standing bid")]
    MissingResumeBid,
    #[error("resume snapshot carries unknown phase {0:?}")]
    UnknownResumePhase(String),
}

/// Computes the state after one message.
pub fn next(state: &GameState, message: &GameMessage) -> Result<GameState, StateError> {
    match message {
        GameMessage::Started(started) => match state {
            GameState::Initial { self_player_id } => {
                started_state(started, self_player_id.clone())
            }
            other => Err(illegal(other, message)),
        },
        GameMessage::Resume(resume) => resumed_state(resume, state.self_player_id().to_owned()),
        GameMessage::CardsDealt(dealt) => match state {
            GameState::BeforeBid {
                self_player_id,
                players,
                start_player_id,
            } => Ok(GameState::BeforeBid {
                self_player_id: self_player_id.clone(),
                players: with_self_cards(players, self_player_id, dealt)?,
                start_player_id: start_player_id.clone(),
            }),
            GameState::WithBid {
                self_player_id,
                players,
                bid,
            } => Ok(GameState::WithBid {
                self_player_id: self_player_id.clone(),
                players: with_self_cards(players, self_player_id, dealt)?,
                bid: *bid,
            }),
            other => Err(illegal(other, message)),
        },
        GameMessage::PlayerBid(bid) => match state {
            GameState::BeforeBid {
                self_player_id,
                players,
                ..
            }
            | GameState::WithBid {
                self_player_id,
                players,
                ..
            } => {
                if bid.is_pass() {
                    return Ok(state.clone());
                }
                Ok(GameState::WithBid {
                    self_player_id: self_player_id.clone(),
                    players: players.clone(),
                    bid: Bid {
                        points: bid.points,
                        suit: suit_from_code(bid.announce_type)?,
                    },
                })
            }
            other => Err(illegal(other, message)),
        },
        GameMessage::CardPlayed(play) => match state {
            // The first card after bidding opens the play phase.
            GameState::WithBid {
                self_player_id,
                players,
                bid,
            } => update_with_play(self_player_id, players, bid.suit, &[], &Trick::empty(), play),
            GameState::Playing {
                self_player_id,
                players,
                trump,
                past_tricks,
                current_trick,
            } => update_with_play(
                self_player_id,
                players,
                *trump,
                past_tricks,
                current_trick,
                play,
            ),
            other => Err(illegal(other, message)),
        },
        GameMessage::EndOfTrick(_) => match state {
            GameState::Playing {
                self_player_id,
                players,
                trump,
                past_tricks,
                current_trick,
            } => {
                let mut past_tricks = past_tricks.clone();
                past_tricks.push(current_trick.clone());
                Ok(GameState::Playing {
                    self_player_id: self_player_id.clone(),
                    players: players.clone(),
                    trump: *trump,
                    past_tricks,
                    current_trick: Trick::empty(),
                })
            }
            other => Err(illegal(other, message)),
        },
        GameMessage::NewRound(round) => match state {
            GameState::BeforeBid {
                self_player_id,
                players,
                ..
            }
            | GameState::WithBid {
                self_player_id,
                players,
                ..
            }
            | GameState::Playing {
                self_player_id,
                players,
                ..
            } => Ok(GameState::BeforeBid {
                self_player_id: self_player_id.clone(),
                players: players
                    .values()
                    .map(|p| (p.id.clone(), Player::new(p.id.clone(), p.team.clone())))
                    .collect(),
                start_player_id: round.start_player_id.clone(),
            }),
            other => Err(illegal(other, message)),
        },

        // No hand information in any of these.
        GameMessage::PlayOptions(_)
        | GameMessage::BidOptions(_)
        | GameMessage::TopCardShown(_)
        | GameMessage::AvailableDeclarations(_)
        | GameMessage::EndOfRound(_)
        | GameMessage::PlayerDeclared(_)
        | GameMessage::SelfDeclared(_)
        | GameMessage::ComeBack(_)
        | GameMessage::PlayerNotice(_)
        | GameMessage::PlayCardAction(_)
        | GameMessage::BidAction(_)
        | GameMessage::Unknown(_) => Ok(state.clone()),
    }
}

fn started_state(started: &GameStarted, self_player_id: String) -> Result<GameState, StateError> {
    let mut players = Players::new();
    for id in started.player_positions.keys() {
        let team = started
            .player_teams
            .get(id)
            .ok_or_else(|| StateError::MissingTeam(id.clone()))?;
        players.insert(id.clone(), Player::new(id.clone(), team.clone()));
    }
    Ok(GameState::BeforeBid {
        self_player_id,
        players,
        start_player_id: started.start_player_id.clone(),
    })
}

/// The observer's own cards are the only directly visible ones: they become
/// certain for the observer and impossible for everyone else.
fn with_self_cards(
    players: &Players,
    self_player_id: &str,
    dealt: &CardsDealt,
) -> Result<Players, StateError> {
    let mut players = players.clone();
    for (id, player) in players.iter_mut() {
        if id == self_player_id {
            player.hand.promote_certain(dealt.cards.iter().copied());
        } else {
            for &card in &dealt.cards {
                player
                    .hand
                    .retract_candidate(card)
                    .map_err(|e| hand_error(id, e))?;
            }
        }
    }
    close_over(&mut players)?;
    Ok(players)
}

fn update_with_play(
    self_player_id: &str,
    players: &Players,
    trump: Suit,
    past_tricks: &[Trick],
    current_trick: &Trick,
    play: &CardPlayed,
) -> Result<GameState, StateError> {
    let team = players
        .get(&play.player_id)
        .ok_or_else(|| StateError::UnknownPlayer(play.player_id.clone()))?
        .team
        .clone();

    let mut players = players.clone();
    for (id, player) in players.iter_mut() {
        if *id == play.player_id {
            apply_own_play(player, play.card, current_trick, trump)?;
        } else {
            player
                .hand
                .retract_candidate(play.card)
                .map_err(|e| hand_error(id, e))?;
        }
    }
    close_over(&mut players)?;

    let landed = PlayedCard {
        card: play.card,
        player_id: play.player_id.clone(),
        team,
    };
    Ok(GameState::Playing {
        self_player_id: self_player_id.to_owned(),
        players,
        trump,
        past_tricks: past_tricks.to_vec(),
        current_trick: current_trick.with_card(landed, trump),
    })
}

/// Eliminations deducible from how the player answered the trick so far.
fn apply_own_play(
    player: &mut Player,
    card: Card,
    trick: &Trick,
    trump: Suit,
) -> Result<(), StateError> {
    let id = player.id.clone();
    player
        .hand
        .remove_played(card)
        .map_err(|e| hand_error(&id, e))?;

    // Leading the trick reveals nothing beyond the card itself.
    let Some(lead) = trick.lead_suit() else {
        return Ok(());
    };
    if card.suit == lead {
        return Ok(());
    }

    let winning = trick.winning().ok_or(StateError::InconsistentTrick)?;
    if team_holds_trick(winning, &player.team) {
        return Ok(());
    }

    // Not following the led suit while behind proves the suit is gone.
    player
        .hand
        .retract_candidates_if(|c| c.suit == lead)
        .map_err(|e| hand_error(&id, e))?;

    if card.suit == trump {
        if let Some(prime) = trick.prime() {
            if card.trump_strength() < prime.card.trump_strength() {
                // Failing to overtrump rules out every stronger trump.
                let floor = card.trump_strength();
                player
                    .hand
                    .retract_candidates_if(|c| c.suit == trump && c.trump_strength() >= floor)
                    .map_err(|e| hand_error(&id, e))?;
            }
        }
    } else {
        // Discarding off-trump while behind: a trump would have been played.
        player
            .hand
            .retract_candidates_if(|c| c.suit == trump)
            .map_err(|e| hand_error(&id, e))?;
    }
    Ok(())
}

/// Whether the player's own side currently holds the trick.
///
/// Provisional rule, inferred from recorded sessions rather than documented
/// play requirements; kept in one place so it can be swapped out.
fn team_holds_trick(winning: &PlayedCard, team: &str) -> bool {
    winning.team == team
}

/// Propagates certainty across all hands until nothing changes.
///
/// A card only one player can still hold becomes certain for that player; a
/// card certain for one player disappears from every other candidate set.
/// Running it again on the result is a no-op.
fn close_over(players: &mut Players) -> Result<(), StateError> {
    loop {
        let mut changed = false;

        let mut certain_owner: BTreeMap<Card, String> = BTreeMap::new();
        for (id, player) in players.iter() {
            for &card in player.hand.certain() {
                if let Some(first) = certain_owner.insert(card, id.clone()) {
                    return Err(StateError::ConflictingCertainty {
                        card,
                        first,
                        second: id.clone(),
                    });
                }
            }
        }

        for (id, player) in players.iter_mut() {
            let owned_elsewhere: Vec<Card> = player
                .hand
                .candidates()
                .iter()
                .copied()
                .filter(|card| certain_owner.get(card).is_some_and(|owner| owner != id))
                .collect();
            for card in owned_elsewhere {
                player
                    .hand
                    .retract_candidate(card)
                    .map_err(|e| hand_error(id, e))?;
                changed = true;
            }
        }

        let mut holders: BTreeMap<Card, Vec<String>> = BTreeMap::new();
        for (id, player) in players.iter() {
            for &card in player.hand.candidates() {
                holders.entry(card).or_default().push(id.clone());
            }
        }
        for (card, ids) in holders {
            if ids.len() == 1 && !certain_owner.contains_key(&card) {
                if let Some(player) = players.get_mut(&ids[0]) {
                    player.hand.promote_certain([card]);
                    changed = true;
                }
            }
        }

        if !changed {
            return Ok(());
        }
    }
}

fn resumed_state(resume: &ResumeGame, self_player_id: String) -> Result<GameState, StateError> {
    let save = &resume.game_save_data;
    let view = &save.game_view_model;

    let mut players = Players::new();
    for seated in &view.players {
        let mut player = Player::new(seated.id.clone(), seated.team_id.clone());
        player
            .hand
            .promote_certain(seated.cards.iter().flatten().copied());
        players.insert(seated.id.clone(), player);
    }

    // Cards already on the table (or in the archived trick) are in nobody's
    // hand anymore.
    let mut table_cards: Vec<Card> = view.table.cards.to_vec();
    if let Some(last) = &view.last_trick {
        table_cards.extend(last.cards.iter().copied());
    }
    for (id, player) in players.iter_mut() {
        for &card in &table_cards {
            player
                .hand
                .retract_candidate(card)
                .map_err(|e| hand_error(id, e))?;
        }
    }
    close_over(&mut players)?;

    let announce = &view.announce.announce_data;
    let bid = if announce.announce_type == PASS_BID {
        None
    } else {
        Some(Bid {
            points: announce.points,
            suit: suit_from_code(announce.announce_type)?,
        })
    };

    match save.from_state_name.as_str() {
        "Announce" => Ok(match bid {
            None => GameState::BeforeBid {
                self_player_id,
                players,
                start_player_id: save.start_player_id.clone(),
            },
            Some(bid) => GameState::WithBid {
                self_player_id,
                players,
                bid,
            },
        }),
        "CardPlay" => {
            let bid = bid.ok_or(StateError::MissingResumeBid)?;
            let current_trick = trick_from_wire(&view.table)?;
            let past_tricks = match &view.last_trick {
                Some(last) => vec![trick_from_wire(last)?],
                None => Vec::new(),
            };
            Ok(GameState::Playing {
                self_player_id,
                players,
                trump: bid.suit,
                past_tricks,
                current_trick,
            })
        }
        other => Err(StateError::UnknownResumePhase(other.to_owned())),
    }
}

fn trick_from_wire(wire: &WireTrick) -> Result<Trick, StateError> {
    let major = owned_play(wire.major_card, &wire.major_card_owner)?;
    let prime = owned_play(wire.prime_card, &wire.prime_card_owner)?;
    Ok(Trick::from_parts(wire.cards.clone(), major, prime))
}

fn owned_play(
    card: Option<Card>,
    owner: &Option<WirePlayer>,
) -> Result<Option<PlayedCard>, StateError> {
    match (card, owner) {
        (Some(card), Some(owner)) => Ok(Some(PlayedCard {
            card,
            player_id: owner.id.clone(),
            team: owner.team_id.clone(),
        })),
        (None, _) => Ok(None),
        (Some(_), None) => Err(StateError::InconsistentTrick),
    }
}

fn suit_from_code(code: u16) -> Result<Suit, StateError> {
    u8::try_from(code)
        .ok()
        .and_then(Suit::from_wire_code)
        .ok_or(StateError::UnknownSuitCode(code))
}

fn hand_error(player_id: &str, error: HandError) -> StateError {
    match error {
        HandError::PlayedCardUntracked(card) => StateError::PlayedCardUntracked {
            player_id: player_id.to_owned(),
            card,
        },
        HandError::CertainCardConflict(card) => StateError::CertainCardConflict {
            player_id: player_id.to_owned(),
            card,
        },
    }
}

fn illegal(state: &GameState, message: &GameMessage) -> StateError {
    StateError::IllegalStateTransition {
        state: state.phase(),
        message: message_name(message),
    }
}

fn message_name(message: &GameMessage) -> &'static str {
    match message {
        GameMessage::Started(_) => "GameStarted",
        GameMessage::NewRound(_) => "NewRound",
        GameMessage::CardPlayed(_) => "CardPlayed",
        GameMessage::PlayOptions(_) => "PlayOptions",
        GameMessage::PlayerBid(_) => "PlayerBid",
        GameMessage::BidOptions(_) => "BidOptions",
        GameMessage::CardsDealt(_) => "CardsDealt",
        GameMessage::TopCardShown(_) => "TopCardShown",
        GameMessage::AvailableDeclarations(_) => "AvailableDeclarations",
        GameMessage::EndOfTrick(_) => "EndOfTrick",
        GameMessage::EndOfRound(_) => "EndOfRound",
        GameMessage::PlayerDeclared(_) => "PlayerDeclared",
        GameMessage::SelfDeclared(_) => "SelfDeclared",
        GameMessage::ComeBack(_) => "ComeBack",
        GameMessage::PlayerNotice(_) => "PlayerNotice",
        GameMessage::Resume(_) => "ResumeGame",
        GameMessage::PlayCardAction(_) => "PlayCardAction",
        GameMessage::BidAction(_) => "BidAction",
        GameMessage::Unknown(_) => "UnknownGameMessage",
    }
}

//! End-to-end: raw WebSocket frames through the protocol stack into states.

use belote_protocol::cards::Suit;
use belote_protocol::messages::{GameMessage, Message};
use belote_protocol::record::{Direction, FrameOutcome, SessionDecoder};
use belote_state::state::GameState;
use belote_state::stream::states;

const FRAMES: &[&str] = &[
    "0{\"sid\":\"s1\",\"pingInterval\":25000}",
    "40/game,",
    "42/game,[\"connect.ok\"]",
    // Game start: four seats, two teams.
    "42/game,[\"gmsg.out\",{\"msgId\":1,\"type\":0,\"data\":{\
     \"startPlayerId\":\"p1\",\
     \"playerPositions\":{\"p1\":0,\"p2\":1,\"p3\":2,\"p4\":3},\
     \"playerTeams\":{\"p1\":\"t1\",\"p2\":\"t2\",\"p3\":\"t1\",\"p4\":\"t2\"}}}]",
    // The observer is dealt all eight clubs.
    "42/game,[\"gmsg.out\",{\"msgId\":2,\"type\":8,\"data\":{\
     \"announcePlayerId\":\"p1\",\
     \"cards\":[\
     {\"rankEnum\":55,\"suitEnum\":99},{\"rankEnum\":56,\"suitEnum\":99},\
     {\"rankEnum\":57,\"suitEnum\":99},{\"rankEnum\":106,\"suitEnum\":99},\
     {\"rankEnum\":113,\"suitEnum\":99},{\"rankEnum\":107,\"suitEnum\":99},\
     {\"rankEnum\":116,\"suitEnum\":99},{\"rankEnum\":97,\"suitEnum\":99}]}}]",
    // p2 takes the contract at 80 spades.
    "42/game,[\"gmsg.out\",{\"msgId\":3,\"type\":4,\"data\":{\
     \"playerId\":\"p2\",\"points\":80,\"announceType\":115,\
     \"announceVariationType\":null}}]",
    // p2 leads the ace of hearts.
    "42/game,[\"gmsg.out\",{\"msgId\":4,\"type\":2,\"data\":{\
     \"playerId\":\"p2\",\"card\":{\"rankEnum\":97,\"suitEnum\":104},\
     \"trickIndex\":0}}]",
    // p3 throws a diamond while the opposing side holds the trick.
    "42/game,[\"gmsg.out\",{\"msgId\":5,\"type\":2,\"data\":{\
     \"playerId\":\"p3\",\"card\":{\"rankEnum\":55,\"suitEnum\":100},\
     \"trickIndex\":0}}]",
];

fn decode_game_messages(frames: &[&str]) -> Vec<GameMessage> {
    let mut decoder = SessionDecoder::new();
    let mut messages = Vec::new();
    for (index, frame) in frames.iter().enumerate() {
        let outcome = decoder
            .decode_frame(Direction::Received, index as i64, frame)
            .expect("frame decodes");
        if let FrameOutcome::Record(record) = outcome {
            if let Message::Game(game) = record.message {
                messages.push(game);
            }
        }
    }
    messages
}

#[test]
fn frames_fold_into_a_consistent_playing_state() {
    let messages = decode_game_messages(FRAMES);
    assert_eq!(messages.len(), 4);

    let folded = states("p1", messages.iter()).expect("messages fold");
    let last = folded.last().expect("at least one state");

    let GameState::Playing {
        players,
        trump,
        current_trick,
        past_tricks,
        ..
    } = last
    else {
        panic!("expected a playing state, got {}", last.phase());
    };

    assert_eq!(*trump, Suit::Spades);
    assert_eq!(current_trick.cards().len(), 2);
    assert!(past_tricks.is_empty());

    // The observer's own hand is fully known.
    let me = &players["p1"];
    assert_eq!(me.hand.certain().len(), 8);
    assert!(me.hand.candidates().is_empty());

    // p3 failed to follow hearts and to trump in while behind.
    let p3 = &players["p3"];
    assert!(p3.hand.candidates().iter().all(|c| c.suit != Suit::Hearts));
    assert!(p3.hand.candidates().iter().all(|c| c.suit != Suit::Spades));

    // Nothing certain for one player may remain possible for another.
    for owner in players.values() {
        for certain in owner.hand.certain() {
            for other in players.values() {
                if other.id != owner.id {
                    assert!(!other.hand.candidates().contains(certain));
                }
            }
        }
    }
}

#[test]
fn control_frames_produce_no_game_messages() {
    let messages = decode_game_messages(&FRAMES[..3]);
    assert!(messages.is_empty());
}

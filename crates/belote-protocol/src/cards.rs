//! Card model shared by the wire catalog and the state engine.
//!
//! Ranks and suits travel as small integer codes on the wire (the client's
//! internal enum values), so both serialize through their code rather than
//! their name.

use core::fmt;
use serde::{Deserialize, Serialize};

/// Ranks of the 32-card deck, declared in plain (non-trump) playing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum Rank {
    Seven,
    Eight,
    Nine,
    Jack,
    Queen,
    King,
    Ten,
    Ace,
}

impl Rank {
    pub const ORDERED: [Rank; 8] = [
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ten,
        Rank::Ace,
    ];

    /// Integer code used on the wire for this rank.
    pub const fn wire_code(self) -> u8 {
        match self {
            Rank::Seven => 55,
            Rank::Eight => 56,
            Rank::Nine => 57,
            Rank::Jack => 106,
            Rank::Queen => 113,
            Rank::King => 107,
            Rank::Ten => 116,
            Rank::Ace => 97,
        }
    }

    pub const fn from_wire_code(code: u8) -> Option<Self> {
        match code {
            55 => Some(Rank::Seven),
            56 => Some(Rank::Eight),
            57 => Some(Rank::Nine),
            106 => Some(Rank::Jack),
            113 => Some(Rank::Queen),
            107 => Some(Rank::King),
            116 => Some(Rank::Ten),
            97 => Some(Rank::Ace),
            _ => None,
        }
    }

    /// Strength of this rank when its suit is trump (jack highest).
    pub const fn trump_strength(self) -> u8 {
        match self {
            Rank::Seven => 1,
            Rank::Eight => 2,
            Rank::Queen => 3,
            Rank::King => 4,
            Rank::Ten => 5,
            Rank::Ace => 6,
            Rank::Nine => 7,
            Rank::Jack => 8,
        }
    }
}

impl TryFrom<u8> for Rank {
    type Error = UnknownCardCode;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Rank::from_wire_code(code).ok_or(UnknownCardCode {
            kind: "rank",
            code,
        })
    }
}

impl From<Rank> for u8 {
    fn from(rank: Rank) -> Self {
        rank.wire_code()
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
            Rank::Ten => "10",
            Rank::Ace => "A",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum Suit {
    Clubs,
    Diamonds,
    Hearts,
    Spades,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Clubs, Suit::Diamonds, Suit::Hearts, Suit::Spades];

    /// Integer code used on the wire for this suit.
    pub const fn wire_code(self) -> u8 {
        match self {
            Suit::Clubs => 99,
            Suit::Diamonds => 100,
            Suit::Hearts => 104,
            Suit::Spades => 115,
        }
    }

    pub const fn from_wire_code(code: u8) -> Option<Self> {
        match code {
            99 => Some(Suit::Clubs),
            100 => Some(Suit::Diamonds),
            104 => Some(Suit::Hearts),
            115 => Some(Suit::Spades),
            _ => None,
        }
    }
}

impl TryFrom<u8> for Suit {
    type Error = UnknownCardCode;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Suit::from_wire_code(code).ok_or(UnknownCardCode {
            kind: "suit",
            code,
        })
    }
}

impl From<Suit> for u8 {
    fn from(suit: Suit) -> Self {
        suit.wire_code()
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Suit::Clubs => "C",
            Suit::Diamonds => "D",
            Suit::Hearts => "H",
            Suit::Spades => "S",
        };
        f.write_str(symbol)
    }
}

/// Error carried by the serde conversions when a code is not part of the deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} code {code}")]
pub struct UnknownCardCode {
    pub kind: &'static str,
    pub code: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Card {
    #[serde(rename = "rankEnum")]
    pub rank: Rank,
    #[serde(rename = "suitEnum")]
    pub suit: Suit,
}

impl Card {
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }

    pub const fn trump_strength(self) -> u8 {
        self.rank.trump_strength()
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

#[cfg(test)]
mod tests {
    use super::{Card, Rank, Suit};

    #[test]
    fn rank_codes_round_trip() {
        for rank in Rank::ORDERED {
            assert_eq!(Rank::from_wire_code(rank.wire_code()), Some(rank));
        }
        assert_eq!(Rank::from_wire_code(42), None);
    }

    #[test]
    fn suit_codes_round_trip() {
        for suit in Suit::ALL {
            assert_eq!(Suit::from_wire_code(suit.wire_code()), Some(suit));
        }
        assert_eq!(Suit::from_wire_code(0), None);
    }

    #[test]
    fn jack_is_top_trump_ace_tops_plain_order() {
        assert!(Rank::Jack.trump_strength() > Rank::Nine.trump_strength());
        assert!(Rank::Nine.trump_strength() > Rank::Ace.trump_strength());
        assert!(Rank::Ace > Rank::Ten);
        assert!(Rank::Ten > Rank::King);
    }

    #[test]
    fn card_serializes_as_wire_codes() {
        let card = Card::new(Rank::Queen, Suit::Clubs);
        let json = serde_json::to_string(&card).unwrap();
        assert_eq!(json, r#"{"rankEnum":113,"suitEnum":99}"#);
        let back: Card = serde_json::from_str(&json).unwrap();
        assert_eq!(back, card);
    }

    #[test]
    fn unknown_code_is_rejected() {
        let err = serde_json::from_str::<Card>(r#"{"rankEnum":1,"suitEnum":99}"#);
        assert!(err.is_err());
    }
}

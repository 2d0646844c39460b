use belote_protocol::cards::{Card, Suit};

/// A card on the table together with who put it there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayedCard {
    pub card: Card,
    pub player_id: String,
    pub team: String,
}

/// The cards played so far in one trick.
///
/// The major card is the highest card of the led suit; the prime card is the
/// strongest trump on the table, when any trump was played. The prime card
/// holds the trick over the major card.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Trick {
    cards: Vec<Card>,
    major: Option<PlayedCard>,
    prime: Option<PlayedCard>,
}

impl Trick {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_parts(
        cards: Vec<Card>,
        major: Option<PlayedCard>,
        prime: Option<PlayedCard>,
    ) -> Self {
        Self {
            cards,
            major,
            prime,
        }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn lead_suit(&self) -> Option<Suit> {
        self.cards.first().map(|card| card.suit)
    }

    pub fn major(&self) -> Option<&PlayedCard> {
        self.major.as_ref()
    }

    pub fn prime(&self) -> Option<&PlayedCard> {
        self.prime.as_ref()
    }

    /// The play currently holding the trick.
    pub fn winning(&self) -> Option<&PlayedCard> {
        self.prime.as_ref().or(self.major.as_ref())
    }

    /// The trick after one more card lands on the table.
    pub fn with_card(&self, play: PlayedCard, trump: Suit) -> Trick {
        let mut cards = self.cards.clone();
        cards.push(play.card);
        let major = match &self.major {
            None => Some(play.clone()),
            Some(current) if current.card.suit == play.card.suit && current.card.rank < play.card.rank => {
                Some(play.clone())
            }
            Some(current) => Some(current.clone()),
        };
        let prime = if play.card.suit == trump {
            match &self.prime {
                None => Some(play),
                Some(current) if current.card.trump_strength() < play.card.trump_strength() => {
                    Some(play)
                }
                Some(current) => Some(current.clone()),
            }
        } else {
            self.prime.clone()
        };
        Trick {
            cards,
            major,
            prime,
        }
    }
}

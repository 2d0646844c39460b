use belote_protocol::cards::{Card, Rank, Suit};
use once_cell::sync::Lazy;
use std::collections::BTreeSet;

static DECK: Lazy<BTreeSet<Card>> = Lazy::new(|| {
    let mut cards = BTreeSet::new();
    for suit in Suit::ALL {
        for rank in Rank::ORDERED {
            cards.insert(Card::new(rank, suit));
        }
    }
    cards
});

/// The full 32-card deck.
pub fn full_deck() -> &'static BTreeSet<Card> {
    &DECK
}

#[cfg(test)]
mod tests {
    use super::full_deck;
    use belote_protocol::cards::{Card, Rank, Suit};

    #[test]
    fn deck_has_thirty_two_distinct_cards() {
        assert_eq!(full_deck().len(), 32);
        assert!(full_deck().contains(&Card::new(Rank::Jack, Suit::Hearts)));
    }
}

use crate::model::deck::full_deck;
use belote_protocol::cards::Card;
use std::collections::BTreeSet;
use thiserror::Error;

/// What is known about one player's hand: cards proven to be there, and
/// cards not yet ruled out.
///
/// The two sets are disjoint at all times. Candidates only shrink; once all
/// eight cards of a hand are certain, no candidates remain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandBelief {
    certain: BTreeSet<Card>,
    candidates: BTreeSet<Card>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HandError {
    #[error("played card {0} is neither certain nor a candidate in this hand")]
    PlayedCardUntracked(Card),
    #[error("card {0} is certain in this hand but must now be ruled out")]
    CertainCardConflict(Card),
}

impl HandBelief {
    /// A hand about which nothing is known: every card is a candidate.
    pub fn fresh() -> Self {
        Self {
            certain: BTreeSet::new(),
            candidates: full_deck().clone(),
        }
    }

    pub fn certain(&self) -> &BTreeSet<Card> {
        &self.certain
    }

    pub fn candidates(&self) -> &BTreeSet<Card> {
        &self.candidates
    }

    /// True once all eight cards are known.
    pub fn is_complete(&self) -> bool {
        self.certain.len() == 8
    }

    pub fn could_hold(&self, card: Card) -> bool {
        self.certain.contains(&card) || self.candidates.contains(&card)
    }

    /// Marks the given cards as certainly held.
    pub fn promote_certain(&mut self, cards: impl IntoIterator<Item = Card>) {
        self.certain.extend(cards);
        if self.is_complete() {
            self.candidates.clear();
        } else {
            let certain = &self.certain;
            self.candidates.retain(|card| !certain.contains(card));
        }
    }

    /// Removes a card this player just played, from whichever set held it.
    pub fn remove_played(&mut self, card: Card) -> Result<(), HandError> {
        let was_certain = self.certain.remove(&card);
        let was_candidate = self.candidates.remove(&card);
        if !was_certain && !was_candidate {
            return Err(HandError::PlayedCardUntracked(card));
        }
        Ok(())
    }

    /// Rules out a single candidate (someone else holds or played it).
    pub fn retract_candidate(&mut self, card: Card) -> Result<(), HandError> {
        if self.certain.contains(&card) {
            return Err(HandError::CertainCardConflict(card));
        }
        self.candidates.remove(&card);
        Ok(())
    }

    /// Rules out every candidate matching the predicate.
    pub fn retract_candidates_if(
        &mut self,
        predicate: impl Fn(Card) -> bool,
    ) -> Result<(), HandError> {
        if let Some(&conflicting) = self.certain.iter().find(|&&card| predicate(card)) {
            return Err(HandError::CertainCardConflict(conflicting));
        }
        self.candidates.retain(|&card| !predicate(card));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{HandBelief, HandError};
    use crate::model::deck::full_deck;
    use belote_protocol::cards::{Card, Rank, Suit};

    #[test]
    fn fresh_hand_considers_the_whole_deck() {
        let hand = HandBelief::fresh();
        assert!(hand.certain().is_empty());
        assert_eq!(hand.candidates().len(), 32);
    }

    #[test]
    fn promoting_keeps_the_sets_disjoint() {
        let mut hand = HandBelief::fresh();
        let card = Card::new(Rank::Ace, Suit::Spades);
        hand.promote_certain([card]);
        assert!(hand.certain().contains(&card));
        assert!(!hand.candidates().contains(&card));
    }

    #[test]
    fn eight_certain_cards_empty_the_candidates() {
        let mut hand = HandBelief::fresh();
        let eight: Vec<Card> = full_deck().iter().copied().take(8).collect();
        hand.promote_certain(eight);
        assert!(hand.is_complete());
        assert!(hand.candidates().is_empty());
    }

    #[test]
    fn playing_an_untracked_card_is_an_error() {
        let mut hand = HandBelief::fresh();
        let card = Card::new(Rank::Seven, Suit::Clubs);
        hand.retract_candidate(card).unwrap();
        assert_eq!(
            hand.remove_played(card),
            Err(HandError::PlayedCardUntracked(card))
        );
    }

    #[test]
    fn retracting_a_certain_card_is_a_conflict() {
        let mut hand = HandBelief::fresh();
        let card = Card::new(Rank::Jack, Suit::Hearts);
        hand.promote_certain([card]);
        assert_eq!(
            hand.retract_candidate(card),
            Err(HandError::CertainCardConflict(card))
        );
        assert_eq!(
            hand.retract_candidates_if(|c| c.suit == Suit::Hearts),
            Err(HandError::CertainCardConflict(card))
        );
    }

    #[test]
    fn predicate_retraction_spares_unmatched_candidates() {
        let mut hand = HandBelief::fresh();
        hand.retract_candidates_if(|c| c.suit == Suit::Diamonds)
            .unwrap();
        assert_eq!(hand.candidates().len(), 24);
        assert!(hand.candidates().iter().all(|c| c.suit != Suit::Diamonds));
    }
}

use crate::card::Card;

/// One seat's hand. Cards are removed only by playing a formation, and
/// added to only by the kitty handoff during `KittyExchange`.
#[derive(Debug, Clone, Default)]
pub struct Player {
    hand: Vec<Card>,
}

impl Player {
    pub fn new() -> Player {
        Player { hand: Vec::new() }
    }

    pub fn assign(&mut self, cards: Vec<Card>) {
        self.hand = cards;
    }

    pub fn hand(&self) -> &[Card] {
        &self.hand
    }

    pub fn has(&self, card: Card) -> bool {
        self.hand.contains(&card)
    }

    pub fn has_all(&self, cards: &[Card]) -> bool {
        self.first_missing(cards).is_none()
    }

    /// Like `has_all`, but returns the first card in `cards` that the
    /// hand cannot supply - accounting for multiplicity, so a hand
    /// holding one copy of a card correctly rejects a play that names
    /// that same card twice.
    pub fn first_missing(&self, cards: &[Card]) -> Option<Card> {
        let mut remaining = self.hand.clone();
        for card in cards {
            match remaining.iter().position(|c| c == card) {
                Some(idx) => {
                    remaining.swap_remove(idx);
                }
                None => return Some(*card),
            }
        }
        None
    }

    /// Remove exactly the given cards from the hand. Callers must have
    /// already verified `has_all` — this does not itself error, to keep
    /// the "validate, then mutate" split explicit at the call site.
    pub fn remove_all(&mut self, cards: &[Card]) {
        for card in cards {
            if let Some(idx) = self.hand.iter().position(|c| c == card) {
                self.hand.remove(idx);
            }
        }
    }

    pub fn add_all(&mut self, cards: impl IntoIterator<Item = Card>) {
        self.hand.extend(cards);
    }

    pub fn len(&self) -> usize {
        self.hand.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hand.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{Rank, Suit};

    #[test]
    fn has_all_checks_multiset_membership_not_just_set_membership() {
        let mut player = Player::new();
        let card = Card::standard(Suit::Hearts, Rank::Ace, 1);
        player.assign(vec![card]);
        assert!(player.has_all(&[card]));
        assert!(!player.has_all(&[card, card]));
    }

    #[test]
    fn remove_all_only_removes_what_was_present() {
        let mut player = Player::new();
        let a = Card::standard(Suit::Hearts, Rank::Ace, 1);
        let b = Card::standard(Suit::Hearts, Rank::King, 1);
        player.assign(vec![a, b]);
        player.remove_all(&[a]);
        assert_eq!(player.hand(), &[b]);
    }
}

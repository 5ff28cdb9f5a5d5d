use std::collections::HashMap;

use rand::Rng;
use thiserror::Error;

use crate::card::{Card, JokerKind, Rank, Suit};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidDeck {
    #[error("expected {expected} copies of {face}, found {found}")]
    WrongFaceCount {
        face: String,
        expected: u8,
        found: u8,
    },
    #[error("expected {expected} of the {kind:?} joker, found {found}")]
    WrongJokerCount {
        kind: JokerKind,
        expected: u8,
        found: u8,
    },
    #[error("deck has {found} cards, expected {expected}")]
    WrongSize { expected: usize, found: usize },
}

/// The 108-card shoe: two 52-card packs plus four jokers.
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    pub const SIZE: usize = 108;

    /// Build the canonical shoe: two copies of every (suit, rank) face,
    /// tagged by pack, plus one Big and one Small joker per pack.
    pub fn new_shoe() -> Deck {
        let mut cards = Vec::with_capacity(Self::SIZE);
        for pack in 1..=2u8 {
            for suit in Suit::ALL {
                for rank in Rank::ALL {
                    cards.push(Card::standard(suit, rank, pack));
                }
            }
            cards.push(Card::joker(JokerKind::Big, pack));
            cards.push(Card::joker(JokerKind::Small, pack));
        }
        Deck { cards }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn total_points(&self) -> u32 {
        self.cards.iter().map(|c| c.points()).sum()
    }

    /// Recount the deck's composition and fail if anything is off: any
    /// standard face must appear exactly twice, and each joker kind
    /// exactly twice (once per pack).
    pub fn validate_composition(&self) -> Result<(), InvalidDeck> {
        if self.cards.len() != Self::SIZE {
            return Err(InvalidDeck::WrongSize {
                expected: Self::SIZE,
                found: self.cards.len(),
            });
        }
        let mut face_counts: HashMap<(Suit, Rank), u8> = HashMap::new();
        let mut joker_counts: HashMap<JokerKind, u8> = HashMap::new();
        for card in &self.cards {
            match card {
                Card::Standard { suit, rank, .. } => {
                    *face_counts.entry((*suit, *rank)).or_insert(0) += 1;
                }
                Card::Joker { joker, .. } => {
                    *joker_counts.entry(*joker).or_insert(0) += 1;
                }
            }
        }
        for suit in Suit::ALL {
            for rank in Rank::ALL {
                let found = face_counts.get(&(suit, rank)).copied().unwrap_or(0);
                if found != 2 {
                    return Err(InvalidDeck::WrongFaceCount {
                        face: format!("{rank}{suit}"),
                        expected: 2,
                        found,
                    });
                }
            }
        }
        for kind in [JokerKind::Big, JokerKind::Small] {
            let found = joker_counts.get(&kind).copied().unwrap_or(0);
            if found != 2 {
                return Err(InvalidDeck::WrongJokerCount {
                    kind,
                    expected: 2,
                    found,
                });
            }
        }
        Ok(())
    }

    /// Uniform Fisher-Yates shuffle over the injected random source. The
    /// source is unspecified by the engine: callers inject cryptographic
    /// randomness in production and a seeded deterministic source (e.g.
    /// `rand_chacha::ChaCha20Rng::from_seed`) in tests.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let len = self.cards.len();
        for i in (1..len).rev() {
            let j = rng.gen_range(0..=i);
            self.cards.swap(i, j);
        }
    }

    /// Split the shuffled deck into `hand_count` hands of `hand_size`
    /// each plus a `kitty_size` kitty, per spec §4.1: hand `i` receives
    /// the cards at positions `hand_count*k + i`, and the trailing
    /// `kitty_size` cards form the kitty.
    pub fn deal(&self, hand_count: usize, hand_size: usize, kitty_size: usize) -> Dealt {
        let mut hands: Vec<Vec<Card>> = vec![Vec::with_capacity(hand_size); hand_count];
        for k in 0..hand_size {
            for (i, hand) in hands.iter_mut().enumerate() {
                hand.push(self.cards[hand_count * k + i]);
            }
        }
        let dealt_cards = hand_count * hand_size;
        let kitty = self.cards[dealt_cards..dealt_cards + kitty_size].to_vec();
        Dealt { hands, kitty }
    }
}

pub struct Dealt {
    pub hands: Vec<Vec<Card>>,
    pub kitty: Vec<Card>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn a_fresh_shoe_has_108_cards_and_200_points() {
        let deck = Deck::new_shoe();
        assert_eq!(deck.cards().len(), 108);
        assert_eq!(deck.total_points(), 200);
        assert!(deck.validate_composition().is_ok());
    }

    #[test]
    fn dropping_a_card_fails_composition() {
        let mut deck = Deck::new_shoe();
        deck.cards.pop();
        assert!(deck.validate_composition().is_err());
    }

    #[test]
    fn duplicating_a_card_in_place_of_another_fails_composition() {
        let mut deck = Deck::new_shoe();
        let last = deck.cards.last().copied().unwrap();
        deck.cards[0] = last;
        assert!(deck.validate_composition().is_err());
    }

    #[test]
    fn dealing_splits_into_four_hands_and_a_kitty_with_no_overlap() {
        let deck = Deck::new_shoe();
        let dealt = deck.deal(4, 25, 8);
        assert_eq!(dealt.hands.len(), 4);
        for hand in &dealt.hands {
            assert_eq!(hand.len(), 25);
        }
        assert_eq!(dealt.kitty.len(), 8);

        let mut all: Vec<Card> = dealt.hands.into_iter().flatten().collect();
        all.extend(dealt.kitty);
        all.sort_by_key(|c| c.to_string());
        let mut original = deck.cards().to_vec();
        original.sort_by_key(|c| c.to_string());
        assert_eq!(all, original);
    }

    #[test]
    fn shuffle_is_deterministic_for_a_fixed_seed() {
        let mut deck_a = Deck::new_shoe();
        let mut deck_b = Deck::new_shoe();
        let mut rng_a = ChaCha20Rng::from_seed([7; 32]);
        let mut rng_b = ChaCha20Rng::from_seed([7; 32]);
        deck_a.shuffle(&mut rng_a);
        deck_b.shuffle(&mut rng_b);
        assert_eq!(deck_a.cards(), deck_b.cards());
    }
}

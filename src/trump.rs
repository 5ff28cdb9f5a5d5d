use std::cmp::Ordering;

use crate::card::{Card, JokerKind, Suit};

/// The suit a card is "grouped" under for suit-following purposes. Trump
/// is treated as a single effective suit distinct from all four natural
/// suits, per spec §3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectiveSuit {
    Trump,
    Natural(Suit),
}

/// A declared trump suit. Every card's rank and playable "suit" are
/// derived from this context; `TrumpContext` itself carries no other
/// state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrumpContext {
    suit: Suit,
}

impl TrumpContext {
    pub fn new(suit: Suit) -> TrumpContext {
        TrumpContext { suit }
    }

    pub fn suit(self) -> Suit {
        self.suit
    }

    /// `TrumpRank` from spec §4.2: the higher this value, the stronger
    /// the card is irrespective of what was led. Zero means the card is
    /// not trump at all.
    pub fn trump_rank(self, card: Card) -> u32 {
        match card {
            Card::Joker { joker, .. } => match joker {
                JokerKind::Big => 1000,
                JokerKind::Small => 999,
            },
            Card::Standard { suit, rank, .. } => {
                use crate::card::Rank;
                match rank {
                    Rank::Two if suit == self.suit => 998,
                    Rank::Two => 997,
                    _ if suit == self.suit => 900 + u32::from(rank.ordinal()),
                    _ => 0,
                }
            }
        }
    }

    /// A card is trump iff its trump rank is positive: a joker, any 2,
    /// or any card of the trump suit.
    pub fn is_trump(self, card: Card) -> bool {
        self.trump_rank(card) > 0
    }

    pub fn effective_suit(self, card: Card) -> EffectiveSuit {
        if self.is_trump(card) {
            EffectiveSuit::Trump
        } else {
            match card {
                Card::Standard { suit, .. } => EffectiveSuit::Natural(suit),
                Card::Joker { .. } => unreachable!("jokers are always trump"),
            }
        }
    }

    /// The natural (non-trump) rank ordinal of a card, used to order
    /// cards of the same effective suit when trump rank alone does not
    /// distinguish them. Only meaningful for `Card::Standard`.
    fn natural_ordinal(card: Card) -> Option<u8> {
        match card {
            Card::Standard { rank, .. } => Some(rank.ordinal()),
            Card::Joker { .. } => None,
        }
    }

    /// Total order used to pick the highest of two cards in a given led
    /// suit, per spec §4.2. `a_before_b` breaks ties between cards that
    /// compare equal on every other criterion (duplicate-pack copies of
    /// the same face): the earlier play wins, so when `a` was played
    /// first this resolves to `Greater`.
    ///
    /// The `led_suit` parameter matters only when both cards have trump
    /// rank zero and belong to different natural suits; in every other
    /// context it is unused.
    pub fn compare(
        self,
        a: Card,
        b: Card,
        led_suit: Option<Suit>,
        a_before_b: bool,
    ) -> Ordering {
        let (ra, rb) = (self.trump_rank(a), self.trump_rank(b));
        if ra != rb {
            return ra.cmp(&rb);
        }
        if ra > 0 {
            // Equal positive trump rank: either the identical face from
            // two packs, or two off-trump 2s (which the trump-rank
            // table treats as equal to each other). Either way, the
            // earlier play wins.
            return earlier_wins(a_before_b);
        }
        // Both non-trump. Compare within-suit first.
        match (a, b) {
            (Card::Standard { suit: sa, .. }, Card::Standard { suit: sb, .. }) if sa == sb => {
                match (Self::natural_ordinal(a), Self::natural_ordinal(b)) {
                    (Some(oa), Some(ob)) if oa != ob => oa.cmp(&ob),
                    _ => earlier_wins(a_before_b),
                }
            }
            (Card::Standard { suit: sa, .. }, Card::Standard { suit: sb, .. }) => {
                let a_led = led_suit == Some(sa);
                let b_led = led_suit == Some(sb);
                match (a_led, b_led) {
                    (true, false) => Ordering::Greater,
                    (false, true) => Ordering::Less,
                    _ => Ordering::Equal,
                }
            }
            _ => unreachable!("non-trump cards are always Card::Standard"),
        }
    }
}

fn earlier_wins(a_before_b: bool) -> Ordering {
    if a_before_b {
        Ordering::Greater
    } else {
        Ordering::Less
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::Rank;

    #[test]
    fn jokers_and_twos_outrank_everything() {
        let trump = TrumpContext::new(Suit::Hearts);
        let big_joker = Card::joker(JokerKind::Big, 1);
        let ace_of_trump = Card::standard(Suit::Hearts, Rank::Ace, 1);
        assert!(trump.trump_rank(big_joker) > trump.trump_rank(ace_of_trump));
        let trump_two = Card::standard(Suit::Hearts, Rank::Two, 1);
        let off_two = Card::standard(Suit::Spades, Rank::Two, 1);
        assert!(trump.trump_rank(trump_two) > trump.trump_rank(off_two));
        assert!(trump.trump_rank(off_two) > trump.trump_rank(ace_of_trump));
    }

    #[test]
    fn off_trump_twos_are_mutually_equal_and_broken_by_play_order() {
        let trump = TrumpContext::new(Suit::Hearts);
        let spade_two = Card::standard(Suit::Spades, Rank::Two, 1);
        let club_two = Card::standard(Suit::Clubs, Rank::Two, 1);
        assert_eq!(trump.trump_rank(spade_two), trump.trump_rank(club_two));
        assert_eq!(
            trump.compare(spade_two, club_two, None, true),
            Ordering::Greater
        );
        assert_eq!(
            trump.compare(spade_two, club_two, None, false),
            Ordering::Less
        );
    }

    #[test]
    fn ruff_beats_led_suit_ace_regardless_of_rank() {
        let trump = TrumpContext::new(Suit::Hearts);
        let ace_spades = Card::standard(Suit::Spades, Rank::Ace, 1);
        let three_hearts = Card::standard(Suit::Hearts, Rank::Three, 1);
        assert_eq!(
            trump.compare(ace_spades, three_hearts, Some(Suit::Spades), true),
            Ordering::Less
        );
    }

    #[test]
    fn non_trump_cards_compare_within_suit_by_natural_rank() {
        let trump = TrumpContext::new(Suit::Hearts);
        let ten = Card::standard(Suit::Spades, Rank::Ten, 1);
        let jack = Card::standard(Suit::Spades, Rank::Jack, 1);
        assert_eq!(trump.compare(jack, ten, Some(Suit::Spades), true), Ordering::Greater);
    }

    #[test]
    fn face_equal_duplicate_tie_break_by_play_order() {
        let trump = TrumpContext::new(Suit::Hearts);
        let ah1 = Card::standard(Suit::Hearts, Rank::Ace, 1);
        let ah2 = Card::standard(Suit::Hearts, Rank::Ace, 2);
        assert_eq!(trump.compare(ah1, ah2, Some(Suit::Hearts), true), Ordering::Greater);
        assert_eq!(trump.compare(ah1, ah2, Some(Suit::Hearts), false), Ordering::Less);
    }
}

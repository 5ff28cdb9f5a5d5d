use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One of the four standard suits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Suit {
    Spades,
    Hearts,
    Clubs,
    Diamonds,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Spades, Suit::Hearts, Suit::Clubs, Suit::Diamonds];

    fn letter(self) -> char {
        match self {
            Suit::Spades => 'S',
            Suit::Hearts => 'H',
            Suit::Clubs => 'C',
            Suit::Diamonds => 'D',
        }
    }

    fn from_letter(c: char) -> Option<Suit> {
        match c {
            'S' => Some(Suit::Spades),
            'H' => Some(Suit::Hearts),
            'C' => Some(Suit::Clubs),
            'D' => Some(Suit::Diamonds),
            _ => None,
        }
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// A standard rank, 2 through Ace. `ordinal()` gives the within-suit
/// natural order used both for non-trump comparisons and for the
/// `900 + ord(r)` trump-rank formula of spec §4.2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rank {
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Ace,
}

impl Rank {
    pub const ALL: [Rank; 13] = [
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ace,
    ];

    /// 2 is lowest at 2, Ace is highest at 14.
    pub fn ordinal(self) -> u8 {
        match self {
            Rank::Two => 2,
            Rank::Three => 3,
            Rank::Four => 4,
            Rank::Five => 5,
            Rank::Six => 6,
            Rank::Seven => 7,
            Rank::Eight => 8,
            Rank::Nine => 9,
            Rank::Ten => 10,
            Rank::Jack => 11,
            Rank::Queen => 12,
            Rank::King => 13,
            Rank::Ace => 14,
        }
    }

    /// The rank immediately above this one in natural order, if any.
    /// Used to test pair-rank consecutiveness when recognizing tractors.
    pub fn successor(self) -> Option<Rank> {
        Rank::ALL
            .iter()
            .position(|r| *r == self)
            .and_then(|idx| Rank::ALL.get(idx + 1).copied())
    }

    fn code(self) -> &'static str {
        match self {
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
            Rank::Ace => "A",
        }
    }

    fn from_code(code: &str) -> Option<Rank> {
        Rank::ALL.iter().copied().find(|r| r.code() == code)
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Which of the two jokers in a pack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JokerKind {
    Big,
    Small,
}

/// Which of the two 52-card packs a card was printed in. Two packs are
/// combined into a single 108-card shoe; `Pack` is what lets two
/// otherwise-identical cards be tracked as distinct physical objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pack(pub u8);

/// A single physical card out of the 108-card shoe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Card {
    Standard { suit: Suit, rank: Rank, pack: Pack },
    Joker { joker: JokerKind, pack: Pack },
}

impl Card {
    pub fn standard(suit: Suit, rank: Rank, pack: u8) -> Card {
        Card::Standard {
            suit,
            rank,
            pack: Pack(pack),
        }
    }

    pub fn joker(joker: JokerKind, pack: u8) -> Card {
        Card::Joker {
            joker,
            pack: Pack(pack),
        }
    }

    pub fn pack(self) -> Pack {
        match self {
            Card::Standard { pack, .. } => pack,
            Card::Joker { pack, .. } => pack,
        }
    }

    /// Point value under the standard Chinese Bridge scoring: K and 10
    /// are worth 10, 5 is worth 5, everything else (including both
    /// jokers) is worth 0.
    pub fn points(self) -> u32 {
        match self {
            Card::Standard { rank, .. } => match rank {
                Rank::King | Rank::Ten => 10,
                Rank::Five => 5,
                _ => 0,
            },
            Card::Joker { .. } => 0,
        }
    }

    /// True when `self` and `other` are the same suit/rank or joker
    /// kind, ignoring which pack they came from.
    pub fn face_equal(self, other: Card) -> bool {
        match (self, other) {
            (
                Card::Standard { suit, rank, .. },
                Card::Standard {
                    suit: s2, rank: r2, ..
                },
            ) => suit == s2 && rank == r2,
            (Card::Joker { joker, .. }, Card::Joker { joker: j2, .. }) => joker == j2,
            _ => false,
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Card::Standard { suit, rank, pack } => write!(f, "{rank}{suit}#{}", pack.0),
            Card::Joker { joker, pack } => {
                let code = match joker {
                    JokerKind::Big => "BJ",
                    JokerKind::Small => "SJ",
                };
                write!(f, "{code}#{}", pack.0)
            }
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("'{0}' is not a valid card encoding")]
pub struct ParseCardError(String);

impl FromStr for Card {
    type Err = ParseCardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (body, pack) = s
            .split_once('#')
            .ok_or_else(|| ParseCardError(s.to_string()))?;
        let pack: u8 = pack.parse().map_err(|_| ParseCardError(s.to_string()))?;
        if body == "BJ" {
            return Ok(Card::joker(JokerKind::Big, pack));
        }
        if body == "SJ" {
            return Ok(Card::joker(JokerKind::Small, pack));
        }
        let suit_char = body
            .chars()
            .last()
            .ok_or_else(|| ParseCardError(s.to_string()))?;
        let suit = Suit::from_letter(suit_char).ok_or_else(|| ParseCardError(s.to_string()))?;
        let rank_code = &body[..body.len() - 1];
        let rank = Rank::from_code(rank_code).ok_or_else(|| ParseCardError(s.to_string()))?;
        Ok(Card::standard(suit, rank, pack))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_wire_encoding() {
        assert_eq!(Card::standard(Suit::Hearts, Rank::King, 2).to_string(), "KH#2");
        assert_eq!(Card::standard(Suit::Spades, Rank::Ten, 1).to_string(), "10S#1");
        assert_eq!(Card::standard(Suit::Diamonds, Rank::Ace, 1).to_string(), "AD#1");
        assert_eq!(Card::joker(JokerKind::Big, 2).to_string(), "BJ#2");
        assert_eq!(Card::joker(JokerKind::Small, 1).to_string(), "SJ#1");
    }

    #[test]
    fn round_trips_through_the_wire_encoding() {
        let cards = [
            Card::standard(Suit::Hearts, Rank::King, 2),
            Card::standard(Suit::Spades, Rank::Ten, 1),
            Card::standard(Suit::Diamonds, Rank::Ace, 1),
            Card::joker(JokerKind::Big, 2),
            Card::joker(JokerKind::Small, 1),
        ];
        for card in cards {
            let encoded = card.to_string();
            assert_eq!(encoded.parse::<Card>().unwrap(), card);
        }
    }

    #[test]
    fn rejects_malformed_encodings() {
        assert!("XX#1".parse::<Card>().is_err());
        assert!("KH".parse::<Card>().is_err());
        assert!("KH#".parse::<Card>().is_err());
    }

    #[test]
    fn points_follow_the_standard_table() {
        assert_eq!(Card::standard(Suit::Clubs, Rank::King, 1).points(), 10);
        assert_eq!(Card::standard(Suit::Clubs, Rank::Ten, 1).points(), 10);
        assert_eq!(Card::standard(Suit::Clubs, Rank::Five, 1).points(), 5);
        assert_eq!(Card::standard(Suit::Clubs, Rank::Ace, 1).points(), 0);
        assert_eq!(Card::joker(JokerKind::Big, 1).points(), 0);
    }

    #[test]
    fn face_equal_ignores_pack() {
        let a = Card::standard(Suit::Hearts, Rank::Ace, 1);
        let b = Card::standard(Suit::Hearts, Rank::Ace, 2);
        assert!(a.face_equal(b));
        assert!(!a.face_equal(Card::standard(Suit::Hearts, Rank::King, 1)));
    }
}

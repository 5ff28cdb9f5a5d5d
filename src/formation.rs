use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::card::{Card, Rank};
use crate::trump::{EffectiveSuit, TrumpContext};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormationError {
    #[error("a formation cannot be built from zero cards")]
    Empty,
    #[error("two cards only form a formation when they are face-equal")]
    NotAPair,
    #[error("cards do not partition into consecutive same-suit pairs")]
    NotATractor,
}

/// What kind of formation a play is. Stored redundantly alongside
/// `Formation` itself so callers can match on shape without destructuring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormationKind {
    Single,
    Pair,
    Tractor(usize),
}

/// A validated, playable unit: one card, a face-equal pair, or `k >= 2`
/// consecutive same-suit pairs. `Formation` never consults a player's
/// hand — it only certifies that a given card set is well-formed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Formation {
    Single(Card),
    Pair([Card; 2]),
    /// Pairs sorted ascending by rank; consecutive in the within-suit
    /// order used for that suit.
    Tractor(Vec<[Card; 2]>),
}

impl Formation {
    pub fn kind(&self) -> FormationKind {
        match self {
            Formation::Single(_) => FormationKind::Single,
            Formation::Pair(_) => FormationKind::Pair,
            Formation::Tractor(pairs) => FormationKind::Tractor(pairs.len()),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Formation::Single(_) => 1,
            Formation::Pair(_) => 2,
            Formation::Tractor(pairs) => pairs.len() * 2,
        }
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn cards(&self) -> Vec<Card> {
        match self {
            Formation::Single(c) => vec![*c],
            Formation::Pair(p) => p.to_vec(),
            Formation::Tractor(pairs) => pairs.iter().flatten().copied().collect(),
        }
    }

    /// The effective suit this formation is played in: a single suit for
    /// singles/pairs/tractors, since all of a tractor's pairs must share
    /// one effective suit by construction.
    pub fn base_suit(&self, trump: TrumpContext) -> EffectiveSuit {
        let representative = match self {
            Formation::Single(c) => *c,
            Formation::Pair(p) => p[0],
            Formation::Tractor(pairs) => pairs[0][0],
        };
        trump.effective_suit(representative)
    }

    /// The single highest card in this formation under `trump`, used to
    /// rank competing formations of the same kind. For a tractor or
    /// pair, every member compares equal on trump rank within the
    /// formation's own suit, so the first pair's first card suffices as
    /// a representative — ties between formations are broken by
    /// `TrumpContext::compare` itself, via play order.
    pub fn highest_card(&self) -> Card {
        match self {
            Formation::Single(c) => *c,
            Formation::Pair(p) => p[0],
            Formation::Tractor(pairs) => pairs.last().unwrap()[0],
        }
    }

    /// Classify `cards` as a Single, Pair, or Tractor under `trump`.
    pub fn recognize(cards: &[Card], trump: TrumpContext) -> Result<Formation, FormationError> {
        match cards.len() {
            0 => Err(FormationError::Empty),
            1 => Ok(Formation::Single(cards[0])),
            2 => {
                if cards[0].face_equal(cards[1]) {
                    Ok(Formation::Pair([cards[0], cards[1]]))
                } else {
                    Err(FormationError::NotAPair)
                }
            }
            n if n >= 4 && n % 2 == 0 => recognize_tractor(cards, trump),
            _ => Err(FormationError::NotATractor),
        }
    }
}

#[derive(PartialEq, Eq, Hash, Clone, Copy)]
enum FaceKey {
    Standard(crate::card::Suit, Rank),
    Joker(crate::card::JokerKind),
}

fn face_key(card: Card) -> FaceKey {
    match card {
        Card::Standard { suit, rank, .. } => FaceKey::Standard(suit, rank),
        Card::Joker { joker, .. } => FaceKey::Joker(joker),
    }
}

fn recognize_tractor(cards: &[Card], trump: TrumpContext) -> Result<Formation, FormationError> {
    let mut groups: HashMap<FaceKey, Vec<Card>> = HashMap::new();
    for card in cards {
        groups.entry(face_key(*card)).or_default().push(*card);
    }
    if groups.values().any(|group| group.len() != 2) {
        return Err(FormationError::NotATractor);
    }

    let mut entries: Vec<(crate::card::Suit, Rank, [Card; 2])> = Vec::with_capacity(groups.len());
    for (key, mut members) in groups {
        let (suit, rank) = match key {
            FaceKey::Standard(suit, rank) => (suit, rank),
            FaceKey::Joker(_) => return Err(FormationError::NotATractor),
        };
        if rank == Rank::Two {
            return Err(FormationError::NotATractor);
        }
        members.sort_by_key(|c| c.pack().0);
        entries.push((suit, rank, [members[0], members[1]]));
    }

    let base = trump.effective_suit(Card::standard(entries[0].0, entries[0].1, 1));
    if entries
        .iter()
        .any(|(suit, rank, _)| trump.effective_suit(Card::standard(*suit, *rank, 1)) != base)
    {
        return Err(FormationError::NotATractor);
    }

    entries.sort_by_key(|(_, rank, _)| rank.ordinal());
    for window in entries.windows(2) {
        let (_, prev_rank, _) = window[0];
        let (_, next_rank, _) = window[1];
        if prev_rank.successor() != Some(next_rank) {
            return Err(FormationError::NotATractor);
        }
    }

    Ok(Formation::Tractor(
        entries.into_iter().map(|(_, _, pair)| pair).collect(),
    ))
}

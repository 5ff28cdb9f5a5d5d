use std::collections::HashMap;

use crate::card::{Card, Rank};
use crate::error::EngineError;
use crate::formation::{Formation, FormationKind};
use crate::seat::Seat;
use crate::trump::{EffectiveSuit, TrumpContext};

/// One seat's contribution to a trick, recorded in the order it was
/// played (which is what breaks ties between face-equal duplicates).
#[derive(Debug, Clone)]
pub struct TrickPlay {
    pub seat: Seat,
    pub cards: Vec<Card>,
}

/// One of the match's 25 card-play tricks.
#[derive(Debug, Clone)]
pub struct Trick {
    leader: Seat,
    plays: Vec<TrickPlay>,
}

impl Trick {
    pub fn new(leader: Seat) -> Trick {
        Trick {
            leader,
            plays: Vec::with_capacity(4),
        }
    }

    pub fn leader(&self) -> Seat {
        self.leader
    }

    pub fn plays(&self) -> &[TrickPlay] {
        &self.plays
    }

    pub fn is_complete(&self) -> bool {
        self.plays.len() == 4
    }

    /// The seat whose turn it is to play next, following the order
    /// plays were made in, wrapping from the leader.
    pub fn next_to_play(&self) -> Seat {
        let mut seat = self.leader;
        for _ in 0..self.plays.len() {
            seat = seat.next();
        }
        seat
    }

    /// The formation led to this trick, once the leader has played.
    pub fn led_formation(&self, trump: TrumpContext) -> Option<Formation> {
        let first = self.plays.first()?;
        Formation::recognize(&first.cards, trump).ok()
    }

    /// Validate and, if legal, record `seat`'s play of `cards` (already
    /// confirmed to be a subset of that seat's hand by the caller).
    /// Mutates nothing on failure.
    pub fn record_play(
        &mut self,
        seat: Seat,
        cards: Vec<Card>,
        hand: &[Card],
        trump: TrumpContext,
    ) -> Result<(), EngineError> {
        if self.plays.is_empty() {
            // The leader may play any recognized formation.
            Formation::recognize(&cards, trump)?;
        } else {
            let led = self
                .led_formation(trump)
                .expect("a non-empty trick always has a recognized led formation");
            validate_follow(&led, hand, &cards, trump)?;
        }
        self.plays.push(TrickPlay { seat, cards });
        Ok(())
    }

    /// Close the trick: determine the winning seat and the total points
    /// captured (every point card across all four plays, win or lose).
    pub fn close(&self, trump: TrumpContext) -> TrickOutcome {
        assert!(self.is_complete(), "cannot close an incomplete trick");
        let led = self
            .led_formation(trump)
            .expect("a complete trick always has a recognized led formation");
        let led_kind = led.kind();
        let led_suit = led.base_suit(trump);

        let mut winner_idx = 0usize;
        let mut winner_class = play_class(&self.plays[0].cards, led_kind, led_suit, trump);
        let mut winner_formation = Formation::recognize(&self.plays[0].cards, trump).ok();

        for (idx, play) in self.plays.iter().enumerate().skip(1) {
            let class = play_class(&play.cards, led_kind, led_suit, trump);
            if class == 0 {
                continue;
            }
            let formation = Formation::recognize(&play.cards, trump).ok();
            let beats_current = match class.cmp(&winner_class) {
                std::cmp::Ordering::Greater => true,
                std::cmp::Ordering::Less => false,
                std::cmp::Ordering::Equal => match (&formation, &winner_formation) {
                    (Some(candidate), Some(current)) => {
                        trump.compare(
                            candidate.highest_card(),
                            current.highest_card(),
                            natural_suit(led_suit),
                            false,
                        ) == std::cmp::Ordering::Greater
                    }
                    _ => false,
                },
            };
            if beats_current {
                winner_idx = idx;
                winner_class = class;
                winner_formation = formation;
            }
        }

        let points: u32 = self
            .plays
            .iter()
            .flat_map(|p| p.cards.iter())
            .map(|c| c.points())
            .sum();

        TrickOutcome {
            winner: self.plays[winner_idx].seat,
            points,
        }
    }
}

pub struct TrickOutcome {
    pub winner: Seat,
    pub points: u32,
}

fn natural_suit(suit: EffectiveSuit) -> Option<crate::card::Suit> {
    match suit {
        EffectiveSuit::Trump => None,
        EffectiveSuit::Natural(s) => Some(s),
    }
}

/// A play's qualification class for winning the trick: 0 means it
/// cannot win (shape-broken or a sluff), 1 means it is a well-formed
/// formation of the led kind in the led suit, 2 means it is a ruff (a
/// well-formed formation of the led kind in trump, only possible when
/// the led suit itself was not trump).
fn play_class(
    cards: &[Card],
    led_kind: FormationKind,
    led_suit: EffectiveSuit,
    trump: TrumpContext,
) -> u8 {
    let Ok(formation) = Formation::recognize(cards, trump) else {
        return 0;
    };
    if formation.kind() != led_kind {
        return 0;
    }
    let suit = formation.base_suit(trump);
    if suit == led_suit {
        1
    } else if led_suit != EffectiveSuit::Trump && suit == EffectiveSuit::Trump {
        2
    } else {
        0
    }
}

/// Suit-following validation for a non-leading play, per spec §4.4.
/// Does not consult whether the play can subsequently *win* the trick
/// (that's decided once all four plays are in) — only whether it is a
/// legal play at all.
pub fn validate_follow(
    led: &Formation,
    hand: &[Card],
    proposed: &[Card],
    trump: TrumpContext,
) -> Result<(), EngineError> {
    let required_len = led.len();
    if proposed.len() != required_len {
        return Err(EngineError::WrongFormationSize {
            expected: required_len,
            actual: proposed.len(),
        });
    }

    let led_suit = led.base_suit(trump);
    let hand_of_led: Vec<Card> = hand
        .iter()
        .copied()
        .filter(|c| trump.effective_suit(*c) == led_suit)
        .collect();

    if hand_of_led.is_empty() {
        // Void in the led suit: ruff or sluff, no shape constraint.
        return Ok(());
    }

    if hand_of_led.len() < required_len {
        // Must play every led-suit card held, filling the remainder
        // (sluffs) from elsewhere in the hand.
        let all_led_cards_played = count_by_face(&hand_of_led)
            .iter()
            .all(|(face, count)| count_of_face(proposed, *face) >= *count);
        if !all_led_cards_played {
            return Err(EngineError::SuitFollowingViolated {
                reason: "must play every held card of the led suit before sluffing",
            });
        }
        return Ok(());
    }

    // hand_of_led.len() >= required_len: must use only led-suit cards,
    // and must match shape as far as possible.
    let proposed_all_led_suit = proposed
        .iter()
        .all(|c| trump.effective_suit(*c) == led_suit);
    if !proposed_all_led_suit {
        return Err(EngineError::SuitFollowingViolated {
            reason: "must follow the led suit while holding enough cards of it",
        });
    }

    match led.kind() {
        FormationKind::Single => Ok(()),
        FormationKind::Pair => {
            let has_pair = count_by_face(&hand_of_led).values().any(|c| *c >= 2);
            if has_pair {
                match Formation::recognize(proposed, trump) {
                    Ok(Formation::Pair(_)) => Ok(()),
                    _ => Err(EngineError::SuitFollowingViolated {
                        reason: "must play a pair of the led suit when holding one",
                    }),
                }
            } else {
                Ok(())
            }
        }
        FormationKind::Tractor(k) => {
            let max_run = max_tractor_run_length(&hand_of_led, led_suit, trump);
            if max_run >= k {
                match Formation::recognize(proposed, trump) {
                    Ok(Formation::Tractor(pairs)) if pairs.len() == k => Ok(()),
                    _ => Err(EngineError::SuitFollowingViolated {
                        reason: "must play a matching tractor of the led suit when holding one",
                    }),
                }
            } else {
                let available_pairs = count_by_face(&hand_of_led).values().filter(|c| **c >= 2).count();
                let target_pairs = available_pairs.min(k);
                let pairs_in_proposed = count_by_face(proposed).values().filter(|c| **c >= 2).count();
                if pairs_in_proposed == target_pairs {
                    Ok(())
                } else {
                    Err(EngineError::SuitFollowingViolated {
                        reason: "must play as many pairs of the led suit as available before singles",
                    })
                }
            }
        }
    }
}

#[derive(PartialEq, Eq, Hash, Clone, Copy)]
enum Face {
    Standard(crate::card::Suit, Rank),
    Joker(crate::card::JokerKind),
}

fn face_of(card: Card) -> Face {
    match card {
        Card::Standard { suit, rank, .. } => Face::Standard(suit, rank),
        Card::Joker { joker, .. } => Face::Joker(joker),
    }
}

fn count_by_face(cards: &[Card]) -> HashMap<Face, usize> {
    let mut counts = HashMap::new();
    for card in cards {
        *counts.entry(face_of(*card)).or_insert(0) += 1;
    }
    counts
}

fn count_of_face(cards: &[Card], face: Face) -> usize {
    cards.iter().filter(|c| face_of(**c) == face).count()
}

/// The length, in pairs, of the longest run of consecutive same-suit
/// ranks that each have two copies available — the same shape a tractor
/// requires, but computed over a raw hand slice rather than a already-
/// recognized `Formation`. Twos and jokers never participate.
fn max_tractor_run_length(cards: &[Card], suit: EffectiveSuit, trump: TrumpContext) -> usize {
    let mut counts: HashMap<u8, u8> = HashMap::new();
    for card in cards {
        if let Card::Standard { rank, .. } = card {
            if *rank == Rank::Two {
                continue;
            }
            if trump.effective_suit(*card) != suit {
                continue;
            }
            *counts.entry(rank.ordinal()).or_insert(0) += 1;
        }
    }
    let mut ordinals: Vec<u8> = counts
        .iter()
        .filter(|(_, count)| **count >= 2)
        .map(|(rank, _)| *rank)
        .collect();
    ordinals.sort_unstable();

    let mut best = 0usize;
    let mut run = 0usize;
    let mut prev: Option<u8> = None;
    for ordinal in ordinals {
        if prev == Some(ordinal - 1) {
            run += 1;
        } else {
            run = 1;
        }
        best = best.max(run);
        prev = Some(ordinal);
    }
    best
}

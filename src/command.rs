use serde::{Deserialize, Serialize};

use crate::card::{Card, Suit};
use crate::seat::Seat;

/// A single command issued against a `Match`, per spec.md §4.8. Every
/// command either fully applies (returning the `Event`s it produced) or
/// is rejected outright with no state mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "command")]
pub enum Command {
    StartMatch {
        players: [String; 4],
        seating: [Seat; 4],
        dealer: Seat,
        first_leader: Option<Seat>,
    },
    PlaceBid {
        seat: Seat,
        amount: u32,
    },
    Pass {
        seat: Seat,
    },
    DeclareTrump {
        seat: Seat,
        suit: Suit,
    },
    ExchangeKitty {
        seat: Seat,
        cards: Vec<Card>,
    },
    PlayFormation {
        seat: Seat,
        cards: Vec<Card>,
    },
}

impl Command {
    /// Every `Seat` value this command carries, so the dispatcher can
    /// range-check them all before any of the match's per-seat arrays are
    /// indexed by them.
    pub fn seats(&self) -> Vec<Seat> {
        match self {
            Command::StartMatch {
                seating,
                dealer,
                first_leader,
                ..
            } => {
                let mut seats = seating.to_vec();
                seats.push(*dealer);
                seats.extend(*first_leader);
                seats
            }
            Command::PlaceBid { seat, .. } => vec![*seat],
            Command::Pass { seat } => vec![*seat],
            Command::DeclareTrump { seat, .. } => vec![*seat],
            Command::ExchangeKitty { seat, .. } => vec![*seat],
            Command::PlayFormation { seat, .. } => vec![*seat],
        }
    }
}

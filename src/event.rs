use serde::{Deserialize, Serialize};

use crate::card::{Card, Suit};
use crate::seat::{Seat, Team};

/// Everything a `Match` can emit. The event log is the single source of
/// truth a caller may persist to reconstruct any state (spec.md §4.8);
/// the engine itself never reads its own history back.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum Event {
    MatchStarted {
        seating: [Seat; 4],
    },
    CardsDealt {
        hand_sizes: [usize; 4],
        kitty_size: usize,
    },
    BidPlaced {
        seat: Seat,
        amount: u32,
    },
    Passed {
        seat: Seat,
    },
    BiddingClosed {
        declarer: Seat,
        contract: u32,
    },
    TrumpDeclared {
        seat: Seat,
        suit: Suit,
    },
    KittyExchanged {
        seat: Seat,
        kitty: Vec<Card>,
    },
    TrickPlayed {
        seat: Seat,
        cards: Vec<Card>,
    },
    TrickClosed {
        winner: Seat,
        points: u32,
    },
    MatchEnded {
        winner_team: Team,
        defenders_points: u32,
        kitty_bonus: u32,
    },
}

/// An `Event` tagged with the `Match` it belongs to and its position in
/// that match's event stream, per spec.md §6: "Each event carries: match
/// id, monotonic sequence number (starting at 1), event kind tag, and a
/// kind-specific payload." Sequence numbers are gap-free within a match,
/// so a caller persisting the stream can rehydrate by replaying from 1.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub match_id: u64,
    pub sequence: u64,
    #[serde(flatten)]
    pub event: Event,
}

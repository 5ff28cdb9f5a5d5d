use serde::{Deserialize, Serialize};

use crate::card::{Card, Suit};
use crate::match_state::Phase;
use crate::seat::{Seat, Team};

/// One seat as seen by a particular observer: full hand if the observer
/// is that seat, otherwise only a count. Grounded on
/// `judgment_server::room::Room::hand_of_player`, which withholds a
/// player's cards from every requester but that player.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeatView {
    pub seat: Seat,
    pub player: String,
    pub hand: Option<Vec<Card>>,
    pub hand_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuctionView {
    pub current_bid: u32,
    pub turn: Seat,
    pub closed: bool,
}

/// A read-only, observer-scoped projection of a `Match`, per spec.md
/// §4.8. Hides every seat's hand but the observer's own, and hides the
/// pre-exchange kitty from everyone except the declarer mid-exchange;
/// after `Ended` the final kitty is visible to all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchView {
    pub id: u64,
    pub phase: Phase,
    pub seats: [SeatView; 4],
    pub dealer: Seat,
    pub first_leader: Seat,
    pub auction: Option<AuctionView>,
    pub declarer: Option<Seat>,
    pub trump_suit: Option<Suit>,
    pub kitty: Option<Vec<Card>>,
    pub tricks_closed: usize,
    pub contract: Option<u32>,
    pub winner_team: Option<Team>,
}

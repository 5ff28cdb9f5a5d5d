use crate::config::MatchConfig;
use crate::error::EngineError;
use crate::seat::Seat;

/// One entry in the auction's public history, in the order it happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BidEvent {
    Bid { seat: Seat, amount: u32 },
    Pass { seat: Seat },
}

/// The descending-bid auction, per spec.md §4.5. `currentBid` starts at
/// the configured ceiling (`startBid`) and only ever decreases; there is
/// no bid on record until the first `PlaceBid` succeeds.
#[derive(Debug, Clone)]
pub struct Auction {
    ceiling: u32,
    start_bid: u32,
    min_bid: u32,
    step: u32,
    allow_opening_pass: bool,
    history: Vec<BidEvent>,
    passed: [bool; 4],
    has_bid: bool,
    last_bidder: Option<Seat>,
    turn: Seat,
}

impl Auction {
    pub fn new(config: &MatchConfig, leader: Seat) -> Auction {
        Auction {
            ceiling: config.start_bid,
            start_bid: config.start_bid,
            min_bid: config.min_bid,
            step: config.step,
            allow_opening_pass: config.allow_opening_pass,
            history: Vec::new(),
            passed: [false; 4],
            has_bid: false,
            last_bidder: None,
            turn: leader,
        }
    }

    pub fn history(&self) -> &[BidEvent] {
        &self.history
    }

    pub fn current_bid(&self) -> u32 {
        self.ceiling
    }

    pub fn turn(&self) -> Seat {
        self.turn
    }

    /// Closed once every seat but the last bidder has passed. A pass is
    /// permanent (a passed seat never acts again), so this is equivalent
    /// to spec.md's `consecutivePasses >= 3` counter without needing to
    /// reset a counter on every new bid: once three of the four seats
    /// have passed *at all*, the fourth is the only one left to act.
    pub fn is_closed(&self) -> bool {
        self.has_bid && self.passed.iter().filter(|passed| !**passed).count() == 1
    }

    /// The auction's winner and the contract they won it at, once closed.
    pub fn outcome(&self) -> Option<(Seat, u32)> {
        if self.is_closed() {
            self.last_bidder.map(|seat| (seat, self.ceiling))
        } else {
            None
        }
    }

    pub fn place_bid(&mut self, seat: Seat, amount: u32) -> Result<(), EngineError> {
        self.check_turn(seat)?;
        if amount % self.step != self.start_bid % self.step {
            return Err(EngineError::InvalidBid {
                amount,
                reason: "bid is not a multiple of the configured step away from the start bid",
            });
        }
        if amount < self.min_bid || amount >= self.ceiling {
            return Err(EngineError::InvalidBid {
                amount,
                reason: "bid must be at least minBid and strictly below the current bid",
            });
        }
        self.ceiling = amount;
        self.has_bid = true;
        self.last_bidder = Some(seat);
        self.history.push(BidEvent::Bid { seat, amount });
        self.advance_turn();
        Ok(())
    }

    pub fn pass(&mut self, seat: Seat) -> Result<(), EngineError> {
        self.check_turn(seat)?;
        if !self.has_bid && !self.allow_opening_pass {
            return Err(EngineError::PassDenied {
                seat,
                reason: "this configuration does not allow an opening pass",
            });
        }
        // Check for collapse before mutating anything: a command that
        // fails must leave the auction exactly as it found it.
        let is_the_last_unpassed_seat = self
            .passed
            .iter()
            .enumerate()
            .all(|(i, passed)| *passed || i == seat.index());
        if !self.has_bid && is_the_last_unpassed_seat {
            return Err(EngineError::BiddingCollapsed);
        }

        self.passed[seat.index()] = true;
        self.history.push(BidEvent::Pass { seat });
        if !self.is_closed() {
            self.advance_turn();
        }
        Ok(())
    }

    fn check_turn(&self, seat: Seat) -> Result<(), EngineError> {
        if !seat.is_valid() {
            return Err(EngineError::UnknownSeat(seat));
        }
        if self.is_closed() {
            return Err(EngineError::PhaseError {
                expected: "Bidding (open)",
                actual: "Bidding (closed)",
            });
        }
        if self.passed[seat.index()] {
            return Err(EngineError::PassDenied {
                seat,
                reason: "seat has already passed",
            });
        }
        if seat != self.turn {
            return Err(EngineError::TurnError {
                actor: seat,
                expected: self.turn,
            });
        }
        Ok(())
    }

    fn advance_turn(&mut self) {
        let mut next = self.turn.next();
        for _ in 0..4 {
            if !self.passed[next.index()] {
                break;
            }
            next = next.next();
        }
        self.turn = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> MatchConfig {
        MatchConfig::default()
    }

    fn seat(i: u8) -> Seat {
        Seat::from_index(i).unwrap()
    }

    #[test]
    fn bidding_closure_scenario_from_spec() {
        let mut auction = Auction::new(&config(), seat(0));
        auction.place_bid(seat(0), 120).unwrap();
        auction.pass(seat(1)).unwrap();
        auction.place_bid(seat(2), 115).unwrap();
        auction.pass(seat(3)).unwrap();
        auction.pass(seat(0)).unwrap();
        assert!(auction.is_closed());
        assert_eq!(auction.outcome(), Some((seat(2), 115)));
    }

    #[test]
    fn passed_seat_cannot_act_again() {
        let mut auction = Auction::new(&config(), seat(0));
        auction.place_bid(seat(0), 120).unwrap();
        auction.pass(seat(1)).unwrap();
        let err = auction.place_bid(seat(1), 110);
        assert!(err.is_err());
    }

    #[test]
    fn bid_must_be_strictly_below_the_current_ceiling() {
        let mut auction = Auction::new(&config(), seat(0));
        assert!(auction.place_bid(seat(0), 125).is_err());
        assert!(auction.place_bid(seat(0), 95 - 5).is_err());
        assert!(auction.place_bid(seat(0), 120).is_ok());
    }

    #[test]
    fn all_four_passing_with_no_bid_collapses_the_auction() {
        let mut auction = Auction::new(&config(), seat(0));
        auction.pass(seat(0)).unwrap();
        auction.pass(seat(1)).unwrap();
        auction.pass(seat(2)).unwrap();
        let err = auction.pass(seat(3));
        assert_eq!(err, Err(EngineError::BiddingCollapsed));
    }

    #[test]
    fn opening_pass_denied_when_configuration_disallows_it() {
        let mut config = config();
        config.allow_opening_pass = false;
        let mut auction = Auction::new(&config, seat(0));
        assert!(auction.pass(seat(0)).is_err());
    }

    #[test]
    fn a_seat_index_outside_the_table_is_rejected_before_any_array_indexing() {
        let mut auction = Auction::new(&config(), seat(0));
        // `from_index` itself refuses to build this value; reach past it the
        // way a deserialized wire payload with `seat: 9` could.
        let out_of_range = Seat::test_out_of_range();
        assert_eq!(
            auction.place_bid(out_of_range, 120),
            Err(EngineError::UnknownSeat(out_of_range))
        );
        assert_eq!(
            auction.pass(out_of_range),
            Err(EngineError::UnknownSeat(out_of_range))
        );
    }
}

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::bidding::Auction;
use crate::card::{Card, Suit};
use crate::command::Command;
use crate::config::MatchConfig;
use crate::deck::Deck;
use crate::error::EngineError;
use crate::event::{Event, EventEnvelope};
use crate::kitty::KittyExchange;
use crate::player::Player;
use crate::seat::{Seat, Team};
use crate::trick::Trick;
use crate::trump::TrumpContext;
use crate::view::{AuctionView, MatchView, SeatView};

/// The match's current stage, per spec.md §3. `Dealing` is entered and
/// left synchronously inside `StartMatch` — there is no standalone
/// command that observes the match sitting in it — but it is kept as a
/// distinct value because the state it names (cards shuffled, not yet
/// dealt) is real even if momentary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Waiting,
    Dealing,
    Bidding,
    TrumpDeclaration,
    KittyExchange,
    Playing,
    Ended,
}

impl Phase {
    fn label(self) -> &'static str {
        match self {
            Phase::Waiting => "Waiting",
            Phase::Dealing => "Dealing",
            Phase::Bidding => "Bidding",
            Phase::TrumpDeclaration => "TrumpDeclaration",
            Phase::KittyExchange => "KittyExchange",
            Phase::Playing => "Playing",
            Phase::Ended => "Ended",
        }
    }
}

/// The full state of one hand of Chinese Bridge, per spec.md §3. Holds
/// no reference to any transport, persistence, or identity layer — the
/// engine's only inputs are the commands it is handed and the random
/// source/clock the caller injects (spec.md §1).
#[derive(Debug, Clone)]
pub struct Match {
    id: u64,
    config: MatchConfig,
    phase: Phase,
    players: [String; 4],
    seats: [Player; 4],
    dealer: Seat,
    first_leader: Seat,
    auction: Option<Auction>,
    declarer: Option<Seat>,
    trump: Option<TrumpContext>,
    kitty: Vec<Card>,
    tricks_closed: usize,
    defenders_points: u32,
    current_trick: Option<Trick>,
    contract: Option<u32>,
    winner_team: Option<Team>,
    next_sequence: u64,
}

impl Match {
    pub fn new(id: u64, config: MatchConfig) -> Match {
        config.validate();
        Match {
            id,
            config,
            phase: Phase::Waiting,
            players: [String::new(), String::new(), String::new(), String::new()],
            seats: [Player::new(), Player::new(), Player::new(), Player::new()],
            dealer: Seat::ALL[0],
            first_leader: Seat::ALL[0],
            auction: None,
            declarer: None,
            trump: None,
            kitty: Vec::new(),
            tricks_closed: 0,
            defenders_points: 0,
            current_trick: None,
            contract: None,
            winner_team: None,
            next_sequence: 1,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Dispatch a single command, per spec.md §4.8. `rng` is consulted
    /// only by `StartMatch`; every other command ignores it. On error,
    /// no field of `self` has been mutated.
    pub fn apply<R: Rng + ?Sized>(
        &mut self,
        command: Command,
        rng: &mut R,
    ) -> Result<Vec<EventEnvelope>, EngineError> {
        if self.phase == Phase::Ended {
            return Err(EngineError::MatchEnded);
        }
        for seat in command.seats() {
            if !seat.is_valid() {
                return Err(EngineError::UnknownSeat(seat));
            }
        }
        let events = match command {
            Command::StartMatch {
                players,
                seating,
                dealer,
                first_leader,
            } => self.start(players, seating, dealer, first_leader, rng),
            Command::PlaceBid { seat, amount } => self.place_bid(seat, amount),
            Command::Pass { seat } => self.pass(seat),
            Command::DeclareTrump { seat, suit } => self.declare_trump(seat, suit),
            Command::ExchangeKitty { seat, cards } => self.exchange_kitty(seat, cards),
            Command::PlayFormation { seat, cards } => self.play_formation(seat, cards),
        }?;
        Ok(events
            .into_iter()
            .map(|event| {
                let sequence = self.next_sequence;
                self.next_sequence += 1;
                EventEnvelope {
                    match_id: self.id,
                    sequence,
                    event,
                }
            })
            .collect())
    }

    fn expect_phase(&self, expected: Phase) -> Result<(), EngineError> {
        if self.phase != expected {
            return Err(EngineError::PhaseError {
                expected: expected.label(),
                actual: self.phase.label(),
            });
        }
        Ok(())
    }

    fn start(
        &mut self,
        players: [String; 4],
        seating: [Seat; 4],
        dealer: Seat,
        first_leader: Option<Seat>,
        rng: &mut (impl Rng + ?Sized),
    ) -> Result<Vec<Event>, EngineError> {
        self.expect_phase(Phase::Waiting)?;
        self.phase = Phase::Dealing;

        let mut deck = Deck::new_shoe();
        deck.validate_composition()?;
        deck.shuffle(rng);
        let dealt = deck.deal(4, self.config.hand_size, self.config.kitty_size);

        let hand_sizes = [
            dealt.hands[0].len(),
            dealt.hands[1].len(),
            dealt.hands[2].len(),
            dealt.hands[3].len(),
        ];
        for (seat, hand) in self.seats.iter_mut().zip(dealt.hands) {
            seat.assign(hand);
        }
        self.kitty = dealt.kitty;
        // `seating[i]` is the table seat that `players[i]` occupies; dealing
        // itself is purely positional (seat `i` always gets hand `i`), so
        // `seating` only has to steer which identity is recorded at which
        // seat.
        for (player_name, seat) in players.into_iter().zip(seating.iter().copied()) {
            self.players[seat.index()] = player_name;
        }
        self.dealer = dealer;
        self.first_leader = first_leader.unwrap_or_else(|| dealer.next());
        self.auction = Some(Auction::new(&self.config, self.first_leader));
        self.phase = Phase::Bidding;

        Ok(vec![
            Event::MatchStarted { seating },
            Event::CardsDealt {
                hand_sizes,
                kitty_size: self.kitty.len(),
            },
        ])
    }

    fn place_bid(&mut self, seat: Seat, amount: u32) -> Result<Vec<Event>, EngineError> {
        self.expect_phase(Phase::Bidding)?;
        let auction = self.auction.as_mut().expect("auction exists during Bidding");
        auction.place_bid(seat, amount)?;
        let mut events = vec![Event::BidPlaced { seat, amount }];
        self.close_auction_if_done(&mut events);
        Ok(events)
    }

    fn pass(&mut self, seat: Seat) -> Result<Vec<Event>, EngineError> {
        self.expect_phase(Phase::Bidding)?;
        let auction = self.auction.as_mut().expect("auction exists during Bidding");
        auction.pass(seat)?;
        let mut events = vec![Event::Passed { seat }];
        self.close_auction_if_done(&mut events);
        Ok(events)
    }

    fn close_auction_if_done(&mut self, events: &mut Vec<Event>) {
        let auction = self.auction.as_ref().expect("auction exists during Bidding");
        if let Some((declarer, contract)) = auction.outcome() {
            self.declarer = Some(declarer);
            self.contract = Some(contract);
            self.phase = Phase::TrumpDeclaration;
            events.push(Event::BiddingClosed { declarer, contract });
        }
    }

    fn declare_trump(&mut self, seat: Seat, suit: Suit) -> Result<Vec<Event>, EngineError> {
        if self.trump.is_some() {
            return Err(EngineError::TrumpAlreadyDeclared);
        }
        self.expect_phase(Phase::TrumpDeclaration)?;
        let declarer = self.declarer.expect("declarer exists during TrumpDeclaration");
        if seat != declarer {
            return Err(EngineError::TurnError {
                actor: seat,
                expected: declarer,
            });
        }
        if !self.config.trump_options.contains(&suit) {
            return Err(EngineError::TrumpOptionNotAllowed { suit });
        }
        self.trump = Some(TrumpContext::new(suit));
        KittyExchange::open(&mut self.seats[declarer.index()], self.kitty.clone());
        self.phase = Phase::KittyExchange;
        Ok(vec![Event::TrumpDeclared { seat, suit }])
    }

    fn exchange_kitty(&mut self, seat: Seat, cards: Vec<Card>) -> Result<Vec<Event>, EngineError> {
        if self.trump.is_none() {
            return Err(EngineError::TrumpNotDeclared);
        }
        self.expect_phase(Phase::KittyExchange)?;
        let declarer = self.declarer.expect("declarer exists during KittyExchange");
        if seat != declarer {
            return Err(EngineError::TurnError {
                actor: seat,
                expected: declarer,
            });
        }
        let new_kitty = KittyExchange::exchange(
            &mut self.seats[declarer.index()],
            cards,
            self.config.kitty_size,
        )?;
        self.kitty = new_kitty.clone();
        self.phase = Phase::Playing;
        self.current_trick = Some(Trick::new(declarer));
        Ok(vec![Event::KittyExchanged {
            seat,
            kitty: new_kitty,
        }])
    }

    fn play_formation(&mut self, seat: Seat, cards: Vec<Card>) -> Result<Vec<Event>, EngineError> {
        if self.trump.is_none() {
            return Err(EngineError::TrumpNotDeclared);
        }
        self.expect_phase(Phase::Playing)?;
        let trump = self.trump.expect("trump exists during Playing");
        let trick = self
            .current_trick
            .as_mut()
            .expect("current trick exists during Playing");

        let expected_turn = trick.next_to_play();
        if seat != expected_turn {
            return Err(EngineError::TurnError {
                actor: seat,
                expected: expected_turn,
            });
        }
        if let Some(missing) = self.seats[seat.index()].first_missing(&cards) {
            return Err(EngineError::CardsNotInHand { seat, card: missing });
        }
        let hand = self.seats[seat.index()].hand();

        trick.record_play(seat, cards.clone(), hand, trump)?;
        self.seats[seat.index()].remove_all(&cards);

        let mut events = vec![Event::TrickPlayed { seat, cards }];

        if trick.is_complete() {
            let outcome = trick.close(trump);
            self.tricks_closed += 1;
            self.defenders_points += self.points_for_defenders(outcome.winner, outcome.points);
            events.push(Event::TrickClosed {
                winner: outcome.winner,
                points: outcome.points,
            });

            if self.seats.iter().all(|p| p.is_empty()) {
                events.push(self.finish_hand(outcome.winner));
            } else {
                self.current_trick = Some(Trick::new(outcome.winner));
            }
        }

        Ok(events)
    }

    fn points_for_defenders(&self, winner: Seat, points: u32) -> u32 {
        let declarer_team = self.declarer.expect("declarer exists during Playing").team();
        if winner.team() != declarer_team {
            points
        } else {
            0
        }
    }

    fn finish_hand(&mut self, last_trick_winner: Seat) -> Event {
        let declarer_team = self.declarer.expect("declarer exists at hand end").team();
        let defenders_team = declarer_team.other();
        let kitty_points: u32 = self.kitty.iter().map(|c| c.points()).sum();
        let kitty_bonus = if last_trick_winner.team() == defenders_team {
            kitty_points
        } else {
            0
        };
        let score = self.defenders_points + kitty_bonus;
        let contract = self.contract.expect("contract exists at hand end");
        self.winner_team = Some(if score >= contract {
            defenders_team
        } else {
            declarer_team
        });
        self.phase = Phase::Ended;
        Event::MatchEnded {
            winner_team: self.winner_team.expect("just set"),
            defenders_points: self.defenders_points,
            kitty_bonus,
        }
    }

    /// A read-only, observer-scoped projection, per spec.md §4.8.
    pub fn view(&self, observer: Seat) -> MatchView {
        let seats = std::array::from_fn(|i| {
            let seat = Seat::from_index(i as u8).expect("i < 4");
            let player = &self.seats[i];
            SeatView {
                seat,
                player: self.players[i].clone(),
                hand: (seat == observer).then(|| player.hand().to_vec()),
                hand_count: player.len(),
            }
        });

        let kitty_visible = self.phase == Phase::Ended
            || (self.phase == Phase::KittyExchange && Some(observer) == self.declarer);

        MatchView {
            id: self.id,
            phase: self.phase,
            seats,
            dealer: self.dealer,
            first_leader: self.first_leader,
            auction: self.auction.as_ref().map(|a| AuctionView {
                current_bid: a.current_bid(),
                turn: a.turn(),
                closed: a.is_closed(),
            }),
            declarer: self.declarer,
            trump_suit: self.trump.map(|t| t.suit()),
            kitty: kitty_visible.then(|| self.kitty.clone()),
            tricks_closed: self.tricks_closed,
            contract: self.contract,
            winner_team: self.winner_team,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn seat(i: u8) -> Seat {
        Seat::from_index(i).unwrap()
    }

    fn started_match() -> Match {
        let mut m = Match::new(1, MatchConfig::default());
        let mut rng = ChaCha20Rng::from_seed([3; 32]);
        m.apply(
            Command::StartMatch {
                players: ["N".into(), "E".into(), "S".into(), "W".into()],
                seating: Seat::ALL,
                dealer: seat(0),
                first_leader: Some(seat(0)),
            },
            &mut rng,
        )
        .unwrap();
        m
    }

    #[test]
    fn start_match_deals_and_opens_bidding() {
        let m = started_match();
        assert_eq!(m.phase(), Phase::Bidding);
        for seat in Seat::ALL {
            assert_eq!(m.seats[seat.index()].len(), 25);
        }
        assert_eq!(m.kitty.len(), 8);
    }

    #[test]
    fn view_hides_other_hands_but_not_the_observers_own() {
        let m = started_match();
        let view = m.view(seat(1));
        assert!(view.seats[1].hand.is_some());
        assert!(view.seats[0].hand.is_none());
        assert_eq!(view.seats[0].hand_count, 25);
    }

    #[test]
    fn bidding_closure_walks_the_match_into_trump_declaration() {
        let mut m = started_match();
        let mut rng = ChaCha20Rng::from_seed([1; 32]);
        m.apply(Command::PlaceBid { seat: seat(0), amount: 120 }, &mut rng)
            .unwrap();
        m.apply(Command::Pass { seat: seat(1) }, &mut rng).unwrap();
        m.apply(Command::PlaceBid { seat: seat(2), amount: 115 }, &mut rng)
            .unwrap();
        m.apply(Command::Pass { seat: seat(3) }, &mut rng).unwrap();
        m.apply(Command::Pass { seat: seat(0) }, &mut rng).unwrap();
        assert_eq!(m.phase(), Phase::TrumpDeclaration);
        assert_eq!(m.declarer, Some(seat(2)));
        assert_eq!(m.contract, Some(115));
    }

    #[test]
    fn kitty_exchange_before_trump_is_declared_is_rejected() {
        let mut m = started_match();
        let mut rng = ChaCha20Rng::from_seed([1; 32]);
        let err = m.apply(Command::ExchangeKitty { seat: seat(0), cards: vec![] }, &mut rng);
        assert_eq!(err, Err(EngineError::TrumpNotDeclared));
    }

    #[test]
    fn play_formation_before_trump_is_declared_is_rejected() {
        let mut m = started_match();
        let mut rng = ChaCha20Rng::from_seed([1; 32]);
        let err = m.apply(Command::PlayFormation { seat: seat(0), cards: vec![] }, &mut rng);
        assert_eq!(err, Err(EngineError::TrumpNotDeclared));
    }

    #[test]
    fn declaring_trump_twice_is_rejected() {
        let mut m = started_match();
        let mut rng = ChaCha20Rng::from_seed([1; 32]);
        m.apply(Command::PlaceBid { seat: seat(0), amount: 120 }, &mut rng)
            .unwrap();
        m.apply(Command::Pass { seat: seat(1) }, &mut rng).unwrap();
        m.apply(Command::Pass { seat: seat(2) }, &mut rng).unwrap();
        m.apply(Command::Pass { seat: seat(3) }, &mut rng).unwrap();
        m.apply(Command::DeclareTrump { seat: seat(0), suit: Suit::Hearts }, &mut rng)
            .unwrap();
        let err = m.apply(Command::DeclareTrump { seat: seat(0), suit: Suit::Spades }, &mut rng);
        assert_eq!(err, Err(EngineError::TrumpAlreadyDeclared));
    }

    #[test]
    fn trump_outside_the_configured_options_is_rejected() {
        let config = MatchConfig {
            trump_options: vec![Suit::Hearts],
            ..MatchConfig::default()
        };
        let mut m = Match::new(1, config);
        let mut rng = ChaCha20Rng::from_seed([3; 32]);
        m.apply(
            Command::StartMatch {
                players: ["N".into(), "E".into(), "S".into(), "W".into()],
                seating: Seat::ALL,
                dealer: seat(0),
                first_leader: Some(seat(0)),
            },
            &mut rng,
        )
        .unwrap();
        m.apply(Command::PlaceBid { seat: seat(0), amount: 120 }, &mut rng)
            .unwrap();
        m.apply(Command::Pass { seat: seat(1) }, &mut rng).unwrap();
        m.apply(Command::Pass { seat: seat(2) }, &mut rng).unwrap();
        m.apply(Command::Pass { seat: seat(3) }, &mut rng).unwrap();

        let err = m.apply(Command::DeclareTrump { seat: seat(0), suit: Suit::Spades }, &mut rng);
        assert_eq!(err, Err(EngineError::TrumpOptionNotAllowed { suit: Suit::Spades }));
        assert_eq!(m.phase(), Phase::TrumpDeclaration);

        m.apply(Command::DeclareTrump { seat: seat(0), suit: Suit::Hearts }, &mut rng)
            .unwrap();
        assert_eq!(m.phase(), Phase::KittyExchange);
    }

    #[test]
    fn event_sequence_numbers_are_contiguous_across_commands() {
        let mut m = Match::new(9, MatchConfig::default());
        let mut rng = ChaCha20Rng::from_seed([3; 32]);
        let started = m
            .apply(
                Command::StartMatch {
                    players: ["N".into(), "E".into(), "S".into(), "W".into()],
                    seating: Seat::ALL,
                    dealer: seat(0),
                    first_leader: Some(seat(0)),
                },
                &mut rng,
            )
            .unwrap();
        assert_eq!(started[0].sequence, 1);
        assert_eq!(started[1].sequence, 2);
        assert!(started.iter().all(|e| e.match_id == m.id));

        let next = m.apply(Command::PlaceBid { seat: seat(0), amount: 120 }, &mut rng)
            .unwrap();
        assert_eq!(next[0].sequence, 3);
    }

    #[test]
    fn an_opening_pass_that_would_collapse_the_auction_leaves_it_untouched() {
        let mut m = started_match();
        let mut rng = ChaCha20Rng::from_seed([1; 32]);
        m.apply(Command::Pass { seat: seat(0) }, &mut rng).unwrap();
        m.apply(Command::Pass { seat: seat(1) }, &mut rng).unwrap();
        m.apply(Command::Pass { seat: seat(2) }, &mut rng).unwrap();
        let err = m.apply(Command::Pass { seat: seat(3) }, &mut rng);
        assert_eq!(err, Err(EngineError::BiddingCollapsed));
        assert_eq!(m.phase(), Phase::Bidding);

        // The fourth seat's pass was rejected, not silently recorded -
        // it can still legally place a bid instead.
        m.apply(Command::PlaceBid { seat: seat(3), amount: 100 }, &mut rng)
            .unwrap();
    }

    #[test]
    fn start_match_seats_players_according_to_the_seating_permutation() {
        let mut m = Match::new(1, MatchConfig::default());
        let mut rng = ChaCha20Rng::from_seed([3; 32]);
        // "N" is the 0th entry in `players` but is seated at table seat 2,
        // not seat 0: a non-identity `seating` must actually be honored.
        m.apply(
            Command::StartMatch {
                players: ["N".into(), "E".into(), "S".into(), "W".into()],
                seating: [seat(2), seat(3), seat(0), seat(1)],
                dealer: seat(0),
                first_leader: Some(seat(0)),
            },
            &mut rng,
        )
        .unwrap();
        assert_eq!(m.players[seat(2).index()], "N");
        assert_eq!(m.players[seat(3).index()], "E");
        assert_eq!(m.players[seat(0).index()], "S");
        assert_eq!(m.players[seat(1).index()], "W");
    }

    #[test]
    fn a_command_naming_a_seat_outside_the_table_is_rejected() {
        let mut m = started_match();
        let mut rng = ChaCha20Rng::from_seed([1; 32]);
        let out_of_range = Seat::test_out_of_range();
        let err = m.apply(Command::Pass { seat: out_of_range }, &mut rng);
        assert_eq!(err, Err(EngineError::UnknownSeat(out_of_range)));
    }

    #[test]
    fn commands_after_match_ended_are_rejected() {
        let tiny = MatchConfig {
            hand_size: 1,
            kitty_size: 104,
            ..MatchConfig::default()
        };
        let mut m = Match::new(2, tiny);
        let mut rng = ChaCha20Rng::from_seed([4; 32]);
        m.apply(
            Command::StartMatch {
                players: ["N".into(), "E".into(), "S".into(), "W".into()],
                seating: Seat::ALL,
                dealer: seat(0),
                first_leader: Some(seat(0)),
            },
            &mut rng,
        )
        .unwrap();
        m.apply(Command::PlaceBid { seat: seat(0), amount: 120 }, &mut rng)
            .unwrap();
        m.apply(Command::Pass { seat: seat(1) }, &mut rng).unwrap();
        m.apply(Command::Pass { seat: seat(2) }, &mut rng).unwrap();
        m.apply(Command::Pass { seat: seat(3) }, &mut rng).unwrap();
        m.apply(Command::DeclareTrump { seat: seat(0), suit: Suit::Hearts }, &mut rng)
            .unwrap();

        let discard = m.view(seat(0)).seats[0].hand.clone().unwrap()[..104].to_vec();
        m.apply(Command::ExchangeKitty { seat: seat(0), cards: discard }, &mut rng)
            .unwrap();

        for s in Seat::ALL {
            let hand = m.view(s).seats[s.index()].hand.clone().unwrap();
            m.apply(Command::PlayFormation { seat: s, cards: vec![hand[0]] }, &mut rng)
                .unwrap();
        }
        assert_eq!(m.phase(), Phase::Ended);

        let err = m.apply(Command::Pass { seat: seat(0) }, &mut rng);
        assert_eq!(err, Err(EngineError::MatchEnded));
    }
}

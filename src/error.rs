use thiserror::Error;

use crate::card::Card;
use crate::formation::FormationError;
use crate::seat::Seat;

/// Every way a command can be rejected. State is never mutated when a
/// command returns an error — command execution is atomic with respect
/// to the `Match`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("command does not apply to the current phase (expected {expected}, was {actual})")]
    PhaseError {
        expected: &'static str,
        actual: &'static str,
    },

    #[error("it is not {actor}'s turn (expected {expected})")]
    TurnError { actor: Seat, expected: Seat },

    #[error("{0} is not part of this match")]
    UnknownSeat(Seat),

    #[error("bid {amount} is not a legal bid: {reason}")]
    InvalidBid { amount: u32, reason: &'static str },

    #[error("{seat} cannot pass: {reason}")]
    PassDenied { seat: Seat, reason: &'static str },

    #[error("trump has already been declared")]
    TrumpAlreadyDeclared,

    #[error("trump has not been declared yet")]
    TrumpNotDeclared,

    #[error("{suit} is not a configured trump option")]
    TrumpOptionNotAllowed { suit: crate::card::Suit },

    #[error("kitty exchange is invalid: {reason}")]
    InvalidKittyExchange { reason: &'static str },

    #[error("{seat} does not hold {card}")]
    CardsNotInHand { seat: Seat, card: Card },

    #[error("cards do not form a valid formation: {0}")]
    InvalidFormation(#[from] FormationError),

    #[error("play has {actual} cards, led formation has {expected}")]
    WrongFormationSize { expected: usize, actual: usize },

    #[error("play violates suit-following rules: {reason}")]
    SuitFollowingViolated { reason: &'static str },

    #[error("deck composition is invalid: {0}")]
    InvalidDeck(#[from] crate::deck::InvalidDeck),

    #[error("all four seats passed without any bid being placed")]
    BiddingCollapsed,

    #[error("match has already ended")]
    MatchEnded,
}

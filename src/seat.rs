use serde::{Deserialize, Serialize};
use std::fmt;

/// A position at the table. Always one of four values; the mapping to
/// human-facing "North/East/South/West" labels is a caller concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Seat(u8);

impl Seat {
    pub const COUNT: u8 = 4;

    pub const ALL: [Seat; 4] = [Seat(0), Seat(1), Seat(2), Seat(3)];

    /// Build a seat from its table index (0..4). Returns `None` for any
    /// other value; the engine never constructs an out-of-range `Seat`.
    pub fn from_index(index: u8) -> Option<Seat> {
        if index < Self::COUNT {
            Some(Seat(index))
        } else {
            None
        }
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// True iff this `Seat` is one of the table's four positions. `Seat`
    /// derives `Deserialize` directly on its private field, so a value
    /// arriving over the wire can bypass `from_index`'s check; callers
    /// that index an array by a caller-supplied `Seat` must check this
    /// first.
    pub fn is_valid(self) -> bool {
        self.0 < Self::COUNT
    }

    /// Build a `Seat` outside the table, the way a permissive deserializer
    /// can (see `is_valid`'s doc comment). Only exists so tests can exercise
    /// the bounds checks without going through the wire.
    #[cfg(test)]
    pub(crate) fn test_out_of_range() -> Seat {
        Seat(9)
    }

    /// The seat one place clockwise from this one.
    pub fn next(self) -> Seat {
        Seat((self.0 + 1) % Self::COUNT)
    }

    /// This seat's fixed partner. Partnership is computed from seat
    /// parity, never stored.
    pub fn partner(self) -> Seat {
        Seat((self.0 + 2) % Self::COUNT)
    }

    /// Team identity, fixed by seat parity: seats 0/2 are one team, 1/3
    /// the other.
    pub fn team(self) -> Team {
        if self.0 % 2 == 0 {
            Team::A
        } else {
            Team::B
        }
    }
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "seat {}", self.0)
    }
}

/// One of the two fixed partnerships. `A` holds seats 0 and 2, `B` holds
/// seats 1 and 3; which physical team is "declarer's side" varies hand
/// to hand and is tracked separately on `Match`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    A,
    B,
}

impl Team {
    pub fn other(self) -> Team {
        match self {
            Team::A => Team::B,
            Team::B => Team::A,
        }
    }
}

use serde::{Deserialize, Serialize};

use crate::card::Suit;

/// Tunables recognized by the engine, per spec §6. All fields are
/// optional on the wire; `Default` supplies the documented defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    pub start_bid: u32,
    pub min_bid: u32,
    pub step: u32,
    pub allow_opening_pass: bool,
    pub kitty_size: usize,
    pub hand_size: usize,
    pub trump_options: Vec<Suit>,
}

impl Default for MatchConfig {
    fn default() -> Self {
        MatchConfig {
            start_bid: 125,
            min_bid: 95,
            step: 5,
            allow_opening_pass: true,
            kitty_size: 8,
            hand_size: 25,
            trump_options: Suit::ALL.to_vec(),
        }
    }
}

impl MatchConfig {
    /// Check the structural invariant `4 * hand_size + kitty_size ==
    /// 108` and that the bid range is internally consistent. Called
    /// once at `Match::new`; a config that fails this check is a
    /// programming error, not a runtime condition, so this panics
    /// rather than returning a `Result` — mirroring the teacher's
    /// `Judgment::new`, which asserts its own construction arguments.
    pub fn validate(&self) {
        assert_eq!(
            4 * self.hand_size + self.kitty_size,
            108,
            "4 * hand_size + kitty_size must equal 108, got 4*{} + {}",
            self.hand_size,
            self.kitty_size
        );
        assert!(
            self.min_bid <= self.start_bid,
            "min_bid must not exceed start_bid"
        );
        assert!(self.step > 0, "step must be positive");
        assert_eq!(
            (self.start_bid - self.min_bid) % self.step,
            0,
            "start_bid and min_bid must differ by a multiple of step"
        );
        assert!(
            !self.trump_options.is_empty(),
            "at least one trump option must be available"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_internally_consistent() {
        MatchConfig::default().validate();
    }

    #[test]
    #[should_panic]
    fn mismatched_hand_and_kitty_size_panics() {
        let config = MatchConfig {
            hand_size: 13,
            kitty_size: 8,
            ..MatchConfig::default()
        };
        config.validate();
    }
}

use crate::card::Card;
use crate::error::EngineError;
use crate::player::Player;

/// The declarer's kitty exchange, per spec.md §4.6. Has no teacher
/// precedent (the source game has no kitty); shaped directly from the
/// spec: fold the kitty into the declarer's hand, then require them to
/// discard back down to a fresh kitty of the same size.
pub struct KittyExchange;

impl KittyExchange {
    /// Fold `kitty` into the declarer's hand on entering `KittyExchange`.
    pub fn open(declarer: &mut Player, kitty: Vec<Card>) {
        declarer.add_all(kitty);
    }

    /// The declarer discards exactly `kitty_size` cards from their
    /// (now-enlarged) hand to form the new kitty. Returns the new kitty
    /// on success; the declarer's hand is reduced to `hand_size` cards.
    pub fn exchange(
        declarer: &mut Player,
        discarded: Vec<Card>,
        kitty_size: usize,
    ) -> Result<Vec<Card>, EngineError> {
        if discarded.len() != kitty_size {
            return Err(EngineError::InvalidKittyExchange {
                reason: "must discard exactly kitty_size cards",
            });
        }
        if !declarer.has_all(&discarded) {
            return Err(EngineError::InvalidKittyExchange {
                reason: "discard includes a card not held by the declarer",
            });
        }
        declarer.remove_all(&discarded);
        Ok(discarded)
    }
}

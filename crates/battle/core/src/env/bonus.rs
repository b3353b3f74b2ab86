use crate::state::StatKind;

/// Equipment-derived stat modifiers for the player's party.
///
/// Queried on every stat read of an ally; the result is authoritative for
/// that instant and is never cached by the battle.
pub trait StatBonusOracle: Send + Sync {
    /// Additive (possibly negative) bonus for `stat`.
    fn stat_bonus(&self, stat: StatKind) -> i32;
}

/// Identity bonus oracle: every stat reads at its base value.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoBonuses;

impl StatBonusOracle for NoBonuses {
    fn stat_bonus(&self, _stat: StatKind) -> i32 {
        0
    }
}

use crate::state::Side;

/// Why a battle ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum EndReason {
    AlliesDefeated,
    EnemiesDefeated,
    /// Both rosters emptied by the same turn.
    MutualDefeat,
    RoundLimit,
    /// Ended from outside, e.g. the party fled.
    Aborted,
}

impl EndReason {
    pub const fn winner(self) -> Option<Side> {
        match self {
            EndReason::AlliesDefeated => Some(Side::Enemy),
            EndReason::EnemiesDefeated => Some(Side::Ally),
            EndReason::MutualDefeat | EndReason::RoundLimit | EndReason::Aborted => None,
        }
    }

    /// Reason implied by which rosters are empty, if any is.
    pub const fn from_defeats(allies_defeated: bool, enemies_defeated: bool) -> Option<Self> {
        match (allies_defeated, enemies_defeated) {
            (true, true) => Some(EndReason::MutualDefeat),
            (true, false) => Some(EndReason::AlliesDefeated),
            (false, true) => Some(EndReason::EnemiesDefeated),
            (false, false) => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleOutcome {
    pub winner: Option<Side>,
    pub reason: EndReason,
    /// Rounds started before the battle ended.
    pub rounds: u32,
}

impl BattleOutcome {
    pub const fn new(reason: EndReason, rounds: u32) -> Self {
        Self {
            winner: reason.winner(),
            reason,
            rounds,
        }
    }
}

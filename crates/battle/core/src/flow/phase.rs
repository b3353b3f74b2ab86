use crate::state::{CombatantId, Targeting};

use super::BattleOutcome;

/// State of the battle loop.
///
/// `RoundStart → TurnOrderBuilt → TurnActive → (AwaitingDecision →)
/// ApplyingEffects → TurnComplete → TurnActive | RoundStart`, with
/// `BattleEnded` reachable from any phase and terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattlePhase {
    RoundStart,
    TurnOrderBuilt,
    TurnActive(CombatantId),
    AwaitingDecision(CombatantId),
    ApplyingEffects(CombatantId),
    TurnComplete(CombatantId),
    BattleEnded(BattleOutcome),
}

impl BattlePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            BattlePhase::RoundStart => "round_start",
            BattlePhase::TurnOrderBuilt => "turn_order_built",
            BattlePhase::TurnActive(_) => "turn_active",
            BattlePhase::AwaitingDecision(_) => "awaiting_decision",
            BattlePhase::ApplyingEffects(_) => "applying_effects",
            BattlePhase::TurnComplete(_) => "turn_complete",
            BattlePhase::BattleEnded(_) => "battle_ended",
        }
    }

    /// Returns true if [`crate::BattleLoop::advance`] cannot move past this phase
    /// on its own.
    pub fn is_blocked(&self) -> bool {
        matches!(
            self,
            BattlePhase::AwaitingDecision(_) | BattlePhase::BattleEnded(_)
        )
    }
}

/// An ability a waiting combatant can choose, with its selectable targets.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbilityOption {
    pub ability_id: String,
    pub name: String,
    pub targeting: Targeting,
    pub targets: Vec<CombatantId>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PendingDecision {
    pub combatant: CombatantId,
    pub abilities: Vec<AbilityOption>,
}

/// Where [`crate::BattleLoop::run_until_blocked`] stopped.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattleStatus {
    AwaitingDecision(PendingDecision),
    Ended(BattleOutcome),
}

//! Semantic events emitted by the battle loop for presentation layers.

use std::sync::mpsc;

use crate::engine::TurnEntry;
use crate::error::DecisionError;
use crate::flow::{AbilityOption, EndReason};
use crate::state::{CombatantId, EffectKind, Side};

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattleEvent {
    RoundStarted {
        round: u32,
        order: Vec<TurnEntry>,
    },
    TurnStarted {
        combatant: CombatantId,
    },
    /// A player-controlled combatant is waiting for a decision.
    AwaitingDecision {
        combatant: CombatantId,
        abilities: Vec<AbilityOption>,
    },
    AbilityUsed {
        actor: CombatantId,
        ability_id: String,
        target: CombatantId,
    },
    EffectApplied {
        actor: CombatantId,
        target: CombatantId,
        kind: EffectKind,
        amount: u32,
    },
    CombatantDied {
        combatant: CombatantId,
        side: Side,
    },
    TurnSkipped {
        combatant: CombatantId,
        reason: DecisionError,
    },
    /// Emitted after every executed or skipped turn. UIs may pace on it.
    TurnCompleted {
        combatant: CombatantId,
    },
    /// A whole side keeps failing to act.
    NoActionsAvailable {
        side: Side,
    },
    BattleEnded {
        winner: Option<Side>,
        reason: EndReason,
    },
}

impl BattleEvent {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::RoundStarted { .. } => "round_started",
            Self::TurnStarted { .. } => "turn_started",
            Self::AwaitingDecision { .. } => "awaiting_decision",
            Self::AbilityUsed { .. } => "ability_used",
            Self::EffectApplied { .. } => "effect_applied",
            Self::CombatantDied { .. } => "combatant_died",
            Self::TurnSkipped { .. } => "turn_skipped",
            Self::TurnCompleted { .. } => "turn_completed",
            Self::NoActionsAvailable { .. } => "no_actions_available",
            Self::BattleEnded { .. } => "battle_ended",
        }
    }
}

/// Receiver of [`BattleEvent`]s.
pub trait EventSink: Send {
    fn publish(&mut self, event: BattleEvent);
}

/// Discards every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn publish(&mut self, _event: BattleEvent) {}
}

impl EventSink for Vec<BattleEvent> {
    fn publish(&mut self, event: BattleEvent) {
        self.push(event);
    }
}

impl EventSink for mpsc::Sender<BattleEvent> {
    fn publish(&mut self, event: BattleEvent) {
        if self.send(event).is_err() {
            tracing::trace!(target: "battle::events", "event receiver dropped");
        }
    }
}

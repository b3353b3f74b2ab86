//! Battle state: combatants, their abilities, and the two rosters.
//!
//! Nothing here rolls dice or applies effects; that lives in
//! [`crate::engine`]. Mutation helpers that would let callers break roster
//! invariants are crate-private.
mod ability;
mod battle;
mod combatant;

pub use ability::{Ability, AbilityPriority, Effect, EffectKind, Targeting};
pub use battle::{BattleState, CombatantSpec, PartyHealth};
pub use combatant::{BaseStats, Combatant, CombatantId, Controller, Side, StatKind};

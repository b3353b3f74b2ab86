//! Turn order, targeting and effect application.
//!
//! The [`BattleEngine`] is the authoritative reducer for [`BattleState`]: it
//! rolls turn order, turns a [`Decision`] into concrete targets, applies the
//! ability's effects and removes whoever fell. The free functions it is built
//! from ([`build_turn_order`], [`resolve_targets`], [`apply_effects`]) are
//! public so they can be exercised in isolation.

mod effects;
mod targeting;
mod turns;

pub use effects::{AppliedEffect, EffectReport, apply_effects};
pub use targeting::{TargetSet, adjacent_indices, resolve_targets};
pub use turns::{TurnEntry, build_turn_order, speed_roll};

use crate::decision::Decision;
use crate::env::BattleEnv;
use crate::error::DecisionError;
use crate::state::{BattleState, Combatant, CombatantId};

/// Everything that happened while executing one decision.
#[derive(Clone, Debug, PartialEq)]
pub struct TurnOutcome {
    pub actor: CombatantId,
    pub ability_id: String,
    pub target: CombatantId,
    pub targets: TargetSet,
    pub applied: Vec<AppliedEffect>,
    /// Combatants removed from the battle by this turn, in the order they fell.
    pub fallen: Vec<Combatant>,
}

pub struct BattleEngine<'a> {
    state: &'a mut BattleState,
}

impl<'a> BattleEngine<'a> {
    pub fn new(state: &'a mut BattleState) -> Self {
        Self { state }
    }

    /// Executes `decision` for `actor`.
    ///
    /// Primary effects land on the primary target set, then secondary effects
    /// on the splash set. Every combatant brought to zero health is removed
    /// from its roster and the pending turn order before this returns.
    ///
    /// # Errors
    ///
    /// Returns a [`DecisionError`] without touching state when the actor is
    /// gone, does not know the ability, or the target is not in the roster the
    /// ability's targeting implies.
    pub fn execute(
        &mut self,
        env: &BattleEnv<'_>,
        actor: CombatantId,
        decision: &Decision,
    ) -> Result<TurnOutcome, DecisionError> {
        let combatant = self
            .state
            .combatant(actor)
            .ok_or(DecisionError::UnknownCombatant { combatant: actor })?;
        let ability = combatant
            .ability(&decision.ability_id)
            .cloned()
            .ok_or_else(|| DecisionError::UnknownAbility {
                combatant: actor,
                ability_id: decision.ability_id.clone(),
            })?;

        let targets = resolve_targets(&ability, actor, self.state, decision.target);
        if targets.primary.is_empty() {
            return Err(DecisionError::TargetNotInRoster {
                target: decision.target,
                ability_id: ability.id,
            });
        }

        tracing::debug!(
            target: "battle::engine",
            actor = %actor,
            ability = %ability.id,
            primary = ?targets.primary,
            secondary = ?targets.secondary,
            "executing ability"
        );

        let bonuses = env.bonuses();
        let mut report = apply_effects(
            self.state,
            bonuses,
            actor,
            &ability.primary_effects,
            &targets.primary,
        );
        report.merge(apply_effects(
            self.state,
            bonuses,
            actor,
            &ability.secondary_effects,
            &targets.secondary,
        ));

        let fallen = report
            .deaths
            .iter()
            .filter_map(|&id| self.state.remove_combatant(id))
            .collect();

        Ok(TurnOutcome {
            actor,
            ability_id: ability.id,
            target: decision.target,
            targets,
            applied: report.applied,
            fallen,
        })
    }
}

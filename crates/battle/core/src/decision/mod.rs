//! Decision sources for combatant turns.
//!
//! Automated combatants are driven by a [`DecisionPolicy`] called
//! synchronously from the battle loop. Player-controlled combatants suspend
//! the loop instead, and their [`Decision`] arrives through
//! [`crate::BattleLoop::submit_decision`].
mod priority;
mod random;

pub use priority::PriorityPolicy;
pub use random::RandomPolicy;

use crate::env::BattleEnv;
use crate::error::DecisionError;
use crate::state::{Ability, BattleState, Combatant, CombatantId, Targeting};

// Seed contexts keep the policy's draws independent of the speed dice, which
// use the die index as context.
pub(crate) const ABILITY_CONTEXT: u32 = 0x100;
pub(crate) const TARGET_CONTEXT: u32 = 0x101;
pub(crate) const PRIORITY_CONTEXT: u32 = 0x102;

/// An ability and primary target chosen for one turn.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Decision {
    pub ability_id: String,
    pub target: CombatantId,
}

impl Decision {
    pub fn new(ability_id: impl Into<String>, target: CombatantId) -> Self {
        Self {
            ability_id: ability_id.into(),
            target,
        }
    }
}

/// Chooses an ability and target for an automated combatant.
pub trait DecisionPolicy: Send + Sync {
    /// # Errors
    ///
    /// Fails with [`DecisionError::NoAbilities`] or
    /// [`DecisionError::NoValidTarget`] rather than producing a no-op.
    fn decide(
        &self,
        state: &BattleState,
        actor: CombatantId,
        env: &BattleEnv<'_>,
    ) -> Result<Decision, DecisionError>;

    fn name(&self) -> &'static str;
}

/// Combatants `actor` may pick as the primary target of `ability`.
pub fn implied_targets<'s>(
    state: &'s BattleState,
    actor: &'s Combatant,
    ability: &Ability,
) -> Vec<&'s Combatant> {
    match ability.targeting {
        Targeting::SelfOnly => vec![actor],
        targeting => state
            .roster(targeting.target_side(actor.side))
            .iter()
            .collect(),
    }
}

/// Looks up the actor and draws one of its abilities uniformly.
pub(crate) fn pick_ability<'s>(
    state: &'s BattleState,
    actor: CombatantId,
    env: &BattleEnv<'_>,
) -> Result<(&'s Combatant, &'s Ability), DecisionError> {
    let combatant = state
        .combatant(actor)
        .ok_or(DecisionError::UnknownCombatant { combatant: actor })?;

    let seed = crate::env::compute_seed(state.seed(), state.nonce(), actor.0, ABILITY_CONTEXT);
    let ability = env
        .rng()
        .pick(seed, combatant.abilities.len())
        .and_then(|index| combatant.abilities.get(index))
        .ok_or(DecisionError::NoAbilities { combatant: actor })?;

    Ok((combatant, ability))
}

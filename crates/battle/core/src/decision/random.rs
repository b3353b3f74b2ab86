use crate::env::{BattleEnv, compute_seed};
use crate::error::DecisionError;
use crate::state::{BattleState, CombatantId};

use super::{Decision, DecisionPolicy, TARGET_CONTEXT, implied_targets, pick_ability};

/// Picks an ability uniformly, then a target uniformly from the implied roster.
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomPolicy;

impl DecisionPolicy for RandomPolicy {
    fn decide(
        &self,
        state: &BattleState,
        actor: CombatantId,
        env: &BattleEnv<'_>,
    ) -> Result<Decision, DecisionError> {
        let (combatant, ability) = pick_ability(state, actor, env)?;
        let candidates = implied_targets(state, combatant, ability);

        let seed = compute_seed(state.seed(), state.nonce(), actor.0, TARGET_CONTEXT);
        let target = env
            .rng()
            .pick(seed, candidates.len())
            .and_then(|index| candidates.get(index))
            .ok_or_else(|| DecisionError::NoValidTarget {
                combatant: actor,
                ability_id: ability.id.clone(),
            })?;

        tracing::debug!(
            target: "battle::policy",
            policy = self.name(),
            actor = %actor,
            ability = %ability.id,
            target_id = %target.id,
            "decision made"
        );

        Ok(Decision::new(ability.id.clone(), target.id))
    }

    fn name(&self) -> &'static str {
        "random"
    }
}

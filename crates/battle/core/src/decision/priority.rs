use std::cmp::Reverse;

use crate::env::{BattleEnv, compute_seed};
use crate::error::DecisionError;
use crate::state::{AbilityPriority, BattleState, Combatant, CombatantId};

use super::{
    Decision, DecisionPolicy, PRIORITY_CONTEXT, TARGET_CONTEXT, implied_targets, pick_ability,
};

/// Picks an ability uniformly, then targets according to the ability's
/// [`AbilityPriority`].
///
/// The priority is honoured with probability `priority_strength`%; otherwise
/// (and always for [`AbilityPriority::Random`]) the target is drawn uniformly.
/// Ties go to the combatant earliest in roster order.
#[derive(Clone, Copy, Debug, Default)]
pub struct PriorityPolicy;

impl PriorityPolicy {
    fn prioritised<'s>(
        priority: AbilityPriority,
        candidates: &[&'s Combatant],
        env: &BattleEnv<'_>,
    ) -> Option<&'s Combatant> {
        let bonuses = env.bonuses();
        let candidates = candidates.iter().copied();
        match priority {
            AbilityPriority::LowHealth => candidates.min_by_key(|c| c.health()),
            AbilityPriority::HighHealth => candidates.min_by_key(|c| Reverse(c.health())),
            AbilityPriority::LowHealthPercent => {
                candidates.min_by_key(|c| c.health_percent(bonuses))
            }
            AbilityPriority::HighHealthPercent => {
                candidates.min_by_key(|c| Reverse(c.health_percent(bonuses)))
            }
            AbilityPriority::LowArmor => candidates.min_by_key(|c| c.armor(bonuses)),
            AbilityPriority::HighArmor => candidates.min_by_key(|c| Reverse(c.armor(bonuses))),
            AbilityPriority::Random => None,
        }
    }
}

impl DecisionPolicy for PriorityPolicy {
    fn decide(
        &self,
        state: &BattleState,
        actor: CombatantId,
        env: &BattleEnv<'_>,
    ) -> Result<Decision, DecisionError> {
        let (combatant, ability) = pick_ability(state, actor, env)?;
        let candidates = implied_targets(state, combatant, ability);
        let no_target = || DecisionError::NoValidTarget {
            combatant: actor,
            ability_id: ability.id.clone(),
        };
        if candidates.is_empty() {
            return Err(no_target());
        }

        let rng = env.rng();
        let honour = rng.chance(
            compute_seed(state.seed(), state.nonce(), actor.0, PRIORITY_CONTEXT),
            ability.priority_strength.min(100),
        );

        let prioritised = if honour {
            Self::prioritised(ability.priority, &candidates, env)
        } else {
            None
        };
        let target = match prioritised {
            Some(target) => target,
            None => {
                let seed = compute_seed(state.seed(), state.nonce(), actor.0, TARGET_CONTEXT);
                rng.pick(seed, candidates.len())
                    .and_then(|index| candidates.get(index).copied())
                    .ok_or_else(no_target)?
            }
        };

        tracing::debug!(
            target: "battle::policy",
            policy = self.name(),
            actor = %actor,
            ability = %ability.id,
            priority = ?ability.priority,
            honoured = honour,
            target_id = %target.id,
            "decision made"
        );

        Ok(Decision::new(ability.id.clone(), target.id))
    }

    fn name(&self) -> &'static str {
        "priority"
    }
}

//! Expansion of a chosen target into the full set of combatants an ability hits.

use crate::state::{Ability, BattleState, CombatantId, Targeting};

/// Combatants hit by primary and secondary effects respectively.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TargetSet {
    pub primary: Vec<CombatantId>,
    pub secondary: Vec<CombatantId>,
}

impl TargetSet {
    pub fn is_empty(&self) -> bool {
        self.primary.is_empty() && self.secondary.is_empty()
    }
}

/// Roster indices next to `index`: at most one on each side, never `index`
/// itself, never out of bounds.
pub fn adjacent_indices(index: usize, len: usize) -> impl Iterator<Item = usize> {
    let in_bounds = index < len;
    let left = index.checked_sub(1).filter(|_| in_bounds);
    let right = index.checked_add(1).filter(|&right| right < len);
    left.into_iter().chain(right)
}

/// Resolves an ability's targets for `actor` given its `chosen` target.
///
/// Returns an empty set when the actor has left the battle or `chosen` is not
/// on the side the ability's targeting rule requires. Callers treat an empty
/// set as a skipped turn.
pub fn resolve_targets(
    ability: &Ability,
    actor: CombatantId,
    state: &BattleState,
    chosen: CombatantId,
) -> TargetSet {
    let Some((actor_side, _)) = state.locate(actor) else {
        return TargetSet::default();
    };

    if ability.targeting == Targeting::SelfOnly {
        return TargetSet {
            primary: vec![actor],
            secondary: Vec::new(),
        };
    }

    let expected_side = ability.targeting.target_side(actor_side);
    let index = match state.locate(chosen) {
        Some((side, index)) if side == expected_side => index,
        _ => return TargetSet::default(),
    };
    let roster = state.roster(expected_side);

    let secondary = match ability.targeting {
        Targeting::SelfOnly | Targeting::Single | Targeting::Ally => Vec::new(),
        Targeting::Adjacent => adjacent_indices(index, roster.len())
            .map(|neighbour| roster[neighbour].id)
            .collect(),
        Targeting::All | Targeting::AllAllies => roster
            .iter()
            .map(|combatant| combatant.id)
            .filter(|&id| id != chosen)
            .collect(),
    };

    TargetSet {
        primary: vec![chosen],
        secondary,
    }
}

use crate::env::StatBonusOracle;
use crate::state::{BattleState, CombatantId, Effect, EffectKind};

/// Result of one effect landing on one target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AppliedEffect {
    pub target: CombatantId,
    pub kind: EffectKind,
    /// Magnitude computed from the actor's stats.
    pub planned: u32,
    /// Health actually removed or restored after clamping.
    pub actual: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EffectReport {
    pub applied: Vec<AppliedEffect>,
    /// Targets brought to zero health, each listed once, in the order they fell.
    pub deaths: Vec<CombatantId>,
}

impl EffectReport {
    pub fn merge(&mut self, other: EffectReport) {
        self.applied.extend(other.applied);
        self.deaths.extend(other.deaths);
    }
}

/// Applies `effects` to `targets`, effects in the outer loop and targets in
/// the inner loop.
///
/// Magnitudes scale with the actor's stats, re-read for every effect. A target
/// that reaches zero health is reported once and ignored by the remaining
/// effects of this application. Nobody is removed from the battle here.
pub fn apply_effects<B>(
    state: &mut BattleState,
    bonuses: &B,
    actor: CombatantId,
    effects: &[Effect],
    targets: &[CombatantId],
) -> EffectReport
where
    B: StatBonusOracle + ?Sized,
{
    let mut report = EffectReport::default();

    for effect in effects {
        let Some(source) = state.combatant(actor) else {
            break;
        };
        let planned = effect.magnitude(source.strength(bonuses), source.power(bonuses));

        for &target_id in targets {
            let Some(target) = state.combatant_mut(target_id) else {
                continue;
            };
            if !target.is_alive() {
                continue;
            }

            let max_health = target.max_health(bonuses);
            let actual = match effect.kind {
                EffectKind::Damage => target.take_damage(planned, max_health),
                EffectKind::Heal => target.heal(planned, max_health),
            };
            debug_assert!(target.health() <= max_health);

            report.applied.push(AppliedEffect {
                target: target_id,
                kind: effect.kind,
                planned,
                actual,
            });
            if !target.is_alive() {
                report.deaths.push(target_id);
            }
        }
    }

    report
}

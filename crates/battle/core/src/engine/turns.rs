use std::cmp::Reverse;

use crate::config::BattleConfig;
use crate::env::{BattleEnv, compute_seed};
use crate::state::CombatantId;

use super::BattleEngine;

/// One combatant's slot in a round's turn order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnEntry {
    pub combatant: CombatantId,
    /// Sum of the combatant's speed dice this round.
    pub roll: u32,
}

/// Sums `dice` rolls. Zero dice roll zero.
pub fn speed_roll(dice: u32, mut roll_die: impl FnMut(u32) -> u32) -> u32 {
    (0..dice).fold(0u32, |total, die| total.saturating_add(roll_die(die)))
}

/// Orders entrants by speed roll, fastest first.
///
/// `entrants` yields `(combatant, speed)` in encounter order; equal rolls keep
/// that order. `roll_die(combatant, die_index)` supplies each die, so the
/// result is a pure function of the entrants and the roll sequence.
pub fn build_turn_order<I, F>(entrants: I, mut roll_die: F) -> Vec<TurnEntry>
where
    I: IntoIterator<Item = (CombatantId, u32)>,
    F: FnMut(CombatantId, u32) -> u32,
{
    let mut order: Vec<TurnEntry> = entrants
        .into_iter()
        .map(|(combatant, speed)| TurnEntry {
            combatant,
            roll: speed_roll(speed, |die| roll_die(combatant, die)),
        })
        .collect();

    // stable: ties keep encounter order
    order.sort_by_key(|entry| Reverse(entry.roll));
    order
}

/// Round bookkeeping for BattleEngine.
impl<'a> BattleEngine<'a> {
    /// Opens a new round: re-rolls every living combatant's speed and replaces
    /// the pending turn order.
    pub fn start_round(&mut self, env: &BattleEnv<'_>, config: &BattleConfig) -> Vec<TurnEntry> {
        let round = self.state.begin_round();
        let nonce = self.state.advance_nonce();
        let seed = self.state.seed();
        let bonuses = env.bonuses();
        let rng = env.rng();

        let entrants: Vec<(CombatantId, u32)> = self
            .state
            .combatants()
            .map(|combatant| (combatant.id, combatant.speed(bonuses)))
            .collect();

        let order = build_turn_order(entrants, |combatant, die| {
            rng.roll_die(compute_seed(seed, nonce, combatant.0, die), config.dice_sides)
        });

        self.state
            .set_turn_order(order.iter().map(|entry| entry.combatant));

        tracing::debug!(
            target: "battle::engine",
            round,
            order = ?order,
            "turn order built"
        );

        order
    }

    /// Pops the next combatant due to act this round.
    pub fn next_turn(&mut self) -> Option<CombatantId> {
        self.state.pop_next_turn()
    }
}

use std::collections::{HashSet, VecDeque};

use crate::config::BattleConfig;
use crate::env::{BattleEnv, StatBonusOracle, TemplateOracle};
use crate::error::ConfigurationError;

use super::{Combatant, CombatantId, Side};

/// A request to place one combatant from a template into a roster.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatantSpec {
    pub template_id: String,
    /// Health carried over from an earlier battle. `None` starts at max health.
    pub health: Option<u32>,
}

impl CombatantSpec {
    pub fn new(template_id: impl Into<String>) -> Self {
        Self {
            template_id: template_id.into(),
            health: None,
        }
    }

    pub fn with_health(mut self, health: u32) -> Self {
        self.health = Some(health);
        self
    }
}

/// Surviving party member, as handed back to the caller for persistence.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PartyHealth {
    pub template_id: String,
    pub health: u32,
}

/// Complete state of a single battle.
///
/// Rosters only ever contain living combatants, and the pending turn order
/// only ever references combatants present in a roster. Both are upheld by
/// routing every removal through [`BattleState::remove_combatant`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleState {
    allies: Vec<Combatant>,
    enemies: Vec<Combatant>,
    turn_order: VecDeque<CombatantId>,
    round: u32,
    nonce: u64,
    seed: u64,
}

impl BattleState {
    /// Builds a battle from already-constructed combatants.
    ///
    /// Each combatant's side is forced to match the roster it was passed in.
    /// Combatants at zero health are left out.
    pub fn new(
        allies: Vec<Combatant>,
        enemies: Vec<Combatant>,
        seed: u64,
        config: &BattleConfig,
    ) -> Result<Self, ConfigurationError> {
        let allies = prepare_roster(allies, Side::Ally, config)?;
        let enemies = prepare_roster(enemies, Side::Enemy, config)?;

        let mut seen = HashSet::new();
        for combatant in allies.iter().chain(&enemies) {
            if !seen.insert(combatant.id) {
                return Err(ConfigurationError::DuplicateCombatant { id: combatant.id });
            }
        }

        Ok(Self {
            allies,
            enemies,
            turn_order: VecDeque::new(),
            round: 0,
            nonce: 0,
            seed,
        })
    }

    /// Builds a battle by spawning combatants from the template oracle.
    ///
    /// Ids are assigned sequentially, allies first.
    pub fn from_templates(
        env: &BattleEnv<'_>,
        config: &BattleConfig,
        allies: &[CombatantSpec],
        enemies: &[CombatantSpec],
        seed: u64,
    ) -> Result<Self, ConfigurationError> {
        let templates = env.templates()?;
        let mut next_id = 0u32;
        let allies = spawn_roster(env, templates, allies, Side::Ally, &mut next_id)?;
        let enemies = spawn_roster(env, templates, enemies, Side::Enemy, &mut next_id)?;
        Self::new(allies, enemies, seed, config)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    pub fn allies(&self) -> &[Combatant] {
        &self.allies
    }

    pub fn enemies(&self) -> &[Combatant] {
        &self.enemies
    }

    pub fn roster(&self, side: Side) -> &[Combatant] {
        match side {
            Side::Ally => &self.allies,
            Side::Enemy => &self.enemies,
        }
    }

    /// Every combatant in encounter order: allies by roster index, then enemies.
    pub fn combatants(&self) -> impl Iterator<Item = &Combatant> {
        self.allies.iter().chain(&self.enemies)
    }

    pub fn combatant(&self, id: CombatantId) -> Option<&Combatant> {
        self.combatants().find(|combatant| combatant.id == id)
    }

    pub(crate) fn combatant_mut(&mut self, id: CombatantId) -> Option<&mut Combatant> {
        self.allies
            .iter_mut()
            .chain(self.enemies.iter_mut())
            .find(|combatant| combatant.id == id)
    }

    /// Side and roster index of a combatant still in the battle.
    pub fn locate(&self, id: CombatantId) -> Option<(Side, usize)> {
        [Side::Ally, Side::Enemy].into_iter().find_map(|side| {
            self.roster(side)
                .iter()
                .position(|combatant| combatant.id == id)
                .map(|index| (side, index))
        })
    }

    pub fn contains(&self, id: CombatantId) -> bool {
        self.locate(id).is_some()
    }

    pub fn living_count(&self, side: Side) -> usize {
        self.roster(side).len()
    }

    pub fn is_defeated(&self, side: Side) -> bool {
        self.roster(side).is_empty()
    }

    /// Survivors of `side` with their current health.
    pub fn party_report(&self, side: Side) -> Vec<PartyHealth> {
        self.roster(side)
            .iter()
            .map(|combatant| PartyHealth {
                template_id: combatant.template_id.clone(),
                health: combatant.health(),
            })
            .collect()
    }

    /// Combatants still waiting to act this round, in order.
    pub fn pending_turns(&self) -> impl Iterator<Item = CombatantId> + '_ {
        self.turn_order.iter().copied()
    }

    /// Lowers any health above its effective max, e.g. after a max-health
    /// penalty was equipped before the battle was handed to a loop.
    pub(crate) fn clamp_health(&mut self, bonuses: &dyn StatBonusOracle) {
        for combatant in self.allies.iter_mut().chain(self.enemies.iter_mut()) {
            let max_health = combatant.max_health(bonuses);
            let health = combatant.health();
            if combatant.clamp_health(max_health) {
                tracing::debug!(
                    target: "battle::state",
                    combatant = %combatant.id,
                    health,
                    max_health,
                    "starting health above effective max, clamped"
                );
            }
        }
    }

    /// Removes a combatant from its roster and from the pending turn order.
    ///
    /// This is the only way a combatant leaves the battle.
    pub fn remove_combatant(&mut self, id: CombatantId) -> Option<Combatant> {
        let (side, index) = self.locate(id)?;
        self.turn_order.retain(|&pending| pending != id);
        let removed = match side {
            Side::Ally => self.allies.remove(index),
            Side::Enemy => self.enemies.remove(index),
        };
        Some(removed)
    }

    pub(crate) fn begin_round(&mut self) -> u32 {
        self.round += 1;
        self.round
    }

    /// Returns the current nonce and advances it.
    pub(crate) fn advance_nonce(&mut self) -> u64 {
        let nonce = self.nonce;
        self.nonce += 1;
        nonce
    }

    pub(crate) fn set_turn_order(&mut self, order: impl IntoIterator<Item = CombatantId>) {
        self.turn_order = order.into_iter().collect();
    }

    pub(crate) fn clear_turn_order(&mut self) {
        self.turn_order.clear();
    }

    /// Pops the next pending combatant, dropping any entry that no longer
    /// refers to a combatant in the battle.
    pub(crate) fn pop_next_turn(&mut self) -> Option<CombatantId> {
        while let Some(id) = self.turn_order.pop_front() {
            let present = self.contains(id);
            debug_assert!(present, "turn order held removed combatant {id}");
            if present {
                return Some(id);
            }
            tracing::warn!(
                target: "battle::state",
                combatant = %id,
                "dropping stale turn order entry"
            );
        }
        None
    }
}

fn spawn_roster(
    env: &BattleEnv<'_>,
    templates: &dyn TemplateOracle,
    specs: &[CombatantSpec],
    side: Side,
    next_id: &mut u32,
) -> Result<Vec<Combatant>, ConfigurationError> {
    let mut roster = Vec::with_capacity(specs.len());
    for spec in specs {
        let template = templates.template(&spec.template_id).ok_or_else(|| {
            ConfigurationError::TemplateNotFound {
                template_id: spec.template_id.clone(),
            }
        })?;

        let id = CombatantId(*next_id);
        *next_id += 1;

        let combatant = template.spawn(id, side);
        let max_health = combatant.max_health(env.bonuses());
        let health = spec.health.unwrap_or(max_health);
        roster.push(combatant.with_health(health, max_health));
    }
    Ok(roster)
}

fn prepare_roster(
    roster: Vec<Combatant>,
    side: Side,
    config: &BattleConfig,
) -> Result<Vec<Combatant>, ConfigurationError> {
    if roster.len() > config.max_roster_size {
        return Err(ConfigurationError::RosterTooLarge {
            side,
            size: roster.len(),
            max: config.max_roster_size,
        });
    }

    let mut prepared = Vec::with_capacity(roster.len());
    for mut combatant in roster {
        validate_combatant(&combatant)?;
        combatant.side = side;
        if combatant.is_alive() {
            prepared.push(combatant);
        } else {
            tracing::debug!(
                target: "battle::state",
                combatant = %combatant.id,
                name = %combatant.name,
                "combatant enters battle at zero health, leaving out of roster"
            );
        }
    }
    Ok(prepared)
}

fn validate_combatant(combatant: &Combatant) -> Result<(), ConfigurationError> {
    if combatant.abilities.is_empty() {
        return Err(ConfigurationError::NoAbilities {
            name: combatant.name.clone(),
        });
    }
    if combatant.base.max_health <= 0 {
        return Err(ConfigurationError::InvalidMaxHealth {
            name: combatant.name.clone(),
            max_health: combatant.base.max_health,
        });
    }
    if let Some(ability) = combatant.abilities.iter().find(|a| !a.is_well_formed()) {
        return Err(ConfigurationError::NonFiniteMultiplier {
            name: combatant.name.clone(),
            ability_id: ability.id.clone(),
        });
    }
    Ok(())
}

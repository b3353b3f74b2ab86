use std::fmt;

use crate::env::StatBonusOracle;

use super::Ability;

/// Identifier of a combatant, unique within a single battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatantId(pub u32);

impl fmt::Display for CombatantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Which roster a combatant fights for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "lowercase")]
pub enum Side {
    Ally,
    Enemy,
}

impl Side {
    pub const fn opposite(self) -> Self {
        match self {
            Side::Ally => Side::Enemy,
            Side::Enemy => Side::Ally,
        }
    }
}

/// Stat categories that equipment can raise or lower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum StatKind {
    MaxHealth,
    Armor,
    Speed,
    Strength,
    Power,
}

/// Stats as authored in a combatant template, before equipment bonuses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BaseStats {
    pub max_health: i32,
    pub armor: i32,
    pub speed: i32,
    pub strength: i32,
    pub power: i32,
}

impl BaseStats {
    pub const fn new(max_health: i32, armor: i32, speed: i32, strength: i32, power: i32) -> Self {
        Self {
            max_health,
            armor,
            speed,
            strength,
            power,
        }
    }

    pub const fn get(&self, stat: StatKind) -> i32 {
        match stat {
            StatKind::MaxHealth => self.max_health,
            StatKind::Armor => self.armor,
            StatKind::Speed => self.speed,
            StatKind::Strength => self.strength,
            StatKind::Power => self.power,
        }
    }
}

/// Who chooses a combatant's ability and target each turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Controller {
    /// Decided synchronously by the battle's [`crate::DecisionPolicy`].
    Automated,
    /// Supplied from outside; the battle loop suspends until it arrives.
    External,
}

/// A participant in battle.
///
/// Health is private so that every mutation goes through the clamped
/// [`Combatant::take_damage`] / [`Combatant::heal`] paths. Effective stats are
/// never cached: each read combines the base value with the current bonus
/// from the [`StatBonusOracle`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Combatant {
    pub id: CombatantId,
    pub template_id: String,
    pub name: String,
    pub side: Side,
    pub is_player_controlled: bool,
    pub base: BaseStats,
    health: u32,
    /// Insertion order is display/selection order.
    pub abilities: Vec<Ability>,
}

impl Combatant {
    /// Creates a combatant at full (base) health.
    pub fn new(
        id: CombatantId,
        template_id: impl Into<String>,
        name: impl Into<String>,
        side: Side,
        base: BaseStats,
        abilities: Vec<Ability>,
    ) -> Self {
        Self {
            id,
            template_id: template_id.into(),
            name: name.into(),
            side,
            is_player_controlled: false,
            base,
            health: base.max_health.max(0) as u32,
            abilities,
        }
    }

    pub fn with_player_control(mut self, is_player_controlled: bool) -> Self {
        self.is_player_controlled = is_player_controlled;
        self
    }

    /// Overrides the starting health, clamped to `[0, max_health]`.
    pub fn with_health(mut self, health: u32, max_health: u32) -> Self {
        self.health = health.min(max_health);
        self
    }

    pub fn health(&self) -> u32 {
        self.health
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    pub fn controller(&self) -> Controller {
        if self.is_player_controlled {
            Controller::External
        } else {
            Controller::Automated
        }
    }

    pub fn ability(&self, ability_id: &str) -> Option<&Ability> {
        self.abilities.iter().find(|ability| ability.id == ability_id)
    }

    /// Effective value of a stat. Bonuses apply to the player's party only.
    pub fn stat<B>(&self, stat: StatKind, bonuses: &B) -> i32
    where
        B: StatBonusOracle + ?Sized,
    {
        let base = self.base.get(stat);
        match self.side {
            Side::Ally => base.saturating_add(bonuses.stat_bonus(stat)),
            Side::Enemy => base,
        }
    }

    /// Effective max health, never below 1.
    pub fn max_health<B: StatBonusOracle + ?Sized>(&self, bonuses: &B) -> u32 {
        self.stat(StatKind::MaxHealth, bonuses).max(1) as u32
    }

    /// Effective speed, i.e. the number of dice rolled for turn order.
    pub fn speed<B: StatBonusOracle + ?Sized>(&self, bonuses: &B) -> u32 {
        self.stat(StatKind::Speed, bonuses).max(0) as u32
    }

    pub fn strength<B: StatBonusOracle + ?Sized>(&self, bonuses: &B) -> i32 {
        self.stat(StatKind::Strength, bonuses)
    }

    pub fn power<B: StatBonusOracle + ?Sized>(&self, bonuses: &B) -> i32 {
        self.stat(StatKind::Power, bonuses)
    }

    pub fn armor<B: StatBonusOracle + ?Sized>(&self, bonuses: &B) -> i32 {
        self.stat(StatKind::Armor, bonuses)
    }

    /// Current health as a percentage of effective max health.
    pub fn health_percent<B: StatBonusOracle + ?Sized>(&self, bonuses: &B) -> u32 {
        let max = self.max_health(bonuses);
        (u64::from(self.health.min(max)) * 100 / u64::from(max)) as u32
    }

    /// Subtracts up to `amount` health and returns what was actually removed.
    pub fn take_damage(&mut self, amount: u32, max_health: u32) -> u32 {
        self.self_heal(max_health);
        let actual = amount.min(self.health);
        self.health -= actual;
        actual
    }

    /// Adds up to `amount` health and returns what was actually restored.
    pub fn heal(&mut self, amount: u32, max_health: u32) -> u32 {
        self.self_heal(max_health);
        let actual = amount.min(max_health - self.health);
        self.health += actual;
        actual
    }

    /// Lowers health to `max_health` if above it. Returns whether it was.
    pub(crate) fn clamp_health(&mut self, max_health: u32) -> bool {
        let above = self.health > max_health;
        if above {
            self.health = max_health;
        }
        above
    }

    // Max health can shrink under us when equipment changes mid-battle.
    fn self_heal(&mut self, max_health: u32) {
        let health = self.health;
        if self.clamp_health(max_health) {
            tracing::warn!(
                target: "battle::state",
                combatant = %self.id,
                health,
                max_health,
                "health above max, clamping"
            );
        }
    }
}

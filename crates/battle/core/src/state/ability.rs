//! Abilities and the effects they carry.
//!
//! An [`Ability`] is immutable data: a [`Targeting`] rule that decides which
//! combatants are hit, plus two ordered effect lists. Primary effects land on
//! the chosen target; secondary effects land on the splash set implied by the
//! targeting rule (see [`crate::engine::resolve_targets`]).

use super::Side;

/// How an ability selects its targets.
///
/// The match in the targeting resolver is exhaustive over this enum, so a new
/// targeting kind fails to compile until its splash rule is written.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Targeting {
    /// The actor itself. Never splashes.
    SelfOnly,
    /// One opposing combatant.
    Single,
    /// One opposing combatant plus its roster neighbours.
    Adjacent,
    /// One combatant on the actor's own side.
    Ally,
    /// One combatant on the actor's side plus every other member of it.
    AllAllies,
    /// One opposing combatant plus every other member of that side.
    All,
}

impl Targeting {
    /// Side the chosen target must stand on, given the actor's side.
    pub const fn target_side(self, actor_side: Side) -> Side {
        match self {
            Targeting::SelfOnly | Targeting::Ally | Targeting::AllAllies => actor_side,
            Targeting::Single | Targeting::Adjacent | Targeting::All => actor_side.opposite(),
        }
    }

    /// Returns true if this targeting rule can produce secondary targets.
    pub const fn has_splash(self) -> bool {
        matches!(
            self,
            Targeting::Adjacent | Targeting::AllAllies | Targeting::All
        )
    }
}

/// Target preference used by non-random decision policies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AbilityPriority {
    LowHealth,
    LowHealthPercent,
    HighHealth,
    HighHealthPercent,
    LowArmor,
    HighArmor,
    #[default]
    Random,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "lowercase")]
pub enum EffectKind {
    Damage,
    Heal,
}

/// A single damage or heal computation.
///
/// Multipliers scale against the *acting* combatant's stats, never the target's.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Effect {
    pub kind: EffectKind,
    pub base_value: i32,
    pub strength_multiplier: f32,
    pub power_multiplier: f32,
}

impl Effect {
    pub const fn new(kind: EffectKind, base_value: i32) -> Self {
        Self {
            kind,
            base_value,
            strength_multiplier: 0.0,
            power_multiplier: 0.0,
        }
    }

    pub const fn damage(base_value: i32) -> Self {
        Self::new(EffectKind::Damage, base_value)
    }

    pub const fn heal(base_value: i32) -> Self {
        Self::new(EffectKind::Heal, base_value)
    }

    pub const fn with_strength(mut self, multiplier: f32) -> Self {
        self.strength_multiplier = multiplier;
        self
    }

    pub const fn with_power(mut self, multiplier: f32) -> Self {
        self.power_multiplier = multiplier;
        self
    }

    /// `round(base + str_mult * strength + pow_mult * power)`, floored at 0.
    ///
    /// Rounds half away from zero.
    pub fn magnitude(&self, strength: i32, power: i32) -> u32 {
        let raw = f64::from(self.base_value)
            + f64::from(self.strength_multiplier) * f64::from(strength)
            + f64::from(self.power_multiplier) * f64::from(power);
        // `as` saturates: negative and NaN become 0, overflow becomes u32::MAX
        raw.round() as u32
    }

    pub fn is_finite(&self) -> bool {
        self.strength_multiplier.is_finite() && self.power_multiplier.is_finite()
    }
}

/// An action a combatant can take on its turn.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ability {
    pub id: String,
    pub name: String,
    pub targeting: Targeting,
    pub priority: AbilityPriority,
    /// Percentage chance (0..=100) that a priority-aware policy honours
    /// [`Ability::priority`] instead of picking a target at random.
    pub priority_strength: u32,
    pub primary_effects: Vec<Effect>,
    pub secondary_effects: Vec<Effect>,
}

impl Ability {
    pub fn new(id: impl Into<String>, name: impl Into<String>, targeting: Targeting) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            targeting,
            priority: AbilityPriority::Random,
            priority_strength: 0,
            primary_effects: Vec::new(),
            secondary_effects: Vec::new(),
        }
    }

    pub fn with_primary(mut self, effect: Effect) -> Self {
        self.primary_effects.push(effect);
        self
    }

    pub fn with_secondary(mut self, effect: Effect) -> Self {
        self.secondary_effects.push(effect);
        self
    }

    pub fn with_priority(mut self, priority: AbilityPriority, strength: u32) -> Self {
        self.priority = priority;
        self.priority_strength = strength;
        self
    }

    /// Returns true if every effect has finite multipliers.
    pub fn is_well_formed(&self) -> bool {
        self.primary_effects
            .iter()
            .chain(&self.secondary_effects)
            .all(Effect::is_finite)
    }
}

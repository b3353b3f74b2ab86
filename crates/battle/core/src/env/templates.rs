//! Combatant templates and the oracle that serves them.
//!
//! A template is everything needed to spawn a combatant except its battle-local
//! id and side. Where templates come from (files, a registry, hard-coded
//! tables) is up to the [`TemplateOracle`] implementation.

use crate::state::{Ability, BaseStats, Combatant, CombatantId, Side};

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatantTemplate {
    pub template_id: String,
    pub name: String,
    pub stats: BaseStats,
    pub abilities: Vec<Ability>,
    pub is_player_controlled: bool,
}

impl CombatantTemplate {
    pub fn builder(template_id: impl Into<String>) -> CombatantTemplateBuilder {
        CombatantTemplateBuilder::new(template_id)
    }

    /// Creates a combatant at full health from this template.
    pub fn spawn(&self, id: CombatantId, side: Side) -> Combatant {
        Combatant::new(
            id,
            self.template_id.clone(),
            self.name.clone(),
            side,
            self.stats,
            self.abilities.clone(),
        )
        .with_player_control(self.is_player_controlled)
    }
}

/// Builder for constructing combatant templates.
#[derive(Debug)]
pub struct CombatantTemplateBuilder {
    template_id: String,
    name: Option<String>,
    stats: BaseStats,
    abilities: Vec<Ability>,
    is_player_controlled: bool,
}

impl CombatantTemplateBuilder {
    fn new(template_id: impl Into<String>) -> Self {
        Self {
            template_id: template_id.into(),
            name: None,
            stats: BaseStats::default(),
            abilities: Vec::new(),
            is_player_controlled: false,
        }
    }

    /// Set display name (defaults to the template id)
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn stats(mut self, stats: BaseStats) -> Self {
        self.stats = stats;
        self
    }

    /// Append an ability
    pub fn ability(mut self, ability: Ability) -> Self {
        self.abilities.push(ability);
        self
    }

    pub fn player_controlled(mut self, is_player_controlled: bool) -> Self {
        self.is_player_controlled = is_player_controlled;
        self
    }

    pub fn build(self) -> CombatantTemplate {
        CombatantTemplate {
            name: self.name.unwrap_or_else(|| self.template_id.clone()),
            template_id: self.template_id,
            stats: self.stats,
            abilities: self.abilities,
            is_player_controlled: self.is_player_controlled,
        }
    }
}

/// Oracle providing combatant templates by id.
pub trait TemplateOracle: Send + Sync {
    fn template(&self, template_id: &str) -> Option<CombatantTemplate>;
}

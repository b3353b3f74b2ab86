//! Template oracle implementing [`battle_core::TemplateOracle`].

use std::collections::HashMap;

use battle_core::{
    Ability, AbilityPriority, BaseStats, CombatantTemplate, Effect, TemplateOracle, Targeting,
};

use crate::api::{Result, RuntimeError};

/// Oracle providing combatant templates.
#[derive(Clone, Debug, Default)]
pub struct TemplateOracleImpl {
    templates: HashMap<String, CombatantTemplate>,
}

impl TemplateOracleImpl {
    /// Create an empty oracle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a template, keyed by its `template_id`. Replaces any template with
    /// the same id.
    pub fn add(&mut self, template: CombatantTemplate) {
        self.templates.insert(template.template_id.clone(), template);
    }

    /// Parse a JSON array of templates.
    pub fn from_json(json: &str) -> Result<Self> {
        let templates: Vec<CombatantTemplate> =
            serde_json::from_str(json).map_err(RuntimeError::Templates)?;
        let mut oracle = Self::new();
        for template in templates {
            oracle.add(template);
        }
        Ok(oracle)
    }

    /// Check if a template exists.
    pub fn contains(&self, id: &str) -> bool {
        self.templates.contains_key(id)
    }

    /// Get all template IDs.
    pub fn template_ids(&self) -> impl Iterator<Item = &String> {
        self.templates.keys()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// A small bestiary: two player-controlled heroes and four monsters.
    pub fn sample() -> Self {
        let mut oracle = Self::new();

        oracle.add(
            CombatantTemplate::builder("hero")
                .name("Hero")
                .stats(BaseStats::new(40, 2, 3, 5, 1))
                .ability(
                    Ability::new("slash", "Slash", Targeting::Single)
                        .with_primary(Effect::damage(2).with_strength(1.0)),
                )
                .ability(
                    Ability::new("cleave", "Cleave", Targeting::Adjacent)
                        .with_primary(Effect::damage(1).with_strength(1.0))
                        .with_secondary(Effect::damage(0).with_strength(0.5)),
                )
                .player_controlled(true)
                .build(),
        );
        oracle.add(
            CombatantTemplate::builder("cleric")
                .name("Cleric")
                .stats(BaseStats::new(30, 1, 2, 2, 5))
                .ability(
                    Ability::new("smite", "Smite", Targeting::Single)
                        .with_primary(Effect::damage(1).with_power(1.0)),
                )
                .ability(
                    Ability::new("mend", "Mend", Targeting::Ally)
                        .with_primary(Effect::heal(4).with_power(1.0))
                        .with_priority(AbilityPriority::LowHealthPercent, 80),
                )
                .ability(
                    Ability::new("prayer", "Prayer", Targeting::AllAllies)
                        .with_primary(Effect::heal(2).with_power(0.5))
                        .with_secondary(Effect::heal(1).with_power(0.5)),
                )
                .player_controlled(true)
                .build(),
        );
        oracle.add(
            CombatantTemplate::builder("goon")
                .name("Goon")
                .stats(BaseStats::new(20, 1, 2, 3, 0))
                .ability(
                    Ability::new("club", "Club", Targeting::Single)
                        .with_primary(Effect::damage(2).with_strength(1.0))
                        .with_priority(AbilityPriority::LowHealth, 50),
                )
                .build(),
        );
        oracle.add(
            CombatantTemplate::builder("slime")
                .name("Slime")
                .stats(BaseStats::new(14, 0, 1, 2, 0))
                .ability(
                    Ability::new("ooze", "Ooze", Targeting::Single)
                        .with_primary(Effect::damage(1).with_strength(1.0)),
                )
                .ability(
                    Ability::new("split", "Split", Targeting::SelfOnly)
                        .with_primary(Effect::heal(3)),
                )
                .build(),
        );
        oracle.add(
            CombatantTemplate::builder("bat")
                .name("Bat")
                .stats(BaseStats::new(8, 0, 4, 2, 0))
                .ability(
                    Ability::new("bite", "Bite", Targeting::Single)
                        .with_primary(Effect::damage(1).with_strength(1.0))
                        .with_priority(AbilityPriority::LowArmor, 60),
                )
                .build(),
        );
        oracle.add(
            CombatantTemplate::builder("ogre")
                .name("Ogre")
                .stats(BaseStats::new(60, 3, 1, 7, 0))
                .ability(
                    Ability::new("smash", "Smash", Targeting::Adjacent)
                        .with_primary(Effect::damage(2).with_strength(1.0))
                        .with_secondary(Effect::damage(2)),
                )
                .ability(
                    Ability::new("roar", "Roar", Targeting::All)
                        .with_primary(Effect::damage(1).with_strength(0.5))
                        .with_secondary(Effect::damage(1)),
                )
                .build(),
        );

        oracle
    }
}

impl TemplateOracle for TemplateOracleImpl {
    fn template(&self, template_id: &str) -> Option<CombatantTemplate> {
        self.templates.get(template_id).cloned()
    }
}

//! Traits describing the battle's external collaborators.
//!
//! Oracles expose combatant templates, equipment-derived stat bonuses and
//! seeded randomness. The [`BattleEnv`] aggregate bundles them so the engine
//! can reach everything it needs without coupling to concrete implementations.
mod bonus;
mod error;
mod rng;
mod templates;

use std::fmt;

pub use bonus::{NoBonuses, StatBonusOracle};
pub use error::OracleError;
pub use rng::{PcgRng, RngOracle, compute_seed};
pub use templates::{CombatantTemplate, CombatantTemplateBuilder, TemplateOracle};

/// Aggregates the read-only oracles a battle consults.
///
/// Bonuses and randomness are always required; templates are only needed to
/// build a battle, so they are optional.
#[derive(Clone, Copy)]
pub struct BattleEnv<'a> {
    templates: Option<&'a dyn TemplateOracle>,
    bonuses: &'a dyn StatBonusOracle,
    rng: &'a dyn RngOracle,
}

impl<'a> BattleEnv<'a> {
    pub fn new(bonuses: &'a dyn StatBonusOracle, rng: &'a dyn RngOracle) -> Self {
        Self {
            templates: None,
            bonuses,
            rng,
        }
    }

    pub fn with_templates(mut self, templates: &'a dyn TemplateOracle) -> Self {
        self.templates = Some(templates);
        self
    }

    /// Returns the TemplateOracle, or an error if not available.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::TemplatesNotAvailable` if no template oracle was provided.
    pub fn templates(&self) -> Result<&'a dyn TemplateOracle, OracleError> {
        self.templates.ok_or(OracleError::TemplatesNotAvailable)
    }

    pub fn bonuses(&self) -> &'a dyn StatBonusOracle {
        self.bonuses
    }

    pub fn rng(&self) -> &'a dyn RngOracle {
        self.rng
    }
}

impl fmt::Debug for BattleEnv<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BattleEnv")
            .field("templates", &self.templates.is_some())
            .finish_non_exhaustive()
    }
}

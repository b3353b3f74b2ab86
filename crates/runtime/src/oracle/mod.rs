//! Runtime implementations of the battle oracles.
//!
//! Bundles templates, stat bonuses and randomness into an [`OracleManager`]
//! so the runtime can build [`battle_core::BattleEnv`] views on demand.
mod equipment;
mod templates;

use std::sync::Arc;

use battle_core::{BattleEnv, NoBonuses, PcgRng, RngOracle, StatBonusOracle};

pub use equipment::{EquipmentBonusOracle, EquipmentItem};
pub use templates::TemplateOracleImpl;

/// Manages all oracle implementations and provides unified access
#[derive(Clone)]
pub struct OracleManager {
    templates: Arc<TemplateOracleImpl>,
    bonuses: Arc<dyn StatBonusOracle>,
    rng: Arc<dyn RngOracle>,
}

impl OracleManager {
    pub fn new(templates: Arc<TemplateOracleImpl>, bonuses: Arc<dyn StatBonusOracle>) -> Self {
        Self {
            templates,
            bonuses,
            rng: Arc::new(PcgRng),
        }
    }

    /// Sample bestiary, no equipment.
    pub fn sample() -> Self {
        Self::new(Arc::new(TemplateOracleImpl::sample()), Arc::new(NoBonuses))
    }

    pub fn with_rng(mut self, rng: Arc<dyn RngOracle>) -> Self {
        self.rng = rng;
        self
    }

    pub fn as_battle_env(&self) -> BattleEnv<'_> {
        BattleEnv::new(self.bonuses.as_ref(), self.rng.as_ref())
            .with_templates(self.templates.as_ref())
    }

    pub fn templates(&self) -> &TemplateOracleImpl {
        &self.templates
    }

    pub fn bonuses(&self) -> Arc<dyn StatBonusOracle> {
        Arc::clone(&self.bonuses)
    }

    pub fn rng(&self) -> Arc<dyn RngOracle> {
        Arc::clone(&self.rng)
    }
}

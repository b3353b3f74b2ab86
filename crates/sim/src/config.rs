//! Simulator configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

use battle_core::CombatantSpec;

#[derive(Debug, Clone)]
pub struct SimConfig {
    /// `SIM_ALLIES`: comma-separated template ids.
    pub allies: Vec<CombatantSpec>,
    /// `SIM_ENEMIES`: comma-separated template ids.
    pub enemies: Vec<CombatantSpec>,
    /// `SIM_JSON`: print the outcome as JSON.
    pub json: bool,
    /// `SIM_TEMPLATES`: JSON template file replacing the built-in bestiary.
    pub templates: Option<PathBuf>,
}

impl SimConfig {
    pub const DEFAULT_ALLIES: &'static str = "hero,cleric";
    pub const DEFAULT_ENEMIES: &'static str = "goon,slime,bat";
    pub const DEFAULT_MAX_ROUNDS: u32 = 100;

    pub fn from_env() -> Self {
        let allies = env::var("SIM_ALLIES").unwrap_or_else(|_| Self::DEFAULT_ALLIES.to_owned());
        let enemies =
            env::var("SIM_ENEMIES").unwrap_or_else(|_| Self::DEFAULT_ENEMIES.to_owned());

        Self {
            allies: parse_roster(&allies),
            enemies: parse_roster(&enemies),
            json: read_env_bool("SIM_JSON").unwrap_or(false),
            templates: env::var("SIM_TEMPLATES").ok().map(PathBuf::from),
        }
    }
}

/// `"hero, goon:12"` spawns a hero at full health and a goon at 12.
fn parse_roster(raw: &str) -> Vec<CombatantSpec> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| match entry.split_once(':') {
            Some((id, health)) => match health.trim().parse() {
                Ok(health) => CombatantSpec::new(id.trim()).with_health(health),
                Err(_) => CombatantSpec::new(id.trim()),
            },
            None => CombatantSpec::new(entry),
        })
        .collect()
}

fn read_env_bool(key: &str) -> Option<bool> {
    match env::var(key).ok()?.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

//! Headless battle simulator.
//!
//! Builds a battle from the template bestiary, lets the priority policy play
//! both sides, logs every event and prints the outcome.
//!
//! ```bash
//! SIM_ALLIES=hero,cleric SIM_ENEMIES=ogre BATTLE_SEED=7 RUST_LOG=debug \
//!     cargo run -p battle-sim
//! ```

mod config;

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::EnvFilter;

use battle_core::{NoBonuses, PriorityPolicy, Side};
use battle_runtime::{
    BattleRuntime, OracleManager, PolicyProvider, RuntimeConfig, TemplateOracleImpl, Topic,
};

use crate::config::SimConfig;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let sim_config = SimConfig::from_env();
    let mut runtime_config = RuntimeConfig::from_env();
    runtime_config
        .battle
        .max_rounds
        .get_or_insert(SimConfig::DEFAULT_MAX_ROUNDS);

    let oracles = load_oracles(&sim_config)?;

    tracing::info!(
        allies = sim_config.allies.len(),
        enemies = sim_config.enemies.len(),
        seed = ?runtime_config.seed,
        "Starting battle"
    );

    let runtime = BattleRuntime::builder()
        .config(runtime_config)
        .oracles(oracles.clone())
        .allies(sim_config.allies.clone())
        .enemies(sim_config.enemies.clone())
        .build()
        .await
        .context("failed to set up battle")?;

    let handle = runtime.handle();
    let loggers: Vec<_> = handle
        .subscribe_multiple(&[Topic::Turn, Topic::Combat, Topic::Outcome])
        .into_iter()
        .map(|(topic, mut rx)| {
            tokio::spawn(async move {
                loop {
                    match rx.recv().await {
                        Ok(event) => {
                            tracing::info!(?topic, kind = event.as_str(), "{event:?}");
                        }
                        Err(RecvError::Lagged(skipped)) => {
                            tracing::warn!(?topic, skipped, "event logger lagged");
                        }
                        Err(RecvError::Closed) => break,
                    }
                }
            })
        })
        .collect();

    let provider = PolicyProvider::new(Arc::new(PriorityPolicy), oracles.clone());
    let outcome = runtime.run(&provider).await?;
    let state = handle.query_state().await?;

    drop(handle);
    runtime.shutdown().await?;
    for logger in loggers {
        logger.await?;
    }

    let party = state.party_report(Side::Ally);
    if sim_config.json {
        let report = serde_json::json!({
            "outcome": outcome,
            "party": party,
            "seed": state.seed(),
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        let winner = outcome
            .winner
            .map_or_else(|| "nobody".to_owned(), |side| side.to_string());
        println!(
            "Battle over after {} rounds: {} ({winner} wins)",
            outcome.rounds, outcome.reason
        );
        for member in &party {
            println!("  {:<10} {:>4} hp", member.template_id, member.health);
        }
    }

    Ok(())
}

fn load_oracles(config: &SimConfig) -> Result<OracleManager> {
    let templates = match &config.templates {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read templates from {}", path.display()))?;
            TemplateOracleImpl::from_json(&json)?
        }
        None => TemplateOracleImpl::sample(),
    };
    Ok(OracleManager::new(Arc::new(templates), Arc::new(NoBonuses)))
}

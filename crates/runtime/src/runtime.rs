//! High-level runtime orchestrator.
//!
//! The runtime owns the battle worker, wires up command/event channels, and
//! exposes a builder-based API for clients to drive a battle.

use std::env;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use battle_core::{
    BattleConfig, BattleLoop, BattleOutcome, BattleState, BattleStatus, CombatantSpec,
    DecisionPolicy, PriorityPolicy,
};

use crate::api::{BattleHandle, DecisionProvider, Result, RuntimeError};
use crate::events::EventBus;
use crate::oracle::OracleManager;
use crate::workers::{BattleWorker, Command};

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub battle: BattleConfig,
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
    /// Battle seed. A random one is drawn at build time when unset.
    pub seed: Option<u64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            battle: BattleConfig::default(),
            event_buffer_size: 100,
            command_buffer_size: 32,
            seed: None,
        }
    }
}

impl RuntimeConfig {
    /// Defaults overridden by `BATTLE_*` environment variables. Unparseable
    /// values are ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(seed) = read_env("BATTLE_SEED") {
            config.seed = Some(seed);
        }
        if let Some(max_rounds) = read_env("BATTLE_MAX_ROUNDS") {
            config.battle.max_rounds = Some(max_rounds);
        }
        if let Some(dice_sides) = read_env("BATTLE_DICE_SIDES") {
            config.battle.dice_sides = dice_sides;
        }
        if let Some(size) = read_env("BATTLE_EVENT_BUFFER") {
            config.event_buffer_size = size;
        }
        if let Some(size) = read_env("BATTLE_COMMAND_BUFFER") {
            config.command_buffer_size = size;
        }

        config
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

/// Main runtime that orchestrates a battle
///
/// Runtime owns the worker; [`BattleHandle`] provides a cloneable façade for
/// clients.
pub struct BattleRuntime {
    handle: BattleHandle,
    worker: JoinHandle<()>,
}

impl BattleRuntime {
    /// Create a new runtime builder
    pub fn builder() -> BattleRuntimeBuilder {
        BattleRuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    pub fn handle(&self) -> BattleHandle {
        self.handle.clone()
    }

    /// Drive the battle to its end, asking `provider` for every
    /// player-controlled decision.
    ///
    /// A provider failing with [`RuntimeError::Decision`] skips that turn.
    /// Any other provider error stops the run and leaves the battle waiting;
    /// the caller may retry or [`BattleHandle::abort`].
    pub async fn run(&self, provider: &dyn DecisionProvider) -> Result<BattleOutcome> {
        let mut status = self.handle.status().await?;
        loop {
            match status {
                BattleStatus::Ended(outcome) => return Ok(outcome),
                BattleStatus::AwaitingDecision(pending) => {
                    let state = self.handle.query_state().await?;
                    status = match provider.provide_decision(&pending, &state).await {
                        Ok(decision) => self.handle.submit_decision(decision).await?,
                        Err(RuntimeError::Decision(reason)) => {
                            tracing::warn!(
                                target: "runtime::provider",
                                combatant = %pending.combatant,
                                error = %reason,
                                "provider could not decide, skipping turn"
                            );
                            self.handle.skip_decision(reason).await?
                        }
                        Err(error) => return Err(error),
                    };
                }
            }
        }
    }

    /// Shutdown the runtime gracefully
    ///
    /// The worker stops once every outstanding handle clone is dropped.
    pub async fn shutdown(self) -> Result<()> {
        drop(self.handle);
        self.worker.await.map_err(RuntimeError::WorkerJoin)
    }
}

/// Builder for [`BattleRuntime`] with flexible configuration.
pub struct BattleRuntimeBuilder {
    config: RuntimeConfig,
    oracles: Option<OracleManager>,
    allies: Vec<CombatantSpec>,
    enemies: Vec<CombatantSpec>,
    state: Option<BattleState>,
    policy: Arc<dyn DecisionPolicy>,
}

impl BattleRuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            oracles: None,
            allies: Vec::new(),
            enemies: Vec::new(),
            state: None,
            policy: Arc::new(PriorityPolicy),
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Set required oracle manager
    pub fn oracles(mut self, oracles: OracleManager) -> Self {
        self.oracles = Some(oracles);
        self
    }

    /// Party roster, spawned from templates at build time.
    pub fn allies(mut self, allies: impl IntoIterator<Item = CombatantSpec>) -> Self {
        self.allies = allies.into_iter().collect();
        self
    }

    /// Enemy roster, spawned from templates at build time.
    pub fn enemies(mut self, enemies: impl IntoIterator<Item = CombatantSpec>) -> Self {
        self.enemies = enemies.into_iter().collect();
        self
    }

    /// Provide a ready-made battle state instead of template rosters
    pub fn initial_state(mut self, state: BattleState) -> Self {
        self.state = Some(state);
        self
    }

    /// Policy for automated combatants (default: [`PriorityPolicy`])
    pub fn policy(mut self, policy: Arc<dyn DecisionPolicy>) -> Self {
        self.policy = policy;
        self
    }

    /// Build the runtime and spawn its worker
    pub async fn build(self) -> Result<BattleRuntime> {
        let oracles = self.oracles.ok_or(RuntimeError::MissingOracles)?;

        let state = match self.state {
            Some(state) => state,
            None => {
                let seed = self.config.seed.unwrap_or_else(rand::random::<u64>);
                let env = oracles.as_battle_env();
                BattleState::from_templates(
                    &env,
                    &self.config.battle,
                    &self.allies,
                    &self.enemies,
                    seed,
                )?
            }
        };

        let event_bus = EventBus::with_capacity(self.config.event_buffer_size);
        let (command_tx, command_rx) = mpsc::channel::<Command>(self.config.command_buffer_size);
        let handle = BattleHandle::new(command_tx, event_bus.clone());

        let battle = BattleLoop::builder(state)
            .config(self.config.battle)
            .bonuses(oracles.bonuses())
            .rng(oracles.rng())
            .policy(self.policy)
            .sink(event_bus)
            .build();

        let worker = BattleWorker::new(battle, command_rx);
        let worker = tokio::spawn(worker.run());

        Ok(BattleRuntime { handle, worker })
    }
}

//! Asynchronous abstraction for sourcing player decisions.
//!
//! Automated combatants are decided inside the battle worker by a core
//! [`DecisionPolicy`]. Player-controlled combatants suspend the battle, and
//! [`crate::BattleRuntime::run`] asks a [`DecisionProvider`] to fill the gap:
//! human input, scripted fixtures, or a policy standing in for the player.
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, mpsc};

use battle_core::{BattleState, Decision, DecisionPolicy, PendingDecision};

use super::errors::{Result, RuntimeError};
use crate::oracle::OracleManager;

#[async_trait]
pub trait DecisionProvider: Send + Sync {
    /// Provide a decision for the waiting combatant.
    ///
    /// # Arguments
    /// * `pending` - The waiting combatant and its selectable abilities/targets
    /// * `state` - Read-only snapshot of the battle
    async fn provide_decision(
        &self,
        pending: &PendingDecision,
        state: &BattleState,
    ) -> Result<Decision>;
}

/// Drives player-controlled combatants with a core policy.
pub struct PolicyProvider {
    policy: Arc<dyn DecisionPolicy>,
    oracles: OracleManager,
}

impl PolicyProvider {
    pub fn new(policy: Arc<dyn DecisionPolicy>, oracles: OracleManager) -> Self {
        Self { policy, oracles }
    }
}

#[async_trait]
impl DecisionProvider for PolicyProvider {
    async fn provide_decision(
        &self,
        pending: &PendingDecision,
        state: &BattleState,
    ) -> Result<Decision> {
        let env = self.oracles.as_battle_env();
        let decision = self.policy.decide(state, pending.combatant, &env)?;
        Ok(decision)
    }
}

/// Decisions pushed from outside (a UI, a test) over an mpsc channel.
pub struct ChannelProvider {
    rx: Mutex<mpsc::Receiver<Decision>>,
}

impl ChannelProvider {
    /// Creates the provider and the sender its decisions arrive on.
    pub fn new(buffer: usize) -> (Self, mpsc::Sender<Decision>) {
        let (tx, rx) = mpsc::channel(buffer);
        (Self { rx: Mutex::new(rx) }, tx)
    }
}

#[async_trait]
impl DecisionProvider for ChannelProvider {
    async fn provide_decision(
        &self,
        pending: &PendingDecision,
        _state: &BattleState,
    ) -> Result<Decision> {
        tracing::debug!(
            target: "runtime::provider",
            combatant = %pending.combatant,
            "waiting for external decision"
        );
        self.rx
            .lock()
            .await
            .recv()
            .await
            .ok_or(RuntimeError::DecisionChannelClosed)
    }
}

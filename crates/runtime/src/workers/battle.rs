//! Battle worker that owns the authoritative [`battle_core::BattleLoop`].
//!
//! Receives commands from [`crate::BattleHandle`], drives the loop until it
//! blocks, and replies with the resulting status. Events flow out through the
//! loop's sink, which is the runtime's [`crate::EventBus`].

use tokio::sync::{mpsc, oneshot};
use tracing::debug;

use battle_core::{
    BattleLoop, BattleOutcome, BattleState, BattleStatus, Decision, DecisionError,
};

use crate::api::Result;

/// Commands that can be sent to the battle worker
pub enum Command {
    /// Run until the battle blocks and report why.
    Status { reply: oneshot::Sender<BattleStatus> },
    /// Supply the waiting combatant's decision, then run until blocked.
    SubmitDecision {
        decision: Decision,
        reply: oneshot::Sender<Result<BattleStatus>>,
    },
    /// Skip the waiting combatant's turn, then run until blocked.
    SkipDecision {
        reason: DecisionError,
        reply: oneshot::Sender<Result<BattleStatus>>,
    },
    /// End the battle immediately.
    Abort {
        reply: oneshot::Sender<BattleOutcome>,
    },
    /// Query the current battle state (read-only).
    QueryState { reply: oneshot::Sender<BattleState> },
}

/// Background task that processes battle commands.
///
/// The worker never waits on providers; decision sourcing happens in
/// [`crate::BattleRuntime::run`] or whoever holds a handle.
pub struct BattleWorker {
    battle: BattleLoop,
    command_rx: mpsc::Receiver<Command>,
}

impl BattleWorker {
    pub fn new(battle: BattleLoop, command_rx: mpsc::Receiver<Command>) -> Self {
        let state = battle.state();
        tracing::info!(
            allies = state.allies().len(),
            enemies = state.enemies().len(),
            seed = state.seed(),
            "BattleWorker initialized"
        );

        Self { battle, command_rx }
    }

    /// Main worker loop. Exits once every handle is dropped.
    pub async fn run(mut self) {
        while let Some(cmd) = self.command_rx.recv().await {
            self.handle_command(cmd);
        }
        debug!("battle worker command channel closed, stopping");
    }

    fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::Status { reply } => {
                let status = self.battle.run_until_blocked();
                if reply.send(status).is_err() {
                    debug!("Status reply channel closed (caller dropped)");
                }
            }
            Command::SubmitDecision { decision, reply } => {
                let result = self
                    .battle
                    .submit_decision(decision)
                    .map(|()| self.battle.run_until_blocked())
                    .map_err(Into::into);
                if reply.send(result).is_err() {
                    debug!("SubmitDecision reply channel closed (caller dropped)");
                }
            }
            Command::SkipDecision { reason, reply } => {
                let result = self
                    .battle
                    .skip_decision(reason)
                    .map(|()| self.battle.run_until_blocked())
                    .map_err(Into::into);
                if reply.send(result).is_err() {
                    debug!("SkipDecision reply channel closed (caller dropped)");
                }
            }
            Command::Abort { reply } => {
                let outcome = self.battle.abort();
                if reply.send(outcome).is_err() {
                    debug!("Abort reply channel closed (caller dropped)");
                }
            }
            Command::QueryState { reply } => {
                if reply.send(self.battle.state().clone()).is_err() {
                    debug!("QueryState reply channel closed (caller dropped)");
                }
            }
        }
    }
}

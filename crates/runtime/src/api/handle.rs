//! Cloneable façade for issuing commands to the battle worker.
//!
//! [`BattleHandle`] hides channel plumbing and offers async helpers for
//! submitting decisions or streaming events from specific topics.
use std::collections::HashMap;

use tokio::sync::{broadcast, mpsc, oneshot};

use battle_core::{
    BattleEvent, BattleOutcome, BattleState, BattleStatus, Decision, DecisionError,
};

use super::errors::{Result, RuntimeError};
use crate::events::{EventBus, Topic};
use crate::workers::Command;

/// Client-facing handle to interact with a running battle
#[derive(Clone)]
pub struct BattleHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
}

impl BattleHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>, event_bus: EventBus) -> Self {
        Self {
            command_tx,
            event_bus,
        }
    }

    async fn request<T>(&self, command: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(command(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Runs the battle until it needs a decision or ends, and reports which.
    pub async fn status(&self) -> Result<BattleStatus> {
        self.request(|reply| Command::Status { reply }).await
    }

    /// Submit the decision for the waiting combatant.
    ///
    /// Returns the status after the battle has run on to its next stop.
    pub async fn submit_decision(&self, decision: Decision) -> Result<BattleStatus> {
        self.request(|reply| Command::SubmitDecision { decision, reply })
            .await?
    }

    /// Give up the waiting combatant's turn. The battle carries on.
    pub async fn skip_decision(&self, reason: DecisionError) -> Result<BattleStatus> {
        self.request(|reply| Command::SkipDecision { reason, reply })
            .await?
    }

    /// End the battle now (e.g. the party flees).
    pub async fn abort(&self) -> Result<BattleOutcome> {
        self.request(|reply| Command::Abort { reply }).await
    }

    /// Query the current battle state (read-only snapshot)
    pub async fn query_state(&self) -> Result<BattleState> {
        self.request(|reply| Command::QueryState { reply }).await
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Turn` - Rounds, turns, skips and decision requests
    /// - `Topic::Combat` - Abilities, effects and deaths
    /// - `Topic::Outcome` - Battle end
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<BattleEvent> {
        self.event_bus.subscribe(topic)
    }

    /// Subscribe to multiple topics at once
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> HashMap<Topic, broadcast::Receiver<BattleEvent>> {
        self.event_bus.subscribe_multiple(topics)
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}

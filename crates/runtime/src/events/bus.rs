//! Topic-based event bus implementation.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::broadcast;

use battle_core::{BattleEvent, EventSink};

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Rounds, turns, skips and decision requests
    Turn,
    /// Abilities used, effects applied, deaths
    Combat,
    /// Battle end
    Outcome,
}

impl Topic {
    pub fn of(event: &BattleEvent) -> Self {
        match event {
            BattleEvent::RoundStarted { .. }
            | BattleEvent::TurnStarted { .. }
            | BattleEvent::AwaitingDecision { .. }
            | BattleEvent::TurnSkipped { .. }
            | BattleEvent::TurnCompleted { .. }
            | BattleEvent::NoActionsAvailable { .. } => Topic::Turn,
            BattleEvent::AbilityUsed { .. }
            | BattleEvent::EffectApplied { .. }
            | BattleEvent::CombatantDied { .. } => Topic::Combat,
            BattleEvent::BattleEnded { .. } => Topic::Outcome,
        }
    }
}

/// Topic-based event bus
///
/// Allows consumers to subscribe to specific topics and only receive
/// events they care about. Clones share the same channels.
#[derive(Clone)]
pub struct EventBus {
    turn: broadcast::Sender<BattleEvent>,
    combat: broadcast::Sender<BattleEvent>,
    outcome: broadcast::Sender<BattleEvent>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            turn: broadcast::channel(capacity).0,
            combat: broadcast::channel(capacity).0,
            outcome: broadcast::channel(capacity).0,
        }
    }

    fn sender(&self, topic: Topic) -> &broadcast::Sender<BattleEvent> {
        match topic {
            Topic::Turn => &self.turn,
            Topic::Combat => &self.combat,
            Topic::Outcome => &self.outcome,
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: BattleEvent) {
        let topic = Topic::of(&event);
        if self.sender(topic).send(event).is_err() {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
    }

    /// Subscribe to a specific topic
    ///
    /// Returns a receiver that will only receive events for that topic.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<BattleEvent> {
        self.sender(topic).subscribe()
    }

    /// Subscribe to multiple topics
    ///
    /// Returns receivers for each requested topic.
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> HashMap<Topic, broadcast::Receiver<BattleEvent>> {
        topics
            .iter()
            .map(|&topic| (topic, self.subscribe(topic)))
            .collect()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for EventBus {
    fn publish(&mut self, event: BattleEvent) {
        EventBus::publish(self, event);
    }
}

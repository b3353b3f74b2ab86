//! The battle loop state machine.
//!
//! [`BattleLoop`] owns a [`BattleState`] and moves it through rounds and turns
//! one [`BattlePhase`] at a time. It never blocks: when a player-controlled
//! combatant is due to act it parks in [`BattlePhase::AwaitingDecision`] and
//! stays there until [`BattleLoop::submit_decision`] or [`BattleLoop::abort`].
mod outcome;
mod phase;
mod stall;

pub use outcome::{BattleOutcome, EndReason};
pub use phase::{AbilityOption, BattlePhase, BattleStatus, PendingDecision};

use std::sync::Arc;

use stall::StallTracker;

use crate::config::BattleConfig;
use crate::decision::{Decision, DecisionPolicy, RandomPolicy, implied_targets};
use crate::engine::{BattleEngine, TurnOutcome};
use crate::env::{BattleEnv, NoBonuses, PcgRng, RngOracle, StatBonusOracle};
use crate::error::{BattleError, DecisionError};
use crate::events::{BattleEvent, EventSink, NullSink};
use crate::state::{BattleState, CombatantId, Controller, Side};

pub struct BattleLoop {
    state: BattleState,
    phase: BattlePhase,
    config: BattleConfig,
    bonuses: Arc<dyn StatBonusOracle>,
    rng: Arc<dyn RngOracle>,
    policy: Arc<dyn DecisionPolicy>,
    sink: Box<dyn EventSink>,
    decision: Option<Decision>,
    stalls: StallTracker,
}

impl BattleLoop {
    pub fn builder(state: BattleState) -> BattleLoopBuilder {
        BattleLoopBuilder::new(state)
    }

    pub fn state(&self) -> &BattleState {
        &self.state
    }

    pub fn phase(&self) -> &BattlePhase {
        &self.phase
    }

    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    pub fn outcome(&self) -> Option<&BattleOutcome> {
        match &self.phase {
            BattlePhase::BattleEnded(outcome) => Some(outcome),
            _ => None,
        }
    }

    /// The decision being waited on, if any.
    pub fn pending_decision(&self) -> Option<PendingDecision> {
        match self.phase {
            BattlePhase::AwaitingDecision(combatant) => Some(self.decision_request(combatant)),
            _ => None,
        }
    }

    /// Performs exactly one transition. Inert while awaiting a decision or
    /// once the battle has ended.
    pub fn advance(&mut self) -> &BattlePhase {
        let next = match self.phase {
            BattlePhase::RoundStart => self.start_round(),
            BattlePhase::TurnOrderBuilt | BattlePhase::TurnComplete(_) => self.next_turn(),
            BattlePhase::TurnActive(actor) => self.begin_turn(actor),
            BattlePhase::ApplyingEffects(actor) => self.apply_decision(actor),
            blocked @ (BattlePhase::AwaitingDecision(_) | BattlePhase::BattleEnded(_)) => blocked,
        };
        self.phase = next;
        &self.phase
    }

    /// Advances until a decision is needed or the battle is over.
    pub fn run_until_blocked(&mut self) -> BattleStatus {
        loop {
            match self.phase {
                BattlePhase::AwaitingDecision(combatant) => {
                    return BattleStatus::AwaitingDecision(self.decision_request(combatant));
                }
                BattlePhase::BattleEnded(outcome) => return BattleStatus::Ended(outcome),
                _ => {
                    self.advance();
                }
            }
        }
    }

    /// Supplies the decision for the combatant currently waiting.
    ///
    /// The decision is only checked against the battle when it is applied; an
    /// unusable one skips the turn.
    ///
    /// # Errors
    ///
    /// Rejected, leaving state untouched, unless the loop is in
    /// [`BattlePhase::AwaitingDecision`].
    pub fn submit_decision(&mut self, decision: Decision) -> Result<(), BattleError> {
        match self.phase {
            BattlePhase::AwaitingDecision(combatant) => {
                tracing::debug!(
                    target: "battle::loop",
                    combatant = %combatant,
                    ability = %decision.ability_id,
                    target_id = %decision.target,
                    "decision received"
                );
                self.decision = Some(decision);
                self.phase = BattlePhase::ApplyingEffects(combatant);
                Ok(())
            }
            BattlePhase::BattleEnded(_) => Err(BattleError::BattleEnded),
            ref phase => Err(BattleError::NotAwaitingDecision {
                phase: phase.as_str().to_owned(),
            }),
        }
    }

    /// Gives up the waiting combatant's turn, e.g. when whatever supplies
    /// player decisions could not produce one. The turn is skipped as if an
    /// automated policy had failed and the battle carries on.
    ///
    /// # Errors
    ///
    /// Same as [`BattleLoop::submit_decision`].
    pub fn skip_decision(&mut self, reason: DecisionError) -> Result<(), BattleError> {
        match self.phase {
            BattlePhase::AwaitingDecision(combatant) => {
                self.phase = self.skip_turn(combatant, reason);
                Ok(())
            }
            BattlePhase::BattleEnded(_) => Err(BattleError::BattleEnded),
            ref phase => Err(BattleError::NotAwaitingDecision {
                phase: phase.as_str().to_owned(),
            }),
        }
    }

    /// Ends the battle immediately, regardless of the rosters.
    ///
    /// Aborting an already finished battle returns its existing outcome.
    pub fn abort(&mut self) -> BattleOutcome {
        if let BattlePhase::BattleEnded(outcome) = self.phase {
            return outcome;
        }
        let outcome = self.conclude(EndReason::Aborted);
        self.phase = BattlePhase::BattleEnded(outcome);
        outcome
    }

    fn start_round(&mut self) -> BattlePhase {
        if let Some(reason) = self.defeat() {
            return self.finish(reason);
        }
        let played = self.state.round();
        if self.config.max_rounds.is_some_and(|max_rounds| played >= max_rounds) {
            return self.finish(EndReason::RoundLimit);
        }

        let env = BattleEnv::new(self.bonuses.as_ref(), self.rng.as_ref());
        let order = BattleEngine::new(&mut self.state).start_round(&env, &self.config);
        let round = self.state.round();

        tracing::info!(
            target: "battle::loop",
            round,
            allies = self.state.living_count(Side::Ally),
            enemies = self.state.living_count(Side::Enemy),
            "round started"
        );

        let empty = order.is_empty();
        self.sink.publish(BattleEvent::RoundStarted { round, order });
        if empty {
            return self.finish(EndReason::MutualDefeat);
        }
        BattlePhase::TurnOrderBuilt
    }

    fn next_turn(&mut self) -> BattlePhase {
        match BattleEngine::new(&mut self.state).next_turn() {
            Some(combatant) => {
                self.sink.publish(BattleEvent::TurnStarted { combatant });
                BattlePhase::TurnActive(combatant)
            }
            None => BattlePhase::RoundStart,
        }
    }

    fn begin_turn(&mut self, actor: CombatantId) -> BattlePhase {
        self.state.advance_nonce();

        let Some(controller) = self.state.combatant(actor).map(|c| c.controller()) else {
            let error = DecisionError::UnknownCombatant { combatant: actor };
            return self.skip_turn(actor, error);
        };

        match controller {
            Controller::External => {
                let request = self.decision_request(actor);
                tracing::debug!(
                    target: "battle::loop",
                    combatant = %actor,
                    options = request.abilities.len(),
                    "awaiting decision"
                );
                self.sink.publish(BattleEvent::AwaitingDecision {
                    combatant: actor,
                    abilities: request.abilities,
                });
                BattlePhase::AwaitingDecision(actor)
            }
            Controller::Automated => {
                let env = BattleEnv::new(self.bonuses.as_ref(), self.rng.as_ref());
                match self.policy.decide(&self.state, actor, &env) {
                    Ok(decision) => {
                        self.decision = Some(decision);
                        BattlePhase::ApplyingEffects(actor)
                    }
                    Err(error) => self.skip_turn(actor, error),
                }
            }
        }
    }

    fn apply_decision(&mut self, actor: CombatantId) -> BattlePhase {
        let Some(decision) = self.decision.take() else {
            tracing::warn!(
                target: "battle::loop",
                combatant = %actor,
                "no decision recorded for turn, skipping"
            );
            return self.complete_turn(actor);
        };
        let side = self.state.combatant(actor).map(|c| c.side);

        let env = BattleEnv::new(self.bonuses.as_ref(), self.rng.as_ref());
        let result = BattleEngine::new(&mut self.state).execute(&env, actor, &decision);

        match result {
            Ok(outcome) => {
                if let Some(side) = side {
                    self.stalls.record_success(side);
                }
                self.publish_outcome(&outcome);
                if let Some(reason) = self.defeat() {
                    return self.finish(reason);
                }
                self.complete_turn(actor)
            }
            Err(error) => self.skip_turn(actor, error),
        }
    }

    fn publish_outcome(&mut self, outcome: &TurnOutcome) {
        self.sink.publish(BattleEvent::AbilityUsed {
            actor: outcome.actor,
            ability_id: outcome.ability_id.clone(),
            target: outcome.target,
        });
        for applied in &outcome.applied {
            self.sink.publish(BattleEvent::EffectApplied {
                actor: outcome.actor,
                target: applied.target,
                kind: applied.kind,
                amount: applied.actual,
            });
        }
        for fallen in &outcome.fallen {
            tracing::debug!(
                target: "battle::loop",
                combatant = %fallen.id,
                name = %fallen.name,
                side = %fallen.side,
                "combatant died"
            );
            self.sink.publish(BattleEvent::CombatantDied {
                combatant: fallen.id,
                side: fallen.side,
            });
        }
    }

    fn skip_turn(&mut self, actor: CombatantId, error: DecisionError) -> BattlePhase {
        tracing::warn!(
            target: "battle::loop",
            combatant = %actor,
            error = %error,
            severity = error.severity().as_str(),
            "turn skipped"
        );

        if let Some(side) = self.state.combatant(actor).map(|c| c.side) {
            let living = self.state.living_count(side);
            if self
                .stalls
                .record_skip(side, living, self.config.stall_threshold)
            {
                tracing::warn!(target: "battle::loop", side = %side, "no actions available");
                self.sink.publish(BattleEvent::NoActionsAvailable { side });
            }
        }

        self.sink.publish(BattleEvent::TurnSkipped {
            combatant: actor,
            reason: error,
        });
        self.complete_turn(actor)
    }

    fn complete_turn(&mut self, actor: CombatantId) -> BattlePhase {
        self.sink
            .publish(BattleEvent::TurnCompleted { combatant: actor });
        BattlePhase::TurnComplete(actor)
    }

    fn defeat(&self) -> Option<EndReason> {
        EndReason::from_defeats(
            self.state.is_defeated(Side::Ally),
            self.state.is_defeated(Side::Enemy),
        )
    }

    fn finish(&mut self, reason: EndReason) -> BattlePhase {
        BattlePhase::BattleEnded(self.conclude(reason))
    }

    fn conclude(&mut self, reason: EndReason) -> BattleOutcome {
        let outcome = BattleOutcome::new(reason, self.state.round());
        self.state.clear_turn_order();
        self.decision = None;

        tracing::info!(
            target: "battle::loop",
            reason = %reason,
            winner = ?outcome.winner,
            rounds = outcome.rounds,
            "battle ended"
        );
        self.sink.publish(BattleEvent::BattleEnded {
            winner: outcome.winner,
            reason,
        });
        outcome
    }

    fn decision_request(&self, combatant: CombatantId) -> PendingDecision {
        let abilities = self
            .state
            .combatant(combatant)
            .map(|actor| {
                actor
                    .abilities
                    .iter()
                    .map(|ability| AbilityOption {
                        ability_id: ability.id.clone(),
                        name: ability.name.clone(),
                        targeting: ability.targeting,
                        targets: implied_targets(&self.state, actor, ability)
                            .into_iter()
                            .map(|target| target.id)
                            .collect(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        PendingDecision {
            combatant,
            abilities,
        }
    }
}

/// Builder for [`BattleLoop`]. Every collaborator has a default: no stat
/// bonuses, [`PcgRng`], [`RandomPolicy`] and a [`NullSink`].
pub struct BattleLoopBuilder {
    state: BattleState,
    config: BattleConfig,
    bonuses: Arc<dyn StatBonusOracle>,
    rng: Arc<dyn RngOracle>,
    policy: Arc<dyn DecisionPolicy>,
    sink: Box<dyn EventSink>,
}

impl BattleLoopBuilder {
    fn new(state: BattleState) -> Self {
        Self {
            state,
            config: BattleConfig::default(),
            bonuses: Arc::new(NoBonuses),
            rng: Arc::new(PcgRng),
            policy: Arc::new(RandomPolicy),
            sink: Box::new(NullSink),
        }
    }

    pub fn config(mut self, config: BattleConfig) -> Self {
        self.config = config;
        self
    }

    pub fn bonuses(mut self, bonuses: Arc<dyn StatBonusOracle>) -> Self {
        self.bonuses = bonuses;
        self
    }

    pub fn rng(mut self, rng: Arc<dyn RngOracle>) -> Self {
        self.rng = rng;
        self
    }

    pub fn policy(mut self, policy: Arc<dyn DecisionPolicy>) -> Self {
        self.policy = policy;
        self
    }

    pub fn sink(mut self, sink: impl EventSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    pub fn build(self) -> BattleLoop {
        let mut state = self.state;
        state.clamp_health(self.bonuses.as_ref());

        BattleLoop {
            state,
            phase: BattlePhase::RoundStart,
            config: self.config,
            bonuses: self.bonuses,
            rng: self.rng,
            policy: self.policy,
            sink: self.sink,
            decision: None,
            stalls: StallTracker::default(),
        }
    }
}

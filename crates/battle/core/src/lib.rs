//! Deterministic turn-based combat rules.
//!
//! `battle-core` decides turn order, resolves ability targeting, applies
//! damage and healing, removes the fallen and ends the battle. It performs no
//! I/O and never blocks: the [`BattleLoop`] state machine is driven by discrete
//! [`BattleLoop::advance`] calls and suspends only while a player-controlled
//! combatant awaits a [`Decision`]. All randomness flows through the seeded
//! [`RngOracle`], so a battle replays exactly from its seed.
pub mod config;
pub mod decision;
pub mod engine;
pub mod env;
pub mod error;
pub mod events;
pub mod flow;
pub mod state;

pub use config::BattleConfig;
pub use decision::{Decision, DecisionPolicy, PriorityPolicy, RandomPolicy, implied_targets};
pub use engine::{
    AppliedEffect, BattleEngine, EffectReport, TargetSet, TurnEntry, TurnOutcome, apply_effects,
    build_turn_order, resolve_targets,
};
pub use env::{
    BattleEnv, CombatantTemplate, NoBonuses, OracleError, PcgRng, RngOracle, StatBonusOracle,
    TemplateOracle, compute_seed,
};
pub use error::{BattleError, ConfigurationError, DecisionError, ErrorSeverity};
pub use events::{BattleEvent, EventSink, NullSink};
pub use flow::{
    AbilityOption, BattleLoop, BattleLoopBuilder, BattleOutcome, BattlePhase, BattleStatus,
    EndReason, PendingDecision,
};
pub use state::{
    Ability, AbilityPriority, BaseStats, BattleState, Combatant, CombatantId, CombatantSpec,
    Controller, Effect, EffectKind, PartyHealth, Side, StatKind, Targeting,
};

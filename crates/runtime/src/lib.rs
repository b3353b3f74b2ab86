//! Async runtime around the deterministic battle loop.
//!
//! This crate wires the decision provider abstraction, oracle implementations,
//! and the battle worker into a cohesive runtime API. Consumers embed
//! [`BattleRuntime`] to run a battle to completion, subscribe to events, and
//! submit player decisions through [`BattleHandle`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides the topic-based event bus
//! - [`oracle`] provides template and equipment data adapters
//! - `workers` keeps the background task internal to the crate
pub mod api;
pub mod events;
pub mod oracle;
pub mod runtime;

mod workers;

pub use api::{
    BattleHandle, ChannelProvider, DecisionProvider, PolicyProvider, Result, RuntimeError,
};
pub use events::{EventBus, Topic};
pub use oracle::{EquipmentBonusOracle, EquipmentItem, OracleManager, TemplateOracleImpl};
pub use runtime::{BattleRuntime, BattleRuntimeBuilder, RuntimeConfig};

//! Worker tasks that back the runtime orchestration.
//!
//! The battle worker owns the battle loop and executes commands sent through
//! [`crate::BattleHandle`].

mod battle;

pub use battle::{BattleWorker, Command};

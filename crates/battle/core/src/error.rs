//! Common error infrastructure for battle-core.
//!
//! Errors fall into three families that map onto how the battle reacts:
//!
//! - [`ConfigurationError`]: malformed combatant or ability data. Fatal at
//!   battle start; no partial battle is ever created.
//! - [`DecisionError`]: a decision source could not produce a usable
//!   `(ability, target)` pair. Contained within a single turn, which is
//!   skipped while the battle continues.
//! - [`BattleError`]: misuse of the [`crate::BattleLoop`] API by the caller,
//!   such as supplying a decision while no combatant is waiting for one.
//!
//! Invariant violations (health outside its bounds, stale turn-order entries)
//! are not surfaced as errors. They are asserted in debug builds and
//! self-healed in release builds.

use crate::env::OracleError;
use crate::state::{CombatantId, Side};

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Recoverable error - the current turn is lost but the battle goes on.
    Recoverable,

    /// Validation error - invalid input, should not retry without changes.
    Validation,

    /// Internal error - unexpected state inconsistency.
    Internal,

    /// Fatal error - the battle cannot be created or continued.
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Malformed battle setup. Returned before any battle state exists.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConfigurationError {
    #[error("combatant template '{template_id}' not found")]
    TemplateNotFound { template_id: String },

    #[error("combatant '{name}' has no abilities")]
    NoAbilities { name: String },

    #[error("combatant '{name}' has invalid max health {max_health}")]
    InvalidMaxHealth { name: String, max_health: i32 },

    #[error("ability '{ability_id}' of combatant '{name}' has a non-finite multiplier")]
    NonFiniteMultiplier { name: String, ability_id: String },

    #[error("{side} roster has {size} combatants (max {max})")]
    RosterTooLarge { side: Side, size: usize, max: usize },

    #[error("combatant id {id} appears more than once")]
    DuplicateCombatant { id: CombatantId },

    #[error(transparent)]
    Oracle(#[from] OracleError),
}

impl ConfigurationError {
    pub const fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }
}

/// A decision that cannot be turned into effects. The turn is skipped.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DecisionError {
    #[error("combatant {combatant} has no abilities")]
    NoAbilities { combatant: CombatantId },

    #[error("combatant {combatant} has no valid target for ability '{ability_id}'")]
    NoValidTarget {
        combatant: CombatantId,
        ability_id: String,
    },

    #[error("combatant {combatant} does not know ability '{ability_id}'")]
    UnknownAbility {
        combatant: CombatantId,
        ability_id: String,
    },

    #[error("combatant {combatant} is not in the battle")]
    UnknownCombatant { combatant: CombatantId },

    #[error("target {target} is not in the roster implied by ability '{ability_id}'")]
    TargetNotInRoster {
        target: CombatantId,
        ability_id: String,
    },
}

impl DecisionError {
    pub const fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Recoverable
    }
}

/// Misuse of the battle loop API.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattleError {
    #[error("no combatant is awaiting a decision (phase: {phase})")]
    NotAwaitingDecision { phase: String },

    #[error("battle has already ended")]
    BattleEnded,
}

impl BattleError {
    pub const fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }
}

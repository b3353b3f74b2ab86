//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from worker coordination, battle setup, and decision
//! providers so clients can bubble them up with consistent context.
use thiserror::Error;
use tokio::sync::oneshot;

use battle_core::{BattleError, ConfigurationError, DecisionError, ErrorSeverity};

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("battle worker command channel closed")]
    CommandChannelClosed,

    #[error("battle worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("battle worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error("runtime requires oracles to be configured before building")]
    MissingOracles,

    #[error("failed to set up battle")]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Battle(#[from] BattleError),

    #[error("decision provider failed")]
    Decision(#[from] DecisionError),

    #[error("decision channel closed")]
    DecisionChannelClosed,

    #[error("failed to parse combatant templates")]
    Templates(#[source] serde_json::Error),
}

impl RuntimeError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            RuntimeError::Configuration(error) => error.severity(),
            RuntimeError::Battle(error) => error.severity(),
            RuntimeError::Decision(error) => error.severity(),
            RuntimeError::Templates(_) | RuntimeError::MissingOracles => ErrorSeverity::Validation,
            RuntimeError::CommandChannelClosed
            | RuntimeError::ReplyChannelClosed(_)
            | RuntimeError::WorkerJoin(_)
            | RuntimeError::DecisionChannelClosed => ErrorSeverity::Internal,
        }
    }
}

//! Oracle access errors.

use crate::error::ErrorSeverity;

/// Errors that occur when a required oracle is missing from the environment.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OracleError {
    /// TemplateOracle is not available in the environment.
    #[error("TemplateOracle not available")]
    TemplatesNotAvailable,
}

impl OracleError {
    pub const fn severity(&self) -> ErrorSeverity {
        // Battles cannot be built without their data source
        ErrorSeverity::Fatal
    }
}

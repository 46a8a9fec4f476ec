//! Error types for LotForge

use thiserror::Error;

/// Main error type for LotForge operations.
///
/// Validation of a finished solution is not reported through this type; see
/// [`ValidationResult`](crate::ValidationResult).
#[derive(Debug, Error)]
pub enum LotForgeError {
    /// Unknown or inconsistent algorithm configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Instance arrays do not match the declared dimensions.
    #[error("Invalid instance: {0}")]
    InvalidInstance(String),

    /// The instance cannot be scheduled at all (e.g. a part no machine can produce).
    #[error("Infeasible instance: {0}")]
    InfeasibleInstance(String),

    /// A machine sequence is already at its work slot budget.
    #[error("Capacity exceeded: machine {machine} already holds {limit} work slots")]
    Capacity { machine: usize, limit: usize },

    /// Internal consistency fault. Indicates a defect in the move engine, not bad input.
    #[error("Internal consistency fault: {0}")]
    Fault(String),
}

impl LotForgeError {
    /// Returns true for faults that signal a bug rather than a bad request.
    pub fn is_fault(&self) -> bool {
        matches!(self, LotForgeError::Fault(_))
    }
}

/// Result type alias for LotForge operations
pub type Result<T> = std::result::Result<T, LotForgeError>;

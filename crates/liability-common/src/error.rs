//! Error types for Liability Lab
//!
//! Three failure classes drive the sweep's propagation policy:
//! configuration errors abort before any computation, degenerate fitness is
//! contained to a single grid point, and invariant violations always surface.

use thiserror::Error;

/// Result type alias using LiabilityError
pub type Result<T> = std::result::Result<T, LiabilityError>;

/// Unified error type for Liability Lab operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LiabilityError {
    // Caller-supplied configuration is inconsistent
    #[error("Configuration error: {0}")]
    Configuration(String),

    // Fitness landscape cannot be renormalised for this run
    #[error("Degenerate fitness at generation {generation}: mean fitness {mean_fitness}")]
    DegenerateFitness { mean_fitness: f64, generation: u64 },

    // Internal consistency check failed
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    // Background task could not be joined
    #[error("Task join error: {0}")]
    Join(String),

    // Generic internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl LiabilityError {
    /// Shorthand for a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        LiabilityError::Configuration(msg.into())
    }

    /// Shorthand for an invariant violation
    pub fn invariant(msg: impl Into<String>) -> Self {
        LiabilityError::InvariantViolation(msg.into())
    }

    /// Whether the sweep may record a sentinel and carry on
    pub fn is_recoverable(&self) -> bool {
        matches!(self, LiabilityError::DegenerateFitness { .. })
    }
}

impl From<serde_json::Error> for LiabilityError {
    fn from(err: serde_json::Error) -> Self {
        LiabilityError::Serialization(err.to_string())
    }
}

impl From<anyhow::Error> for LiabilityError {
    fn from(err: anyhow::Error) -> Self {
        LiabilityError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LiabilityError::config("grid needs at least 2 points");
        assert!(err.to_string().contains("at least 2 points"));
    }

    #[test]
    fn test_degenerate_display() {
        let err = LiabilityError::DegenerateFitness {
            mean_fitness: -3.5,
            generation: 0,
        };
        assert!(err.to_string().contains("-3.5"));
        assert!(err.to_string().contains("generation 0"));
    }

    #[test]
    fn test_only_degenerate_is_recoverable() {
        assert!(LiabilityError::DegenerateFitness {
            mean_fitness: 0.0,
            generation: 3
        }
        .is_recoverable());
        assert!(!LiabilityError::config("bad").is_recoverable());
        assert!(!LiabilityError::invariant("sum != 1").is_recoverable());
    }
}

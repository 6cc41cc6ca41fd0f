//! Error types for the top-N product kernel
//!
//! Every failure is fatal for the call that raised it: the kernel is a pure
//! computation with no external resources, so nothing here is retryable.

use std::collections::TryReserveError;
use thiserror::Error;

/// Errors raised by matrix construction and the top-N product
#[derive(Error, Debug)]
pub enum TopNError {
    /// A compressed-row operand is malformed
    #[error("Invalid shape: {reason}")]
    InvalidShape { reason: String },

    /// The shared dimension of the operands does not agree
    ///
    /// An invalid-shape error for the operand pair rather than one matrix;
    /// like [`TopNError::InvalidShape`] it is raised before any row is processed.
    #[error("Matrix multiplication dimension mismatch: ({m1}×{n1}) × ({m2}×{n2})")]
    DimensionMismatch {
        m1: usize,
        n1: usize,
        m2: usize,
        n2: usize,
    },

    /// A caller-supplied parameter is out of range
    #[error("Invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// Output storage could not grow to the requested size
    #[error("Cannot grow output storage to {requested} entries: {source}")]
    Capacity {
        requested: usize,
        #[source]
        source: TryReserveError,
    },

    /// The worker pool could not be started
    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Result type alias for top-N operations
pub type Result<T> = std::result::Result<T, TopNError>;

impl TopNError {
    /// Create an invalid shape error with a message
    pub fn invalid_shape(reason: impl Into<String>) -> Self {
        TopNError::InvalidShape {
            reason: reason.into(),
        }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter(name: &'static str, reason: impl Into<String>) -> Self {
        TopNError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_mismatch_message() {
        let err = TopNError::DimensionMismatch {
            m1: 3,
            n1: 4,
            m2: 5,
            n2: 6,
        };
        assert_eq!(
            err.to_string(),
            "Matrix multiplication dimension mismatch: (3×4) × (5×6)"
        );
    }

    #[test]
    fn test_invalid_parameter_message() {
        let err = TopNError::invalid_parameter("n", "must be at least 1");
        assert_eq!(err.to_string(), "Invalid parameter `n`: must be at least 1");
    }

    #[test]
    fn test_capacity_error_keeps_source() {
        let mut v: Vec<u64> = Vec::new();
        let source = v.try_reserve_exact(usize::MAX).unwrap_err();
        let err = TopNError::Capacity {
            requested: usize::MAX,
            source,
        };
        assert!(std::error::Error::source(&err).is_some());
    }
}

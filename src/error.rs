//! Error types for GutGuard.
//!
//! All errors are strongly typed using thiserror. Only structural problems
//! (malformed input, querying an engine before it was initialized) surface
//! as errors. Sparse data and "nothing matched" are ordinary values.

use thiserror::Error;

/// Validation errors raised for malformed inputs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A required field is empty or absent.
    #[error("Required field '{field}' is missing")]
    MissingField {
        /// Name of the field.
        field: String,
    },

    /// A condition name outside the supported set.
    #[error("Unknown gut condition '{name}'")]
    UnknownCondition {
        /// The name as given.
        name: String,
    },

    /// A confidence value outside [0, 1].
    #[error("Confidence value {value} is out of range [0.0, 1.0]")]
    ConfidenceOutOfRange {
        /// The rejected value.
        value: f64,
    },

    /// A feedback rating outside 1..=5.
    #[error("Feedback rating {rating} is out of range [1, 5]")]
    InvalidRating {
        /// The rejected rating.
        rating: u8,
    },

    /// Input that could not be decoded.
    #[error("Malformed input: {message}")]
    Malformed {
        /// Decoder message.
        message: String,
    },
}

/// Errors raised by the learning engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// A read issued before `initialize`.
    #[error("Learning engine is not initialized (called {operation})")]
    NotInitialized {
        /// The operation that was attempted.
        operation: String,
    },
}

/// Top-level error type for GutGuard.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GutGuardError {
    /// Malformed input.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Engine misuse.
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    /// An invariant was broken inside the library.
    #[error("Internal error: {message}")]
    Internal {
        /// What went wrong.
        message: String,
    },
}

impl GutGuardError {
    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns true if this is a validation error.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns true if the engine was queried before `initialize`.
    #[must_use]
    pub const fn is_not_initialized(&self) -> bool {
        matches!(self, Self::Engine(EngineError::NotInitialized { .. }))
    }

    /// Returns true if this is an internal error.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal { .. })
    }
}

/// Result type alias for GutGuard operations.
pub type GutResult<T> = Result<T, GutGuardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_missing_field() {
        let err = ValidationError::MissingField {
            field: "name".to_string(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("'name'"));
        assert!(msg.contains("missing"));
    }

    #[test]
    fn test_validation_error_unknown_condition() {
        let err = ValidationError::UnknownCondition {
            name: "celiac".to_string(),
        };
        assert!(format!("{err}").contains("celiac"));
    }

    #[test]
    fn test_engine_error_not_initialized() {
        let err = EngineError::NotInitialized {
            operation: "generate_insights".to_string(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("not initialized"));
        assert!(msg.contains("generate_insights"));
    }

    #[test]
    fn test_error_from_validation() {
        let err: GutGuardError = ValidationError::InvalidRating { rating: 9 }.into();
        assert!(err.is_validation());
        assert!(!err.is_not_initialized());
        assert!(!err.is_internal());
    }

    #[test]
    fn test_error_from_engine() {
        let err: GutGuardError = EngineError::NotInitialized {
            operation: "calculate_metrics".to_string(),
        }
        .into();
        assert!(err.is_not_initialized());
        assert!(!err.is_validation());
    }

    #[test]
    fn test_error_internal() {
        let err = GutGuardError::internal("unexpected state");
        assert!(err.is_internal());
        assert!(format!("{err}").contains("unexpected state"));
    }
}

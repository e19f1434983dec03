//! # Error Types
//!
//! Domain-specific error types for larek-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  larek-core errors (this file)                                         │
//! │  ├── CoreError        - Parsing UI input into domain values            │
//! │  └── ValidationError  - Field / catalog entry validation failures      │
//! │                                                                         │
//! │  larek-api errors (separate crate)                                     │
//! │  └── ApiError         - HTTP, status and decode failures               │
//! │                                                                         │
//! │  storefront errors (app)                                               │
//! │  └── AppError         - Startup and submission failures                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## What Is NOT an Error
//! - Precondition violations on state mutators (removing an absent basket
//!   item, adding a priceless product) are silent no-ops.
//! - Order form validation results are queryable state
//!   (`AppStateModel::get_order_errors`). `ValidationError` values are only
//!   used there for their messages, never returned from a mutator.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Errors raised when turning untyped UI input into domain values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Product id is not in the catalog.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Form input named a field that is not part of the order draft.
    #[error("Unknown order field: {0}")]
    UnknownOrderField(String),

    /// Payment value other than `card` / `cash`.
    #[error("Unknown payment method: {0}")]
    UnknownPaymentMethod(String),

    /// Step value other than `shipment` / `contacts`.
    #[error("Unknown order step: {0}")]
    UnknownOrderStep(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Invalid format (e.g. an email without a domain).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Duplicate value (e.g. two catalog entries sharing an id).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::UnknownOrderField("zip".to_string());
        assert_eq!(err.to_string(), "Unknown order field: zip");

        let err = CoreError::UnknownPaymentMethod("barter".to_string());
        assert_eq!(err.to_string(), "Unknown payment method: barter");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "address".to_string(),
        };
        assert_eq!(err.to_string(), "address is required");

        let err = ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "missing @".to_string(),
        };
        assert_eq!(err.to_string(), "email has invalid format: missing @");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "phone".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}

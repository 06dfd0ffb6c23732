//! # Error Types
//!
//! Domain-specific error types for tally-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  tally-core errors (this file)                                         │
//! │  ├── ValidationError  - A field value breaks an item invariant         │
//! │  ├── FormatError      - A record line cannot be decoded                │
//! │  └── ParseMoneyError  - Text is not a decimal amount                   │
//! │                                                                         │
//! │  tally-store errors (separate crate)                                   │
//! │  └── StoreError       - Not found, I/O, persistence failures           │
//! │                                                                         │
//! │  Flow: ValidationError → FormatError (on decode) → StoreError → CLI    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (field, value, line)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use thiserror::Error;

// =============================================================================
// Validation Error
// =============================================================================

/// Field validation errors.
///
/// Raised by item construction and by every setter. A setter that returns
/// one of these has left the item untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// A count or amount is below zero.
    #[error("{field} cannot be negative")]
    Negative { field: String },

    /// A quantity adjustment would take stock below zero.
    ///
    /// ## User Workflow
    /// ```text
    /// Adjust Quantity (delta: -8)
    ///      │
    ///      ▼
    /// Current quantity: 5
    ///      │
    ///      ▼
    /// InsufficientQuantity { available: 5, delta: -8 }
    ///      │
    ///      ▼
    /// Menu shows: "cannot adjust quantity 5 by -8: result would be negative"
    /// ```
    #[error("cannot adjust quantity {available} by {delta}: result would be negative")]
    InsufficientQuantity { available: i64, delta: i64 },

    /// A quantity adjustment does not fit in an i64.
    #[error("cannot adjust quantity {available} by {delta}: result is out of range")]
    QuantityOverflow { available: i64, delta: i64 },

    /// last_modified is earlier than date_added.
    #[error("last modified ({last_modified}) is earlier than date added ({date_added})")]
    TimestampOrder {
        date_added: i64,
        last_modified: i64,
    },

    /// Every id up to `u64::MAX` has been handed out or loaded.
    #[error("no item ids left to allocate")]
    IdsExhausted,
}

impl ValidationError {
    /// Creates a Required error for the given field.
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }

    /// Creates a Negative error for the given field.
    pub fn negative(field: impl Into<String>) -> Self {
        ValidationError::Negative {
            field: field.into(),
        }
    }
}

// =============================================================================
// Format Error
// =============================================================================

/// Errors decoding one record line.
///
/// During load and import these are caught per line: the line is skipped,
/// a warning is logged, and processing continues.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// The line split into fewer fields than a record needs.
    #[error("expected {expected} fields, found {found}")]
    MissingFields { expected: usize, found: usize },

    /// An integer column did not parse.
    #[error("{field} is not a valid integer: '{value}'")]
    InvalidNumber { field: String, value: String },

    /// A money column did not parse.
    #[error("{field} is not a valid amount: '{value}'")]
    InvalidMoney { field: String, value: String },

    /// A timestamp column is not epoch seconds in range.
    #[error("{field} is not a valid timestamp: '{value}'")]
    InvalidTimestamp { field: String, value: String },

    /// The fields parsed but describe an invalid item.
    #[error("invalid record: {0}")]
    Invalid(#[from] ValidationError),
}

// =============================================================================
// Money Parse Error
// =============================================================================

/// Text could not be read as a decimal amount.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{input}' is not a valid amount")]
pub struct ParseMoneyError {
    pub input: String,
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for decoding operations.
pub type FormatResult<T> = Result<T, FormatError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::required("name");
        assert_eq!(err.to_string(), "name is required");

        let err = ValidationError::negative("quantity");
        assert_eq!(err.to_string(), "quantity cannot be negative");

        let err = ValidationError::InsufficientQuantity {
            available: 5,
            delta: -8,
        };
        assert_eq!(
            err.to_string(),
            "cannot adjust quantity 5 by -8: result would be negative"
        );
    }

    #[test]
    fn test_format_error_messages() {
        let err = FormatError::MissingFields {
            expected: 14,
            found: 3,
        };
        assert_eq!(err.to_string(), "expected 14 fields, found 3");

        let err = FormatError::InvalidNumber {
            field: "Quantity".to_string(),
            value: "ten".to_string(),
        };
        assert_eq!(err.to_string(), "Quantity is not a valid integer: 'ten'");
    }

    #[test]
    fn test_validation_converts_to_format_error() {
        let format_err: FormatError = ValidationError::required("name").into();
        assert!(matches!(format_err, FormatError::Invalid(_)));
        assert_eq!(format_err.to_string(), "invalid record: name is required");
    }

    #[test]
    fn test_parse_money_error_message() {
        let err = ParseMoneyError {
            input: "abc".to_string(),
        };
        assert_eq!(err.to_string(), "'abc' is not a valid amount");
    }
}

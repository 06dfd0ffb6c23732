//! # Validation Module
//!
//! Field rules shared by item construction, setters and the record codec.
//!
//! ## Where Rules Run
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Entry Points                            │
//! │                                                                         │
//! │  Menu / CLI input ──► NewItem ──► Item::new ─────────┐                 │
//! │                                                       │                 │
//! │  Item setters (set_name, set_cost, ...) ─────────────┼──► THIS MODULE  │
//! │                                                       │                 │
//! │  Record line ──► codec::decode ──► Item::from_parts ─┘                 │
//! │                                                                         │
//! │  One rule set, so a stored item can never hold a value that a          │
//! │  freshly typed one could not.                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use tally_core::validation::{validate_item_name, validate_count};
//!
//! validate_item_name("Widget").unwrap();
//! assert!(validate_count("quantity", -1).is_err());
//! ```

use chrono::{DateTime, Utc};

use crate::error::ValidationError;
use crate::money::Money;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates an item name.
///
/// ## Rules
/// - Must not be empty after trimming whitespace
///
/// The name itself is stored as given; only the emptiness check trims.
///
/// ## Example
/// ```rust
/// use tally_core::validation::validate_item_name;
///
/// assert!(validate_item_name("Widget, large").is_ok());
/// assert!(validate_item_name("").is_err());
/// assert!(validate_item_name("   ").is_err());
/// ```
pub fn validate_item_name(name: &str) -> ValidationResult<()> {
    if name.trim().is_empty() {
        return Err(ValidationError::required("name"));
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a stock count (quantity, minimum stock).
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (out of stock / no threshold)
pub fn validate_count(field: &str, value: i64) -> ValidationResult<()> {
    if value < 0 {
        return Err(ValidationError::negative(field));
    }

    Ok(())
}

/// Validates a monetary amount (cost, selling price).
///
/// ## Example
/// ```rust
/// use tally_core::money::Money;
/// use tally_core::validation::validate_amount;
///
/// assert!(validate_amount("cost", Money::from_cents(250)).is_ok());
/// assert!(validate_amount("cost", Money::zero()).is_ok());
/// assert!(validate_amount("cost", Money::from_cents(-1)).is_err());
/// ```
pub fn validate_amount(field: &str, value: Money) -> ValidationResult<()> {
    if value.is_negative() {
        return Err(ValidationError::negative(field));
    }

    Ok(())
}

/// Applies a signed delta to a quantity.
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Adjust Quantity                                                        │
/// │                                                                         │
/// │  Current: 10, user enters -3                                           │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  apply_delta(10, -3) ← THIS FUNCTION                                   │
/// │       │                                                                 │
/// │       ├── overflows i64? → QuantityOverflow                            │
/// │       │                                                                 │
/// │       ├── result < 0?    → InsufficientQuantity                        │
/// │       │                                                                 │
/// │       └── OK(7)                                                         │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn apply_delta(available: i64, delta: i64) -> ValidationResult<i64> {
    let next = available
        .checked_add(delta)
        .ok_or(ValidationError::QuantityOverflow { available, delta })?;

    if next < 0 {
        return Err(ValidationError::InsufficientQuantity { available, delta });
    }

    Ok(next)
}

// =============================================================================
// Timestamp Validators
// =============================================================================

/// Validates that an item was not modified before it was added.
pub fn validate_timestamps(
    date_added: DateTime<Utc>,
    last_modified: DateTime<Utc>,
) -> ValidationResult<()> {
    if last_modified < date_added {
        return Err(ValidationError::TimestampOrder {
            date_added: date_added.timestamp(),
            last_modified: last_modified.timestamp(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_item_name() {
        assert!(validate_item_name("Widget").is_ok());
        assert!(validate_item_name(" padded ").is_ok());
        assert_eq!(
            validate_item_name("\t\n"),
            Err(ValidationError::required("name"))
        );
    }

    #[test]
    fn test_validate_count() {
        assert!(validate_count("quantity", 0).is_ok());
        assert!(validate_count("quantity", 42).is_ok());
        assert_eq!(
            validate_count("minimum stock", -1),
            Err(ValidationError::negative("minimum stock"))
        );
    }

    #[test]
    fn test_validate_amount() {
        assert!(validate_amount("selling price", Money::from_cents(1)).is_ok());
        assert!(validate_amount("selling price", Money::from_cents(-1)).is_err());
    }

    #[test]
    fn test_apply_delta() {
        assert_eq!(apply_delta(10, -3), Ok(7));
        assert_eq!(apply_delta(10, -10), Ok(0));
        assert_eq!(apply_delta(0, 5), Ok(5));
        assert_eq!(
            apply_delta(5, -6),
            Err(ValidationError::InsufficientQuantity {
                available: 5,
                delta: -6
            })
        );
        assert!(matches!(
            apply_delta(i64::MAX, 1),
            Err(ValidationError::QuantityOverflow { .. })
        ));
    }

    #[test]
    fn test_validate_timestamps() {
        let earlier = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let later = DateTime::from_timestamp(1_700_000_060, 0).unwrap();

        assert!(validate_timestamps(earlier, later).is_ok());
        assert!(validate_timestamps(earlier, earlier).is_ok());
        assert_eq!(
            validate_timestamps(later, earlier),
            Err(ValidationError::TimestampOrder {
                date_added: 1_700_000_060,
                last_modified: 1_700_000_000,
            })
        );
    }
}

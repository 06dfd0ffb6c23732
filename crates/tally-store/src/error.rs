//! # Store Error Types
//!
//! Error types for inventory store operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  ValidationError (tally-core)      io::Error (std / tempfile)          │
//! │       │                                 │                               │
//! │       ▼                                 ▼                               │
//! │  StoreError (this module) ← Adds the path and the failing id           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  AppError (in tally-cli) ← Mapped to a message and an exit code        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Per-record decode failures never show up here: load and import count
//! them and log them, then move on.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use tally_core::{ItemId, ValidationError};

/// Inventory store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No item with this id.
    ///
    /// ## When This Occurs
    /// - update / delete / adjust with an unknown id
    /// - The item was deleted earlier in the session
    #[error("Item with ID {id} not found")]
    NotFound { id: ItemId },

    /// A field value was rejected. The store is unchanged.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Reading or writing a user-named file failed (import / export).
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Rewriting the backing file failed.
    ///
    /// ## When This Occurs
    /// - Disk full, permissions, directory removed
    ///
    /// The in-memory change that triggered the write is kept; the store
    /// retries on the next mutation or on close.
    #[error("Failed to save inventory to {}: {source}", path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl StoreError {
    /// Creates a NotFound error for the given id.
    pub fn not_found(id: ItemId) -> Self {
        StoreError::NotFound { id }
    }

    /// Creates an Io error for the given path.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            StoreError::not_found(42).to_string(),
            "Item with ID 42 not found"
        );

        let err: StoreError = ValidationError::required("name").into();
        assert_eq!(err.to_string(), "name is required");

        let err = StoreError::io(
            "/tmp/missing.csv",
            io::Error::new(io::ErrorKind::NotFound, "no such file"),
        );
        assert_eq!(err.to_string(), "I/O error on /tmp/missing.csv: no such file");
    }
}

//! # App Error Type
//!
//! Unified error type for startup and subcommands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Tally                                  │
//! │                                                                         │
//! │  tally report --json                                                   │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  run() → Result<(), AppError>                                    │  │
//! │  │         │                                                        │  │
//! │  │  Config? ─── bad tally.toml / invalid value ──┐                 │  │
//! │  │         │                                     │                 │  │
//! │  │  Store? ──── StoreError (not found, I/O) ─────┼──► AppError     │  │
//! │  │         │                                     │       │         │  │
//! │  │  Output? ─── stdout closed, JSON failure ─────┘       │         │  │
//! │  └───────────────────────────────────────────────────────┼──────────┘  │
//! │                                                          ▼             │
//! │                                       "error: ..." on stderr, exit 1   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Inside the interactive menu, store errors are shown to the user and the
//! loop continues; only I/O on the terminal itself ends the session.

use std::process::ExitCode;
use thiserror::Error;

use tally_store::StoreError;

/// Errors that end a `tally` invocation.
#[derive(Debug, Error)]
pub enum AppError {
    /// A configuration value is unusable.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// The config file is not valid TOML for our schema.
    #[error("Could not parse config file: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Terminal or config-file I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An inventory operation failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// JSON output could not be produced.
    #[error("JSON output failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl AppError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        AppError::Config(message.into())
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> ExitCode {
        ExitCode::FAILURE
    }
}

/// Result type for the console application.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_message_passes_through() {
        let err: AppError = StoreError::not_found(3).into();
        assert_eq!(err.to_string(), "Item with ID 3 not found");
    }

    #[test]
    fn test_config_error_message() {
        let err = AppError::config("data_file must not be empty");
        assert_eq!(
            err.to_string(),
            "Invalid configuration: data_file must not be empty"
        );
    }
}

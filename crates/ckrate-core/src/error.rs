//! Error types for ckrate
//!
//! This module defines the error types used throughout the ckrate workspace.
//! All errors are derived from `thiserror` for convenient error handling
//! and automatic `From` implementations.
//!
//! # Example
//!
//! ```
//! use ckrate_core::error::{CkrateError, Result};
//!
//! fn example_function() -> Result<()> {
//!     // This will automatically convert io::Error to CkrateError
//!     let _file = std::fs::read_to_string("nonexistent.json")?;
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// Main error type for ckrate operations
///
/// Covers everything from reading rating data to parsing the records
/// handed to the aggregator.
#[derive(Error, Debug)]
pub enum CkrateError {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// A record carried a missing or malformed timestamp
    #[error("Parse error in {record}: {error}")]
    Parse {
        /// Description of the offending record
        record: String,
        /// The error message
        error: String,
    },

    /// A record carried an amount that is not a number
    #[error("Invalid amount in field '{field}' of {record}: {value}")]
    InvalidAmount {
        /// Name of the field holding the amount
        field: &'static str,
        /// Description of the offending record
        record: String,
        /// The rejected value, as received
        value: String,
    },

    /// Invalid timezone
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    /// Network error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The rating API answered with a non-success status
    #[error("Rating API returned {status} for {url}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Requested URL
        url: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl CkrateError {
    /// Build a parse error for the given record description
    pub fn parse(record: impl Into<String>, error: impl Into<String>) -> Self {
        Self::Parse {
            record: record.into(),
            error: error.into(),
        }
    }
}

/// Convenience type alias for Results in ckrate
///
/// # Example
///
/// ```
/// use ckrate_core::Result;
///
/// fn process_data() -> Result<String> {
///     Ok("Processed successfully".to_string())
/// }
/// ```
pub type Result<T> = std::result::Result<T, CkrateError>;

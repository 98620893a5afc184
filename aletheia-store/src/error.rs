//! Error types for store operations
//!
//! This module defines custom error types for the aletheia-store library,
//! covering record lookups, writes, and backend failures.

use thiserror::Error;

/// Main error type for store operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// No record exists for the given key
    #[error("record not found: {0}")]
    NotFound(String),

    /// A record with the given key already exists
    #[error("duplicate key: {0}")]
    DuplicateKey(String),

    /// Serialization/Deserialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Underlying persistence failure
    #[error("backend error: {0}")]
    Backend(String),
}

/// Result type alias for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

impl From<String> for StoreError {
    fn from(s: String) -> Self {
        StoreError::Backend(s)
    }
}

impl From<&str> for StoreError {
    fn from(s: &str) -> Self {
        StoreError::Backend(s.to_string())
    }
}

//! Error types for the diagnostics API infrastructure.

use thiserror::Error;

/// Errors that can occur talking to the hosted store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Transport-level failure reaching the store
    #[error("store request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Store answered with a non-success status
    #[error("store returned {status}: {body}")]
    Status { status: u16, body: String },

    /// Row decoding failure
    #[error("invalid row data: {0}")]
    Decode(String),

    /// Fault record not found
    #[error("record not found: {0}")]
    RecordNotFound(String),

    /// VIN has no NFT link
    #[error("vin not found: {0}")]
    VinNotFound(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

//! Error types for ledger operations
//!
//! Ingest failures are mostly recovered inside the store (skipped with a
//! diagnostic). The variants here are what is left over: batch aborts,
//! persistence failures, lock poisoning and gateway transport errors.

use thiserror::Error;

/// Core error type for the ledger store
#[derive(Error, Debug)]
pub enum LedgerError {
    /// Payload does not have the expected shape
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    /// A transaction without a category aborted the batch
    #[error("Transaction {txid} on address {address} has no category")]
    MissingCategory { address: String, txid: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A writer panicked while holding the store lock
    #[error("Ledger lock poisoned")]
    LockPoisoned,
}

/// Errors raised by outbound request gateways
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Remote service answered with a non-success status
    #[error("Request to {collection} failed with status {status}: {body}")]
    Status {
        collection: String,
        status: u16,
        body: String,
    },

    #[error("Invalid response from {collection}: {reason}")]
    InvalidResponse { collection: String, reason: String },

    /// Remote service refused the request without a transport failure
    ///
    /// Returned by [`Transport`](crate::gateway::Transport) implementations
    /// whose protocol reports refusals in-band (for example a message bus
    /// reply) rather than through an HTTP status.
    #[error("Request rejected: {0}")]
    Rejected(String),
}

/// Errors raised while reading configuration
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

impl GatewayError {
    /// Create an invalid response error
    pub fn invalid_response(collection: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidResponse {
            collection: collection.into(),
            reason: reason.into(),
        }
    }
}

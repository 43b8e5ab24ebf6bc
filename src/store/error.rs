//! Data store error types.
//!
//! Errors are storage-backend agnostic: the REST client and the in-memory
//! fake both report failures through [`StoreError`].

use miette::Diagnostic;
use thiserror::Error;

/// Data store operation errors.
#[derive(Error, Diagnostic, Debug)]
pub enum StoreError {
    #[error("Request to {environment} timed out")]
    #[diagnostic(
        code(detail_ops::store::timeout),
        help("The call was retried once. Check connectivity to the hosted database.")
    )]
    Timeout { environment: String },

    #[error("Failed to connect to {environment}: {message}")]
    #[diagnostic(code(detail_ops::store::connection))]
    Connection {
        environment: String,
        message: String,
    },

    #[error("{environment} rejected request on '{collection}' ({status}): {message}")]
    #[diagnostic(code(detail_ops::store::rejected))]
    Rejected {
        environment: String,
        collection: String,
        status: u16,
        message: String,
    },

    #[error("Invalid response from {environment}: {message}")]
    #[diagnostic(code(detail_ops::store::invalid_response))]
    InvalidResponse {
        environment: String,
        message: String,
    },

    #[error("Record in '{collection}' has no '{key}' field")]
    #[diagnostic(
        code(detail_ops::store::missing_key),
        help("Only records with a stable identifying key can be upserted.")
    )]
    MissingKey { collection: String, key: String },
}

impl StoreError {
    /// Whether the failure is a transient network condition worth one retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::Timeout { .. } | StoreError::Connection { .. })
    }
}

/// Result type for data store operations.
pub type StoreResult<T> = Result<T, StoreError>;

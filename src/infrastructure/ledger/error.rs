//! # Ledger Errors
//!
//! Error types for remote ledger operations.
//!
//! # Examples
//!
//! ```
//! use ledger_scan::infrastructure::ledger::error::LedgerError;
//!
//! let error = LedgerError::timeout("Request timed out after 5000ms");
//! assert!(error.is_remote_unavailable());
//!
//! let error = LedgerError::transaction_not_found("ABC123");
//! assert!(!error.is_remote_unavailable());
//! ```

use crate::domain::value_objects::{AccountId, TransactionHash};
use thiserror::Error;

/// Error type for remote ledger operations.
#[derive(Debug, Clone, Error)]
pub enum LedgerError {
    /// Request timed out.
    #[error("ledger timeout: {message}")]
    Timeout {
        /// Error message.
        message: String,
        /// Timeout duration in milliseconds.
        timeout_ms: Option<u64>,
    },

    /// Network or connection error.
    #[error("ledger connection error: {message}")]
    Connection {
        /// Error message.
        message: String,
    },

    /// Remote rate limit exceeded.
    #[error("ledger rate limit exceeded: {message}")]
    RateLimited {
        /// Error message.
        message: String,
    },

    /// Request rejected as malformed.
    #[error("ledger invalid request: {message}")]
    InvalidRequest {
        /// Error message.
        message: String,
    },

    /// Resource not found.
    #[error("ledger resource not found: {message}")]
    NotFound {
        /// Error message.
        message: String,
    },

    /// The account identifier was rejected by the ledger.
    #[error("invalid account {account}: {message}")]
    InvalidAccount {
        /// The rejected account.
        account: AccountId,
        /// Error message.
        message: String,
    },

    /// The transaction hash no longer resolves.
    #[error("transaction not found: {hash}")]
    TransactionNotFound {
        /// The unresolved hash.
        hash: TransactionHash,
    },

    /// Protocol or format error.
    #[error("ledger protocol error: {message}")]
    ProtocolError {
        /// Error message.
        message: String,
    },

    /// Internal client error.
    #[error("ledger internal error: {message}")]
    InternalError {
        /// Error message.
        message: String,
    },
}

impl LedgerError {
    /// Creates a timeout error.
    #[must_use]
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout {
            message: message.into(),
            timeout_ms: None,
        }
    }

    /// Creates a timeout error with duration.
    #[must_use]
    pub fn timeout_with_duration(message: impl Into<String>, timeout_ms: u64) -> Self {
        Self::Timeout {
            message: message.into(),
            timeout_ms: Some(timeout_ms),
        }
    }

    /// Creates a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Creates a rate limited error.
    #[must_use]
    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::RateLimited {
            message: message.into(),
        }
    }

    /// Creates an invalid request error.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Creates a not found error.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Creates an invalid account error.
    #[must_use]
    pub fn invalid_account(account: AccountId, message: impl Into<String>) -> Self {
        Self::InvalidAccount {
            account,
            message: message.into(),
        }
    }

    /// Creates a transaction not found error.
    #[must_use]
    pub fn transaction_not_found(hash: impl Into<TransactionHash>) -> Self {
        Self::TransactionNotFound { hash: hash.into() }
    }

    /// Creates a protocol error.
    #[must_use]
    pub fn protocol_error(message: impl Into<String>) -> Self {
        Self::ProtocolError {
            message: message.into(),
        }
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
        }
    }

    /// Returns true if this error is transient and the whole request may
    /// succeed on retry.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Timeout { .. } | Self::Connection { .. } | Self::RateLimited { .. }
        )
    }

    /// Returns true if the ledger could not be reached or did not answer
    /// usably. These failures are fatal for a scan.
    #[must_use]
    pub fn is_remote_unavailable(&self) -> bool {
        !matches!(
            self,
            Self::InvalidAccount { .. } | Self::TransactionNotFound { .. }
        )
    }

    /// Returns true if the transaction hash no longer resolves.
    #[must_use]
    pub fn is_transaction_not_found(&self) -> bool {
        matches!(self, Self::TransactionNotFound { .. })
    }
}

/// Result type for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;

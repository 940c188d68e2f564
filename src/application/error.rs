//! # Application Errors
//!
//! Error types for history scans.
//!
//! # Error Hierarchy
//!
//! ```text
//! ScanError
//! ├── kind: ScanErrorKind
//! │   ├── InvalidAccount      - ledger rejected the account (no retry)
//! │   ├── RemoteUnavailable   - transport failure; the whole scan may be retried
//! │   └── Cancelled           - caller aborted the scan
//! ├── progress: ScanProgress  - budget consumed before the failure
//! └── partial_trades          - trades found so far, only when requested
//! ```
//!
//! `TransactionNotFound` never surfaces here: the scanner skips such
//! notifications.
//!
//! # Examples
//!
//! ```
//! use ledger_scan::application::error::{ScanError, ScanErrorKind, ScanProgress};
//!
//! let err = ScanError::new(ScanErrorKind::Cancelled, ScanProgress::new(3, 1));
//! assert!(err.to_string().contains("3 api calls"));
//! ```

use crate::domain::entities::trade::Trade;
use crate::domain::value_objects::AccountId;
use crate::infrastructure::ledger::error::LedgerError;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Budget consumed by a scan so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScanProgress {
    /// Resolution calls made.
    pub api_calls_made: u32,
    /// Trades found.
    pub trades_found: u32,
}

impl ScanProgress {
    /// Creates a progress snapshot.
    #[must_use]
    pub const fn new(api_calls_made: u32, trades_found: u32) -> Self {
        Self {
            api_calls_made,
            trades_found,
        }
    }
}

impl fmt::Display for ScanProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} api calls made, {} trades found",
            self.api_calls_made, self.trades_found
        )
    }
}

/// Why a scan failed.
#[derive(Debug, Clone, Error)]
pub enum ScanErrorKind {
    /// The ledger rejected the account.
    #[error("invalid account {account}: {message}")]
    InvalidAccount {
        /// The rejected account.
        account: AccountId,
        /// Ledger message.
        message: String,
    },

    /// The ledger could not be reached or answered unusably.
    #[error("remote ledger unavailable: {0}")]
    RemoteUnavailable(#[source] LedgerError),

    /// The caller cancelled the scan.
    #[error("scan cancelled")]
    Cancelled,
}

impl From<LedgerError> for ScanErrorKind {
    fn from(error: LedgerError) -> Self {
        match error {
            LedgerError::InvalidAccount { account, message } => {
                Self::InvalidAccount { account, message }
            }
            other => Self::RemoteUnavailable(other),
        }
    }
}

/// A failed scan with the budget consumed before the failure.
#[derive(Debug, Clone, Error)]
#[error("{kind} ({progress})")]
pub struct ScanError {
    kind: ScanErrorKind,
    progress: ScanProgress,
    partial_trades: Option<Vec<Trade>>,
}

impl ScanError {
    /// Creates a scan error without partial results.
    #[must_use]
    pub fn new(kind: ScanErrorKind, progress: ScanProgress) -> Self {
        Self {
            kind,
            progress,
            partial_trades: None,
        }
    }

    /// Attaches the trades accumulated before the failure.
    #[must_use]
    pub fn with_partial_trades(mut self, trades: Vec<Trade>) -> Self {
        self.partial_trades = Some(trades);
        self
    }

    /// Returns the failure kind.
    #[inline]
    #[must_use]
    pub fn kind(&self) -> &ScanErrorKind {
        &self.kind
    }

    /// Returns the budget consumed before the failure.
    #[inline]
    #[must_use]
    pub fn progress(&self) -> ScanProgress {
        self.progress
    }

    /// Returns the partial trades, if the caller asked for them.
    #[must_use]
    pub fn partial_trades(&self) -> Option<&[Trade]> {
        self.partial_trades.as_deref()
    }

    /// Consumes the error, returning the partial trades if any.
    #[must_use]
    pub fn into_partial_trades(self) -> Option<Vec<Trade>> {
        self.partial_trades
    }

    /// Returns true if the caller cancelled the scan.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self.kind, ScanErrorKind::Cancelled)
    }

    /// Returns true if retrying the whole scan may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self.kind, ScanErrorKind::RemoteUnavailable(_))
    }
}

/// Result type for scans.
pub type ScanOutcome<T> = Result<T, ScanError>;

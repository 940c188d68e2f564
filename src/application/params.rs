//! # Scan Parameters
//!
//! Optional, orthogonal facets of a history scan and their resolution into
//! effective limits.
//!
//! Every facet is optional. Unset trade and call budgets fall back to the
//! scanner's [`ScanDefaults`]; every other unset facet disables its limit.
//! Facets are resolved once, at scan start.
//!
//! # Examples
//!
//! ```
//! use ledger_scan::application::params::{ScanDefaults, ScanParameters};
//! use ledger_scan::domain::value_objects::AccountId;
//!
//! let params = ScanParameters::new().with_max_trades(5).with_stop_at_hash("ABC123");
//! let limits = params.resolve(&AccountId::new("rOwner"), &ScanDefaults::default());
//!
//! assert_eq!(limits.max_trades, 5);
//! assert_eq!(limits.max_api_calls, 100);
//! ```

use crate::domain::value_objects::{AccountId, FeedOrder, Timestamp, TransactionHash};
use crate::infrastructure::ledger::traits::{DEFAULT_PAGE_LENGTH, PageRequest};
use serde::{Deserialize, Serialize};

/// Default maximum number of trades returned by one scan.
pub const DEFAULT_TRADE_COUNT_LIMIT: u32 = 10;

/// Default maximum number of resolution calls made by one scan.
pub const DEFAULT_API_CALL_COUNT: u32 = 100;

/// Fallback values for facets a caller leaves unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanDefaults {
    /// Trade budget.
    pub max_trades: u32,
    /// Resolution call budget.
    pub max_api_calls: u32,
    /// Notifications per page.
    pub page_length: u32,
    /// Pull oldest notifications first.
    pub earliest_first: bool,
}

impl Default for ScanDefaults {
    fn default() -> Self {
        Self {
            max_trades: DEFAULT_TRADE_COUNT_LIMIT,
            max_api_calls: DEFAULT_API_CALL_COUNT,
            page_length: DEFAULT_PAGE_LENGTH,
            earliest_first: false,
        }
    }
}

/// Caller-supplied scan facets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanParameters {
    /// Account to scan; defaults to the scanner's own account.
    pub account: Option<AccountId>,
    /// Stop once this many trades are found.
    pub max_trades: Option<u32>,
    /// Stop once this many resolution calls are made.
    pub max_api_calls: Option<u32>,
    /// Stop on reaching this hash, typically the last trade already processed.
    pub stop_at_hash: Option<TransactionHash>,
    /// Ignore notifications older than this (inclusive bound).
    pub earliest_timestamp: Option<Timestamp>,
    /// One-based page to start from.
    pub start_page: Option<u32>,
    /// Notifications per page.
    pub page_length: Option<u32>,
    /// Pull oldest notifications first.
    pub earliest_first: Option<bool>,
    /// On cancellation, return the trades found so far with the error.
    #[serde(default)]
    pub return_partial_on_cancel: bool,
}

impl ScanParameters {
    /// Creates parameters with every facet unset.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the account to scan.
    #[must_use]
    pub fn with_account(mut self, account: impl Into<AccountId>) -> Self {
        self.account = Some(account.into());
        self
    }

    /// Sets the trade budget.
    #[must_use]
    pub fn with_max_trades(mut self, max: u32) -> Self {
        self.max_trades = Some(max);
        self
    }

    /// Sets the resolution call budget.
    #[must_use]
    pub fn with_max_api_calls(mut self, max: u32) -> Self {
        self.max_api_calls = Some(max);
        self
    }

    /// Sets the stop hash.
    #[must_use]
    pub fn with_stop_at_hash(mut self, hash: impl Into<TransactionHash>) -> Self {
        self.stop_at_hash = Some(hash.into());
        self
    }

    /// Sets the earliest timestamp of interest.
    #[must_use]
    pub fn with_earliest_timestamp(mut self, timestamp: Timestamp) -> Self {
        self.earliest_timestamp = Some(timestamp);
        self
    }

    /// Sets the first page to fetch.
    #[must_use]
    pub fn with_start_page(mut self, page: u32) -> Self {
        self.start_page = Some(page);
        self
    }

    /// Sets the page length.
    #[must_use]
    pub fn with_page_length(mut self, length: u32) -> Self {
        self.page_length = Some(length);
        self
    }

    /// Sets the pull direction.
    #[must_use]
    pub fn with_earliest_first(mut self, earliest_first: bool) -> Self {
        self.earliest_first = Some(earliest_first);
        self
    }

    /// Requests partial results on cancellation.
    #[must_use]
    pub fn with_partial_on_cancel(mut self) -> Self {
        self.return_partial_on_cancel = true;
        self
    }

    /// Resolves the facets into effective limits.
    ///
    /// `owner` is the scanner's own account, used when no account is set.
    #[must_use]
    pub fn resolve(&self, owner: &AccountId, defaults: &ScanDefaults) -> ScanLimits {
        let order =
            FeedOrder::from_earliest_first(self.earliest_first.unwrap_or(defaults.earliest_first));
        ScanLimits {
            account: self.account.clone().unwrap_or_else(|| owner.clone()),
            max_trades: self.max_trades.unwrap_or(defaults.max_trades),
            max_api_calls: self.max_api_calls.unwrap_or(defaults.max_api_calls),
            stop_at_hash: self.stop_at_hash.clone(),
            earliest_timestamp: self.earliest_timestamp,
            first_page: PageRequest::new(
                self.start_page.unwrap_or(1),
                self.page_length.unwrap_or(defaults.page_length),
                order,
            ),
            return_partial_on_cancel: self.return_partial_on_cancel,
        }
    }
}

/// Effective limits of one scan, fixed at scan start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanLimits {
    /// Account scanned.
    pub account: AccountId,
    /// Trade budget.
    pub max_trades: u32,
    /// Resolution call budget.
    pub max_api_calls: u32,
    /// Stop hash.
    pub stop_at_hash: Option<TransactionHash>,
    /// Cutoff, inclusive.
    pub earliest_timestamp: Option<Timestamp>,
    /// First page to fetch, carrying page length and direction.
    pub first_page: PageRequest,
    /// Return partial trades on cancellation.
    pub return_partial_on_cancel: bool,
}

impl ScanLimits {
    /// Returns the pull direction.
    #[inline]
    #[must_use]
    pub fn order(&self) -> FeedOrder {
        self.first_page.order()
    }

    /// Returns true if `timestamp` is older than the cutoff.
    #[must_use]
    pub fn precedes_cutoff(&self, timestamp: Timestamp) -> bool {
        self.earliest_timestamp
            .is_some_and(|cutoff| timestamp.is_before(&cutoff))
    }

    /// Returns true if `hash` is the stop hash.
    #[must_use]
    pub fn is_stop_hash(&self, hash: &TransactionHash) -> bool {
        self.stop_at_hash.as_ref() == Some(hash)
    }
}

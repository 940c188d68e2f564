//! # Ledger Gateway Trait
//!
//! Port definition for remote ledger integrations.
//!
//! This module defines the [`LedgerGateway`] trait the history scanner calls
//! through. It covers exactly two remote operations: listing one page of an
//! account's notification feed, and fetching one order transaction by hash.
//!
//! # Examples
//!
//! ```ignore
//! use ledger_scan::infrastructure::ledger::traits::{LedgerGateway, NotificationPage, PageRequest};
//!
//! struct MyLedger { /* ... */ }
//!
//! #[async_trait::async_trait]
//! impl LedgerGateway for MyLedger {
//!     // ... implement required methods
//! }
//! ```

use crate::domain::entities::notification::Notification;
use crate::domain::entities::transaction::OrderTransactionPayload;
use crate::domain::value_objects::{AccountId, FeedOrder, TransactionHash};
use crate::infrastructure::ledger::error::LedgerResult;
use async_trait::async_trait;
use std::fmt;

/// Default number of notifications per page.
pub const DEFAULT_PAGE_LENGTH: u32 = 20;

/// Request for one page of the notification feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageRequest {
    /// One-based page number.
    page: u32,
    /// Notifications per page.
    page_length: u32,
    /// Pull direction.
    order: FeedOrder,
}

impl PageRequest {
    /// Creates a page request. Page numbers and lengths below one are raised
    /// to one.
    #[must_use]
    pub fn new(page: u32, page_length: u32, order: FeedOrder) -> Self {
        Self {
            page: page.max(1),
            page_length: page_length.max(1),
            order,
        }
    }

    /// Returns the one-based page number.
    #[inline]
    #[must_use]
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Returns the page length.
    #[inline]
    #[must_use]
    pub fn page_length(&self) -> u32 {
        self.page_length
    }

    /// Returns the pull direction.
    #[inline]
    #[must_use]
    pub fn order(&self) -> FeedOrder {
        self.order
    }

    /// Returns the request for the given page with the same shape.
    #[must_use]
    pub fn at_page(&self, page: u32) -> Self {
        Self::new(page, self.page_length, self.order)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1, DEFAULT_PAGE_LENGTH, FeedOrder::default())
    }
}

/// Where the feed continues after a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageCursor {
    /// More notifications may be available at this page.
    Next(u32),
    /// The feed is exhausted.
    End,
}

impl PageCursor {
    /// Returns true if the feed is exhausted.
    #[inline]
    #[must_use]
    pub fn is_end(&self) -> bool {
        matches!(self, Self::End)
    }
}

impl fmt::Display for PageCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Next(page) => write!(f, "page {}", page),
            Self::End => write!(f, "end"),
        }
    }
}

/// One page of notifications plus the continuation cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationPage {
    /// Notifications in pull order.
    pub notifications: Vec<Notification>,
    /// Continuation.
    pub next: PageCursor,
}

impl NotificationPage {
    /// Creates a page.
    #[must_use]
    pub fn new(notifications: Vec<Notification>, next: PageCursor) -> Self {
        Self {
            notifications,
            next,
        }
    }

    /// Creates the terminal empty page.
    #[must_use]
    pub fn end() -> Self {
        Self::new(Vec::new(), PageCursor::End)
    }

    /// Builds a page for `request`, ending the feed when fewer notifications
    /// than requested were returned.
    #[must_use]
    pub fn from_request(request: &PageRequest, notifications: Vec<Notification>) -> Self {
        let full = notifications.len() >= request.page_length() as usize;
        let next = if full {
            request
                .page()
                .checked_add(1)
                .map_or(PageCursor::End, PageCursor::Next)
        } else {
            PageCursor::End
        };
        Self::new(notifications, next)
    }
}

/// Trait defining the interface to a remote account ledger.
///
/// # Error Handling
///
/// Implementations map transport failures (timeouts included) to the
/// `LedgerError` variants for which `is_remote_unavailable` holds, a rejected
/// account to `LedgerError::InvalidAccount`, and an unknown transaction hash
/// to `LedgerError::TransactionNotFound`. Retries, if any, belong to the
/// implementation; callers treat each call as one attempt.
#[async_trait]
pub trait LedgerGateway: Send + Sync + fmt::Debug {
    /// Returns the per-request timeout in milliseconds.
    fn timeout_ms(&self) -> u64;

    /// Fetches one page of the account's notification feed.
    ///
    /// # Errors
    ///
    /// - `LedgerError::InvalidAccount` - the ledger rejected the account
    /// - any remote-unavailable variant - transport failure or timeout
    async fn fetch_notifications(
        &self,
        account: &AccountId,
        request: &PageRequest,
    ) -> LedgerResult<NotificationPage>;

    /// Fetches the order transaction referenced by a notification.
    ///
    /// # Errors
    ///
    /// - `LedgerError::TransactionNotFound` - the hash no longer resolves
    /// - any remote-unavailable variant - transport failure or timeout
    async fn fetch_order_transaction(
        &self,
        account: &AccountId,
        hash: &TransactionHash,
    ) -> LedgerResult<OrderTransactionPayload>;
}

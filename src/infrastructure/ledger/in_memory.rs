//! # In-Memory Ledger
//!
//! In-memory implementation of [`LedgerGateway`] for tests and demos.
//!
//! Feeds are scripted per account, newest notification first. Failures can
//! be injected per page or per hash, and every remote call is counted so
//! tests can assert on the cost of a scan.

use crate::domain::entities::notification::Notification;
use crate::domain::entities::transaction::OrderTransactionPayload;
use crate::domain::value_objects::{AccountId, FeedOrder, TransactionHash};
use crate::infrastructure::ledger::error::{LedgerError, LedgerResult};
use crate::infrastructure::ledger::traits::{LedgerGateway, NotificationPage, PageRequest};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

#[derive(Debug, Default)]
struct LedgerState {
    /// Newest first.
    feeds: HashMap<AccountId, Vec<Notification>>,
    transactions: HashMap<TransactionHash, OrderTransactionPayload>,
    failing_pages: HashSet<u32>,
    failing_hashes: HashSet<TransactionHash>,
    page_requests: Vec<PageRequest>,
    order_lookups: Vec<TransactionHash>,
}

/// In-memory implementation of [`LedgerGateway`].
///
/// Cloning shares the underlying state.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLedger {
    state: Arc<RwLock<LedgerState>>,
}

impl InMemoryLedger {
    /// Creates an empty ledger with no accounts.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an account with an empty feed.
    pub fn add_account(&self, account: &AccountId) {
        self.state.write().feeds.entry(account.clone()).or_default();
    }

    /// Appends a notification to the account's feed. Notifications must be
    /// pushed newest first.
    pub fn push_notification(&self, account: &AccountId, notification: Notification) {
        self.state
            .write()
            .feeds
            .entry(account.clone())
            .or_default()
            .push(notification);
    }

    /// Stores an order transaction so its hash resolves.
    pub fn insert_transaction(&self, payload: OrderTransactionPayload) {
        self.state
            .write()
            .transactions
            .insert(payload.hash.clone(), payload);
    }

    /// Makes fetching the given one-based page fail with a connection error.
    pub fn fail_page(&self, page: u32) {
        self.state.write().failing_pages.insert(page);
    }

    /// Makes resolving the given hash fail with a timeout.
    pub fn fail_hash(&self, hash: &TransactionHash) {
        self.state.write().failing_hashes.insert(hash.clone());
    }

    /// Returns the number of notification pages fetched.
    #[must_use]
    pub fn page_fetches(&self) -> usize {
        self.state.read().page_requests.len()
    }

    /// Returns every page request received, in order.
    #[must_use]
    pub fn page_requests(&self) -> Vec<PageRequest> {
        self.state.read().page_requests.clone()
    }

    /// Returns the number of order transaction lookups.
    #[must_use]
    pub fn order_lookups(&self) -> usize {
        self.state.read().order_lookups.len()
    }

    /// Returns the looked-up hashes, in order.
    #[must_use]
    pub fn looked_up_hashes(&self) -> Vec<TransactionHash> {
        self.state.read().order_lookups.clone()
    }
}

#[async_trait]
impl LedgerGateway for InMemoryLedger {
    fn timeout_ms(&self) -> u64 {
        0
    }

    async fn fetch_notifications(
        &self,
        account: &AccountId,
        request: &PageRequest,
    ) -> LedgerResult<NotificationPage> {
        let mut state = self.state.write();
        state.page_requests.push(*request);

        if state.failing_pages.contains(&request.page()) {
            return Err(LedgerError::connection(format!(
                "injected failure on page {}",
                request.page()
            )));
        }

        let feed = state.feeds.get(account).ok_or_else(|| {
            LedgerError::invalid_account(account.clone(), "account not found in ledger")
        })?;

        let length = request.page_length() as usize;
        let skip = (request.page() as usize - 1).saturating_mul(length);
        let notifications: Vec<Notification> = match request.order() {
            FeedOrder::NewestFirst => feed.iter().skip(skip).take(length).cloned().collect(),
            FeedOrder::OldestFirst => feed.iter().rev().skip(skip).take(length).cloned().collect(),
        };

        Ok(NotificationPage::from_request(request, notifications))
    }

    async fn fetch_order_transaction(
        &self,
        _account: &AccountId,
        hash: &TransactionHash,
    ) -> LedgerResult<OrderTransactionPayload> {
        let mut state = self.state.write();
        state.order_lookups.push(hash.clone());

        if state.failing_hashes.contains(hash) {
            return Err(LedgerError::timeout(format!("injected timeout for {hash}")));
        }

        state
            .transactions
            .get(hash)
            .cloned()
            .ok_or_else(|| LedgerError::transaction_not_found(hash.clone()))
    }
}

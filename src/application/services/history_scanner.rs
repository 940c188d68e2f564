//! # History Scanner
//!
//! Bounded incremental scan of an account's trade history.
//!
//! The remote feed mixes order entries, cancels and executions under one
//! notification type, so every candidate costs a resolution call. The
//! scanner walks the feed through a [`NotificationPager`], resolves order
//! notifications through a [`TransactionResolver`] and stops at whichever
//! limit fires first:
//!
//! - the time cutoff (inclusive)
//! - the stop hash, or a hash already seen in this scan
//! - the call budget
//! - the trade budget
//!
//! # Scan Phases
//!
//! ```text
//! Idle ──► Scanning ──┬──► Completed
//!                     ├──► CallBudgetExhausted
//!                     ├──► TradeBudgetReached
//!                     ├──► KnownHashReached
//!                     ├──► TimeCutoffReached
//!                     └──► Failed (InvalidAccount, RemoteUnavailable, Cancelled)
//! ```
//!
//! Every per-notification check runs in this order: cancellation, cutoff,
//! known hash, notification type, budgets.
//!
//! # Examples
//!
//! ```ignore
//! use ledger_scan::application::services::{HistoryScanner, ScannerConfig};
//! use ledger_scan::application::params::ScanParameters;
//!
//! let scanner = HistoryScanner::new(gateway, "rOwner", ScannerConfig::default());
//! let result = scanner.scan(&ScanParameters::new().with_max_trades(5)).await?;
//! println!("{} trades, stopped: {}", result.trades.len(), result.stop_reason);
//! ```

use crate::application::error::{ScanError, ScanErrorKind, ScanOutcome, ScanProgress};
use crate::application::params::{ScanDefaults, ScanLimits, ScanParameters};
use crate::application::services::notification_pager::NotificationPager;
use crate::application::services::pacing::Pacer;
use crate::application::services::transaction_resolver::TransactionResolver;
use crate::domain::entities::notification::Notification;
use crate::domain::entities::trade::Trade;
use crate::domain::entities::transaction::ResolvedTransaction;
use crate::domain::value_objects::{
    AccountId, FeedOrder, RateLimitPolicy, ScanId, ScanPhase, StopReason, TransactionHash,
};
use crate::infrastructure::ledger::traits::LedgerGateway;
use futures::TryStreamExt;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::pin::pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{Instrument, debug, info, info_span, trace, warn};

/// Configuration for a [`HistoryScanner`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScannerConfig {
    /// Fallbacks for unset scan parameters.
    pub defaults: ScanDefaults,
    /// Pacing of resolution calls for this scanner's credential.
    pub rate_limit: RateLimitPolicy,
}

impl ScannerConfig {
    /// Creates a configuration with the given rate limit.
    #[must_use]
    pub fn with_rate_limit(rate_limit: RateLimitPolicy) -> Self {
        Self {
            rate_limit,
            ..Default::default()
        }
    }

    /// Sets the default trade budget.
    #[must_use]
    pub fn with_max_trades(mut self, max: u32) -> Self {
        self.defaults.max_trades = max;
        self
    }

    /// Sets the default call budget.
    #[must_use]
    pub fn with_max_api_calls(mut self, max: u32) -> Self {
        self.defaults.max_api_calls = max;
        self
    }

    /// Sets the default page length.
    #[must_use]
    pub fn with_page_length(mut self, length: u32) -> Self {
        self.defaults.page_length = length;
        self
    }

    /// Sets the default pull direction.
    #[must_use]
    pub fn with_earliest_first(mut self, earliest_first: bool) -> Self {
        self.defaults.earliest_first = earliest_first;
        self
    }
}

/// Cooperative cancellation flag for running scans.
///
/// Clones share the flag. Scans observe it between notifications, never in
/// the middle of a resolution.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    cancelled: Arc<AtomicBool>,
}

impl CancelHandle {
    /// Creates an untriggered handle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Returns true once cancellation was requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Outcome of a successful scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    /// Correlation ID of the scan.
    pub scan_id: ScanId,
    /// Account scanned.
    pub account: AccountId,
    /// Trades in arrival order.
    pub trades: Vec<Trade>,
    /// Why the scan stopped.
    pub stop_reason: StopReason,
    /// Budget consumed.
    pub progress: ScanProgress,
}

impl ScanResult {
    /// Returns the hash of the first trade in arrival order.
    ///
    /// For a newest-first scan this is the most recent trade, the natural
    /// stop hash for the next incremental scan.
    #[must_use]
    pub fn first_trade_hash(&self) -> Option<&TransactionHash> {
        self.trades.first().map(Trade::hash)
    }
}

/// Mutable state of one scan.
#[derive(Debug)]
struct ScanState {
    phase: ScanPhase,
    api_calls_made: u32,
    trades_found: Vec<ResolvedTransaction>,
    seen_hashes: HashSet<TransactionHash>,
}

impl ScanState {
    fn new() -> Self {
        Self {
            phase: ScanPhase::Idle,
            api_calls_made: 0,
            trades_found: Vec::new(),
            seen_hashes: HashSet::new(),
        }
    }

    fn advance(&mut self, target: ScanPhase) {
        if self.phase.can_transition_to(target) {
            self.phase = target;
        } else {
            warn!(from = %self.phase, to = %target, "ignored invalid scan phase transition");
        }
    }

    fn trades_found(&self) -> u32 {
        u32::try_from(self.trades_found.len()).unwrap_or(u32::MAX)
    }

    fn progress(&self) -> ScanProgress {
        ScanProgress::new(self.api_calls_made, self.trades_found())
    }

    /// Returns the budget that is used up, call budget first.
    fn budget_reached(&self, limits: &ScanLimits) -> Option<StopReason> {
        if self.api_calls_made >= limits.max_api_calls {
            Some(StopReason::CallBudgetExhausted)
        } else if self.trades_found() >= limits.max_trades {
            Some(StopReason::TradeBudgetReached)
        } else {
            None
        }
    }

    fn trades(&self, account: &AccountId) -> Vec<Trade> {
        self.trades_found
            .iter()
            .filter_map(|resolved| Trade::from_resolved(account, resolved))
            .collect()
    }
}

/// What to do with one pulled notification.
enum Step {
    Stop(StopReason),
    Skip,
    Resolve,
}

/// Scans trade history under trade, call and known-hash limits.
///
/// One scanner stands for one credential: concurrent scans through the same
/// scanner share its [`Pacer`], each with its own scan state.
#[derive(Debug)]
pub struct HistoryScanner {
    gateway: Arc<dyn LedgerGateway>,
    owner: AccountId,
    config: ScannerConfig,
    pacer: Arc<Pacer>,
}

impl HistoryScanner {
    /// Creates a scanner acting for `owner`, the default scan account.
    #[must_use]
    pub fn new(
        gateway: Arc<dyn LedgerGateway>,
        owner: impl Into<AccountId>,
        config: ScannerConfig,
    ) -> Self {
        Self {
            gateway,
            owner: owner.into(),
            pacer: Arc::new(Pacer::new(&config.rate_limit)),
            config,
        }
    }

    /// Returns the scanner's own account.
    #[inline]
    #[must_use]
    pub fn owner(&self) -> &AccountId {
        &self.owner
    }

    /// Returns the configuration.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }

    /// Runs a scan.
    ///
    /// # Errors
    ///
    /// Returns a [`ScanError`] carrying the budget consumed if the account is
    /// rejected or the ledger is unavailable.
    pub async fn scan(&self, params: &ScanParameters) -> ScanOutcome<ScanResult> {
        self.scan_with_cancel(params, &CancelHandle::new()).await
    }

    /// Runs a scan that stops with `ScanErrorKind::Cancelled` once `cancel`
    /// is triggered.
    ///
    /// # Errors
    ///
    /// As [`HistoryScanner::scan`], plus cancellation. Trades found before
    /// cancellation are attached only if the parameters ask for them.
    pub async fn scan_with_cancel(
        &self,
        params: &ScanParameters,
        cancel: &CancelHandle,
    ) -> ScanOutcome<ScanResult> {
        let scan_id = ScanId::new_v4();
        let limits = params.resolve(&self.owner, &self.config.defaults);
        let span = info_span!("history_scan", %scan_id, account = %limits.account);
        self.run(scan_id, limits, cancel).instrument(span).await
    }

    async fn run(
        &self,
        scan_id: ScanId,
        limits: ScanLimits,
        cancel: &CancelHandle,
    ) -> ScanOutcome<ScanResult> {
        debug!(
            max_trades = limits.max_trades,
            max_api_calls = limits.max_api_calls,
            stop_at_hash = ?limits.stop_at_hash,
            earliest_timestamp = ?limits.earliest_timestamp,
            order = %limits.order(),
            "scan started"
        );

        let mut state = ScanState::new();
        state.advance(ScanPhase::Scanning);

        match self.walk(&limits, &mut state, cancel).await {
            Ok(reason) => {
                state.advance(ScanPhase::from_stop_reason(reason));
                let progress = state.progress();
                info!(
                    stop_reason = %reason,
                    api_calls_made = progress.api_calls_made,
                    trades_found = progress.trades_found,
                    "scan finished"
                );
                Ok(ScanResult {
                    scan_id,
                    trades: state.trades(&limits.account),
                    account: limits.account,
                    stop_reason: reason,
                    progress,
                })
            }
            Err(kind) => {
                state.advance(ScanPhase::Failed);
                let progress = state.progress();
                info!(
                    error = %kind,
                    api_calls_made = progress.api_calls_made,
                    trades_found = progress.trades_found,
                    "scan failed"
                );
                let keep_partial =
                    matches!(kind, ScanErrorKind::Cancelled) && limits.return_partial_on_cancel;
                let error = ScanError::new(kind, progress);
                Err(if keep_partial {
                    error.with_partial_trades(state.trades(&limits.account))
                } else {
                    error
                })
            }
        }
    }

    async fn walk(
        &self,
        limits: &ScanLimits,
        state: &mut ScanState,
        cancel: &CancelHandle,
    ) -> Result<StopReason, ScanErrorKind> {
        let notifications = NotificationPager::new(
            Arc::clone(&self.gateway),
            limits.account.clone(),
            limits.first_page,
        )
        .into_stream();
        let mut notifications = pin!(notifications);
        let mut resolver =
            TransactionResolver::new(Arc::clone(&self.gateway), Arc::clone(&self.pacer));

        loop {
            if cancel.is_cancelled() {
                return Err(ScanErrorKind::Cancelled);
            }
            let Some(notification) = notifications.try_next().await? else {
                return Ok(StopReason::Completed);
            };

            match Self::inspect(&notification, limits, state) {
                Step::Stop(reason) => return Ok(reason),
                Step::Skip => continue,
                Step::Resolve => {}
            }

            let hash = notification.hash();
            state.seen_hashes.insert(hash.clone());
            let resolved = resolver.resolve(&limits.account, hash).await;
            state.api_calls_made = resolver.calls_made();

            match resolved {
                Ok(transaction) => {
                    if transaction.classification().is_execution() {
                        state.trades_found.push(transaction);
                    }
                }
                Err(e) if e.is_transaction_not_found() => {
                    warn!(%hash, "transaction not found, skipping notification");
                }
                Err(e) => return Err(e.into()),
            }

            if let Some(reason) = state.budget_reached(limits) {
                return Ok(reason);
            }
        }
    }

    fn inspect(notification: &Notification, limits: &ScanLimits, state: &ScanState) -> Step {
        if limits.precedes_cutoff(notification.timestamp()) {
            return match limits.order() {
                FeedOrder::NewestFirst => Step::Stop(StopReason::TimeCutoffReached),
                FeedOrder::OldestFirst => {
                    trace!(hash = %notification.hash(), "before cutoff, skipping");
                    Step::Skip
                }
            };
        }

        let hash = notification.hash();
        if limits.is_stop_hash(hash) || state.seen_hashes.contains(hash) {
            return Step::Stop(StopReason::KnownHashReached);
        }

        if !notification.is_order() {
            trace!(%hash, kind = %notification.notification_type(), "not an order, skipping");
            return Step::Skip;
        }

        // Zero budgets stop before the first resolution.
        match state.budget_reached(limits) {
            Some(reason) => Step::Stop(reason),
            None => Step::Resolve,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::domain::entities::transaction::{OrderAction, OrderTransactionPayload};
    use crate::domain::value_objects::{Amount, NotificationType, TimeUnit, Timestamp};
    use crate::infrastructure::ledger::error::{LedgerError, LedgerResult};
    use crate::infrastructure::ledger::in_memory::InMemoryLedger;
    use crate::infrastructure::ledger::traits::{NotificationPage, PageRequest};
    use async_trait::async_trait;
    use rust_decimal::Decimal;

    const OWNER: &str = "rOwner";
    const ISSUER: &str = "rvYAfWj5gh67oV6fW32ZzP3Aw4Eubs59B";

    #[derive(Debug, Clone, Copy)]
    enum Entry {
        Fill,
        Open,
        Cancel,
        Missing,
        Payment,
    }

    fn ts(secs: i64) -> Timestamp {
        Timestamp::from_secs(1_700_000_000 + secs).unwrap()
    }

    fn payload(hash: &str, entry: Entry, secs: i64) -> Option<OrderTransactionPayload> {
        let fee = Decimal::new(12, 3);
        let (action, balance_changes) = match entry {
            Entry::Fill => (OrderAction::OrderCreate, vec![
                Amount::native(Decimal::new(-100_012, 3)),
                Amount::issued("USD", ISSUER, Decimal::new(15, 1)),
            ]),
            Entry::Open => (OrderAction::OrderCreate, vec![Amount::native(-fee)]),
            Entry::Cancel => (OrderAction::OrderCancel, vec![Amount::native(-fee)]),
            Entry::Missing | Entry::Payment => return None,
        };
        Some(OrderTransactionPayload {
            hash: TransactionHash::new(hash),
            ledger: 1,
            timestamp: ts(secs),
            action,
            fee,
            balance_changes,
        })
    }

    /// Builds a ledger from `(hash, entry, secs)` rows, newest first.
    fn ledger(rows: &[(&str, Entry, i64)]) -> InMemoryLedger {
        let ledger = InMemoryLedger::new();
        let owner = AccountId::new(OWNER);
        ledger.add_account(&owner);
        for (i, (hash, entry, secs)) in rows.iter().enumerate() {
            let kind = match entry {
                Entry::Payment => NotificationType::Payment,
                _ => NotificationType::Order,
            };
            ledger.push_notification(
                &owner,
                Notification::new(
                    (rows.len() - i) as u64,
                    TransactionHash::new(*hash),
                    kind,
                    ts(*secs),
                ),
            );
            if let Some(payload) = payload(hash, *entry, *secs) {
                ledger.insert_transaction(payload);
            }
        }
        ledger
    }

    fn unpaced() -> RateLimitPolicy {
        RateLimitPolicy::try_new(10_000, 1, TimeUnit::Seconds).unwrap()
    }

    fn scanner_for(gateway: Arc<dyn LedgerGateway>) -> HistoryScanner {
        HistoryScanner::new(
            gateway,
            OWNER,
            ScannerConfig::with_rate_limit(unpaced()).with_page_length(2),
        )
    }

    fn scanner(ledger: &InMemoryLedger) -> HistoryScanner {
        scanner_for(Arc::new(ledger.clone()))
    }

    fn hashes(trades: &[Trade]) -> Vec<&str> {
        trades.iter().map(|t| t.hash().as_str()).collect()
    }

    fn looked_up(ledger: &InMemoryLedger) -> Vec<String> {
        ledger
            .looked_up_hashes()
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    mod config {
        use super::*;

        #[test]
        fn defaults() {
            let config = ScannerConfig::default();
            assert_eq!(config.defaults.max_trades, 10);
            assert_eq!(config.defaults.max_api_calls, 100);
            assert_eq!(config.defaults.page_length, 20);
            assert!(!config.defaults.earliest_first);
            assert_eq!(config.rate_limit.delay_millis(), 1000);
        }

        #[test]
        fn builder() {
            let config = ScannerConfig::default()
                .with_max_trades(3)
                .with_max_api_calls(4)
                .with_page_length(5)
                .with_earliest_first(true);
            assert_eq!(config.defaults.max_trades, 3);
            assert_eq!(config.defaults.max_api_calls, 4);
            assert_eq!(config.defaults.page_length, 5);
            assert!(config.defaults.earliest_first);
        }

        #[test]
        fn cancel_handle_is_shared() {
            let handle = CancelHandle::new();
            let clone = handle.clone();
            assert!(!handle.is_cancelled());
            clone.cancel();
            assert!(handle.is_cancelled());
        }
    }

    mod completion {
        use super::*;

        #[tokio::test]
        async fn exhausts_feed_and_keeps_only_executions() {
            let ledger = ledger(&[
                ("F2", Entry::Fill, 50),
                ("O1", Entry::Open, 40),
                ("C1", Entry::Cancel, 30),
                ("F1", Entry::Fill, 20),
                ("O2", Entry::Open, 10),
            ]);
            let result = scanner(&ledger).scan(&ScanParameters::new()).await.unwrap();

            assert_eq!(result.stop_reason, StopReason::Completed);
            assert_eq!(hashes(&result.trades), ["F2", "F1"]);
            assert_eq!(result.progress, ScanProgress::new(5, 2));
            assert_eq!(result.account, AccountId::new(OWNER));
            assert_eq!(ledger.page_fetches(), 3);
        }

        #[tokio::test]
        async fn trades_carry_exchanged_amounts() {
            let ledger = ledger(&[("F1", Entry::Fill, 10)]);
            let result = scanner(&ledger).scan(&ScanParameters::new()).await.unwrap();
            let trade = &result.trades[0];
            assert_eq!(trade.bought().currency(), "USD");
            assert_eq!(trade.sold().value(), Decimal::new(100, 0));
            assert_eq!(trade.fee(), Decimal::new(12, 3));
            assert_eq!(trade.executed_at(), ts(10));
        }

        #[tokio::test]
        async fn empty_feed_completes() {
            let ledger = ledger(&[]);
            let result = scanner(&ledger).scan(&ScanParameters::new()).await.unwrap();
            assert_eq!(result.stop_reason, StopReason::Completed);
            assert!(result.trades.is_empty());
            assert_eq!(result.progress, ScanProgress::default());
        }

        #[tokio::test]
        async fn non_order_notifications_cost_nothing() {
            let ledger = ledger(&[
                ("P1", Entry::Payment, 30),
                ("F1", Entry::Fill, 20),
                ("P2", Entry::Payment, 10),
            ]);
            let result = scanner(&ledger).scan(&ScanParameters::new()).await.unwrap();
            assert_eq!(result.progress, ScanProgress::new(1, 1));
            assert_eq!(looked_up(&ledger), ["F1"]);
        }

        #[tokio::test]
        async fn not_found_is_skipped_but_counted() {
            let ledger = ledger(&[
                ("F2", Entry::Fill, 30),
                ("GONE", Entry::Missing, 20),
                ("F1", Entry::Fill, 10),
            ]);
            let result = scanner(&ledger).scan(&ScanParameters::new()).await.unwrap();
            assert_eq!(result.stop_reason, StopReason::Completed);
            assert_eq!(hashes(&result.trades), ["F2", "F1"]);
            assert_eq!(result.progress.api_calls_made, 3);
        }

        #[tokio::test]
        async fn explicit_account_overrides_owner() {
            let ledger = ledger(&[]);
            let other = AccountId::new("rOther");
            ledger.add_account(&other);
            let result = scanner(&ledger)
                .scan(&ScanParameters::new().with_account(other.clone()))
                .await
                .unwrap();
            assert_eq!(result.account, other);
        }

        #[tokio::test]
        async fn starts_from_requested_page() {
            let ledger = ledger(&[
                ("F4", Entry::Fill, 40),
                ("F3", Entry::Fill, 30),
                ("F2", Entry::Fill, 20),
                ("F1", Entry::Fill, 10),
            ]);
            let result = scanner(&ledger)
                .scan(&ScanParameters::new().with_start_page(2))
                .await
                .unwrap();
            assert_eq!(hashes(&result.trades), ["F2", "F1"]);
        }

        #[tokio::test]
        async fn result_serializes() {
            let ledger = ledger(&[("F1", Entry::Fill, 10)]);
            let result = scanner(&ledger).scan(&ScanParameters::new()).await.unwrap();
            let json = serde_json::to_value(&result).unwrap();
            assert_eq!(json["stop_reason"], "COMPLETED");
            assert_eq!(json["progress"]["api_calls_made"], 1);
            assert_eq!(json["trades"][0]["hash"], "F1");
        }
    }

    mod budgets {
        use super::*;

        #[tokio::test]
        async fn trade_budget_stops_mid_page() {
            let ledger = ledger(&[
                ("F3", Entry::Fill, 30),
                ("F2", Entry::Fill, 20),
                ("F1", Entry::Fill, 10),
            ]);
            let result = scanner(&ledger)
                .scan(&ScanParameters::new().with_max_trades(1))
                .await
                .unwrap();
            assert_eq!(result.stop_reason, StopReason::TradeBudgetReached);
            assert_eq!(hashes(&result.trades), ["F3"]);
            assert_eq!(ledger.order_lookups(), 1);
        }

        #[tokio::test]
        async fn call_budget_without_executions() {
            let rows: Vec<(String, Entry, i64)> = (0..6)
                .map(|i| {
                    let entry = if i % 2 == 0 { Entry::Open } else { Entry::Cancel };
                    (format!("X{i}"), entry, 100 - i)
                })
                .collect();
            let rows: Vec<(&str, Entry, i64)> =
                rows.iter().map(|(h, e, s)| (h.as_str(), *e, *s)).collect();
            let ledger = ledger(&rows);

            let result = scanner(&ledger)
                .scan(&ScanParameters::new().with_max_api_calls(5))
                .await
                .unwrap();
            assert_eq!(result.stop_reason, StopReason::CallBudgetExhausted);
            assert!(result.trades.is_empty());
            assert_eq!(result.progress.api_calls_made, 5);
            assert_eq!(ledger.order_lookups(), 5);
        }

        #[tokio::test]
        async fn call_budget_counts_not_found() {
            let ledger = ledger(&[
                ("GONE1", Entry::Missing, 30),
                ("GONE2", Entry::Missing, 20),
                ("F1", Entry::Fill, 10),
            ]);
            let result = scanner(&ledger)
                .scan(&ScanParameters::new().with_max_api_calls(2))
                .await
                .unwrap();
            assert_eq!(result.stop_reason, StopReason::CallBudgetExhausted);
            assert!(result.trades.is_empty());
        }

        #[tokio::test]
        async fn zero_budgets_make_no_calls() {
            let ledger = ledger(&[("F1", Entry::Fill, 10)]);
            let scanner = scanner(&ledger);

            let result = scanner
                .scan(&ScanParameters::new().with_max_api_calls(0))
                .await
                .unwrap();
            assert_eq!(result.stop_reason, StopReason::CallBudgetExhausted);

            let result = scanner
                .scan(&ScanParameters::new().with_max_trades(0))
                .await
                .unwrap();
            assert_eq!(result.stop_reason, StopReason::TradeBudgetReached);
            assert_eq!(ledger.order_lookups(), 0);
        }

        #[tokio::test]
        async fn call_budget_wins_ties() {
            let ledger = ledger(&[("F2", Entry::Fill, 20), ("F1", Entry::Fill, 10)]);
            let result = scanner(&ledger)
                .scan(&ScanParameters::new().with_max_trades(1).with_max_api_calls(1))
                .await
                .unwrap();
            assert_eq!(result.stop_reason, StopReason::CallBudgetExhausted);
            assert_eq!(result.trades.len(), 1);
        }

        #[tokio::test]
        async fn scanner_defaults_apply() {
            let ledger = ledger(&[("F2", Entry::Fill, 20), ("F1", Entry::Fill, 10)]);
            let scanner = HistoryScanner::new(
                Arc::new(ledger.clone()),
                OWNER,
                ScannerConfig::with_rate_limit(unpaced()).with_max_trades(1),
            );
            let result = scanner.scan(&ScanParameters::new()).await.unwrap();
            assert_eq!(result.stop_reason, StopReason::TradeBudgetReached);
        }
    }

    mod known_hash {
        use super::*;

        #[tokio::test]
        async fn stops_at_stop_hash_without_resolving_it() {
            let ledger = ledger(&[
                ("F3", Entry::Fill, 30),
                ("F2", Entry::Fill, 20),
                ("F1", Entry::Fill, 10),
            ]);
            let result = scanner(&ledger)
                .scan(&ScanParameters::new().with_stop_at_hash("f2"))
                .await
                .unwrap();
            assert_eq!(result.stop_reason, StopReason::KnownHashReached);
            assert_eq!(hashes(&result.trades), ["F3"]);
            assert_eq!(looked_up(&ledger), ["F3"]);
        }

        #[tokio::test]
        async fn rescan_from_latest_trade_finds_nothing() {
            let ledger = ledger(&[
                ("O2", Entry::Open, 40),
                ("F2", Entry::Fill, 30),
                ("C1", Entry::Cancel, 20),
                ("F1", Entry::Fill, 10),
            ]);
            let scanner = scanner(&ledger);
            let first = scanner.scan(&ScanParameters::new()).await.unwrap();
            let latest = first.first_trade_hash().unwrap().clone();

            let second = scanner
                .scan(&ScanParameters::new().with_stop_at_hash(latest))
                .await
                .unwrap();
            assert!(second.trades.is_empty());
            assert_eq!(second.stop_reason, StopReason::KnownHashReached);
        }

        #[tokio::test]
        async fn repeated_hash_in_feed_stops() {
            let ledger = ledger(&[
                ("F2", Entry::Fill, 30),
                ("F2", Entry::Fill, 30),
                ("F1", Entry::Fill, 10),
            ]);
            let result = scanner(&ledger).scan(&ScanParameters::new()).await.unwrap();
            assert_eq!(result.stop_reason, StopReason::KnownHashReached);
            assert_eq!(hashes(&result.trades), ["F2"]);
        }

        #[tokio::test]
        async fn checked_on_non_order_notifications() {
            let ledger = ledger(&[("F2", Entry::Fill, 30), ("P1", Entry::Payment, 20)]);
            let result = scanner(&ledger)
                .scan(&ScanParameters::new().with_stop_at_hash("P1"))
                .await
                .unwrap();
            assert_eq!(result.stop_reason, StopReason::KnownHashReached);
        }
    }

    mod cutoff {
        use super::*;

        fn five() -> InMemoryLedger {
            ledger(&[
                ("T5", Entry::Fill, 5),
                ("T4", Entry::Open, 4),
                ("T3", Entry::Fill, 3),
                ("T2", Entry::Fill, 2),
                ("T1", Entry::Fill, 1),
            ])
        }

        #[tokio::test]
        async fn inclusive_boundary_newest_first() {
            let ledger = five();
            let result = scanner(&ledger)
                .scan(&ScanParameters::new().with_earliest_timestamp(ts(3)))
                .await
                .unwrap();
            assert_eq!(result.stop_reason, StopReason::TimeCutoffReached);
            assert_eq!(looked_up(&ledger), ["T5", "T4", "T3"]);
            assert_eq!(hashes(&result.trades), ["T5", "T3"]);
        }

        #[tokio::test]
        async fn oldest_first_skips_older_notifications() {
            let ledger = five();
            let result = scanner(&ledger)
                .scan(
                    &ScanParameters::new()
                        .with_earliest_timestamp(ts(3))
                        .with_earliest_first(true),
                )
                .await
                .unwrap();
            assert_eq!(result.stop_reason, StopReason::Completed);
            assert_eq!(looked_up(&ledger), ["T3", "T4", "T5"]);
            assert_eq!(hashes(&result.trades), ["T3", "T5"]);
        }

        #[tokio::test]
        async fn cutoff_before_feed_start_is_inert() {
            let ledger = five();
            let result = scanner(&ledger)
                .scan(&ScanParameters::new().with_earliest_timestamp(ts(0)))
                .await
                .unwrap();
            assert_eq!(result.stop_reason, StopReason::Completed);
            assert_eq!(result.progress.api_calls_made, 5);
        }
    }

    mod failures {
        use super::*;

        #[tokio::test]
        async fn invalid_account() {
            let ledger = ledger(&[]);
            let err = scanner(&ledger)
                .scan(&ScanParameters::new().with_account("rNobody"))
                .await
                .unwrap_err();
            assert!(matches!(err.kind(), ScanErrorKind::InvalidAccount { .. }));
            assert!(!err.is_retryable());
            assert_eq!(err.progress(), ScanProgress::default());
        }

        #[tokio::test]
        async fn resolution_failure_reports_progress() {
            let ledger = ledger(&[
                ("F3", Entry::Fill, 30),
                ("F2", Entry::Fill, 20),
                ("F1", Entry::Fill, 10),
            ]);
            ledger.fail_hash(&TransactionHash::new("F2"));
            let err = scanner(&ledger)
                .scan(&ScanParameters::new().with_partial_on_cancel())
                .await
                .unwrap_err();
            assert!(err.is_retryable());
            assert_eq!(err.progress(), ScanProgress::new(2, 1));
            assert!(err.partial_trades().is_none());
            assert!(err.to_string().contains("2 api calls made"));
        }

        #[tokio::test]
        async fn page_failure_mid_scan() {
            let ledger = ledger(&[
                ("F3", Entry::Fill, 30),
                ("O1", Entry::Open, 20),
                ("F1", Entry::Fill, 10),
            ]);
            ledger.fail_page(2);
            let err = scanner(&ledger)
                .scan(&ScanParameters::new())
                .await
                .unwrap_err();
            assert!(matches!(err.kind(), ScanErrorKind::RemoteUnavailable(_)));
            assert_eq!(err.progress(), ScanProgress::new(2, 1));
        }

        #[tokio::test]
        async fn unrecognized_order_action_is_fatal() {
            let ledger = ledger(&[("ODD", Entry::Missing, 10)]);
            ledger.insert_transaction(OrderTransactionPayload {
                hash: TransactionHash::new("ODD"),
                ledger: 1,
                timestamp: ts(10),
                action: OrderAction::Other("offer_bridge".to_string()),
                fee: Decimal::ZERO,
                balance_changes: vec![],
            });
            let err = scanner(&ledger)
                .scan(&ScanParameters::new())
                .await
                .unwrap_err();
            assert!(matches!(
                err.kind(),
                ScanErrorKind::RemoteUnavailable(LedgerError::ProtocolError { .. })
            ));
        }
    }

    mod cancellation {
        use super::*;

        /// Triggers a cancel handle once a number of lookups went through.
        #[derive(Debug)]
        struct CancellingLedger {
            inner: InMemoryLedger,
            cancel: CancelHandle,
            after: usize,
        }

        #[async_trait]
        impl LedgerGateway for CancellingLedger {
            fn timeout_ms(&self) -> u64 {
                self.inner.timeout_ms()
            }

            async fn fetch_notifications(
                &self,
                account: &AccountId,
                request: &PageRequest,
            ) -> LedgerResult<NotificationPage> {
                self.inner.fetch_notifications(account, request).await
            }

            async fn fetch_order_transaction(
                &self,
                account: &AccountId,
                hash: &TransactionHash,
            ) -> LedgerResult<OrderTransactionPayload> {
                let result = self.inner.fetch_order_transaction(account, hash).await;
                if self.inner.order_lookups() >= self.after {
                    self.cancel.cancel();
                }
                result
            }
        }

        fn cancelling(after: usize) -> (InMemoryLedger, CancelHandle, HistoryScanner) {
            let ledger = ledger(&[
                ("F4", Entry::Fill, 40),
                ("F3", Entry::Fill, 30),
                ("F2", Entry::Fill, 20),
                ("F1", Entry::Fill, 10),
            ]);
            let cancel = CancelHandle::new();
            let gateway = CancellingLedger {
                inner: ledger.clone(),
                cancel: cancel.clone(),
                after,
            };
            (ledger, cancel, scanner_for(Arc::new(gateway)))
        }

        #[tokio::test]
        async fn discards_partial_results_by_default() {
            let (ledger, cancel, scanner) = cancelling(2);
            let err = scanner
                .scan_with_cancel(&ScanParameters::new(), &cancel)
                .await
                .unwrap_err();
            assert!(err.is_cancelled());
            assert!(err.partial_trades().is_none());
            assert_eq!(err.progress(), ScanProgress::new(2, 2));
            assert_eq!(ledger.order_lookups(), 2);
        }

        #[tokio::test]
        async fn returns_partial_results_on_request() {
            let (_ledger, cancel, scanner) = cancelling(3);
            let err = scanner
                .scan_with_cancel(&ScanParameters::new().with_partial_on_cancel(), &cancel)
                .await
                .unwrap_err();
            assert!(err.is_cancelled());
            assert_eq!(hashes(err.partial_trades().unwrap()), ["F4", "F3", "F2"]);
        }

        #[tokio::test]
        async fn cancelled_before_start() {
            let ledger = ledger(&[("F1", Entry::Fill, 10)]);
            let cancel = CancelHandle::new();
            cancel.cancel();
            let err = scanner(&ledger)
                .scan_with_cancel(&ScanParameters::new().with_partial_on_cancel(), &cancel)
                .await
                .unwrap_err();
            assert!(err.is_cancelled());
            assert_eq!(err.partial_trades().map(<[Trade]>::len), Some(0));
            assert_eq!(ledger.page_fetches(), 0);
        }
    }

    mod pacing {
        use super::*;
        use std::time::{Duration, Instant};

        #[tokio::test]
        async fn concurrent_scans_share_the_credential_pace() {
            let ledger = ledger(&[("F2", Entry::Fill, 20), ("F1", Entry::Fill, 10)]);
            let scanner = HistoryScanner::new(
                Arc::new(ledger.clone()),
                OWNER,
                ScannerConfig::with_rate_limit(
                    RateLimitPolicy::try_new(20, 1, TimeUnit::Seconds).unwrap(),
                ),
            );

            let start = Instant::now();
            let params = ScanParameters::new();
            let (a, b) = tokio::join!(scanner.scan(&params), scanner.scan(&params));
            assert_eq!(a.unwrap().trades.len(), 2);
            assert_eq!(b.unwrap().trades.len(), 2);
            assert_eq!(ledger.order_lookups(), 4);
            assert!(start.elapsed() + Duration::from_millis(5) >= Duration::from_millis(150));
        }
    }

    mod phases {
        use super::*;

        #[test]
        fn state_follows_phase_rules() {
            let mut state = ScanState::new();
            state.advance(ScanPhase::Completed);
            assert_eq!(state.phase, ScanPhase::Idle);
            state.advance(ScanPhase::Scanning);
            state.advance(ScanPhase::KnownHashReached);
            assert_eq!(state.phase, ScanPhase::KnownHashReached);
            state.advance(ScanPhase::Failed);
            assert_eq!(state.phase, ScanPhase::KnownHashReached);
        }
    }
}

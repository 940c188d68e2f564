//! # ledger-scan
//!
//! Bounded incremental trade-history scanner for paginated account-ledger
//! notification feeds.
//!
//! A ledger feed reports order entries, cancels and executions under one
//! notification type. Finding executed trades therefore costs one
//! resolution call per candidate notification. This crate walks the feed and
//! stops at whichever limit fires first: a trade budget, a call budget, a
//! known transaction hash or a time cutoff. Resolution calls are paced by a
//! "calls per time span" policy.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │ application   HistoryScanner                             │
//! │               ├── NotificationPager   (page walk)        │
//! │               └── TransactionResolver (paced lookups)    │
//! ├──────────────────────────────────────────────────────────┤
//! │ domain        Notification, ResolvedTransaction, Trade,  │
//! │               RateLimitPolicy, ScanPhase, StopReason     │
//! ├──────────────────────────────────────────────────────────┤
//! │ infrastructure LedgerGateway port                        │
//! │               ├── RippleRestClient (reqwest)             │
//! │               └── InMemoryLedger                         │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use ledger_scan::application::{HistoryScanner, ScanParameters, ScannerConfig};
//! use ledger_scan::infrastructure::ripple::RippleRestClient;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let gateway = Arc::new(RippleRestClient::new("https://api.ripple.com", 10_000)?);
//! let scanner = HistoryScanner::new(gateway, "rfZz9cPdU4DSCQhW2hsmu4tbzfdEbY3VrH", ScannerConfig::default());
//!
//! let result = scanner
//!     .scan(&ScanParameters::new().with_max_trades(5))
//!     .await?;
//! for trade in &result.trades {
//!     println!("{trade}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod settings;
pub mod telemetry;

pub use application::{
    CancelHandle, HistoryScanner, ScanError, ScanErrorKind, ScanParameters, ScanProgress,
    ScanResult, ScannerConfig,
};
pub use domain::entities::Trade;
pub use domain::value_objects::{RateLimitPolicy, StopReason, TimeUnit};
pub use settings::ScannerSettings;

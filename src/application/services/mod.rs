//! # Application Services
//!
//! Services that orchestrate domain logic and infrastructure.
//!
//! This module provides application-level services including:
//! - [`HistoryScanner`]: Bounded incremental trade-history scan
//! - [`NotificationPager`]: Lazy walk over a notification feed
//! - [`TransactionResolver`]: Paced, counted transaction classification
//! - [`Pacer`]: Call spacing for one credential

pub mod history_scanner;
pub mod notification_pager;
pub mod pacing;
pub mod transaction_resolver;

pub use history_scanner::{CancelHandle, HistoryScanner, ScanResult, ScannerConfig};
pub use notification_pager::NotificationPager;
pub use pacing::Pacer;
pub use transaction_resolver::TransactionResolver;

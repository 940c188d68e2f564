//! # Application Layer
//!
//! Scan orchestration on top of the domain model and the ledger port.

pub mod error;
pub mod params;
pub mod services;

pub use error::{ScanError, ScanErrorKind, ScanOutcome, ScanProgress};
pub use params::{ScanDefaults, ScanLimits, ScanParameters};
pub use services::{CancelHandle, HistoryScanner, ScanResult, ScannerConfig};

//! # Ledger Gateway
//!
//! Port and shared plumbing for remote ledger access.
//!
//! - [`LedgerGateway`]: notification listing and order lookup
//! - [`LedgerError`]: remote failure taxonomy
//! - [`InMemoryLedger`]: scripted in-memory implementation
//! - [`HttpClient`]: reqwest wrapper used by HTTP gateways

pub mod error;
pub mod http_client;
pub mod in_memory;
pub mod traits;

pub use error::{LedgerError, LedgerResult};
pub use http_client::HttpClient;
pub use in_memory::InMemoryLedger;
pub use traits::{DEFAULT_PAGE_LENGTH, LedgerGateway, NotificationPage, PageCursor, PageRequest};

//! # Domain Entities
//!
//! Records read from, or derived from, the remote ledger.
//!
//! - [`Notification`]: Feed entry referencing a transaction by hash
//! - [`ResolvedTransaction`]: Order transaction classified from its payload
//! - [`Trade`]: Executed trade of one account

pub mod notification;
pub mod trade;
pub mod transaction;

pub use notification::Notification;
pub use trade::Trade;
pub use transaction::{
    ClassificationError, Execution, OrderAction, OrderTransactionPayload, ResolvedTransaction,
    TransactionDetails,
};

//! # Value Objects
//!
//! Immutable types with validation and domain semantics.
//!
//! ## Identity Types
//!
//! - [`AccountId`], [`TransactionHash`]: String-based ledger identifiers
//! - [`ScanId`]: UUID correlating one history scan
//!
//! ## Pacing
//!
//! - [`RateLimitPolicy`]: "calls per time span" quota and its derived delay
//!
//! ## Domain Enums
//!
//! - `NotificationType`: Kind of ledger event a notification refers to
//! - `TransactionKind`: Order entry, cancel or execution
//! - `StopReason`, `ScanPhase`: History scan outcome and lifecycle

pub mod amount;
pub mod enums;
pub mod ids;
pub mod rate_limit;
pub mod scan_phase;
pub mod timestamp;

pub use amount::Amount;
pub use enums::{FeedOrder, NotificationType, StopReason, TransactionKind};
pub use ids::{AccountId, ScanId, TransactionHash};
pub use rate_limit::{RateLimitError, RateLimitPolicy, TimeUnit};
pub use scan_phase::ScanPhase;
pub use timestamp::Timestamp;

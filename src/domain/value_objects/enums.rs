//! # Domain Enums
//!
//! Enumeration types for ledger concepts.
//!
//! - [`NotificationType`] - Kind of account event a notification refers to
//! - [`TransactionKind`] - Classification of a resolved order transaction
//! - [`FeedOrder`] - Direction in which the notification feed is pulled
//! - [`StopReason`] - Why a successful history scan stopped
//!
//! All enums implement `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`,
//! `Display` and Serde traits.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of account event referenced by a notification.
///
/// The notification feed only says which kind of ledger object an event
/// touched; it never says whether an order was entered, cancelled or
/// executed.
///
/// # Examples
///
/// ```
/// use ledger_scan::domain::value_objects::enums::NotificationType;
///
/// let kind: NotificationType = "order".parse().unwrap();
/// assert!(kind.is_order());
/// assert_eq!("offer".parse::<NotificationType>().unwrap(), NotificationType::Unknown);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationType {
    /// Order entry, cancel or execution.
    Order,
    /// Payment between accounts.
    Payment,
    /// Trust line change.
    Trustline,
    /// Any type this client does not recognise.
    #[default]
    #[serde(other)]
    Unknown,
}

impl NotificationType {
    /// Returns true if this notification may reference an order transaction.
    #[inline]
    #[must_use]
    pub const fn is_order(self) -> bool {
        matches!(self, Self::Order)
    }
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Order => write!(f, "order"),
            Self::Payment => write!(f, "payment"),
            Self::Trustline => write!(f, "trustline"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

impl FromStr for NotificationType {
    type Err = ParseEnumError;

    /// Unrecognised values parse as [`NotificationType::Unknown`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "order" => Self::Order,
            "payment" => Self::Payment,
            "trustline" => Self::Trustline,
            _ => Self::Unknown,
        })
    }
}

/// Classification of a resolved order transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum TransactionKind {
    /// A new order was placed and rested on the book.
    OrderEntry = 0,
    /// An open order was cancelled.
    OrderCancel = 1,
    /// An order crossed and exchanged value.
    OrderExecution = 2,
}

impl TransactionKind {
    /// Returns true if this classification is a trade.
    #[inline]
    #[must_use]
    pub const fn is_execution(self) -> bool {
        matches!(self, Self::OrderExecution)
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OrderEntry => write!(f, "ORDER_ENTRY"),
            Self::OrderCancel => write!(f, "ORDER_CANCEL"),
            Self::OrderExecution => write!(f, "ORDER_EXECUTION"),
        }
    }
}

/// Direction in which the notification feed is pulled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FeedOrder {
    /// Most recent notification first.
    #[default]
    NewestFirst,
    /// Oldest notification first.
    OldestFirst,
}

impl FeedOrder {
    /// Creates the order from the remote API's `earliest_first` flag.
    #[inline]
    #[must_use]
    pub const fn from_earliest_first(earliest_first: bool) -> Self {
        if earliest_first {
            Self::OldestFirst
        } else {
            Self::NewestFirst
        }
    }

    /// Returns the remote API's `earliest_first` flag.
    #[inline]
    #[must_use]
    pub const fn is_earliest_first(self) -> bool {
        matches!(self, Self::OldestFirst)
    }
}

impl fmt::Display for FeedOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NewestFirst => write!(f, "NEWEST_FIRST"),
            Self::OldestFirst => write!(f, "OLDEST_FIRST"),
        }
    }
}

/// Why a successful history scan stopped.
///
/// # Examples
///
/// ```
/// use ledger_scan::domain::value_objects::enums::StopReason;
///
/// assert!(StopReason::CallBudgetExhausted.is_budget_limit());
/// assert!(!StopReason::Completed.is_early_stop());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StopReason {
    /// The notification feed was exhausted.
    Completed,
    /// The resolution call budget was used up.
    CallBudgetExhausted,
    /// The requested number of trades was found.
    TradeBudgetReached,
    /// The stop hash, or a hash already seen in this scan, was reached.
    KnownHashReached,
    /// A notification older than the cutoff was reached.
    TimeCutoffReached,
}

impl StopReason {
    /// Returns true if the scan stopped before the feed was exhausted.
    #[inline]
    #[must_use]
    pub const fn is_early_stop(self) -> bool {
        !matches!(self, Self::Completed)
    }

    /// Returns true if a call or trade budget stopped the scan.
    #[inline]
    #[must_use]
    pub const fn is_budget_limit(self) -> bool {
        matches!(self, Self::CallBudgetExhausted | Self::TradeBudgetReached)
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed => write!(f, "COMPLETED"),
            Self::CallBudgetExhausted => write!(f, "CALL_BUDGET_EXHAUSTED"),
            Self::TradeBudgetReached => write!(f, "TRADE_BUDGET_REACHED"),
            Self::KnownHashReached => write!(f, "KNOWN_HASH_REACHED"),
            Self::TimeCutoffReached => write!(f, "TIME_CUTOFF_REACHED"),
        }
    }
}

/// Error type for parsing enum values from strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseEnumError {
    /// The provided string value is not valid for the enum.
    InvalidValue(&'static str, String),
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidValue(enum_name, value) => {
                write!(f, "invalid {} value: '{}'", enum_name, value)
            }
        }
    }
}

impl std::error::Error for ParseEnumError {}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    mod notification_type {
        use super::*;

        #[test]
        fn deserializes_known_and_unknown() {
            let kind: NotificationType = serde_json::from_str("\"order\"").unwrap();
            assert_eq!(kind, NotificationType::Order);
            let kind: NotificationType = serde_json::from_str("\"escrow\"").unwrap();
            assert_eq!(kind, NotificationType::Unknown);
        }

        #[test]
        fn only_order_is_order() {
            assert!(NotificationType::Order.is_order());
            assert!(!NotificationType::Payment.is_order());
            assert!(!NotificationType::Unknown.is_order());
        }
    }

    mod transaction_kind {
        use super::*;

        #[test]
        fn only_execution_is_trade() {
            assert!(TransactionKind::OrderExecution.is_execution());
            assert!(!TransactionKind::OrderEntry.is_execution());
            assert!(!TransactionKind::OrderCancel.is_execution());
        }

        #[test]
        fn display() {
            assert_eq!(TransactionKind::OrderCancel.to_string(), "ORDER_CANCEL");
        }
    }

    mod feed_order {
        use super::*;

        #[test]
        fn earliest_first_flag() {
            assert_eq!(FeedOrder::from_earliest_first(true), FeedOrder::OldestFirst);
            assert_eq!(FeedOrder::from_earliest_first(false), FeedOrder::NewestFirst);
            assert!(FeedOrder::OldestFirst.is_earliest_first());
            assert_eq!(FeedOrder::default(), FeedOrder::NewestFirst);
        }
    }

    mod stop_reason {
        use super::*;

        #[test]
        fn classification() {
            assert!(!StopReason::Completed.is_early_stop());
            assert!(StopReason::KnownHashReached.is_early_stop());
            assert!(StopReason::TradeBudgetReached.is_budget_limit());
            assert!(!StopReason::TimeCutoffReached.is_budget_limit());
        }

        #[test]
        fn serde_screaming_snake() {
            let json = serde_json::to_string(&StopReason::TimeCutoffReached).unwrap();
            assert_eq!(json, "\"TIME_CUTOFF_REACHED\"");
        }
    }
}

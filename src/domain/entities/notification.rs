//! # Notification Entity
//!
//! One entry of a remote ledger account notification feed.
//!
//! A notification references an account event by transaction hash without
//! revealing its outcome. Notifications are produced by the feed and are
//! read-only to the scanner.

use crate::domain::value_objects::{NotificationType, Timestamp, TransactionHash};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A ledger feed entry.
///
/// # Examples
///
/// ```
/// use ledger_scan::domain::entities::notification::Notification;
/// use ledger_scan::domain::value_objects::{NotificationType, Timestamp, TransactionHash};
///
/// let n = Notification::new(
///     12_345,
///     TransactionHash::new("AB12"),
///     NotificationType::Order,
///     Timestamp::from_secs(1_425_000_000).unwrap(),
/// );
/// assert!(n.is_order());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Feed sequence number (ledger index for ledger-backed feeds).
    sequence_id: u64,
    /// Hash of the referenced transaction.
    hash: TransactionHash,
    /// Kind of event.
    notification_type: NotificationType,
    /// When the event was validated.
    timestamp: Timestamp,
}

impl Notification {
    /// Creates a notification.
    #[must_use]
    pub fn new(
        sequence_id: u64,
        hash: TransactionHash,
        notification_type: NotificationType,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            sequence_id,
            hash,
            notification_type,
            timestamp,
        }
    }

    /// Returns the feed sequence number.
    #[inline]
    #[must_use]
    pub fn sequence_id(&self) -> u64 {
        self.sequence_id
    }

    /// Returns the referenced transaction hash.
    #[inline]
    #[must_use]
    pub fn hash(&self) -> &TransactionHash {
        &self.hash
    }

    /// Returns the notification type.
    #[inline]
    #[must_use]
    pub fn notification_type(&self) -> NotificationType {
        self.notification_type
    }

    /// Returns the event timestamp.
    #[inline]
    #[must_use]
    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    /// Returns true if the notification may reference an order transaction.
    #[inline]
    #[must_use]
    pub fn is_order(&self) -> bool {
        self.notification_type.is_order()
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Notification(#{} {} {} @ {})",
            self.sequence_id, self.notification_type, self.hash, self.timestamp
        )
    }
}

//! # Identifiers
//!
//! Identity types for ledger accounts, transactions and scans.
//!
//! - [`AccountId`]: ledger account address, as issued by the remote ledger
//! - [`TransactionHash`]: ledger transaction hash referenced by notifications
//! - [`ScanId`]: UUID correlating the log output of one history scan

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Ledger account identifier.
///
/// The remote ledger is the only authority on whether an account exists;
/// no local validation beyond non-emptiness is performed.
///
/// # Examples
///
/// ```
/// use ledger_scan::domain::value_objects::AccountId;
///
/// let account = AccountId::new("rfZz9cPdU4DSCQhW2hsmu4tbzfdEbY3VrH");
/// assert_eq!(account.as_str(), "rfZz9cPdU4DSCQhW2hsmu4tbzfdEbY3VrH");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    /// Creates a new account identifier.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the identifier as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the identifier is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AccountId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Ledger transaction hash.
///
/// Hashes are compared case-insensitively by normalising to upper case on
/// construction, since ledger feeds are not consistent about hex casing.
///
/// # Examples
///
/// ```
/// use ledger_scan::domain::value_objects::TransactionHash;
///
/// let a = TransactionHash::new("ab12");
/// let b = TransactionHash::new("AB12");
/// assert_eq!(a, b);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct TransactionHash(String);

impl TransactionHash {
    /// Creates a new transaction hash.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into().trim().to_ascii_uppercase())
    }

    /// Returns the hash as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TransactionHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for TransactionHash {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for TransactionHash {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<TransactionHash> for String {
    fn from(value: TransactionHash) -> Self {
        value.0
    }
}

/// Identifier of a single history scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScanId(Uuid);

impl ScanId {
    /// Creates a new random scan ID.
    #[must_use]
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying UUID.
    #[inline]
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for ScanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn account_is_empty() {
        assert!(AccountId::new("  ").is_empty());
        assert!(!AccountId::new("rAccount").is_empty());
    }

    #[test]
    fn hash_normalises_case_and_whitespace() {
        let hash = TransactionHash::new(" 0a1b ");
        assert_eq!(hash.as_str(), "0A1B");
    }

    #[test]
    fn hash_deserializes_normalised() {
        let hash: TransactionHash = serde_json::from_str("\"abc\"").unwrap();
        assert_eq!(hash, TransactionHash::new("ABC"));
    }

    #[test]
    fn scan_ids_are_unique() {
        assert_ne!(ScanId::new_v4(), ScanId::new_v4());
    }
}

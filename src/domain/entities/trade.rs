//! # Trade Entity
//!
//! A user trade reconstructed from an executed order transaction.

use crate::domain::entities::transaction::ResolvedTransaction;
use crate::domain::value_objects::{AccountId, Amount, Timestamp, TransactionHash};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An executed trade of one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    /// Hash of the executing transaction.
    hash: TransactionHash,
    /// Account that traded.
    account: AccountId,
    /// When the execution was validated.
    executed_at: Timestamp,
    /// Amount received.
    bought: Amount,
    /// Amount given up.
    sold: Amount,
    /// Network fee in the native currency.
    fee: Decimal,
}

impl Trade {
    /// Builds a trade from a resolved transaction.
    ///
    /// Returns `None` unless the transaction is an order execution.
    #[must_use]
    pub fn from_resolved(account: &AccountId, transaction: &ResolvedTransaction) -> Option<Self> {
        let execution = transaction.execution()?;
        Some(Self {
            hash: transaction.hash().clone(),
            account: account.clone(),
            executed_at: transaction.timestamp(),
            bought: execution.bought.clone(),
            sold: execution.sold.clone(),
            fee: execution.fee,
        })
    }

    /// Returns the executing transaction hash.
    #[inline]
    #[must_use]
    pub fn hash(&self) -> &TransactionHash {
        &self.hash
    }

    /// Returns the trading account.
    #[inline]
    #[must_use]
    pub fn account(&self) -> &AccountId {
        &self.account
    }

    /// Returns when the trade executed.
    #[inline]
    #[must_use]
    pub fn executed_at(&self) -> Timestamp {
        self.executed_at
    }

    /// Returns the amount received.
    #[inline]
    #[must_use]
    pub fn bought(&self) -> &Amount {
        &self.bought
    }

    /// Returns the amount given up.
    #[inline]
    #[must_use]
    pub fn sold(&self) -> &Amount {
        &self.sold
    }

    /// Returns the network fee.
    #[inline]
    #[must_use]
    pub fn fee(&self) -> Decimal {
        self.fee
    }
}

impl fmt::Display for Trade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Trade({}: bought {} for {} @ {})",
            self.hash, self.bought, self.sold, self.executed_at
        )
    }
}

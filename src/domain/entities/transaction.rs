//! # Order Transactions
//!
//! Raw order transaction payloads and their classification.
//!
//! A notification of type `order` may refer to an order entry, a cancel, or
//! an execution; only the transaction payload tells them apart. This module
//! turns the payload shape into the closed [`TransactionDetails`] variant,
//! once, so nothing downstream re-inspects raw balance changes.
//!
//! # Classification
//!
//! - action `order_cancel` ⇒ [`TransactionDetails::OrderCancel`]
//! - action `order_create` with value exchanged ⇒ [`TransactionDetails::OrderExecution`]
//! - action `order_create` otherwise ⇒ [`TransactionDetails::OrderEntry`]
//!
//! Value is exchanged when, after netting the fee back into the native
//! currency change, the account has both a credit and a debit in different
//! assets.

use crate::domain::value_objects::{Amount, Timestamp, TransactionHash, TransactionKind};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Order action reported by the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OrderAction {
    /// An order was submitted (it may have rested, crossed, or both).
    OrderCreate,
    /// An order was cancelled.
    OrderCancel,
    /// Any other action string.
    Other(String),
}

impl OrderAction {
    /// Parses the ledger's action string.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "order_create" => Self::OrderCreate,
            "order_cancel" => Self::OrderCancel,
            _ => Self::Other(value.to_string()),
        }
    }
}

impl fmt::Display for OrderAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OrderCreate => write!(f, "order_create"),
            Self::OrderCancel => write!(f, "order_cancel"),
            Self::Other(action) => write!(f, "{action}"),
        }
    }
}

/// Raw order transaction as fetched from the ledger, before classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderTransactionPayload {
    /// Transaction hash.
    pub hash: TransactionHash,
    /// Ledger index the transaction was validated in.
    pub ledger: u64,
    /// Validation time.
    pub timestamp: Timestamp,
    /// Order action.
    pub action: OrderAction,
    /// Network fee paid in the native currency.
    pub fee: Decimal,
    /// Balance changes of the queried account, fee included.
    pub balance_changes: Vec<Amount>,
}

/// Error classifying an order payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassificationError {
    /// The action is none of the known order actions.
    #[error("transaction {hash} has unrecognised order action '{action}'")]
    UnrecognizedAction {
        /// Transaction hash.
        hash: TransactionHash,
        /// The unrecognised action.
        action: String,
    },
    /// Netting the fee into the native balance change overflowed.
    #[error("transaction {hash} balance change overflows when netting fee {fee}")]
    Overflow {
        /// Transaction hash.
        hash: TransactionHash,
        /// The fee being netted.
        fee: Decimal,
    },
}

/// Value exchanged by an executed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Execution {
    /// What the account received (positive).
    pub bought: Amount,
    /// What the account gave up (positive).
    pub sold: Amount,
    /// Network fee in the native currency.
    pub fee: Decimal,
}

/// Classified transaction details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionDetails {
    /// Order placed without exchanging value.
    OrderEntry {
        /// Network fee.
        fee: Decimal,
    },
    /// Order cancelled.
    OrderCancel {
        /// Network fee.
        fee: Decimal,
    },
    /// Order executed.
    OrderExecution(Execution),
}

impl TransactionDetails {
    /// Returns the classification label.
    #[must_use]
    pub fn kind(&self) -> TransactionKind {
        match self {
            Self::OrderEntry { .. } => TransactionKind::OrderEntry,
            Self::OrderCancel { .. } => TransactionKind::OrderCancel,
            Self::OrderExecution(_) => TransactionKind::OrderExecution,
        }
    }
}

/// A transaction classified from one notification. Immutable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedTransaction {
    hash: TransactionHash,
    timestamp: Timestamp,
    details: TransactionDetails,
}

impl ResolvedTransaction {
    /// Creates a resolved transaction.
    #[must_use]
    pub fn new(hash: TransactionHash, timestamp: Timestamp, details: TransactionDetails) -> Self {
        Self {
            hash,
            timestamp,
            details,
        }
    }

    /// Returns the transaction hash.
    #[inline]
    #[must_use]
    pub fn hash(&self) -> &TransactionHash {
        &self.hash
    }

    /// Returns the validation time.
    #[inline]
    #[must_use]
    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    /// Returns the classified details.
    #[inline]
    #[must_use]
    pub fn details(&self) -> &TransactionDetails {
        &self.details
    }

    /// Returns the classification label.
    #[inline]
    #[must_use]
    pub fn classification(&self) -> TransactionKind {
        self.details.kind()
    }

    /// Returns the execution, if this transaction is a trade.
    #[must_use]
    pub fn execution(&self) -> Option<&Execution> {
        match &self.details {
            TransactionDetails::OrderExecution(execution) => Some(execution),
            _ => None,
        }
    }
}

impl fmt::Display for ResolvedTransaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.classification(), self.hash)
    }
}

impl OrderTransactionPayload {
    /// Classifies the payload by its shape.
    ///
    /// # Errors
    ///
    /// - `ClassificationError::UnrecognizedAction` if the action is neither
    ///   `order_create` nor `order_cancel`
    /// - `ClassificationError::Overflow` if netting the fee overflows
    pub fn classify(self) -> Result<ResolvedTransaction, ClassificationError> {
        let details = match &self.action {
            OrderAction::OrderCancel => TransactionDetails::OrderCancel { fee: self.fee },
            OrderAction::OrderCreate => match self.exchanged_value()? {
                Some((bought, sold)) => TransactionDetails::OrderExecution(Execution {
                    bought,
                    sold,
                    fee: self.fee,
                }),
                None => TransactionDetails::OrderEntry { fee: self.fee },
            },
            OrderAction::Other(action) => {
                return Err(ClassificationError::UnrecognizedAction {
                    hash: self.hash,
                    action: action.clone(),
                });
            }
        };
        Ok(ResolvedTransaction::new(self.hash, self.timestamp, details))
    }

    /// Net balance changes with the fee removed from the native change.
    fn net_changes(&self) -> Result<Vec<Amount>, ClassificationError> {
        let mut changes = Vec::with_capacity(self.balance_changes.len());
        for change in &self.balance_changes {
            let net = if change.is_native() {
                let value = change.value().checked_add(self.fee).ok_or_else(|| {
                    ClassificationError::Overflow {
                        hash: self.hash.clone(),
                        fee: self.fee,
                    }
                })?;
                change.with_value(value)
            } else {
                change.clone()
            };
            if !net.value().is_zero() {
                changes.push(net);
            }
        }
        Ok(changes)
    }

    /// The first credit and first debit in a different asset, both positive.
    fn exchanged_value(&self) -> Result<Option<(Amount, Amount)>, ClassificationError> {
        let changes = self.net_changes()?;
        let Some(bought) = changes.iter().find(|c| c.is_credit()) else {
            return Ok(None);
        };
        Ok(changes
            .iter()
            .find(|c| c.is_debit() && !c.same_asset(bought))
            .map(|sold| (bought.clone(), sold.abs())))
    }
}

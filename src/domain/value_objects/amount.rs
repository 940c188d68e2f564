//! # Amount Value Object
//!
//! A signed quantity of one ledger currency.
//!
//! Issued currencies are identified by currency code plus issuing
//! counterparty; the ledger's native currency has no counterparty.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Currency code of the ledger's native asset.
pub const NATIVE_CURRENCY: &str = "XRP";

/// A quantity of a currency, optionally issued by a counterparty.
///
/// # Examples
///
/// ```
/// use ledger_scan::domain::value_objects::Amount;
/// use rust_decimal::Decimal;
///
/// let usd = Amount::issued("USD", "rvYAfWj5gh67oV6fW32ZzP3Aw4Eubs59B", Decimal::new(-125, 1));
/// assert!(usd.is_debit());
/// assert_eq!(usd.abs().value(), Decimal::new(125, 1));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Amount {
    currency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    counterparty: Option<String>,
    value: Decimal,
}

impl Amount {
    /// Creates an amount. An empty counterparty is treated as none.
    #[must_use]
    pub fn new(currency: impl Into<String>, counterparty: Option<String>, value: Decimal) -> Self {
        Self {
            currency: currency.into(),
            counterparty: counterparty.filter(|c| !c.is_empty()),
            value,
        }
    }

    /// Creates an amount of the native currency.
    #[must_use]
    pub fn native(value: Decimal) -> Self {
        Self::new(NATIVE_CURRENCY, None, value)
    }

    /// Creates an amount of an issued currency.
    #[must_use]
    pub fn issued(
        currency: impl Into<String>,
        counterparty: impl Into<String>,
        value: Decimal,
    ) -> Self {
        Self::new(currency, Some(counterparty.into()), value)
    }

    /// Returns the currency code.
    #[inline]
    #[must_use]
    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// Returns the issuing counterparty, if any.
    #[inline]
    #[must_use]
    pub fn counterparty(&self) -> Option<&str> {
        self.counterparty.as_deref()
    }

    /// Returns the signed value.
    #[inline]
    #[must_use]
    pub fn value(&self) -> Decimal {
        self.value
    }

    /// Returns true for the native currency.
    #[must_use]
    pub fn is_native(&self) -> bool {
        self.currency.eq_ignore_ascii_case(NATIVE_CURRENCY) && self.counterparty.is_none()
    }

    /// Returns true if the value is positive.
    #[inline]
    #[must_use]
    pub fn is_credit(&self) -> bool {
        self.value.is_sign_positive() && !self.value.is_zero()
    }

    /// Returns true if the value is negative.
    #[inline]
    #[must_use]
    pub fn is_debit(&self) -> bool {
        self.value.is_sign_negative() && !self.value.is_zero()
    }

    /// Returns true if both amounts denote the same currency and issuer.
    #[must_use]
    pub fn same_asset(&self, other: &Self) -> bool {
        self.currency.eq_ignore_ascii_case(&other.currency) && self.counterparty == other.counterparty
    }

    /// Returns a copy with a different value.
    #[must_use]
    pub fn with_value(&self, value: Decimal) -> Self {
        Self {
            value,
            ..self.clone()
        }
    }

    /// Returns a copy with the absolute value.
    #[must_use]
    pub fn abs(&self) -> Self {
        self.with_value(self.value.abs())
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.currency)?;
        if let Some(counterparty) = &self.counterparty {
            write!(f, "/{}", counterparty)?;
        }
        Ok(())
    }
}

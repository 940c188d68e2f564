//! # Ripple REST DTOs
//!
//! Wire types for the Ripple REST notification and order endpoints, and their
//! conversion into domain types.

use crate::domain::entities::notification::Notification;
use crate::domain::entities::transaction::{OrderAction, OrderTransactionPayload};
use crate::domain::value_objects::{Amount, NotificationType, Timestamp, TransactionHash};
use crate::infrastructure::ledger::error::{LedgerError, LedgerResult};
use rust_decimal::Decimal;
use serde::Deserialize;

/// Integer fields the API sends either as JSON numbers or as strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FlexibleU64 {
    /// JSON number.
    Number(u64),
    /// Decimal string.
    Text(String),
}

impl FlexibleU64 {
    fn parse(&self, field: &str) -> LedgerResult<u64> {
        match self {
            Self::Number(value) => Ok(*value),
            Self::Text(text) => text.trim().parse().map_err(|_| {
                LedgerError::protocol_error(format!("{field} is not an integer: '{text}'"))
            }),
        }
    }
}

fn parse_timestamp(value: &str) -> LedgerResult<Timestamp> {
    Timestamp::parse_rfc3339(value)
        .map_err(|e| LedgerError::protocol_error(format!("invalid timestamp '{value}': {e}")))
}

/// Error body returned with `success: false`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorResponse {
    /// Error category, e.g. `invalid_request`.
    #[serde(default)]
    pub error_type: Option<String>,
    /// Short error.
    #[serde(default)]
    pub error: Option<String>,
    /// Longer description.
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorResponse {
    /// Parses an error body, falling back to the raw text as the message.
    #[must_use]
    pub fn from_body(body: &str) -> Self {
        serde_json::from_str(body).unwrap_or_else(|_| Self {
            message: Some(body.to_string()),
            ..Self::default()
        })
    }

    /// Returns a one-line description.
    #[must_use]
    pub fn describe(&self) -> String {
        match (&self.error, &self.message) {
            (Some(error), Some(message)) if !message.is_empty() => format!("{error}: {message}"),
            (Some(error), _) => error.clone(),
            (None, Some(message)) => message.clone(),
            (None, None) => "unspecified error".to_string(),
        }
    }
}

/// `GET /v1/accounts/{account}/notifications` response.
#[derive(Debug, Clone, Deserialize)]
pub struct NotificationsResponse {
    /// Whether the request succeeded.
    pub success: bool,
    /// Notifications in requested order.
    #[serde(default)]
    pub notifications: Vec<NotificationDto>,
    /// Error fields, present when `success` is false.
    #[serde(flatten)]
    pub error: ErrorResponse,
}

/// One notification.
#[derive(Debug, Clone, Deserialize)]
pub struct NotificationDto {
    /// Event type, e.g. `order` or `payment`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Ledger index.
    pub ledger: FlexibleU64,
    /// Transaction hash.
    pub hash: String,
    /// RFC 3339 validation time.
    pub timestamp: String,
}

impl NotificationDto {
    /// Converts into a domain notification.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::ProtocolError` for unparseable fields.
    pub fn into_domain(self) -> LedgerResult<Notification> {
        let kind: NotificationType = self
            .kind
            .parse()
            .unwrap_or(NotificationType::Unknown);
        Ok(Notification::new(
            self.ledger.parse("ledger")?,
            TransactionHash::new(self.hash),
            kind,
            parse_timestamp(&self.timestamp)?,
        ))
    }
}

/// One balance change.
#[derive(Debug, Clone, Deserialize)]
pub struct BalanceChangeDto {
    /// Issuer; empty for the native currency.
    #[serde(default)]
    pub counterparty: String,
    /// Currency code.
    pub currency: String,
    /// Signed change.
    pub value: Decimal,
}

impl From<BalanceChangeDto> for Amount {
    fn from(dto: BalanceChangeDto) -> Self {
        Amount::new(dto.currency, Some(dto.counterparty), dto.value)
    }
}

/// `GET /v1/accounts/{account}/orders/{hash}` response.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderTransactionResponse {
    /// Whether the request succeeded.
    pub success: bool,
    /// Transaction hash.
    #[serde(default)]
    pub hash: Option<String>,
    /// Ledger index.
    #[serde(default)]
    pub ledger: Option<FlexibleU64>,
    /// RFC 3339 validation time.
    #[serde(default)]
    pub timestamp: Option<String>,
    /// Network fee in the native currency.
    #[serde(default)]
    pub fee: Option<Decimal>,
    /// `order_create` or `order_cancel`.
    #[serde(default)]
    pub action: Option<String>,
    /// Balance changes of the queried account.
    #[serde(default)]
    pub balance_changes: Vec<BalanceChangeDto>,
    /// Error fields, present when `success` is false.
    #[serde(flatten)]
    pub error: ErrorResponse,
}

impl OrderTransactionResponse {
    /// Converts into a raw order payload.
    ///
    /// A missing hash falls back to `requested`, the hash that was looked up.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::ProtocolError` for missing or unparseable fields.
    pub fn into_domain(self, requested: &TransactionHash) -> LedgerResult<OrderTransactionPayload> {
        let missing = |field: &str| LedgerError::protocol_error(format!("order response missing {field}"));

        let timestamp = self.timestamp.as_deref().ok_or_else(|| missing("timestamp"))?;
        let action = self.action.as_deref().ok_or_else(|| missing("action"))?;
        let ledger = match &self.ledger {
            Some(ledger) => ledger.parse("ledger")?,
            None => 0,
        };

        Ok(OrderTransactionPayload {
            hash: self
                .hash
                .map_or_else(|| requested.clone(), TransactionHash::new),
            ledger,
            timestamp: parse_timestamp(timestamp)?,
            action: OrderAction::parse(action),
            fee: self.fee.unwrap_or(Decimal::ZERO),
            balance_changes: self.balance_changes.into_iter().map(Amount::from).collect(),
        })
    }
}

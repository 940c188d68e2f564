//! # Ripple REST Gateway
//!
//! [`LedgerGateway`] implementation for a Ripple REST server.
//!
//! - `GET {base}/v1/accounts/{account}/notifications?page=&results_per_page=&earliest_first=`
//! - `GET {base}/v1/accounts/{account}/orders/{hash}`
//!
//! The notification endpoint has no explicit end marker: a page shorter than
//! requested ends the feed, and an empty page always does.
//!
//! # Examples
//!
//! ```ignore
//! use ledger_scan::infrastructure::ripple::RippleRestClient;
//!
//! let client = RippleRestClient::new("https://api.ripple.com", 5000)?;
//! ```

use crate::domain::entities::notification::Notification;
use crate::domain::entities::transaction::OrderTransactionPayload;
use crate::domain::value_objects::{AccountId, TransactionHash};
use crate::infrastructure::ledger::error::{LedgerError, LedgerResult};
use crate::infrastructure::ledger::http_client::HttpClient;
use crate::infrastructure::ledger::traits::{LedgerGateway, NotificationPage, PageRequest};
use crate::infrastructure::ripple::dto::{
    ErrorResponse, NotificationsResponse, OrderTransactionResponse,
};
use async_trait::async_trait;
use tracing::debug;

/// Ripple REST client.
#[derive(Debug, Clone)]
pub struct RippleRestClient {
    http: HttpClient,
    base_url: String,
}

impl RippleRestClient {
    /// Creates a client for the server at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::InternalError` if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, timeout_ms: u64) -> LedgerResult<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self {
            http: HttpClient::new(timeout_ms)?,
            base_url,
        })
    }

    /// Returns the server base URL.
    #[inline]
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn notifications_url(&self, account: &AccountId) -> String {
        format!("{}/v1/accounts/{}/notifications", self.base_url, account)
    }

    fn order_url(&self, account: &AccountId, hash: &TransactionHash) -> String {
        format!("{}/v1/accounts/{}/orders/{}", self.base_url, account, hash)
    }
}

/// Maps a failed notification listing to the account-level taxonomy.
///
/// Only a server error body naming the account or address means the account
/// is bad. Other 400/404 bodies (wrong path, access denied) keep their
/// transport classification.
fn map_listing_error(account: &AccountId, error: LedgerError) -> LedgerError {
    match error {
        LedgerError::InvalidRequest { ref message } | LedgerError::NotFound { ref message } => {
            let body = ErrorResponse::from_body(message);
            if is_invalid_account(&body) {
                LedgerError::invalid_account(account.clone(), body.describe())
            } else {
                error
            }
        }
        other => other,
    }
}

fn is_invalid_account(body: &ErrorResponse) -> bool {
    if body.error_type.as_deref() != Some("invalid_request") {
        return false;
    }
    let description = body.describe().to_lowercase();
    description.contains("address") || description.contains("account")
}

/// Maps a failed order lookup to the transaction-level taxonomy.
fn map_lookup_error(hash: &TransactionHash, error: LedgerError) -> LedgerError {
    match error {
        LedgerError::NotFound { .. } => LedgerError::transaction_not_found(hash.clone()),
        LedgerError::InvalidRequest { message } => {
            let body = ErrorResponse::from_body(&message);
            if is_not_found(&body) {
                LedgerError::transaction_not_found(hash.clone())
            } else {
                LedgerError::invalid_request(body.describe())
            }
        }
        other => other,
    }
}

fn is_not_found(body: &ErrorResponse) -> bool {
    body.error_type.as_deref() == Some("transaction_not_found")
        || body.describe().to_lowercase().contains("not found")
}

#[async_trait]
impl LedgerGateway for RippleRestClient {
    fn timeout_ms(&self) -> u64 {
        self.http.timeout_ms()
    }

    async fn fetch_notifications(
        &self,
        account: &AccountId,
        request: &PageRequest,
    ) -> LedgerResult<NotificationPage> {
        let params = [
            ("page", request.page().to_string()),
            ("results_per_page", request.page_length().to_string()),
            (
                "earliest_first",
                request.order().is_earliest_first().to_string(),
            ),
            ("exclude_failed", "true".to_string()),
        ];

        let response: NotificationsResponse = self
            .http
            .get_with_params(&self.notifications_url(account), &params)
            .await
            .map_err(|e| map_listing_error(account, e))?;

        if !response.success {
            return Err(if is_invalid_account(&response.error) {
                LedgerError::invalid_account(account.clone(), response.error.describe())
            } else {
                LedgerError::protocol_error(response.error.describe())
            });
        }

        let notifications = response
            .notifications
            .into_iter()
            .map(|dto| dto.into_domain())
            .collect::<LedgerResult<Vec<Notification>>>()?;

        debug!(
            %account,
            page = request.page(),
            count = notifications.len(),
            "fetched notification page"
        );

        Ok(NotificationPage::from_request(request, notifications))
    }

    async fn fetch_order_transaction(
        &self,
        account: &AccountId,
        hash: &TransactionHash,
    ) -> LedgerResult<OrderTransactionPayload> {
        let response: OrderTransactionResponse = self
            .http
            .get(&self.order_url(account, hash))
            .await
            .map_err(|e| map_lookup_error(hash, e))?;

        if !response.success {
            return Err(if is_not_found(&response.error) {
                LedgerError::transaction_not_found(hash.clone())
            } else {
                LedgerError::protocol_error(response.error.describe())
            });
        }

        response.into_domain(hash)
    }
}

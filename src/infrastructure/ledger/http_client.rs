//! # HTTP Client Utilities
//!
//! Shared HTTP client for ledger gateways.
//!
//! This module provides a reusable HTTP client wrapper with:
//! - A per-request timeout, surfaced as `LedgerError::Timeout`
//! - JSON deserialization
//! - Status code to [`LedgerError`] mapping
//!
//! The client never retries; one call is one attempt.
//!
//! # Examples
//!
//! ```ignore
//! use ledger_scan::infrastructure::ledger::http_client::HttpClient;
//!
//! let client = HttpClient::new(5000)?;
//! let response: MyResponse = client.get("https://api.example.com/endpoint").await?;
//! ```

use crate::infrastructure::ledger::error::{LedgerError, LedgerResult};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::trace;

/// HTTP client wrapper for ledger gateways.
#[derive(Debug, Clone)]
pub struct HttpClient {
    /// Inner reqwest client.
    client: Client,
    /// Request timeout in milliseconds.
    timeout_ms: u64,
}

impl HttpClient {
    /// Creates a new HTTP client with the specified timeout.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::InternalError` if the client cannot be created.
    pub fn new(timeout_ms: u64) -> LedgerResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(|e| {
                LedgerError::internal_error(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { client, timeout_ms })
    }

    /// Returns the configured timeout in milliseconds.
    #[inline]
    #[must_use]
    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    /// Makes a GET request and deserializes the JSON response.
    ///
    /// # Errors
    ///
    /// Returns a remote-unavailable `LedgerError` if the request fails,
    /// `LedgerError::InvalidRequest` / `LedgerError::NotFound` for 400 / 404
    /// responses, and `LedgerError::ProtocolError` if the body cannot be parsed.
    pub async fn get<T: DeserializeOwned>(&self, url: &str) -> LedgerResult<T> {
        trace!(url, "GET");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.map_reqwest_error(e))?;

        self.handle_response(response).await
    }

    /// Makes a GET request with query parameters and deserializes the JSON response.
    ///
    /// # Errors
    ///
    /// Same as [`get`](Self::get).
    pub async fn get_with_params<T: DeserializeOwned, P: serde::Serialize + ?Sized>(
        &self,
        url: &str,
        params: &P,
    ) -> LedgerResult<T> {
        trace!(url, "GET with query");
        let response = self
            .client
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(|e| self.map_reqwest_error(e))?;

        self.handle_response(response).await
    }

    /// Handles the HTTP response, checking status and deserializing JSON.
    async fn handle_response<T: DeserializeOwned>(&self, response: Response) -> LedgerResult<T> {
        let status = response.status();

        if status.is_success() {
            response
                .json::<T>()
                .await
                .map_err(|e| LedgerError::protocol_error(format!("Failed to parse response: {}", e)))
        } else {
            let error_body = response.text().await.unwrap_or_default();
            Err(self.map_status_error(status, &error_body))
        }
    }

    /// Maps a reqwest error to a LedgerError.
    fn map_reqwest_error(&self, error: reqwest::Error) -> LedgerError {
        if error.is_timeout() {
            LedgerError::timeout_with_duration("Request timed out", self.timeout_ms)
        } else if error.is_connect() {
            LedgerError::connection(format!("Connection failed: {}", error))
        } else {
            LedgerError::connection(format!("HTTP request failed: {}", error))
        }
    }

    /// Maps an HTTP status code to a LedgerError.
    fn map_status_error(&self, status: StatusCode, body: &str) -> LedgerError {
        match status {
            StatusCode::BAD_REQUEST => LedgerError::invalid_request(body),
            StatusCode::NOT_FOUND => LedgerError::not_found(body),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                LedgerError::invalid_request(format!("Access denied: {}", body))
            }
            StatusCode::TOO_MANY_REQUESTS => LedgerError::rate_limited("Rate limit exceeded"),
            StatusCode::INTERNAL_SERVER_ERROR
            | StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT => {
                LedgerError::connection(format!("Server error ({}): {}", status, body))
            }
            _ => LedgerError::protocol_error(format!("HTTP error ({}): {}", status, body)),
        }
    }
}

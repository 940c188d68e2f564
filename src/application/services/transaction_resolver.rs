//! # Transaction Resolver
//!
//! Resolves notification hashes into classified order transactions.
//!
//! Every call to [`TransactionResolver::resolve`] is one paced remote call
//! and is counted whatever its outcome. Classification comes from the
//! payload shape only. Nothing is cached.

use crate::application::services::pacing::Pacer;
use crate::domain::entities::transaction::ResolvedTransaction;
use crate::domain::value_objects::{AccountId, TransactionHash};
use crate::infrastructure::ledger::error::{LedgerError, LedgerResult};
use crate::infrastructure::ledger::traits::LedgerGateway;
use std::sync::Arc;
use tracing::debug;

/// Paced, counted transaction lookups.
#[derive(Debug)]
pub struct TransactionResolver {
    gateway: Arc<dyn LedgerGateway>,
    pacer: Arc<Pacer>,
    calls_made: u32,
}

impl TransactionResolver {
    /// Creates a resolver sharing `pacer` with other resolvers of the same
    /// credential.
    #[must_use]
    pub fn new(gateway: Arc<dyn LedgerGateway>, pacer: Arc<Pacer>) -> Self {
        Self {
            gateway,
            pacer,
            calls_made: 0,
        }
    }

    /// Returns the number of resolution calls made.
    #[inline]
    #[must_use]
    pub fn calls_made(&self) -> u32 {
        self.calls_made
    }

    /// Fetches and classifies the order transaction `hash` of `account`.
    ///
    /// # Errors
    ///
    /// - `LedgerError::TransactionNotFound` if the hash no longer resolves
    /// - `LedgerError::ProtocolError` if the payload is not an order entry,
    ///   cancel or execution, or its balance changes overflow
    /// - any transport error from the gateway
    pub async fn resolve(
        &mut self,
        account: &AccountId,
        hash: &TransactionHash,
    ) -> LedgerResult<ResolvedTransaction> {
        self.pacer.wait_turn().await;
        self.calls_made = self.calls_made.saturating_add(1);

        let payload = self.gateway.fetch_order_transaction(account, hash).await?;
        let resolved = payload
            .classify()
            .map_err(|e| LedgerError::protocol_error(e.to_string()))?;

        debug!(
            %hash,
            kind = %resolved.classification(),
            calls_made = self.calls_made,
            "resolved transaction"
        );
        Ok(resolved)
    }
}

//! # Notification Pager
//!
//! Lazy forward walk over an account's notification feed.
//!
//! The pager fetches one page at a time and hands out notifications in pull
//! order. It is restartable from any page cursor and finishes when the
//! gateway reports [`PageCursor::End`]. Page fetches are not part of the
//! resolution budget.
//!
//! # Examples
//!
//! ```ignore
//! let mut pager = NotificationPager::new(gateway, account, PageRequest::default());
//! while let Some(notification) = pager.next_notification().await? {
//!     println!("{notification}");
//! }
//! ```

use crate::domain::entities::notification::Notification;
use crate::domain::value_objects::AccountId;
use crate::infrastructure::ledger::error::{LedgerError, LedgerResult};
use crate::infrastructure::ledger::traits::{LedgerGateway, PageCursor, PageRequest};
use futures::Stream;
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::debug;

/// Pulls notifications page by page.
#[derive(Debug)]
pub struct NotificationPager {
    gateway: Arc<dyn LedgerGateway>,
    account: AccountId,
    request: PageRequest,
    next: PageCursor,
    buffer: VecDeque<Notification>,
    pages_fetched: u32,
}

impl NotificationPager {
    /// Creates a pager starting at `first_page`.
    #[must_use]
    pub fn new(gateway: Arc<dyn LedgerGateway>, account: AccountId, first_page: PageRequest) -> Self {
        Self {
            gateway,
            account,
            request: first_page,
            next: PageCursor::Next(first_page.page()),
            buffer: VecDeque::new(),
            pages_fetched: 0,
        }
    }

    /// Returns the number of pages fetched so far.
    #[inline]
    #[must_use]
    pub fn pages_fetched(&self) -> u32 {
        self.pages_fetched
    }

    /// Returns the next notification, or `None` once the feed is exhausted.
    ///
    /// # Errors
    ///
    /// Propagates gateway failures; the pager can be polled again afterwards
    /// and retries the same page.
    pub async fn next_notification(&mut self) -> LedgerResult<Option<Notification>> {
        loop {
            if let Some(notification) = self.buffer.pop_front() {
                return Ok(Some(notification));
            }
            let PageCursor::Next(page) = self.next else {
                return Ok(None);
            };

            let request = self.request.at_page(page);
            let fetched = self
                .gateway
                .fetch_notifications(&self.account, &request)
                .await?;
            self.pages_fetched = self.pages_fetched.saturating_add(1);

            debug!(
                account = %self.account,
                page,
                count = fetched.notifications.len(),
                next = %fetched.next,
                "notification page"
            );

            // An empty page ends the feed whatever the cursor says.
            self.next = if fetched.notifications.is_empty() {
                PageCursor::End
            } else {
                fetched.next
            };
            self.buffer.extend(fetched.notifications);
        }
    }

    /// Converts the pager into a stream of notifications.
    ///
    /// The stream ends after the last notification and stops at the first
    /// gateway failure.
    pub fn into_stream(self) -> impl Stream<Item = LedgerResult<Notification>> {
        futures::stream::try_unfold(self, |mut pager| async move {
            let next = pager.next_notification().await?;
            if next.is_none() {
                debug!(
                    account = %pager.account,
                    pages = pager.pages_fetched,
                    "notification feed exhausted"
                );
            }
            Ok::<_, LedgerError>(next.map(|notification| (notification, pager)))
        })
    }
}

//! Notification polling with a `since` watermark.
//!
//! DESIGN
//! ======
//! The feed remembers the newest `created_at` it has delivered and sends it
//! as `since` on the next request. Items at or before the watermark are
//! dropped even if the backend returns them again, so nothing is delivered
//! twice and the watermark never moves backwards. Unread counts are fetched
//! independently on every poll.
//!
//! ERROR HANDLING
//! ==============
//! A failed `get_recent` leaves the watermark untouched so the next tick
//! retries the same window. A failed `get_counts` is logged and does not
//! discard the items already fetched. The background poller logs failures
//! and keeps ticking; it stops only on cancellation or when its receiver
//! is dropped.

use std::cmp::Ordering;
use std::time::Duration;

use time::PrimitiveDateTime;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::api::NotificationsApi;
use crate::error::ApiError;
use crate::models::{Notification, NotificationCounts};

const POLL_QUEUE_CAPACITY: usize = 16;

const SERVER_TIMESTAMP: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

// =============================================================================
// SOURCE
// =============================================================================

#[async_trait::async_trait]
pub trait NotificationSource: Send + Sync {
    async fn recent(&self, user_id: i64, since: Option<&str>) -> Result<Vec<Notification>, ApiError>;
    async fn counts(&self, user_id: i64) -> Result<NotificationCounts, ApiError>;
}

#[async_trait::async_trait]
impl NotificationSource for NotificationsApi {
    async fn recent(&self, user_id: i64, since: Option<&str>) -> Result<Vec<Notification>, ApiError> {
        self.get_recent(user_id, since).await
    }

    async fn counts(&self, user_id: i64) -> Result<NotificationCounts, ApiError> {
        self.get_counts(user_id).await
    }
}

// =============================================================================
// TIMESTAMPS
// =============================================================================

/// Order two server timestamps. Falls back to string order when either
/// side is not `YYYY-MM-DD HH:MM:SS`.
#[must_use]
pub fn compare_timestamps(a: &str, b: &str) -> Ordering {
    match (parse_timestamp(a), parse_timestamp(b)) {
        (Some(a), Some(b)) => a.cmp(&b),
        _ => a.cmp(b),
    }
}

fn parse_timestamp(raw: &str) -> Option<PrimitiveDateTime> {
    PrimitiveDateTime::parse(raw.trim(), SERVER_TIMESTAMP).ok()
}

// =============================================================================
// FEED
// =============================================================================

/// Result of one poll.
#[derive(Debug, Clone, PartialEq)]
pub struct PollOutcome {
    /// Items newer than the previous watermark, in server order.
    pub items: Vec<Notification>,
    /// `None` when the count request failed.
    pub counts: Option<NotificationCounts>,
}

pub struct NotificationFeed<S> {
    source: S,
    user_id: i64,
    since: Option<String>,
}

impl<S: NotificationSource> NotificationFeed<S> {
    #[must_use]
    pub fn new(source: S, user_id: i64) -> Self {
        Self { source, user_id, since: None }
    }

    /// Resume from a known watermark.
    #[must_use]
    pub fn with_since(mut self, since: impl Into<String>) -> Self {
        self.since = Some(since.into());
        self
    }

    #[must_use]
    pub fn since(&self) -> Option<&str> {
        self.since.as_deref()
    }

    #[must_use]
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Fetch new items and the current counts.
    ///
    /// # Errors
    ///
    /// The `get_recent` error; the watermark is left unchanged.
    pub async fn poll_once(&mut self) -> Result<PollOutcome, ApiError> {
        let fetched = self.source.recent(self.user_id, self.since.as_deref()).await?;
        let fetched_count = fetched.len();

        let since = self.since.as_deref();
        let items: Vec<Notification> = fetched
            .into_iter()
            .filter(|n| since.is_none_or(|w| compare_timestamps(&n.created_at, w) == Ordering::Greater))
            .collect();

        if let Some(newest) = items
            .iter()
            .map(|n| n.created_at.as_str())
            .max_by(|a, b| compare_timestamps(a, b))
        {
            self.since = Some(newest.to_owned());
        }
        debug!(
            user_id = self.user_id,
            fetched = fetched_count,
            delivered = items.len(),
            since = ?self.since,
            "notifications polled"
        );

        let counts = match self.source.counts(self.user_id).await {
            Ok(counts) => Some(counts),
            Err(e) => {
                warn!(user_id = self.user_id, error = %e, "notification counts failed");
                None
            }
        };

        Ok(PollOutcome { items, counts })
    }
}

// =============================================================================
// POLLER
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum PollEvent {
    Items(Vec<Notification>),
    Counts(NotificationCounts),
}

/// Poll `feed` every `interval` until `cancel` fires or the receiver is
/// dropped. The first poll runs immediately.
pub fn spawn_notification_poller<S>(
    mut feed: NotificationFeed<S>,
    interval: Duration,
    cancel: CancellationToken,
) -> (JoinHandle<()>, mpsc::Receiver<PollEvent>)
where
    S: NotificationSource + 'static,
{
    let (tx, rx) = mpsc::channel(POLL_QUEUE_CAPACITY);
    info!(user_id = feed.user_id, interval_secs = interval.as_secs_f64(), "notification poller started");

    let handle = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                _ = ticker.tick() => {}
            }

            let outcome = tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                outcome = feed.poll_once() => outcome,
            };

            match outcome {
                Ok(PollOutcome { items, counts }) => {
                    if !items.is_empty() && !deliver(&tx, &cancel, PollEvent::Items(items)).await {
                        break;
                    }
                    if let Some(counts) = counts {
                        if !deliver(&tx, &cancel, PollEvent::Counts(counts)).await {
                            break;
                        }
                    }
                }
                Err(e) => warn!(user_id = feed.user_id, error = %e, "notification poll failed"),
            }
        }
        info!(user_id = feed.user_id, "notification poller stopped");
    });

    (handle, rx)
}

/// Queue one event unless cancellation wins first. `false` stops the poller.
async fn deliver(tx: &mpsc::Sender<PollEvent>, cancel: &CancellationToken, event: PollEvent) -> bool {
    tokio::select! {
        biased;
        () = cancel.cancelled() => false,
        sent = tx.send(event) => sent.is_ok(),
    }
}

#[cfg(test)]
#[path = "notifications_test.rs"]
mod tests;

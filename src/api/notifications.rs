//! `notifications.php` operations.

use super::client::{ApiClient, Script};
use crate::error::ApiError;
use crate::models::{Notification, NotificationCounts};

#[derive(Debug, Clone)]
pub struct NotificationsApi {
    client: ApiClient,
}

impl NotificationsApi {
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// `get_recent&user_id=&since=`. `since` is omitted on the first poll.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the request or decoding.
    pub async fn get_recent(&self, user_id: i64, since: Option<&str>) -> Result<Vec<Notification>, ApiError> {
        let mut query = vec![("operation", "get_recent".to_owned()), ("user_id", user_id.to_string())];
        if let Some(since) = since {
            query.push(("since", since.to_owned()));
        }
        let mut envelope = self.client.get(Script::Notifications, &query).await?;
        envelope.take(&["notifications", "data"])
    }

    /// `get_counts&user_id=`
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the request or decoding.
    pub async fn get_counts(&self, user_id: i64) -> Result<NotificationCounts, ApiError> {
        let query = [("operation", "get_counts".to_owned()), ("user_id", user_id.to_string())];
        let envelope = self.client.get(Script::Notifications, &query).await?;
        envelope.take_or_payload(&["counts", "data"])
    }
}

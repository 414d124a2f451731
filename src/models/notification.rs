use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{RecordId, de};

/// An item from `notifications.php?operation=get_recent`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    #[serde(rename = "notification_id", alias = "id", deserialize_with = "de::id")]
    pub id: RecordId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub message: String,
    #[serde(rename = "type", alias = "notification_type", default)]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "de::flag")]
    pub is_read: bool,
    /// Server timestamp, `YYYY-MM-DD HH:MM:SS`.
    pub created_at: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationCounts {
    #[serde(alias = "unread_count", default, deserialize_with = "de::opt_i64")]
    pub unread: Option<i64>,
    #[serde(alias = "total_count", default, deserialize_with = "de::opt_i64")]
    pub total: Option<i64>,
}

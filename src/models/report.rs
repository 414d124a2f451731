//! Activity and session reporting records.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::status::{DomainStatus, SessionStatus};
use super::{Record, RecordId, de};

/// One entry of the admin activity timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityItem {
    #[serde(rename = "activity_id", alias = "id", alias = "log_id", deserialize_with = "de::id")]
    pub id: RecordId,
    #[serde(alias = "action_type", default)]
    pub action: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(alias = "username", default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub entity_type: Option<String>,
    #[serde(alias = "timestamp", default)]
    pub created_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Record for ActivityItem {
    fn id(&self) -> RecordId {
        self.id
    }
}

/// A login session row from `getDetailedSessionLogs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionLog {
    #[serde(rename = "session_id", alias = "id", deserialize_with = "de::id")]
    pub id: RecordId,
    #[serde(default, deserialize_with = "de::opt_i64")]
    pub user_id: Option<i64>,
    #[serde(alias = "username", default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub user_type: Option<String>,
    #[serde(default)]
    pub ip_address: Option<String>,
    #[serde(default)]
    pub user_agent: Option<String>,
    #[serde(default)]
    pub login_time: Option<String>,
    #[serde(default)]
    pub logout_time: Option<String>,
    #[serde(default)]
    pub last_activity: Option<String>,
    #[serde(alias = "session_status", default)]
    pub status: SessionStatus,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Record for SessionLog {
    fn id(&self) -> RecordId {
        self.id
    }

    fn apply_status(&mut self, wire: &str) -> bool {
        SessionStatus::parse(wire)
            .map(|status| self.status = status)
            .is_ok()
    }
}

/// Aggregates from `getSessionAnalytics`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionAnalytics {
    #[serde(default, deserialize_with = "de::opt_i64")]
    pub total_sessions: Option<i64>,
    #[serde(default, deserialize_with = "de::opt_i64")]
    pub active_sessions: Option<i64>,
    #[serde(default, deserialize_with = "de::opt_i64")]
    pub unique_users: Option<i64>,
    #[serde(alias = "avg_session_duration", default, deserialize_with = "de::opt_f64")]
    pub avg_duration_minutes: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

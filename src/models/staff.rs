use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::status::{DomainStatus, OnboardingStatus};
use super::{Record, RecordId, de};

/// A back-office or on-site staff member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Staff {
    #[serde(rename = "staff_id", alias = "id", deserialize_with = "de::id")]
    pub id: RecordId,
    #[serde(alias = "full_name", default)]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(alias = "contact_number", default, deserialize_with = "de::opt_string")]
    pub phone: Option<String>,
    #[serde(alias = "position", default)]
    pub role: Option<String>,
    #[serde(default)]
    pub status: OnboardingStatus,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Record for Staff {
    fn id(&self) -> RecordId {
        self.id
    }

    fn apply_status(&mut self, wire: &str) -> bool {
        OnboardingStatus::parse(wire)
            .map(|status| self.status = status)
            .is_ok()
    }
}

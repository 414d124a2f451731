use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::status::{DomainStatus, OnboardingStatus};
use super::{Record, RecordId, de};

/// An event organizer with a quoted fee range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organizer {
    #[serde(rename = "organizer_id", alias = "id", deserialize_with = "de::id")]
    pub id: RecordId,
    #[serde(alias = "organizer_name", alias = "full_name", default)]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(alias = "contact_number", default, deserialize_with = "de::opt_string")]
    pub phone: Option<String>,
    #[serde(alias = "company_name", default)]
    pub company: Option<String>,
    #[serde(default, deserialize_with = "de::opt_f64")]
    pub fee_min: Option<f64>,
    #[serde(default, deserialize_with = "de::opt_f64")]
    pub fee_max: Option<f64>,
    #[serde(default)]
    pub status: OnboardingStatus,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Record for Organizer {
    fn id(&self) -> RecordId {
        self.id
    }

    fn apply_status(&mut self, wire: &str) -> bool {
        OnboardingStatus::parse(wire)
            .map(|status| self.status = status)
            .is_ok()
    }
}

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::status::{DomainStatus, OnboardingStatus};
use super::{Record, RecordId, de};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Venue {
    #[serde(rename = "venue_id", alias = "id", deserialize_with = "de::id")]
    pub id: RecordId,
    #[serde(alias = "venue_name", default)]
    pub name: String,
    #[serde(alias = "address", default)]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "de::opt_i64")]
    pub capacity: Option<i64>,
    #[serde(alias = "price", default, deserialize_with = "de::opt_f64")]
    pub rate: Option<f64>,
    #[serde(default)]
    pub image_path: Option<String>,
    #[serde(default)]
    pub status: OnboardingStatus,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Record for Venue {
    fn id(&self) -> RecordId {
        self.id
    }

    fn apply_status(&mut self, wire: &str) -> bool {
        OnboardingStatus::parse(wire)
            .map(|status| self.status = status)
            .is_ok()
    }
}

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::status::{DomainStatus, OnboardingStatus};
use super::{Record, RecordId, de};

/// A catering, decor, sound, or other service supplier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Supplier {
    #[serde(rename = "supplier_id", alias = "id", deserialize_with = "de::id")]
    pub id: RecordId,
    #[serde(alias = "business_name", alias = "supplier_name", default)]
    pub name: String,
    #[serde(alias = "service_category", default)]
    pub category: Option<String>,
    #[serde(default)]
    pub contact_person: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(alias = "contact_number", default, deserialize_with = "de::opt_string")]
    pub phone: Option<String>,
    #[serde(alias = "price_min", default, deserialize_with = "de::opt_f64")]
    pub fee_min: Option<f64>,
    #[serde(alias = "price_max", default, deserialize_with = "de::opt_f64")]
    pub fee_max: Option<f64>,
    #[serde(alias = "onboarding_status", default)]
    pub status: OnboardingStatus,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Record for Supplier {
    fn id(&self) -> RecordId {
        self.id
    }

    fn apply_status(&mut self, wire: &str) -> bool {
        OnboardingStatus::parse(wire)
            .map(|status| self.status = status)
            .is_ok()
    }
}

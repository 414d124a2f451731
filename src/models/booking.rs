use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::status::{BookingStatus, DomainStatus};
use super::{Record, RecordId, de};

/// A client booking request as listed by `getAllBookings`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    #[serde(rename = "booking_id", alias = "id", deserialize_with = "de::id")]
    pub id: RecordId,
    #[serde(rename = "booking_reference", alias = "reference", default, deserialize_with = "de::opt_string")]
    pub reference: Option<String>,
    #[serde(alias = "customer_name", default)]
    pub client_name: Option<String>,
    #[serde(alias = "customer_email", default)]
    pub client_email: Option<String>,
    #[serde(default)]
    pub event_type: Option<String>,
    #[serde(default)]
    pub event_date: Option<String>,
    #[serde(default)]
    pub venue_name: Option<String>,
    #[serde(default, deserialize_with = "de::opt_i64")]
    pub guest_count: Option<i64>,
    #[serde(default, deserialize_with = "de::opt_f64")]
    pub total_amount: Option<f64>,
    #[serde(default)]
    pub status: BookingStatus,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Record for Booking {
    fn id(&self) -> RecordId {
        self.id
    }

    fn apply_status(&mut self, wire: &str) -> bool {
        match BookingStatus::parse(wire) {
            Ok(status) => {
                self.status = status;
                true
            }
            Err(_) => false,
        }
    }
}

#[cfg(test)]
#[path = "booking_test.rs"]
mod tests;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::status::{DomainStatus, PaymentStatus};
use super::{Record, RecordId, de};
use crate::validation::{self, ValidationError};

/// One event row from `getEventsWithPaymentStatus`.
///
/// `total_paid`, `balance` and `payment_percentage` are computed by the
/// backend and only ever replaced by a refetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventPaymentSummary {
    #[serde(rename = "event_id", alias = "id", deserialize_with = "de::id")]
    pub id: RecordId,
    #[serde(alias = "event_title", alias = "event_name", default)]
    pub title: String,
    #[serde(default)]
    pub event_date: Option<String>,
    #[serde(default)]
    pub organizer_name: Option<String>,
    #[serde(alias = "total_budget", default, deserialize_with = "de::opt_f64")]
    pub total_amount: Option<f64>,
    #[serde(default, deserialize_with = "de::f64_or_zero")]
    pub total_paid: f64,
    #[serde(default, deserialize_with = "de::opt_f64")]
    pub balance: Option<f64>,
    #[serde(default, deserialize_with = "de::opt_f64")]
    pub payment_percentage: Option<f64>,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub payments: Vec<Payment>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Record for EventPaymentSummary {
    fn id(&self) -> RecordId {
        self.id
    }

    fn apply_status(&mut self, wire: &str) -> bool {
        PaymentStatus::parse(wire)
            .map(|status| self.payment_status = status)
            .is_ok()
    }
}

/// A single recorded payment against an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    #[serde(rename = "payment_id", alias = "id", deserialize_with = "de::id")]
    pub id: RecordId,
    #[serde(default, deserialize_with = "de::opt_i64")]
    pub event_id: Option<i64>,
    #[serde(alias = "payment_amount", default, deserialize_with = "de::f64_or_zero")]
    pub amount: f64,
    #[serde(alias = "payment_method", default)]
    pub method: Option<String>,
    #[serde(alias = "payment_status", default)]
    pub status: PaymentStatus,
    #[serde(alias = "reference_number", default, deserialize_with = "de::opt_string")]
    pub reference: Option<String>,
    #[serde(alias = "payment_date", default)]
    pub paid_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Record for Payment {
    fn id(&self) -> RecordId {
        self.id
    }

    fn apply_status(&mut self, wire: &str) -> bool {
        PaymentStatus::parse(wire)
            .map(|status| self.status = status)
            .is_ok()
    }
}

/// Body of `createPayment`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentDraft {
    pub event_id: RecordId,
    pub amount: f64,
    pub payment_method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl PaymentDraft {
    /// # Errors
    ///
    /// Rejects non-positive amounts and a blank payment method.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validation::validate_positive_amount("amount", self.amount)?;
        if self.payment_method.trim().is_empty() {
            return Err(ValidationError::Required { field: "payment_method".into() });
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "payment_test.rs"]
mod tests;

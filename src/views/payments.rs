//! Payments: one row per event with its payment summary.
//!
//! Totals, balance and percentage are computed by the backend, so every
//! write here is followed by the controller's reload and never patched
//! locally. Updates address an individual payment (not the event row) and
//! may only change its status.

use serde_json::{Map, Value, json};

use crate::api::{AdminApi, ListParams, Listing};
use crate::error::ApiError;
use crate::list::{FilterSchema, ListController, ListSource, Mutation, PaginationMode};
use crate::models::status::DomainStatus;
use crate::models::{EventPaymentSummary, PaymentDraft, PaymentStatus, RecordId};
use crate::validation::{self, ValidationError};

use super::{ViewContext, present, unsupported};

pub const VIEW: &str = "payments";

pub struct PaymentSource {
    api: AdminApi,
}

impl PaymentSource {
    #[must_use]
    pub fn new(api: AdminApi) -> Self {
        Self { api }
    }
}

#[async_trait::async_trait]
impl ListSource<EventPaymentSummary> for PaymentSource {
    async fn fetch(&self, params: &ListParams) -> Result<Listing<EventPaymentSummary>, ApiError> {
        self.api.get_events_with_payment_status(params).await
    }

    async fn mutate(&self, mutation: &Mutation) -> Result<(), ApiError> {
        match mutation {
            Mutation::Create { payload } => {
                let draft = draft_from_payload(payload)?;
                self.api.create_payment(&draft).await.map(|_| ())
            }
            Mutation::Update { id, payload } => {
                let raw = payload
                    .get("status")
                    .and_then(Value::as_str)
                    .ok_or_else(|| ValidationError::Required { field: "status".into() })?;
                let status = PaymentStatus::parse(raw)?;
                self.api.update_payment_status(*id, status).await
            }
            other => Err(unsupported(VIEW, other)),
        }
    }
}

/// Decode and validate a `createPayment` body.
///
/// # Errors
///
/// `Required` for missing fields, or whatever [`PaymentDraft::validate`]
/// rejects.
pub fn draft_from_payload(payload: &Map<String, Value>) -> Result<PaymentDraft, ValidationError> {
    validation::require_fields(payload, &["event_id", "amount", "payment_method"])?;
    let event_id = validation::numeric_field(payload, "event_id")
        .filter(|v| v.fract() == 0.0 && *v > 0.0)
        .ok_or_else(|| ValidationError::Required { field: "event_id".into() })?;
    let amount = validation::numeric_field(payload, "amount")
        .ok_or_else(|| ValidationError::NonPositiveAmount { field: "amount".into() })?;
    let text = |field: &str| payload.get(field).and_then(Value::as_str).map(str::to_owned);

    #[allow(clippy::cast_possible_truncation)]
    let draft = PaymentDraft {
        event_id: event_id as RecordId,
        amount,
        payment_method: text("payment_method").unwrap_or_default(),
        reference_number: text("reference_number"),
        notes: text("notes"),
    };
    draft.validate()?;
    Ok(draft)
}

#[must_use]
pub fn schema() -> FilterSchema<EventPaymentSummary> {
    FilterSchema::new()
        .search("search", |e: &EventPaymentSummary| present([Some(e.title.as_str()), e.organizer_name.as_deref()]))
        .exact("status", |e| e.payment_status.as_str())
}

pub type PaymentsView = ListController<EventPaymentSummary, PaymentSource>;

#[must_use]
pub fn view(ctx: &ViewContext) -> PaymentsView {
    let (api, token) = ctx.scoped_api();
    ctx.build(VIEW, PaymentSource::new(api), schema(), PaginationMode::Client, token)
}

impl ListController<EventPaymentSummary, PaymentSource> {
    /// # Errors
    ///
    /// Validation errors before sending, otherwise any [`ApiError`].
    pub async fn record_payment(&mut self, draft: &PaymentDraft) -> Result<(), ApiError> {
        let payload = match serde_json::to_value(draft) {
            Ok(Value::Object(map)) => map,
            Ok(_) => return Err(ValidationError::NotAnObject.into()),
            Err(e) => return Err(ApiError::Decode(e.to_string())),
        };
        self.mutate(Mutation::Create { payload }).await
    }

    /// # Errors
    ///
    /// Any [`ApiError`].
    pub async fn set_payment_status(&mut self, payment_id: RecordId, status: PaymentStatus) -> Result<(), ApiError> {
        let mut payload = Map::new();
        payload.insert("status".to_owned(), json!(status.as_str()));
        self.mutate(Mutation::Update { id: payment_id, payload }).await
    }
}

#[cfg(test)]
#[path = "payments_test.rs"]
mod tests;

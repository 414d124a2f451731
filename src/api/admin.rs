//! Typed `admin.php` operations.
//!
//! Each method maps one backend `operation` to typed input/output. List
//! operations accept [`ListParams`] so the same call serves client-side
//! pagination (no page/limit sent) and server-side pagination.

use std::collections::BTreeMap;
use std::path::Path;

use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};
use tracing::info;

use super::client::{ApiClient, Script};
use super::envelope::Envelope;
use crate::error::ApiError;
use crate::models::status::DomainStatus;
use crate::models::{
    ActivityItem, Booking, BookingStatus, EventPaymentSummary, Organizer, PaymentDraft, PaymentStatus, RecordId,
    SessionAnalytics, SessionLog, Staff, Supplier, Venue,
};
use crate::validation;

/// Query for a list operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListParams {
    pub page: Option<usize>,
    pub limit: Option<usize>,
    /// Server-evaluated filters; blank and `"all"` values are not sent.
    pub filters: BTreeMap<String, String>,
}

impl ListParams {
    #[must_use]
    pub fn to_body(&self) -> Value {
        let mut body = Map::new();
        if let Some(page) = self.page {
            body.insert("page".to_owned(), json!(page));
        }
        if let Some(limit) = self.limit {
            body.insert("limit".to_owned(), json!(limit));
        }
        for (key, value) in &self.filters {
            let value = value.trim();
            if value.is_empty() || value.eq_ignore_ascii_case("all") {
                continue;
            }
            body.insert(key.clone(), Value::String(value.to_owned()));
        }
        Value::Object(body)
    }
}

/// One page (or the whole collection) of a list operation.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing<T> {
    pub items: Vec<T>,
    /// Total matching rows when the server paginates.
    pub total: Option<usize>,
}

/// What kind of entity a create/update/delete targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Organizer,
    Staff,
    Supplier,
    Venue,
}

impl Entity {
    fn id_field(self) -> &'static str {
        match self {
            Self::Organizer => "organizer_id",
            Self::Staff => "staff_id",
            Self::Supplier => "supplier_id",
            Self::Venue => "venue_id",
        }
    }

    fn list_operation(self) -> &'static str {
        match self {
            Self::Organizer => "getAllOrganizers",
            Self::Staff => "getAllStaff",
            Self::Supplier => "getAllSuppliers",
            Self::Venue => "getAllVenues",
        }
    }

    fn list_keys(self) -> &'static [&'static str] {
        match self {
            Self::Organizer => &["organizers", "data"],
            Self::Staff => &["staff", "data"],
            Self::Supplier => &["suppliers", "data"],
            Self::Venue => &["venues", "data"],
        }
    }

    fn operation(self, verb: &str) -> String {
        let noun = match self {
            Self::Organizer => "Organizer",
            Self::Staff => "Staff",
            Self::Supplier => "Supplier",
            Self::Venue => "Venue",
        };
        format!("{verb}{noun}")
    }
}

#[derive(Debug, Clone)]
pub struct AdminApi {
    client: ApiClient,
}

impl AdminApi {
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    #[must_use]
    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    // =========================================================================
    // BOOKINGS
    // =========================================================================

    /// `getAllBookings`
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the request or decoding.
    pub async fn get_all_bookings(&self, params: &ListParams) -> Result<Listing<Booking>, ApiError> {
        self.list("getAllBookings", &["bookings", "data"], params).await
    }

    /// `updateBookingStatus`
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the request.
    pub async fn update_booking_status(&self, booking_id: RecordId, status: BookingStatus) -> Result<(), ApiError> {
        let body = json!({ "booking_id": booking_id, "status": status.as_str() });
        self.client.post_json(Script::Admin, "updateBookingStatus", &body).await?;
        info!(booking_id, status = status.as_str(), "booking status updated");
        Ok(())
    }

    /// `convertBookingToEvent`; returns the new event id when reported.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the request.
    pub async fn convert_booking_to_event(&self, booking_id: RecordId) -> Result<Option<RecordId>, ApiError> {
        let body = json!({ "booking_id": booking_id });
        let envelope = self
            .client
            .post_json(Script::Admin, "convertBookingToEvent", &body)
            .await?;
        let event_id = envelope.created_id("event_id");
        info!(booking_id, ?event_id, "booking converted to event");
        Ok(event_id)
    }

    // =========================================================================
    // DIRECTORY ENTITIES (organizers, staff, suppliers, venues)
    // =========================================================================

    /// `getAllOrganizers`
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the request or decoding.
    pub async fn get_all_organizers(&self, params: &ListParams) -> Result<Listing<Organizer>, ApiError> {
        self.get_all(Entity::Organizer, params).await
    }

    /// `getAllStaff`
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the request or decoding.
    pub async fn get_all_staff(&self, params: &ListParams) -> Result<Listing<Staff>, ApiError> {
        self.get_all(Entity::Staff, params).await
    }

    /// `getAllSuppliers`
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the request or decoding.
    pub async fn get_all_suppliers(&self, params: &ListParams) -> Result<Listing<Supplier>, ApiError> {
        self.get_all(Entity::Supplier, params).await
    }

    /// `getAllVenues`
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the request or decoding.
    pub async fn get_all_venues(&self, params: &ListParams) -> Result<Listing<Venue>, ApiError> {
        self.get_all(Entity::Venue, params).await
    }

    /// `getAll{Entity}` for any directory entity.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the request or decoding.
    pub async fn get_all<T: DeserializeOwned>(&self, entity: Entity, params: &ListParams) -> Result<Listing<T>, ApiError> {
        self.list(entity.list_operation(), entity.list_keys(), params).await
    }

    /// `create{Entity}`; returns the new id when reported.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the request.
    pub async fn create(&self, entity: Entity, payload: &Map<String, Value>) -> Result<Option<RecordId>, ApiError> {
        let operation = entity.operation("create");
        let envelope = self
            .client
            .post_json(Script::Admin, &operation, &Value::Object(payload.clone()))
            .await?;
        let id = envelope.created_id(entity.id_field());
        info!(operation = %operation, ?id, "record created");
        Ok(id)
    }

    /// `update{Entity}`; the id is merged into the payload under its field.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the request.
    pub async fn update(&self, entity: Entity, id: RecordId, payload: &Map<String, Value>) -> Result<(), ApiError> {
        let operation = entity.operation("update");
        let mut body = payload.clone();
        body.insert(entity.id_field().to_owned(), json!(id));
        self.client
            .post_json(Script::Admin, &operation, &Value::Object(body))
            .await?;
        info!(operation = %operation, id, "record updated");
        Ok(())
    }

    /// `delete{Entity}`
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the request.
    pub async fn delete(&self, entity: Entity, id: RecordId) -> Result<(), ApiError> {
        let operation = entity.operation("delete");
        let mut body = Map::new();
        body.insert(entity.id_field().to_owned(), json!(id));
        self.client
            .post_json(Script::Admin, &operation, &Value::Object(body))
            .await?;
        info!(operation = %operation, id, "record deleted");
        Ok(())
    }

    // =========================================================================
    // PAYMENTS
    // =========================================================================

    /// `getEventsWithPaymentStatus`
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the request or decoding.
    pub async fn get_events_with_payment_status(
        &self,
        params: &ListParams,
    ) -> Result<Listing<EventPaymentSummary>, ApiError> {
        self.list("getEventsWithPaymentStatus", &["events", "data"], params).await
    }

    /// `createPayment`; validates the draft first.
    ///
    /// # Errors
    ///
    /// Validation errors before sending, otherwise any [`ApiError`].
    pub async fn create_payment(&self, draft: &PaymentDraft) -> Result<Option<RecordId>, ApiError> {
        draft.validate()?;
        let body = serde_json::to_value(draft).map_err(|e| ApiError::Decode(e.to_string()))?;
        let envelope = self.client.post_json(Script::Admin, "createPayment", &body).await?;
        let id = envelope.created_id("payment_id");
        info!(event_id = draft.event_id, ?id, "payment recorded");
        Ok(id)
    }

    /// `updatePaymentStatus`
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the request.
    pub async fn update_payment_status(&self, payment_id: RecordId, status: PaymentStatus) -> Result<(), ApiError> {
        let body = json!({ "payment_id": payment_id, "status": status.as_str() });
        self.client.post_json(Script::Admin, "updatePaymentStatus", &body).await?;
        info!(payment_id, status = status.as_str(), "payment status updated");
        Ok(())
    }

    // =========================================================================
    // REPORTS
    // =========================================================================

    /// `getActivityTimeline`
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the request or decoding.
    pub async fn get_activity_timeline(&self, params: &ListParams) -> Result<Listing<ActivityItem>, ApiError> {
        self.list("getActivityTimeline", &["activities", "timeline", "data"], params).await
    }

    /// `getSessionAnalytics`
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the request or decoding.
    pub async fn get_session_analytics(&self) -> Result<SessionAnalytics, ApiError> {
        let envelope = self
            .client
            .post_json(Script::Admin, "getSessionAnalytics", &json!({}))
            .await?;
        envelope.take_or_payload(&["analytics", "data"])
    }

    /// `getDetailedSessionLogs`
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the request or decoding.
    pub async fn get_detailed_session_logs(&self, params: &ListParams) -> Result<Listing<SessionLog>, ApiError> {
        self.list("getDetailedSessionLogs", &["sessions", "logs", "data"], params).await
    }

    /// `terminateUserSession`
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the request.
    pub async fn terminate_user_session(&self, session_id: RecordId) -> Result<(), ApiError> {
        let body = json!({ "session_id": session_id });
        self.client.post_json(Script::Admin, "terminateUserSession", &body).await?;
        info!(session_id, "session terminated");
        Ok(())
    }

    // =========================================================================
    // UPLOAD
    // =========================================================================

    /// `upload` (multipart `file`, `type`, `operation`). Returns the stored
    /// path the backend assigned.
    ///
    /// # Errors
    ///
    /// Validation errors (size, type) before sending, otherwise any
    /// [`ApiError`].
    pub async fn upload(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
        upload_type: &str,
        max_bytes: u64,
    ) -> Result<String, ApiError> {
        let size = u64::try_from(bytes.len()).unwrap_or(u64::MAX);
        let mime = validation::validate_image_upload(file_name, size, max_bytes)?;
        let base_name = Path::new(file_name)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(file_name)
            .to_owned();
        let part = Part::bytes(bytes)
            .file_name(base_name)
            .mime_str(mime)
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let form = Form::new()
            .part("file", part)
            .text("type", upload_type.to_owned())
            .text("operation", "upload");
        let mut envelope = self.client.post_multipart(Script::Admin, "upload", form).await?;
        let path: String = envelope.take(&["filePath", "file_path", "path"])?;
        info!(upload_type, size, path = %path, "file uploaded");
        Ok(path)
    }

    async fn list<T: DeserializeOwned>(
        &self,
        operation: &str,
        keys: &[&str],
        params: &ListParams,
    ) -> Result<Listing<T>, ApiError> {
        let mut envelope: Envelope = self
            .client
            .post_json(Script::Admin, operation, &params.to_body())
            .await?;
        let total = envelope.total();
        let items: Vec<T> = envelope.take(keys)?;
        Ok(Listing { items, total })
    }
}

#[cfg(test)]
#[path = "admin_test.rs"]
mod tests;

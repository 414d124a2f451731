//! Bookings: server-paginated, status changes and convert-to-event.

use crate::api::{AdminApi, ListParams, Listing};
use crate::error::ApiError;
use crate::list::{FilterSchema, ListController, ListSource, Mutation, PaginationMode};
use crate::models::status::DomainStatus;
use crate::models::{Booking, BookingStatus, RecordId};

use super::{ViewContext, unsupported};

pub const VIEW: &str = "bookings";

/// Row action that turns a confirmed booking into an event.
pub const CONVERT: &str = "convert";

pub struct BookingSource {
    api: AdminApi,
}

impl BookingSource {
    #[must_use]
    pub fn new(api: AdminApi) -> Self {
        Self { api }
    }
}

#[async_trait::async_trait]
impl ListSource<Booking> for BookingSource {
    async fn fetch(&self, params: &ListParams) -> Result<Listing<Booking>, ApiError> {
        self.api.get_all_bookings(params).await
    }

    async fn mutate(&self, mutation: &Mutation) -> Result<(), ApiError> {
        match mutation {
            Mutation::SetStatus { id, status } => {
                let status = BookingStatus::parse(status)?;
                self.api.update_booking_status(*id, status).await
            }
            Mutation::Action { name, id } if *name == CONVERT => {
                self.api.convert_booking_to_event(*id).await.map(|_| ())
            }
            other => Err(unsupported(VIEW, other)),
        }
    }
}

/// Search and status are both evaluated by the backend so they apply to
/// the whole collection, not just the loaded page.
#[must_use]
pub fn schema() -> FilterSchema<Booking> {
    FilterSchema::new().server("search").server("status")
}

pub type BookingsView = ListController<Booking, BookingSource>;

#[must_use]
pub fn view(ctx: &ViewContext) -> BookingsView {
    let (api, token) = ctx.scoped_api();
    ctx.build(VIEW, BookingSource::new(api), schema(), PaginationMode::Server, token)
}

impl ListController<Booking, BookingSource> {
    /// # Errors
    ///
    /// Any [`ApiError`]; the row's previous status is restored.
    pub async fn set_status(&mut self, id: RecordId, status: BookingStatus) -> Result<(), ApiError> {
        self.mutate(Mutation::SetStatus { id, status: status.as_str().to_owned() }).await
    }

    /// # Errors
    ///
    /// `Busy` while another row action runs, otherwise any [`ApiError`].
    pub async fn convert_to_event(&mut self, id: RecordId) -> Result<(), ApiError> {
        self.run_row_action(Mutation::Action { name: CONVERT, id }).await
    }
}

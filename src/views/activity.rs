//! Activity timeline: read-only, server-paginated.

use crate::api::{AdminApi, ListParams, Listing};
use crate::error::ApiError;
use crate::list::{FilterSchema, ListController, ListSource, Mutation, PaginationMode};
use crate::models::ActivityItem;

use super::{ViewContext, unsupported};

pub const VIEW: &str = "activity";

pub struct ActivitySource {
    api: AdminApi,
}

impl ActivitySource {
    #[must_use]
    pub fn new(api: AdminApi) -> Self {
        Self { api }
    }
}

#[async_trait::async_trait]
impl ListSource<ActivityItem> for ActivitySource {
    async fn fetch(&self, params: &ListParams) -> Result<Listing<ActivityItem>, ApiError> {
        self.api.get_activity_timeline(params).await
    }

    async fn mutate(&self, mutation: &Mutation) -> Result<(), ApiError> {
        Err(unsupported(VIEW, mutation))
    }
}

#[must_use]
pub fn schema() -> FilterSchema<ActivityItem> {
    FilterSchema::new()
        .server("search")
        .server("entity_type")
        .server("date_from")
        .server("date_to")
}

pub type ActivityView = ListController<ActivityItem, ActivitySource>;

#[must_use]
pub fn view(ctx: &ViewContext) -> ActivityView {
    let (api, token) = ctx.scoped_api();
    ctx.build(VIEW, ActivitySource::new(api), schema(), PaginationMode::Server, token)
}

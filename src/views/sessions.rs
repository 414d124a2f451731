//! Session logs (server-paginated) plus the analytics summary.

use tokio_util::sync::CancellationToken;

use crate::api::{AdminApi, ListParams, Listing};
use crate::error::ApiError;
use crate::list::{FilterSchema, ListController, ListSource, Mutation, PaginationMode};
use crate::models::{RecordId, SessionAnalytics, SessionLog};

use super::{ViewContext, unsupported};

pub const VIEW: &str = "sessions";

/// Row action that force-ends a user session.
pub const TERMINATE: &str = "terminate";

pub struct SessionSource {
    api: AdminApi,
}

impl SessionSource {
    #[must_use]
    pub fn new(api: AdminApi) -> Self {
        Self { api }
    }
}

#[async_trait::async_trait]
impl ListSource<SessionLog> for SessionSource {
    async fn fetch(&self, params: &ListParams) -> Result<Listing<SessionLog>, ApiError> {
        self.api.get_detailed_session_logs(params).await
    }

    async fn mutate(&self, mutation: &Mutation) -> Result<(), ApiError> {
        match mutation {
            Mutation::Action { name, id } if *name == TERMINATE => self.api.terminate_user_session(*id).await,
            other => Err(unsupported(VIEW, other)),
        }
    }
}

#[must_use]
pub fn schema() -> FilterSchema<SessionLog> {
    FilterSchema::new().server("search").server("status").server("user_type")
}

pub type SessionsView = ListController<SessionLog, SessionSource>;

#[must_use]
pub fn view(ctx: &ViewContext) -> SessionsView {
    let (api, token) = ctx.scoped_api();
    ctx.build(VIEW, SessionSource::new(api), schema(), PaginationMode::Server, token)
}

impl ListController<SessionLog, SessionSource> {
    /// # Errors
    ///
    /// `Busy` while another row action runs, otherwise any [`ApiError`].
    pub async fn terminate(&mut self, session_id: RecordId) -> Result<(), ApiError> {
        self.run_row_action(Mutation::Action { name: TERMINATE, id: session_id }).await
    }
}

/// Fetch the analytics summary once, bound to `cancel`.
///
/// On failure the notifier gets one destructive notice and the error is
/// returned; cancellation is silent.
///
/// # Errors
///
/// Any [`ApiError`] from the request.
pub async fn load_analytics(
    ctx: &ViewContext,
    cancel: &CancellationToken,
) -> Result<SessionAnalytics, ApiError> {
    let (api, token) = ctx.scoped_api();
    let result = tokio::select! {
        biased;
        () = cancel.cancelled() => Err(ApiError::Cancelled),
        result = api.get_session_analytics() => result,
    };
    token.cancel();
    if let Err(e) = &result {
        tracing::warn!(view = VIEW, error = %e, "analytics load failed");
        if let Some(notice) = e.notice("Failed to load session analytics") {
            ctx.notifier().notify(notice);
        }
    }
    result
}

//! Per-entity list views.
//!
//! DESIGN
//! ======
//! A view is a [`ListController`] configured with three things: a
//! [`ListSource`](crate::list::ListSource) over [`AdminApi`], a filter
//! schema, and a pagination mode. Nothing here re-implements list state.
//!
//! Large, ever-growing collections (bookings, the activity timeline,
//! session logs) paginate on the server. Directory entities and payments
//! are bounded by the number of organizations and events, so they are
//! fetched whole and paginated locally.
//!
//! Every view gets its own child of the context's root token, shared by
//! the controller and its HTTP client. Tearing a view down cancels only
//! that view's requests; [`ViewContext::shutdown`] cancels all of them.

pub mod activity;
pub mod bookings;
pub mod directory;
pub mod payments;
pub mod sessions;

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::api::{AdminApi, ApiClient};
use crate::error::{ApiError, Notifier};
use crate::list::{FilterSchema, ListController, ListSource, Mutation, PaginationMode};
use crate::models::Record;
use crate::validation::ValidationError;

/// Shared ingredients for building views.
#[derive(Clone)]
pub struct ViewContext {
    client: ApiClient,
    root: CancellationToken,
    page_size: usize,
    notifier: Arc<dyn Notifier>,
}

impl ViewContext {
    #[must_use]
    pub fn new(client: ApiClient, page_size: usize, notifier: Arc<dyn Notifier>) -> Self {
        let root = client.cancel_token().clone();
        Self { client, root, page_size, notifier }
    }

    #[must_use]
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    #[must_use]
    pub fn notifier(&self) -> Arc<dyn Notifier> {
        Arc::clone(&self.notifier)
    }

    /// An [`AdminApi`] bound to a fresh child token, and that token.
    #[must_use]
    pub fn scoped_api(&self) -> (AdminApi, CancellationToken) {
        let client = self.client.scoped(&self.root);
        let token = client.cancel_token().clone();
        (AdminApi::new(client), token)
    }

    /// Cancel every view built from this context.
    pub fn shutdown(&self) {
        self.root.cancel();
    }

    fn build<T, S>(
        &self,
        name: &'static str,
        source: S,
        schema: FilterSchema<T>,
        mode: PaginationMode,
        token: CancellationToken,
    ) -> ListController<T, S>
    where
        T: Record,
        S: ListSource<T>,
    {
        ListController::new(name, source, schema, mode, self.page_size, self.notifier()).with_cancel_token(token)
    }
}

impl std::fmt::Debug for ViewContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewContext")
            .field("client", &self.client)
            .field("page_size", &self.page_size)
            .finish_non_exhaustive()
    }
}

/// Collect the present text fields of a record for a search filter.
pub(crate) fn present<'a, const N: usize>(fields: [Option<&'a str>; N]) -> Vec<&'a str> {
    fields.into_iter().flatten().collect()
}

/// Error for a mutation a view does not support.
pub(crate) fn unsupported(view: &'static str, mutation: &Mutation) -> ApiError {
    let value = match mutation {
        Mutation::Create { .. } => "create".to_owned(),
        Mutation::Update { .. } => "update".to_owned(),
        Mutation::Delete { .. } => "delete".to_owned(),
        Mutation::SetStatus { .. } => "status change".to_owned(),
        Mutation::Action { name, .. } => (*name).to_owned(),
    };
    tracing::warn!(view, action = %value, "unsupported mutation");
    ApiError::Validation(ValidationError::UnknownVariant { kind: "action", value })
}

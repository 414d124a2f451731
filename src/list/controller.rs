//! The list-state controller shared by every admin list view.
//!
//! DESIGN
//! ======
//! `items` always mirrors the latest successful fetch. Client-evaluated
//! filters select indices into `items` (`visible`); pagination slices
//! `visible` (client mode) or is delegated to the backend (server mode).
//! Every successful write is followed by exactly one reload: the backend
//! computes derived fields (totals, percentages) that a local merge would
//! get wrong.
//!
//! ERROR HANDLING
//! ==============
//! Failures never escape as panics. Each failed operation logs, emits one
//! destructive notice, returns the error, and leaves the last good state in
//! place. Optimistic patches are rolled back from a snapshot on failure.
//!
//! LIFECYCLE
//! =========
//! The controller owns a cancellation token tied to the view. `teardown`
//! (or drop) cancels it; in-flight calls resolve to `ApiError::Cancelled`
//! without touching state or raising notices.

use std::collections::BTreeSet;
use std::future::Future;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use uuid::Uuid;

use super::filter::{FilterKind, FilterSchema, Filters};
use super::mutation::{Mutation, MutationState};
use super::page::{self, PaginationMode};
use super::selection::Selection;
use crate::api::{ListParams, Listing};
use crate::error::{ApiError, Notice, Notifier};
use crate::models::{Record, RecordId};

/// Remote collaborator behind one list view.
#[async_trait::async_trait]
pub trait ListSource<T>: Send + Sync {
    async fn fetch(&self, params: &ListParams) -> Result<Listing<T>, ApiError>;
    async fn mutate(&self, mutation: &Mutation) -> Result<(), ApiError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListPhase {
    Idle,
    Loading,
    Loaded,
    Mutating,
}

pub struct ListController<T: Record, S: ListSource<T>> {
    name: &'static str,
    source: S,
    schema: FilterSchema<T>,
    mode: PaginationMode,
    notifier: Arc<dyn Notifier>,
    cancel: CancellationToken,

    items: Vec<T>,
    visible: Vec<usize>,
    server_total: Option<usize>,
    filters: Filters,
    loaded_filters: Option<Filters>,
    page: usize,
    page_size: usize,
    selected: Selection,
    pending: Option<RecordId>,
    phase: ListPhase,
    mutation: Option<MutationState>,
}

impl<T: Record, S: ListSource<T>> ListController<T, S> {
    #[must_use]
    pub fn new(
        name: &'static str,
        source: S,
        schema: FilterSchema<T>,
        mode: PaginationMode,
        page_size: usize,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            name,
            source,
            schema,
            mode,
            notifier,
            cancel: CancellationToken::new(),
            items: Vec::new(),
            visible: Vec::new(),
            server_total: None,
            filters: Filters::new(),
            loaded_filters: None,
            page: 1,
            page_size: page_size.max(1),
            selected: Selection::default(),
            pending: None,
            phase: ListPhase::Idle,
            mutation: None,
        }
    }

    /// Replace the view token, e.g. with the one the source's client was
    /// scoped to.
    #[must_use]
    pub fn with_cancel_token(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Every item passing the client-side filters, in server order.
    #[must_use]
    pub fn filtered(&self) -> Vec<&T> {
        self.visible.iter().map(|&i| &self.items[i]).collect()
    }

    /// Rows on the current page.
    #[must_use]
    pub fn page_items(&self) -> Vec<&T> {
        match self.mode {
            PaginationMode::Client => {
                let range = page::page_range(self.page, self.page_size, self.visible.len());
                self.visible[range].iter().map(|&i| &self.items[i]).collect()
            }
            PaginationMode::Server => self.filtered(),
        }
    }

    #[must_use]
    pub fn filtered_count(&self) -> usize {
        match self.mode {
            PaginationMode::Client => self.visible.len(),
            PaginationMode::Server => self.server_total.unwrap_or(self.visible.len()),
        }
    }

    #[must_use]
    pub fn total_pages(&self) -> usize {
        page::total_pages(self.filtered_count(), self.page_size)
    }

    #[must_use]
    pub fn page(&self) -> usize {
        self.page
    }

    #[must_use]
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    #[must_use]
    pub fn mode(&self) -> PaginationMode {
        self.mode
    }

    #[must_use]
    pub fn filters(&self) -> &Filters {
        &self.filters
    }

    #[must_use]
    pub fn selected(&self) -> &BTreeSet<RecordId> {
        self.selected.ids()
    }

    #[must_use]
    pub fn is_selected(&self, id: RecordId) -> bool {
        self.selected.contains(id)
    }

    #[must_use]
    pub fn pending(&self) -> Option<RecordId> {
        self.pending
    }

    #[must_use]
    pub fn is_pending(&self, id: RecordId) -> bool {
        self.pending == Some(id)
    }

    #[must_use]
    pub fn phase(&self) -> ListPhase {
        self.phase
    }

    #[must_use]
    pub fn mutation_state(&self) -> Option<&MutationState> {
        self.mutation.as_ref()
    }

    #[must_use]
    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }

    #[must_use]
    pub fn source(&self) -> &S {
        &self.source
    }

    // =========================================================================
    // LOAD / FILTER / PAGE
    // =========================================================================

    /// Fetch from the backend and replace `items`.
    ///
    /// # Errors
    ///
    /// The fetch error; prior items are kept and one notice is raised.
    pub async fn load(&mut self) -> Result<(), ApiError> {
        self.ensure_live()?;
        let filters_changed = self.loaded_filters.as_ref().is_some_and(|f| *f != self.filters);
        let mut request_page = if filters_changed { 1 } else { self.page };
        let params = self.list_params(request_page);

        let prior_phase = self.phase;
        self.phase = ListPhase::Loading;
        debug!(view = self.name, page = request_page, "loading");

        let mut result = cancellable(&self.cancel, self.source.fetch(&params)).await;

        // The collection shrank under a server-paginated view: the requested
        // page is past the end, so fetch the last page that still exists.
        let overshoot = match (&result, self.mode) {
            (Ok(listing), PaginationMode::Server) => listing
                .total
                .map(|total| page::total_pages(total, self.page_size))
                .filter(|&last| request_page > last),
            _ => None,
        };
        if let Some(last) = overshoot {
            debug!(view = self.name, requested = request_page, page = last, "page past end, refetching");
            request_page = last;
            let params = self.list_params(last);
            result = cancellable(&self.cancel, self.source.fetch(&params)).await;
        }

        match result {
            Ok(listing) => {
                self.items = listing.items;
                self.server_total = listing.total;
                self.page = request_page;
                self.loaded_filters = Some(self.filters.clone());
                let items = &self.items;
                self.selected.retain(|id| items.iter().any(|item| item.id() == id));
                self.recompute();
                self.phase = ListPhase::Loaded;
                debug!(view = self.name, count = self.items.len(), "loaded");
                Ok(())
            }
            Err(e) => {
                self.phase = prior_phase;
                self.report(&e, format!("Failed to load {}", self.name));
                Err(e)
            }
        }
    }

    /// Update one filter value.
    ///
    /// # Errors
    ///
    /// `UnknownFilter` for keys the view does not define, or the reload
    /// error for server-evaluated keys (the filter is then reverted).
    pub async fn apply_filter(&mut self, key: &str, value: &str) -> Result<(), ApiError> {
        self.ensure_live()?;
        let Some(field) = self.schema.field(key) else {
            let err = ApiError::UnknownFilter(key.to_owned());
            self.report(&err, format!("Invalid {} filter", self.name));
            return Err(err);
        };
        let server_side = matches!(field.kind, FilterKind::Server);

        let previous = self.filters.clone();
        if !self.filters.set(key, value) {
            return Ok(());
        }

        if server_side {
            if let Err(e) = self.load().await {
                if !matches!(e, ApiError::Cancelled) {
                    self.filters = previous;
                }
                return Err(e);
            }
        } else {
            self.page = 1;
            self.recompute();
        }
        Ok(())
    }

    /// Record a filter value without fetching or recomputing; the next
    /// `load` applies it. Used to configure a view before its first load.
    ///
    /// # Errors
    ///
    /// `UnknownFilter` for keys the view does not define.
    pub fn stage_filter(&mut self, key: &str, value: &str) -> Result<(), ApiError> {
        if self.schema.field(key).is_none() {
            return Err(ApiError::UnknownFilter(key.to_owned()));
        }
        self.filters.set(key, value);
        Ok(())
    }

    /// Move to page `n`, clamped to `[1, total_pages]`.
    ///
    /// # Errors
    ///
    /// Server mode only: the reload error (the page is then reverted).
    pub async fn set_page(&mut self, n: usize) -> Result<(), ApiError> {
        let target = page::clamp_page(n, self.total_pages());
        match self.mode {
            PaginationMode::Client => {
                self.page = target;
                Ok(())
            }
            PaginationMode::Server => {
                if target == self.page {
                    return Ok(());
                }
                let previous = self.page;
                self.page = target;
                if let Err(e) = self.load().await {
                    if !matches!(e, ApiError::Cancelled) {
                        self.page = previous;
                    }
                    return Err(e);
                }
                Ok(())
            }
        }
    }

    /// Change the page length. Client mode re-clamps the current page;
    /// a loaded server-mode view refetches from page 1.
    ///
    /// # Errors
    ///
    /// Server mode only: the reload error (size and page are then reverted).
    pub async fn set_page_size(&mut self, page_size: usize) -> Result<(), ApiError> {
        let page_size = page_size.max(1);
        if page_size == self.page_size {
            return Ok(());
        }
        if matches!(self.mode, PaginationMode::Client) || self.phase == ListPhase::Idle {
            self.page_size = page_size;
            self.recompute();
            return Ok(());
        }

        let (previous_size, previous_page) = (self.page_size, self.page);
        self.page_size = page_size;
        self.page = 1;
        if let Err(e) = self.load().await {
            if !matches!(e, ApiError::Cancelled) {
                self.page_size = previous_size;
                self.page = previous_page;
            }
            return Err(e);
        }
        Ok(())
    }

    // =========================================================================
    // SELECTION
    // =========================================================================

    pub fn select(&mut self, id: RecordId, checked: bool) {
        self.selected.select(id, checked);
    }

    /// Check or uncheck every row on the current page only.
    pub fn select_all(&mut self, checked: bool) {
        let ids: Vec<RecordId> = self.page_items().iter().map(|item| item.id()).collect();
        self.selected.select_all(ids, checked);
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    // =========================================================================
    // MUTATIONS
    // =========================================================================

    /// Apply `mutation` optimistically, send it, and reload on success.
    ///
    /// # Errors
    ///
    /// The write error; items and selection are restored and one notice is
    /// raised.
    pub async fn mutate(&mut self, mutation: Mutation) -> Result<(), ApiError> {
        self.ensure_live()?;
        let snapshot_items = self.items.clone();
        let snapshot_selected = self.selected.clone();
        let ticket = Uuid::new_v4();

        self.apply_optimistic(&mutation);
        self.phase = ListPhase::Mutating;
        self.mutation = Some(MutationState::InFlight { ticket, mutation: mutation.clone() });
        debug!(view = self.name, %ticket, ?mutation, "mutation in flight");

        let result = cancellable(&self.cancel, self.source.mutate(&mutation)).await;
        match result {
            Ok(()) => {
                self.mutation = Some(MutationState::Committed { ticket, mutation: mutation.clone() });
                self.notifier.notify(Notice::info("Saved", mutation.done_message()));
                if let Err(e) = self.load().await {
                    warn!(view = self.name, %ticket, error = %e, "reload after mutation failed");
                    if !matches!(e, ApiError::Cancelled) {
                        self.phase = ListPhase::Loaded;
                    }
                }
                Ok(())
            }
            Err(ApiError::Cancelled) => Err(ApiError::Cancelled),
            Err(e) => {
                self.items = snapshot_items;
                self.selected = snapshot_selected;
                self.recompute();
                self.phase = ListPhase::Loaded;
                self.mutation = Some(MutationState::Failed { ticket, mutation, error: e.to_string() });
                self.report(&e, "Action failed");
                Err(e)
            }
        }
    }

    /// Run a row-scoped action. Only one may be in flight; the row's id is
    /// held in `pending` until the action settles either way.
    ///
    /// # Errors
    ///
    /// `Busy` while another row action runs, otherwise the action error.
    pub async fn run_row_action(&mut self, mutation: Mutation) -> Result<(), ApiError> {
        self.ensure_live()?;
        if let Some(pending) = self.pending {
            return Err(ApiError::Busy { pending });
        }
        let Some(id) = mutation.target() else {
            return self.mutate(mutation).await;
        };

        self.pending = Some(id);
        let result = {
            let _clear = PendingGuard(&mut self.pending);
            cancellable(&self.cancel, self.source.mutate(&mutation)).await
        };

        match result {
            Ok(()) => {
                self.notifier.notify(Notice::info("Done", mutation.done_message()));
                if let Err(e) = self.load().await {
                    warn!(view = self.name, id, error = %e, "reload after row action failed");
                }
                Ok(())
            }
            Err(e) => {
                self.report(&e, "Action failed");
                Err(e)
            }
        }
    }

    /// Cancel every in-flight and future call made by this view.
    pub fn teardown(&self) {
        debug!(view = self.name, "teardown");
        self.cancel.cancel();
    }

    // =========================================================================
    // INTERNALS
    // =========================================================================

    fn ensure_live(&self) -> Result<(), ApiError> {
        if self.cancel.is_cancelled() { Err(ApiError::Cancelled) } else { Ok(()) }
    }

    fn list_params(&self, page: usize) -> ListParams {
        let (page, limit) = match self.mode {
            PaginationMode::Client => (None, None),
            PaginationMode::Server => (Some(page), Some(self.page_size)),
        };
        ListParams { page, limit, filters: self.filters.server_values(&self.schema) }
    }

    fn recompute(&mut self) {
        let schema = &self.schema;
        let filters = &self.filters;
        self.visible = self
            .items
            .iter()
            .enumerate()
            .filter(|(_, item)| schema.matches(filters, item))
            .map(|(i, _)| i)
            .collect();
        self.page = page::clamp_page(self.page, self.total_pages());
    }

    fn apply_optimistic(&mut self, mutation: &Mutation) {
        match mutation {
            Mutation::Delete { id } => {
                self.items.retain(|item| item.id() != *id);
                self.selected.select(*id, false);
            }
            Mutation::SetStatus { id, status } => {
                if let Some(item) = self.items.iter_mut().find(|item| item.id() == *id) {
                    item.apply_status(status);
                }
            }
            Mutation::Create { .. } | Mutation::Update { .. } | Mutation::Action { .. } => {}
        }
        self.recompute();
    }

    fn report(&self, err: &ApiError, title: impl Into<String>) {
        if matches!(err, ApiError::Cancelled) {
            return;
        }
        warn!(view = self.name, category = ?err.category(), error = %err, "list operation failed");
        if let Some(notice) = err.notice(title) {
            self.notifier.notify(notice);
        }
    }
}

impl<T: Record, S: ListSource<T>> Drop for ListController<T, S> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Clears the row-action marker however the action future ends, including
/// when the caller drops it.
struct PendingGuard<'a>(&'a mut Option<RecordId>);

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        *self.0 = None;
    }
}

/// Race `fut` against the view token.
async fn cancellable<T, F>(cancel: &CancellationToken, fut: F) -> Result<T, ApiError>
where
    F: Future<Output = Result<T, ApiError>>,
{
    tokio::select! {
        biased;
        () = cancel.cancelled() => Err(ApiError::Cancelled),
        result = fut => result,
    }
}

#[cfg(test)]
#[path = "controller_test.rs"]
mod tests;

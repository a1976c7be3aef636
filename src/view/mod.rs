//! Generic filtered list view shared by every admin screen.
//!
//! DESIGN
//! ======
//! A `ListView<E>` owns the cached collection of one entity type plus the
//! screen state around it (filter, loading and submitting flags, dialog
//! mode, notice queue, debounced search). The display list is derived from
//! the cache on demand and never stored.
//!
//! State sits behind a `tokio::sync::RwLock` that is taken only to read or
//! patch fields and is always released before a remote call, so readers see
//! the in-flight flags while a request runs. Every mutation goes through
//! the remote and then refetches the whole collection; only `set_status`
//! splices its patch into the cache instead.
//!
//! ERROR HANDLING
//! ==============
//! Read failures are stored as a `FetchError` and the previous cache stays
//! on screen. Write failures come back as a `MutationError`, are queued as
//! an error notice, and leave the cache untouched. Nothing is retried.

pub mod debounce;
pub mod dialog;
pub mod error;
pub mod filter;
pub mod notice;
pub mod stats;


use std::collections::BTreeSet;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

pub use debounce::Debouncer;
pub use dialog::DialogMode;
pub use error::{Action, FetchError, MutationError};
pub use filter::{CategoryFilter, DateRange, FilterParams, SortOrder};
pub use notice::{Notice, NoticeKind};
pub use stats::{ScoreStats, score_stats};

use crate::config::DEFAULT_SEARCH_DEBOUNCE_MS;
use crate::entities::{Entity, ExamResult, RecordId};
use crate::export::{Exportable, Sheet};
use crate::locale::Locale;
use crate::net::{ApiError, Remote, Resource};

// =============================================================================
// STATE
// =============================================================================

pub struct ViewState<E> {
    pub records: Vec<E>,
    pub filter: FilterParams,
    pub loading: bool,
    pub submitting: bool,
    pub error: Option<FetchError>,
    pub dialog: DialogMode,
    pub notices: Vec<Notice>,
    pub scope: Option<String>,
    search: Debouncer<String>,
    /// Number of the newest load issued. Bumped by every load and scope
    /// change; only the load holding the current number may replace the
    /// cache.
    load_seq: u64,
    /// Loads still waiting on the remote; `loading` is set while nonzero.
    in_flight: usize,
}

impl<E> ViewState<E> {
    fn new(search_delay: Duration) -> Self {
        Self {
            records: Vec::new(),
            filter: FilterParams::default(),
            loading: false,
            submitting: false,
            error: None,
            dialog: DialogMode::Closed,
            notices: Vec::new(),
            scope: None,
            search: Debouncer::new(search_delay),
            load_seq: 0,
            in_flight: 0,
        }
    }
}

// =============================================================================
// LIST VIEW
// =============================================================================

#[derive(Clone)]
pub struct ListView<E: Entity> {
    remote: Arc<dyn Remote>,
    state: Arc<RwLock<ViewState<E>>>,
}

impl<E: Entity> ListView<E> {
    #[must_use]
    pub fn new(remote: Arc<dyn Remote>) -> Self {
        Self::with_search_delay(remote, Duration::from_millis(DEFAULT_SEARCH_DEBOUNCE_MS))
    }

    #[must_use]
    pub fn with_search_delay(remote: Arc<dyn Remote>, delay: Duration) -> Self {
        Self { remote, state: Arc::new(RwLock::new(ViewState::new(delay))) }
    }

    fn resource_for(scope: Option<&str>) -> Resource {
        match scope {
            Some(scope) => E::resource().scoped(scope),
            None => E::resource(),
        }
    }

    // =========================================================================
    // LOADING
    // =========================================================================

    /// First load of the screen.
    ///
    /// # Errors
    ///
    /// Same as [`ListView::load`].
    pub async fn mount(&self) -> Result<usize, FetchError> {
        self.load().await
    }

    /// Refetch the whole collection and replace the cache.
    ///
    /// A scoped collection with no scope set yet loads nothing. When loads
    /// overlap, only the most recently issued one replaces the cache; older
    /// ones finish without touching it. Returns the number of cached records.
    ///
    /// # Errors
    ///
    /// Returns a `FetchError` (also kept in state) when the remote call or
    /// decoding fails; the previous cache is left in place.
    pub async fn load(&self) -> Result<usize, FetchError> {
        let (resource, seq) = {
            let mut state = self.state.write().await;
            let resource = Self::resource_for(state.scope.as_deref());
            if !resource.is_addressable() {
                debug!(entity = E::PLURAL, "load skipped: no scope selected");
                return Ok(0);
            }
            state.load_seq += 1;
            state.in_flight += 1;
            state.loading = true;
            (resource, state.load_seq)
        };

        let outcome = fetch_records::<E>(self.remote.as_ref(), &resource).await;

        let mut state = self.state.write().await;
        state.in_flight = state.in_flight.saturating_sub(1);
        state.loading = state.in_flight > 0;
        if state.load_seq != seq {
            debug!(entity = E::PLURAL, seq, latest = state.load_seq, "discarding superseded load");
            return Ok(state.records.len());
        }
        match outcome {
            Ok(records) => {
                info!(entity = E::PLURAL, count = records.len(), "loaded");
                state.records = records;
                state.error = None;
                Ok(state.records.len())
            }
            Err(e) => {
                warn!(entity = E::PLURAL, error = %e, "load failed");
                let err = FetchError::from_api(E::PLURAL, &e);
                state.error = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Switch the parent the collection is keyed on and reload.
    ///
    /// # Errors
    ///
    /// Same as [`ListView::load`]. An unchanged scope is a no-op.
    pub async fn set_scope(&self, scope: impl Into<String>) -> Result<usize, FetchError> {
        let scope = scope.into();
        {
            let mut state = self.state.write().await;
            if state.scope.as_deref() == Some(scope.as_str()) {
                return Ok(state.records.len());
            }
            state.scope = Some(scope);
            state.records.clear();
            state.error = None;
            state.load_seq += 1;
        }
        self.load().await
    }

    // =========================================================================
    // FILTERING
    // =========================================================================

    /// Replace all filter parameters. No network call.
    pub async fn set_filter(&self, params: FilterParams) {
        self.state.write().await.filter = params;
    }

    /// Change some filter parameters in place.
    pub async fn update_filter(&self, change: impl FnOnce(&mut FilterParams)) {
        change(&mut self.state.write().await.filter);
    }

    /// Feed the search box; applied once input has been idle for the delay.
    pub async fn type_query(&self, text: impl Into<String>) {
        self.state.write().await.search.input(text.into());
    }

    /// Apply the settled query, if any. Returns whether the filter changed.
    pub async fn tick(&self) -> bool {
        let mut state = self.state.write().await;
        match state.search.poll() {
            Some(query) => {
                state.filter.query = query;
                true
            }
            None => false,
        }
    }

    /// Wait until typing has settled and apply the query.
    pub async fn settle_query(&self) -> bool {
        loop {
            let Some(deadline) = self.state.read().await.search.deadline() else {
                return false;
            };
            tokio::time::sleep_until(deadline).await;
            if self.tick().await {
                return true;
            }
        }
    }

    // =========================================================================
    // MUTATIONS
    // =========================================================================

    /// Insert one record and reload.
    ///
    /// # Errors
    ///
    /// Returns a `MutationError` when another write is in flight or the
    /// remote rejects the insert.
    pub async fn create<N: Serialize>(&self, fields: &N) -> Result<(), MutationError> {
        let row = to_row(fields)?;
        self.mutate(Action::Create, move |remote, resource| async move { remote.insert(&resource, vec![row]).await })
            .await
    }

    /// Insert several records through the resource's batch strategy and reload.
    ///
    /// # Errors
    ///
    /// Same as [`ListView::create`].
    pub async fn create_many<N: Serialize>(&self, rows: &[N]) -> Result<(), MutationError> {
        let rows = rows.iter().map(to_row).collect::<Result<Vec<_>, _>>()?;
        self.mutate(Action::Create, move |remote, resource| async move { remote.insert(&resource, rows).await })
            .await
    }

    /// Patch one record and reload.
    ///
    /// # Errors
    ///
    /// Same as [`ListView::create`].
    pub async fn update(&self, id: &RecordId, patch: Value) -> Result<(), MutationError> {
        let id = id.clone();
        self.mutate(Action::Update, move |remote, resource| async move { remote.update(&resource, &id, patch).await })
            .await
    }

    /// Delete one record (or retire it, for soft-delete entities) and reload.
    ///
    /// # Errors
    ///
    /// Same as [`ListView::create`].
    pub async fn remove(&self, id: &RecordId) -> Result<(), MutationError> {
        let id = id.clone();
        self.mutate(Action::Remove, move |remote, resource| async move {
            match E::soft_delete_patch() {
                Some(patch) => remote.update(&resource, &id, patch).await,
                None => remote.delete(&resource, &id).await,
            }
        })
        .await
    }

    /// Patch one record and splice the patch into the cache without reloading.
    ///
    /// # Errors
    ///
    /// Returns `Invalid` when the record is not cached, otherwise the same
    /// errors as [`ListView::create`].
    pub async fn set_status(&self, id: &RecordId, patch: Value) -> Result<(), MutationError> {
        let resource = {
            let mut state = self.state.write().await;
            if state.submitting {
                return Err(MutationError::Busy);
            }
            if !state.records.iter().any(|record| &record.id() == id) {
                return Err(MutationError::Invalid(format!("{} {id} is not loaded", E::SINGULAR)));
            }
            state.submitting = true;
            Self::resource_for(state.scope.as_deref())
        };

        let outcome = self.remote.update(&resource, id, patch.clone()).await;

        let mut state = self.state.write().await;
        state.submitting = false;
        if let Err(e) = outcome {
            return Err(Self::reject(&mut state, Action::Update, &e));
        }
        if let Some(record) = state.records.iter_mut().find(|record| &record.id() == id) {
            match splice(record, &patch) {
                Ok(updated) => *record = updated,
                Err(e) => warn!(entity = E::SINGULAR, %id, error = %e, "patched record no longer decodes"),
            }
        }
        info!(entity = E::SINGULAR, %id, "status updated");
        state.notices.push(Notice::success(error::success_title(Action::Update, E::SINGULAR)));
        Ok(())
    }

    async fn mutate<F, Fut>(&self, action: Action, call: F) -> Result<(), MutationError>
    where
        F: FnOnce(Arc<dyn Remote>, Resource) -> Fut,
        Fut: Future<Output = Result<(), ApiError>>,
    {
        let resource = {
            let mut state = self.state.write().await;
            if state.submitting {
                return Err(MutationError::Busy);
            }
            state.submitting = true;
            Self::resource_for(state.scope.as_deref())
        };

        let outcome = call(Arc::clone(&self.remote), resource).await;

        {
            let mut state = self.state.write().await;
            state.submitting = false;
            if let Err(e) = outcome {
                return Err(Self::reject(&mut state, action, &e));
            }
            info!(entity = E::SINGULAR, action = action.verb(), "mutation succeeded");
            state.notices.push(Notice::success(error::success_title(action, E::SINGULAR)));
            state.dialog = DialogMode::Closed;
        }

        // The write stands even if the refetch fails; that failure is kept
        // as the view's FetchError.
        if let Err(e) = self.load().await {
            debug!(entity = E::PLURAL, error = %e, "reload after mutation failed");
        }
        Ok(())
    }

    fn reject(state: &mut ViewState<E>, action: Action, e: &ApiError) -> MutationError {
        warn!(entity = E::SINGULAR, action = action.verb(), error = %e, "mutation failed");
        let err = MutationError::from_api(action, E::SINGULAR, e);
        state
            .notices
            .push(Notice::error(error::failure_title(action, E::SINGULAR), Some(err.to_string())));
        err
    }

    // =========================================================================
    // DIALOG
    // =========================================================================

    pub async fn open_create(&self) {
        self.state.write().await.dialog = DialogMode::Creating;
    }

    pub async fn open_edit(&self, id: RecordId) {
        self.state.write().await.dialog = DialogMode::Editing(id);
    }

    pub async fn open_bulk(&self) {
        self.state.write().await.dialog = DialogMode::BulkImporting;
    }

    pub async fn close_dialog(&self) {
        self.state.write().await.dialog = DialogMode::Closed;
    }

    pub async fn dialog(&self) -> DialogMode {
        self.state.read().await.dialog.clone()
    }

    /// The cached record the edit dialog is open on.
    pub async fn selected(&self) -> Option<E> {
        let state = self.state.read().await;
        let id = state.dialog.editing()?;
        state.records.iter().find(|record| &record.id() == id).cloned()
    }

    // =========================================================================
    // READS
    // =========================================================================

    /// The derived display list.
    pub async fn visible(&self) -> Vec<E> {
        let state = self.state.read().await;
        filter::derive(&state.records, &state.filter)
    }

    pub async fn records(&self) -> Vec<E> {
        self.state.read().await.records.clone()
    }

    pub async fn filter(&self) -> FilterParams {
        self.state.read().await.filter.clone()
    }

    pub async fn scope(&self) -> Option<String> {
        self.state.read().await.scope.clone()
    }

    pub async fn is_loading(&self) -> bool {
        self.state.read().await.loading
    }

    pub async fn is_submitting(&self) -> bool {
        self.state.read().await.submitting
    }

    pub async fn error(&self) -> Option<FetchError> {
        self.state.read().await.error.clone()
    }

    pub async fn drain_notices(&self) -> Vec<Notice> {
        std::mem::take(&mut self.state.write().await.notices)
    }

    /// Distinct category values present in the cache, sorted.
    pub async fn categories(&self) -> Vec<String> {
        let state = self.state.read().await;
        state
            .records
            .iter()
            .filter_map(|record| record.category_under(&state.filter).map(|c| c.into_owned()))
            .filter(|c| !c.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

impl<E: Exportable> ListView<E> {
    /// Spreadsheet of the currently displayed records.
    pub async fn export_sheet(&self, locale: Locale) -> Sheet {
        crate::export::project(&self.visible().await, locale)
    }
}

impl ListView<ExamResult> {
    /// Score statistics over the whole cache. Only the filter's pass mark
    /// applies; the other predicates are ignored.
    pub async fn stats(&self) -> Option<ScoreStats> {
        let state = self.state.read().await;
        let scores: Vec<f64> = state.records.iter().map(|result| result.score).collect();
        score_stats(&scores, state.filter.pass_mark)
    }
}

// =============================================================================
// HELPERS
// =============================================================================

async fn fetch_records<E: Entity>(remote: &dyn Remote, resource: &Resource) -> Result<Vec<E>, ApiError> {
    remote
        .select(resource)
        .await?
        .into_iter()
        .map(|row| serde_json::from_value(row).map_err(|e| ApiError::Decode(format!("{}: {e}", E::PLURAL))))
        .collect()
}

fn to_row<N: Serialize>(fields: &N) -> Result<Value, MutationError> {
    serde_json::to_value(fields).map_err(|e| MutationError::Invalid(format!("could not encode fields: {e}")))
}

/// Merge the top-level fields of `patch` into a record.
fn splice<E: Entity>(record: &E, patch: &Value) -> Result<E, serde_json::Error> {
    let mut value = serde_json::to_value(record)?;
    if let (Value::Object(target), Value::Object(fields)) = (&mut value, patch) {
        for (key, field) in fields {
            target.insert(key.clone(), field.clone());
        }
    }
    serde_json::from_value(value)
}

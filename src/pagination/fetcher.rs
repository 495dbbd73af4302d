//! The paginated list fetcher
//!
//! One fetch cycle: consume the trigger, check preconditions, issue a single
//! bounded query, then merge (or report) under the latest-cycle check.

use super::predicate::ListPredicate;
use super::types::{FetchOutcome, FetchState, SkipReason, Trigger};
use crate::backend::{Query, RowStore, TableRef};
use crate::decode::{decode_rows, FromRow, Identified, User};
use crate::session::SessionState;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// Mutable part of a fetcher, guarded by one lock
#[derive(Debug)]
struct Inner<T, P> {
    state: FetchState<T>,
    predicate: P,
    /// Identity the accumulated items were fetched for
    owner: Option<String>,
}

/// Accumulates pages of rows for one list view.
///
/// Cloning yields another handle on the same list, so cycles can run from
/// separate tasks; only the most recently started cycle may apply its result.
pub struct ListFetcher<T, P> {
    store: Arc<dyn RowStore>,
    table: TableRef,
    page_size: u32,
    inner: Arc<RwLock<Inner<T, P>>>,
    latest: Arc<AtomicU64>,
}

impl<T, P> Clone for ListFetcher<T, P> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            table: self.table.clone(),
            page_size: self.page_size,
            inner: Arc::clone(&self.inner),
            latest: Arc::clone(&self.latest),
        }
    }
}

impl<T, P> ListFetcher<T, P>
where
    T: FromRow + Identified + Clone + Send + Sync,
    P: ListPredicate,
{
    /// Create a fetcher with an empty list
    pub fn new(store: Arc<dyn RowStore>, table: TableRef, page_size: u32, predicate: P) -> Self {
        Self {
            store,
            table,
            page_size: page_size.max(1),
            inner: Arc::new(RwLock::new(Inner {
                state: FetchState::default(),
                predicate,
                owner: None,
            })),
            latest: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Snapshot of items, loading flag and error
    pub async fn state(&self) -> FetchState<T> {
        self.inner.read().await.state.clone()
    }

    /// Replace the predicate; a different one empties the list and
    /// invalidates cycles still in flight. Returns whether it changed.
    pub async fn set_predicate(&self, predicate: P) -> bool {
        let mut inner = self.inner.write().await;
        if inner.predicate == predicate {
            return false;
        }
        self.latest.fetch_add(1, Ordering::SeqCst);
        inner.predicate = predicate;
        inner.state.reset();
        inner.state.loading = false;
        true
    }

    /// Run one fetch cycle for `page`.
    ///
    /// `on_error` runs exactly once when the call fails and never otherwise.
    pub async fn fetch<F>(
        &self,
        session: &SessionState,
        trigger: &Trigger,
        page: u32,
        on_error: F,
    ) -> FetchOutcome
    where
        F: FnOnce() + Send,
    {
        if !trigger.take() {
            return FetchOutcome::Idle;
        }

        let (seq, queries) = {
            let mut inner = self.inner.write().await;

            let user = match self.check_preconditions(session, &inner.predicate, page) {
                Ok(user) => user,
                Err(reason) => {
                    debug!("Fetch skipped: {reason:?}");
                    inner.state.loading = false;
                    return FetchOutcome::Skipped(reason);
                }
            };

            let seq = self.latest.fetch_add(1, Ordering::SeqCst) + 1;

            let owner_changed = inner.owner.as_deref() != Some(user.id.as_str());
            if page == 1 || owner_changed {
                inner.state.reset();
                inner.owner = Some(user.id.clone());
            }
            inner.state.loading = true;

            (seq, self.build_queries(&inner.predicate, user, page))
        };

        debug!(
            "Fetch cycle {seq}: page {page} of {}/{}",
            self.table.database_id, self.table.table_id
        );

        let result = match self.store.list_rows(&self.table, &queries).await {
            Ok(list) => decode_rows::<T>(&list.rows),
            Err(e) => Err(e),
        };

        let mut inner = self.inner.write().await;
        if self.latest.load(Ordering::SeqCst) != seq {
            debug!("Fetch cycle {seq} superseded, dropping result");
            return FetchOutcome::Superseded;
        }

        match result {
            Ok(items) => {
                let fetched = items.len();
                let added = inner.state.merge(items);
                inner.state.error = if page == 1 && fetched == 0 {
                    inner.predicate.empty_message().map(str::to_string)
                } else {
                    None
                };
                inner.state.loading = false;
                debug!("Fetch cycle {seq}: {fetched} rows, {added} new");
                FetchOutcome::Applied { fetched, added }
            }
            Err(e) => {
                let message = e.user_message();
                warn!("Fetch cycle {seq} failed on page {page}: {e}");
                inner.state.error = Some(message.clone());
                inner.state.loading = false;
                drop(inner);
                on_error();
                FetchOutcome::Failed(message)
            }
        }
    }

    fn check_preconditions<'s>(
        &self,
        session: &'s SessionState,
        predicate: &P,
        page: u32,
    ) -> Result<&'s User, SkipReason> {
        if session.loading {
            return Err(SkipReason::SessionLoading);
        }
        let user = session.user.as_ref().ok_or(SkipReason::NoSession)?;
        predicate.check()?;
        if page < 1 {
            return Err(SkipReason::InvalidPage);
        }
        Ok(user)
    }

    fn build_queries(&self, predicate: &P, user: &User, page: u32) -> Vec<Query> {
        let offset = (page - 1).saturating_mul(self.page_size);
        let mut queries = predicate.filters(user);
        queries.push(Query::limit(self.page_size));
        queries.push(Query::offset(offset));
        queries.extend(predicate.ordering());
        queries
    }
}

impl<T, P: std::fmt::Debug> std::fmt::Debug for ListFetcher<T, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListFetcher")
            .field("table", &self.table)
            .field("page_size", &self.page_size)
            .field("latest", &self.latest.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

//! Fetch state, triggers and outcomes

use crate::decode::Identified;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Accumulated list state exposed to callers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchState<T> {
    /// Items in fetch order, unique by id
    pub items: Vec<T>,
    /// A fetch cycle is in flight
    pub loading: bool,
    /// Human-readable error from the last cycle
    pub error: Option<String>,
}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loading: false,
            error: None,
        }
    }
}

impl<T: Identified> FetchState<T> {
    /// Drop all items and the error
    pub fn reset(&mut self) {
        self.items.clear();
        self.error = None;
    }

    /// Append `incoming`, skipping ids already present; returns how many were added
    pub fn merge(&mut self, incoming: Vec<T>) -> usize {
        merge_unique(&mut self.items, incoming)
    }
}

/// Append items whose id is not yet in `existing`, keeping the first copy
pub fn merge_unique<T: Identified>(existing: &mut Vec<T>, incoming: Vec<T>) -> usize {
    let mut seen: HashSet<String> = existing.iter().map(|item| item.id().to_string()).collect();
    let before = existing.len();

    for item in incoming {
        if seen.insert(item.id().to_string()) {
            existing.push(item);
        }
    }

    existing.len() - before
}

/// Edge-triggered fetch request.
///
/// The caller sets it; the fetcher clears it the moment it looks at it, so an
/// unrelated re-run never repeats a fetch. Clones share the flag.
#[derive(Debug, Clone, Default)]
pub struct Trigger(Arc<AtomicBool>);

impl Trigger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a fetch
    pub fn set(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Withdraw a pending request
    pub fn clear(&self) {
        self.0.store(false, Ordering::SeqCst);
    }

    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Consume the request, returning whether one was pending
    pub fn take(&self) -> bool {
        self.0.swap(false, Ordering::SeqCst)
    }
}

/// Why a triggered fetch did not reach the network
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Session check has not finished yet
    SessionLoading,
    /// Nobody is logged in
    NoSession,
    /// Search term is empty after trimming
    BlankSearchTerm,
    /// Page number below 1
    InvalidPage,
}

/// What one call to `ListFetcher::fetch` did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Trigger was not set
    Idle,
    /// Preconditions failed; no network call
    Skipped(SkipReason),
    /// Rows were merged into the state
    Applied { fetched: usize, added: usize },
    /// The call failed; items untouched, error set, recovery callback invoked
    Failed(String),
    /// A newer cycle started before this one finished; result dropped
    Superseded,
}

/// Caller-side page counter paired with a trigger
#[derive(Debug, Clone)]
pub struct Pager {
    page: u32,
    trigger: Trigger,
}

impl Default for Pager {
    fn default() -> Self {
        Self {
            page: 1,
            trigger: Trigger::new(),
        }
    }
}

impl Pager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn trigger(&self) -> &Trigger {
        &self.trigger
    }

    /// Start over from page 1 and request a fetch
    pub fn first(&mut self) {
        self.page = 1;
        self.trigger.set();
    }

    /// Advance one page and request a fetch
    pub fn next(&mut self) {
        self.page = self.page.saturating_add(1);
        self.trigger.set();
    }

    /// Recovery after a failed page: cancel the request and go back one page
    pub fn step_back(&mut self) {
        self.trigger.clear();
        if self.page > 1 {
            self.page -= 1;
        }
    }
}

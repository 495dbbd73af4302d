//! Paginated list fetching
//!
//! A single `ListFetcher` drives both restaurant lists; the difference
//! between "my restaurants" and "search" lives entirely in the predicate.
//!
//! # Overview
//!
//! - `page == 1` clears the list before the query is issued
//! - `page > 1` appends, keeping the first copy of every `$id`
//! - failures leave items untouched, set `error` and run the caller's
//!   recovery callback
//! - results of superseded cycles are dropped

mod fetcher;
mod predicate;
mod types;

pub use fetcher::ListFetcher;
pub use predicate::{ListPredicate, OwnerScope, SearchScope, NO_RESULTS_MESSAGE};
pub use types::{merge_unique, FetchOutcome, FetchState, Pager, SkipReason, Trigger};

use crate::decode::Restaurant;

/// Restaurants added by the signed-in user
pub type MyRestaurants = ListFetcher<Restaurant, OwnerScope>;

/// Approved restaurants matching a search term
pub type RestaurantSearch = ListFetcher<Restaurant, SearchScope>;

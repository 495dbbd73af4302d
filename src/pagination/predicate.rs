//! Query predicates for the two restaurant lists

use super::types::SkipReason;
use crate::backend::{Query, CREATED_AT};
use crate::decode::{RestaurantStatus, User};

/// Error shown when a fresh search matches nothing
pub const NO_RESULTS_MESSAGE: &str = "No halal restaurants found";

/// Scopes a paginated list query
pub trait ListPredicate: Clone + PartialEq + Send + Sync + 'static {
    /// Predicate-specific precondition
    fn check(&self) -> Result<(), SkipReason> {
        Ok(())
    }

    /// Filter clauses for the signed-in `user`
    fn filters(&self, user: &User) -> Vec<Query>;

    /// Ordering clause, if the list has an explicit order
    fn ordering(&self) -> Option<Query>;

    /// Error to report when page 1 comes back empty
    fn empty_message(&self) -> Option<&'static str> {
        None
    }
}

/// Restaurants added by the signed-in user, newest first
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OwnerScope;

impl ListPredicate for OwnerScope {
    fn filters(&self, user: &User) -> Vec<Query> {
        vec![Query::equal("users", user.id.as_str())]
    }

    fn ordering(&self) -> Option<Query> {
        Some(Query::order_desc(CREATED_AT))
    }
}

/// Approved restaurants whose search text contains a term.
///
/// The term is kept as entered but goes out trimmed; a term that trims to
/// nothing skips the fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchScope {
    term: String,
}

impl SearchScope {
    pub fn new(term: impl Into<String>) -> Self {
        Self { term: term.into() }
    }
}

impl ListPredicate for SearchScope {
    fn check(&self) -> Result<(), SkipReason> {
        if self.term.trim().is_empty() {
            Err(SkipReason::BlankSearchTerm)
        } else {
            Ok(())
        }
    }

    fn filters(&self, _user: &User) -> Vec<Query> {
        vec![
            Query::equal("status", RestaurantStatus::Approved.as_str()),
            Query::contains("searchTerm", self.term.trim()),
        ]
    }

    // Search keeps the backend's default order.
    fn ordering(&self) -> Option<Query> {
        None
    }

    fn empty_message(&self) -> Option<&'static str> {
        Some(NO_RESULTS_MESSAGE)
    }
}

//! Queryset filter translator.
//!
//! Turns a principal's accessibility into predicates on a ticket collection. The
//! collection is abstract ([`TicketQuery`]) so a relational store can translate the two
//! predicates into its own query language; `Vec<T>` is provided for in-memory use.
//!
//! Flag exclusion matches the flag name as a case-insensitive substring of the ticket's
//! free-text flags field, like the store's `icontains` lookup. A restricted flag whose name
//! is a substring of another flag name therefore also hides tickets carrying the longer
//! flag.

use std::collections::HashSet;

use crate::principal::Principal;
use crate::snapshot::ConfigurationSnapshot;

/// Fields of a ticket the filters look at.
pub trait TicketRecord {
    fn category(&self) -> Option<&str>;
    /// Whitespace-delimited flag names.
    fn flags(&self) -> Option<&str>;
}

/// A filterable ticket collection.
pub trait TicketQuery: Sized {
    /// Keep tickets whose category is exactly one of `categories`. Tickets without a
    /// category are dropped.
    fn filter_category_in(self, categories: &[String]) -> Self;

    /// Drop tickets whose flags field contains `flag`, ignoring case. Tickets without
    /// flags are kept.
    fn exclude_flag_icontains(self, flag: &str) -> Self;
}

impl<T: TicketRecord> TicketQuery for Vec<T> {
    fn filter_category_in(mut self, categories: &[String]) -> Self {
        let allowed: HashSet<&str> = categories.iter().map(String::as_str).collect();
        self.retain(|t| t.category().is_some_and(|c| allowed.contains(c)));
        self
    }

    fn exclude_flag_icontains(mut self, flag: &str) -> Self {
        let needle = flag.to_lowercase();
        self.retain(|t| !t.flags().is_some_and(|f| f.to_lowercase().contains(&needle)));
        self
    }
}

impl ConfigurationSnapshot {
    /// Flags that carry permissions `principal` does not satisfy, in flat-list order.
    pub fn restricted_flags<P: Principal + ?Sized>(&self, principal: &P) -> Vec<String> {
        self.flags
            .iter()
            .filter(|f| !f.permissions.is_empty() && !self.authorize_flag(principal, &f.name))
            .map(|f| f.name.clone())
            .collect()
    }

    /// Restrict `query` to tickets `principal` may see. Without any category or flag
    /// configuration the query is returned unchanged.
    pub fn filter_tickets<Q: TicketQuery, P: Principal + ?Sized>(&self, query: Q, principal: &P) -> Q {
        let mut query = query;
        if self.has_category_config() {
            query = query.filter_category_in(&self.accessible_categories(principal, true));
        }
        if self.has_flag_config() {
            for flag in self.restricted_flags(principal) {
                query = query.exclude_flag_icontains(&flag);
            }
        }
        query
    }
}

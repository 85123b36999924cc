//! Access evaluator.
//!
//! Rules, for categories and flags alike:
//! - an absent or anonymous principal is always denied;
//! - a name with no node in the snapshot is allowed (unconfigured and legacy names stay
//!   open);
//! - a node with an empty permission list is allowed;
//! - otherwise the principal needs at least one of the listed codes.
//!
//! Category permissions already include anything inherited from ancestors, so no parent
//! walk happens here.

use tracing::debug;

use crate::config::RightsConfig;
use crate::error::AccessDenied;
use crate::principal::Principal;
use crate::snapshot::ConfigurationSnapshot;

/// Flag names given either as one whitespace-delimited string or as a sequence.
pub trait FlagNames {
    /// Non-empty flag names in order.
    fn flag_names(&self) -> Vec<&str>;
}

impl FlagNames for str {
    fn flag_names(&self) -> Vec<&str> {
        self.split_whitespace().collect()
    }
}

impl FlagNames for String {
    fn flag_names(&self) -> Vec<&str> {
        self.as_str().flag_names()
    }
}

impl<S: AsRef<str>> FlagNames for [S] {
    fn flag_names(&self) -> Vec<&str> {
        self.iter().map(AsRef::as_ref).filter(|f| !f.is_empty()).collect()
    }
}

impl<S: AsRef<str>> FlagNames for Vec<S> {
    fn flag_names(&self) -> Vec<&str> {
        self.as_slice().flag_names()
    }
}

impl<S: AsRef<str>, const N: usize> FlagNames for [S; N] {
    fn flag_names(&self) -> Vec<&str> {
        self.as_slice().flag_names()
    }
}

impl<T: FlagNames + ?Sized> FlagNames for &T {
    fn flag_names(&self) -> Vec<&str> {
        (**self).flag_names()
    }
}

impl<T: FlagNames> FlagNames for Option<T> {
    fn flag_names(&self) -> Vec<&str> {
        self.as_ref().map(FlagNames::flag_names).unwrap_or_default()
    }
}

/// No flags at all.
pub const NO_FLAGS: Option<&str> = None;

/// Ticket operations guarded by module-level rights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TicketOperation {
    QueryTickets,
    CreateTickets,
    UpdateTickets,
    DeleteTickets,
    QueryComments,
    CreateComment,
    ResolveGrievance,
}

impl TicketOperation {
    pub fn name(&self) -> &'static str {
        match self {
            TicketOperation::QueryTickets => "query tickets",
            TicketOperation::CreateTickets => "create tickets",
            TicketOperation::UpdateTickets => "update tickets",
            TicketOperation::DeleteTickets => "delete tickets",
            TicketOperation::QueryComments => "query comments",
            TicketOperation::CreateComment => "create comment",
            TicketOperation::ResolveGrievance => "resolve grievance",
        }
    }
}

impl RightsConfig {
    /// Codes that grant `op`.
    pub fn codes(&self, op: TicketOperation) -> &[String] {
        match op {
            TicketOperation::QueryTickets => &self.query_tickets,
            TicketOperation::CreateTickets => &self.create_tickets,
            TicketOperation::UpdateTickets => &self.update_tickets,
            TicketOperation::DeleteTickets => &self.delete_tickets,
            TicketOperation::QueryComments => &self.query_comments,
            TicketOperation::CreateComment => &self.create_comment,
            TicketOperation::ResolveGrievance => &self.resolve_grievance,
        }
    }
}

impl ConfigurationSnapshot {
    /// May `principal` view, create or use the category at `path`?
    pub fn authorize_category<P: Principal + ?Sized>(&self, principal: &P, path: &str) -> bool {
        if principal.is_anonymous() {
            return false;
        }
        let Some(node) = self.categories.get(path) else {
            return true;
        };
        let ok = principal.has_any_permission(&node.permissions);
        if !ok {
            debug!(category = path, required = ?node.permissions, "category denied");
        }
        ok
    }

    /// May `principal` view or set the flag `name`?
    pub fn authorize_flag<P: Principal + ?Sized>(&self, principal: &P, name: &str) -> bool {
        if principal.is_anonymous() {
            return false;
        }
        let Some(node) = self.flags.get(name) else {
            return true;
        };
        let ok = principal.has_any_permission(&node.permissions);
        if !ok {
            debug!(flag = name, required = ?node.permissions, "flag denied");
        }
        ok
    }

    /// Check a ticket's category and flags. The first denied identifier is reported; an
    /// anonymous principal gets [`AccessDenied::Unauthenticated`] instead. An absent (or
    /// empty) category and an empty flag set are always permitted.
    pub fn authorize_ticket<P, F>(&self, principal: &P, category: Option<&str>, flags: &F) -> Result<(), AccessDenied>
    where
        P: Principal + ?Sized,
        F: FlagNames + ?Sized,
    {
        let category = category.filter(|c| !c.is_empty());
        let flags = flags.flag_names();
        if category.is_none() && flags.is_empty() {
            return Ok(());
        }
        if principal.is_anonymous() {
            return Err(AccessDenied::Unauthenticated);
        }
        if let Some(category) = category {
            if !self.authorize_category(principal, category) {
                return Err(AccessDenied::CategoryDenied(category.to_string()));
            }
        }
        for flag in flags {
            if !self.authorize_flag(principal, flag) {
                return Err(AccessDenied::FlagDenied(flag.to_string()));
            }
        }
        Ok(())
    }

    /// Does `principal` hold a module-level right for `op`? An empty code list admits any
    /// authenticated principal.
    pub fn has_right<P: Principal + ?Sized>(&self, principal: &P, op: TicketOperation) -> bool {
        !principal.is_anonymous() && principal.has_any_permission(self.rights.codes(op))
    }
}

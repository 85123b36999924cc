//! Ticket creation checks: default population and access gating.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::access::TicketOperation;
use crate::error::ValidationError;
use crate::filter::TicketRecord;
use crate::principal::Principal;
use crate::priority::Priority;
use crate::sla::ResolutionTime;
use crate::snapshot::ConfigurationSnapshot;

/// Ticket fields relevant to classification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub title: String,
    pub category: Option<String>,
    /// Whitespace-delimited flag names.
    pub flags: Option<String>,
    pub priority: Priority,
    /// `"{days},{hours}"`.
    pub resolution: String,
}

impl Ticket {
    /// Hours until the ticket is due, when `resolution` is well formed.
    pub fn due_in_hours(&self) -> Option<u32> {
        ResolutionTime::parse(&self.resolution).ok().map(|t| t.to_hours())
    }
}

impl TicketRecord for Ticket {
    fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    fn flags(&self) -> Option<&str> {
        self.flags.as_deref()
    }
}

/// What a caller submits for a new ticket. Unset fields are populated from configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketDraft {
    pub title: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub flags: Option<String>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub resolution: Option<String>,
}

impl TicketDraft {
    pub fn new(title: &str) -> Self {
        TicketDraft { title: title.to_string(), ..Default::default() }
    }

    pub fn category(mut self, category: &str) -> Self {
        self.category = Some(category.to_string());
        self
    }

    pub fn flags(mut self, flags: &str) -> Self {
        self.flags = Some(flags.to_string());
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn resolution(mut self, resolution: &str) -> Self {
        self.resolution = Some(resolution.to_string());
        self
    }
}

/// Gate and populate new tickets against a snapshot.
#[derive(Debug, Clone, Copy)]
pub struct TicketValidator<'a> {
    snapshot: &'a ConfigurationSnapshot,
    require_create_right: bool,
}

impl<'a> TicketValidator<'a> {
    pub fn new(snapshot: &'a ConfigurationSnapshot) -> Self {
        TicketValidator { snapshot, require_create_right: false }
    }

    /// Also demand the module-level create-tickets right.
    pub fn require_create_right(mut self, yes: bool) -> Self {
        self.require_create_right = yes;
        self
    }

    /// Validate `draft` for `principal` and fill in defaults.
    ///
    /// The caller's category and flags are checked; category default flags are applied
    /// afterwards only when the draft names no flags. Priority defaults to the effective
    /// priority of the category and final flags, resolution to the category's resolution
    /// time.
    pub fn prepare<P: Principal + ?Sized>(&self, principal: &P, draft: TicketDraft) -> Result<Ticket, ValidationError> {
        if principal.is_anonymous() {
            return Err(ValidationError::AuthenticationRequired);
        }
        if self.require_create_right && !self.snapshot.has_right(principal, TicketOperation::CreateTickets) {
            return Err(ValidationError::MissingRight(TicketOperation::CreateTickets.name()));
        }

        let category = draft.category.filter(|c| !c.is_empty());
        let flags = draft.flags.filter(|f| !f.trim().is_empty());
        self.snapshot
            .authorize_ticket(principal, category.as_deref(), &flags)
            .map_err(|denied| {
                debug!(error = %denied, "ticket rejected");
                ValidationError::from(denied)
            })?;

        let flags = flags.or_else(|| {
            let defaults = self.snapshot.category_defaults(category.as_deref()?).default_flags;
            (!defaults.is_empty()).then(|| defaults.join(" "))
        });
        let priority = draft
            .priority
            .unwrap_or_else(|| self.snapshot.effective_priority(category.as_deref(), &flags));
        let resolution = draft.resolution.filter(|r| !r.is_empty()).unwrap_or_else(|| match &category {
            Some(c) => self.snapshot.resolution_time_for(c).to_string(),
            None => self.snapshot.global_resolution_time().to_string(),
        });

        Ok(Ticket {
            title: draft.title,
            category,
            flags,
            priority,
            resolution,
        })
    }
}

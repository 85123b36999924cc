//! Grievance access - rights-based access control and configuration resolution for
//! grievance categories and flags.
//!
//! A raw configuration document ([`RawConfig`]) is resolved once into an immutable
//! [`ConfigurationSnapshot`]: the nested category tree is flattened into `|`-joined paths
//! with inheritance applied, flags are indexed, and resolution times are reconciled. All
//! checks and projections then run against the snapshot for a [`Principal`].
//!
//! ```
//! use grievance_access::*;
//!
//! let raw = RawConfig {
//!     grievance_types: vec![CategoryEntry::named("complaint")
//!         .priority("High")
//!         .permissions(&["127000"])
//!         .child("service")
//!         .into()],
//!     ..Default::default()
//! };
//! let snapshot = ConfigurationSnapshot::load(&raw);
//! let clerk = User::new("clerk", &["127000"]);
//!
//! assert!(snapshot.authorize_category(&clerk, "complaint|service"));
//! assert_eq!(snapshot.effective_priority(Some("complaint|service"), &NO_FLAGS), Priority::High);
//! ```

pub mod access;
pub mod config;
pub mod constants;
pub mod error;
pub mod filter;
pub mod normalize;
pub mod path;
pub mod principal;
pub mod priority;
pub mod sla;
pub mod snapshot;
pub mod store;
pub mod ticket;
pub mod views;

pub use access::{FlagNames, TicketOperation, NO_FLAGS};
pub use config::{CategoryEntry, CategoryInput, FlagEntry, FlagInput, PermissionCode, RawConfig, RightsConfig};
pub use error::{AccessDenied, ConfigError, Result, SlaError, ValidationError};
pub use filter::{TicketQuery, TicketRecord};
pub use normalize::{CategoryNode, CategoryTable, FlagNode, FlagTable};
pub use path::CategoryPath;
pub use principal::{Principal, User};
pub use priority::Priority;
pub use sla::ResolutionTime;
pub use snapshot::{ConfigurationSnapshot, SnapshotHandle};
pub use store::ConfigStore;
pub use ticket::{Ticket, TicketDraft, TicketValidator};
pub use views::{CategoryDefaults, CategoryTreeChild, CategoryTreeNode, FlagDetail};

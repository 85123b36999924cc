//! Error types for grievance access control

use thiserror::Error;

/// Denial raised when a principal may not use a category or flag.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessDenied {
    /// Absent or anonymous principal.
    #[error("authentication required")]
    Unauthenticated,

    #[error("user does not have permission to create ticket with category: {0}")]
    CategoryDenied(String),

    #[error("user does not have permission to use flag: {0}")]
    FlagDenied(String),
}

impl AccessDenied {
    /// The category path or flag name that caused the denial, if any.
    pub fn identifier(&self) -> Option<&str> {
        match self {
            AccessDenied::Unauthenticated => None,
            AccessDenied::CategoryDenied(id) | AccessDenied::FlagDenied(id) => Some(id),
        }
    }
}

/// Malformed `"{days},{hours}"` resolution time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SlaError {
    #[error("resolution time {0:?} should contain two integers separated by a comma")]
    MissingComma(String),

    #[error("resolution time {0:?} contains a part that is not a non-negative integer")]
    NotAnInteger(String),

    #[error("days must be in 0..99 and hours in 0..24, got {days} days and {hours} hours")]
    OutOfRange { days: u64, hours: u64 },
}

/// Failure loading or persisting a configuration document.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration document: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("configuration store: {0}")]
    Store(String),
}

/// Convert a storage-layer error into a `ConfigError`.
pub(crate) fn store_err<E: std::error::Error>(e: E) -> ConfigError {
    ConfigError::Store(e.to_string())
}

/// Presentation-layer failure of ticket validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("authentication required to create tickets")]
    AuthenticationRequired,

    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("missing required right for {0}")]
    MissingRight(&'static str),
}

impl From<AccessDenied> for ValidationError {
    fn from(denied: AccessDenied) -> Self {
        match denied {
            AccessDenied::Unauthenticated => ValidationError::AuthenticationRequired,
            other => ValidationError::PermissionDenied(other.to_string()),
        }
    }
}

/// Result type alias for configuration I/O
pub type Result<T> = std::result::Result<T, ConfigError>;

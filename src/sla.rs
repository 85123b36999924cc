//! Resolution-time (SLA) parsing and reconciliation.
//!
//! The stored format is `"{days},{hours}"` with days in `0..99` and hours in `0..24`. That
//! string is the persisted wire format and is carried through untouched; parsing only
//! validates it or yields a typed value for due-date arithmetic.

use std::collections::BTreeMap;
use std::fmt;
use std::num::IntErrorKind;
use std::str::FromStr;

use tracing::{info, warn};

use crate::constants::{MAX_RESOLUTION_DAYS, MAX_RESOLUTION_HOURS};
use crate::error::SlaError;
use crate::normalize::CategoryTable;

/// Parsed resolution time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResolutionTime {
    pub days: u8,
    pub hours: u8,
}

impl ResolutionTime {
    pub fn new(days: u8, hours: u8) -> Result<Self, SlaError> {
        check_range(days as u64, hours as u64)?;
        Ok(ResolutionTime { days, hours })
    }

    /// Parse and range-check a `"{days},{hours}"` string.
    pub fn parse(raw: &str) -> Result<Self, SlaError> {
        let (d, h) = raw.split_once(',').ok_or_else(|| SlaError::MissingComma(raw.to_string()))?;
        // Digits too large for u64 saturate so they fail the range check.
        let int = |part: &str| match part.trim().parse::<u64>() {
            Ok(n) => Ok(n),
            Err(e) if *e.kind() == IntErrorKind::PosOverflow => Ok(u64::MAX),
            Err(_) => Err(SlaError::NotAnInteger(raw.to_string())),
        };
        let (days, hours) = (int(d)?, int(h)?);
        check_range(days, hours)?;
        Ok(ResolutionTime { days: days as u8, hours: hours as u8 })
    }

    pub fn to_hours(&self) -> u32 {
        self.days as u32 * 24 + self.hours as u32
    }
}

fn check_range(days: u64, hours: u64) -> Result<(), SlaError> {
    if days < MAX_RESOLUTION_DAYS && hours < MAX_RESOLUTION_HOURS {
        Ok(())
    } else {
        Err(SlaError::OutOfRange { days, hours })
    }
}

impl FromStr for ResolutionTime {
    type Err = SlaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResolutionTime::parse(s)
    }
}

impl fmt::Display for ResolutionTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.days, self.hours)
    }
}

/// True when `raw` is a well-formed, in-range resolution time.
pub fn is_valid(raw: &str) -> bool {
    ResolutionTime::parse(raw).is_ok()
}

/// Fill empty legacy entries with the global default and warn about malformed ones.
/// Malformed non-empty values are left exactly as written.
pub fn validate_legacy(
    legacy: &BTreeMap<String, Option<String>>,
    global_default: &str,
) -> BTreeMap<String, String> {
    let mut out = BTreeMap::new();
    for (key, value) in legacy {
        let value = match value.as_deref() {
            None | Some("") => {
                warn!(category = %key, default = global_default, "no resolution time; using the global default");
                global_default.to_string()
            }
            Some(raw) => {
                match ResolutionTime::parse(raw) {
                    Ok(t) => info!(category = %key, days = t.days, hours = t.hours, "resolution time"),
                    Err(e) => warn!(category = %key, "invalid resolution time: {}", e),
                }
                raw.to_string()
            }
        };
        out.insert(key.clone(), value);
    }
    out
}

/// Warn about malformed category-level resolution times. Values are not modified.
pub fn validate_categories(categories: &CategoryTable) {
    for node in categories.iter() {
        if let Some(raw) = node.resolution_times.as_deref() {
            if let Err(e) = ResolutionTime::parse(raw) {
                warn!(category = %node.path, "invalid resolution time: {}", e);
            }
        }
    }
}

/// Build the unified category -> resolution time map: legacy entries first, then every
/// category that carries its own (or inherited) value on top. Category values win.
pub fn reconcile(
    legacy: &BTreeMap<String, Option<String>>,
    global_default: &str,
    categories: &CategoryTable,
) -> BTreeMap<String, String> {
    if let Err(e) = ResolutionTime::parse(global_default) {
        warn!("invalid global resolution time: {}", e);
    }
    validate_categories(categories);
    let mut unified = validate_legacy(legacy, global_default);
    for node in categories.iter() {
        if let Some(raw) = &node.resolution_times {
            unified.insert(node.path.joined(), raw.clone());
        }
    }
    unified
}

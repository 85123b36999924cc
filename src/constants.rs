//! Separators, defaults and stock right codes

/// Joins ancestor short names into a full category path.
pub const PATH_SEPARATOR: char = '|';

/// Catch-all category, flag and channel name of the stock configuration.
pub const DEFAULT_STRING: &str = "Default";

/// Global resolution time, `"{days},{hours}"`.
pub const DEFAULT_RESOLUTION_TIME: &str = "5,0";

// Resolution time bounds (exclusive)
pub const MAX_RESOLUTION_DAYS: u64 = 99;
pub const MAX_RESOLUTION_HOURS: u64 = 24;

// Stock right codes
pub const RIGHT_QUERY_TICKETS: &str = "127000";
pub const RIGHT_CREATE_TICKETS: &str = "127001";
pub const RIGHT_UPDATE_TICKETS: &str = "127002";
pub const RIGHT_DELETE_TICKETS: &str = "127003";
pub const RIGHT_QUERY_COMMENTS: &str = "127004";
pub const RIGHT_CREATE_COMMENT: &str = "127005";
pub const RIGHT_RESOLVE_GRIEVANCE: &str = "127006";

// Stock taxonomy
pub(crate) const STOCK_GRIEVANCE_TYPES: &[&str] = &[
    DEFAULT_STRING,
    "violence_vbg",
    "corruption",
    "accident_negligence",
    "discrimination_ethnie_religion",
    "erreur_exclusion",
    "erreur_inclusion",
    "maladie_mentale",
    "paiement",
    "telephone",
    "compte",
    "information",
];

pub(crate) const STOCK_GRIEVANCE_FLAGS: &[&str] = &[DEFAULT_STRING, "SENSITIVE", "SPECIAL"];

pub(crate) const STOCK_CHANNELS: &[&str] = &[
    DEFAULT_STRING,
    "telephone",
    "sms",
    "en_personne",
    "courrier_simple",
    "courrier_electronique",
    "ligne_verte",
    "boite_suggestion",
    "autre",
];

pub(crate) const STOCK_DEFAULT_RESOLUTION: &[(&str, &str)] = &[
    (DEFAULT_STRING, DEFAULT_RESOLUTION_TIME),
    ("violence_vbg", "2,0"),
    ("corruption", "3,0"),
    ("erreur_exclusion", "4,0"),
    ("erreur_inclusion", "4,0"),
    ("maladie_mentale", "3,0"),
    ("paiement", "5,0"),
    ("telephone", "5,0"),
    ("compte", "5,0"),
    ("information", "3,0"),
];

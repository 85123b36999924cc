//! Raw configuration document.
//!
//! Mirrors the module configuration as it is stored by the host application. Category and
//! flag lists are polymorphic: every entry is either a bare name or a structured node, and
//! category nodes nest recursively through `children`. Nothing here is resolved yet; see
//! [`crate::normalize`] for inheritance and [`crate::sla`] for resolution times.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::constants::*;
use crate::error::Result;

/// Read a list one element at a time. Elements that do not fit `T` are logged and skipped,
/// and `null` reads as an empty list.
fn lenient_list<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let items = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(items
        .into_iter()
        .filter_map(|item| match T::deserialize(&item) {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(entry = %item, "skipping malformed entry: {}", e);
                None
            }
        })
        .collect())
}

/// A permission code, written either as a string (`"127000"`) or a bare integer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PermissionCode {
    Text(String),
    Number(u64),
}

impl PermissionCode {
    pub fn into_code(self) -> String {
        match self {
            PermissionCode::Text(s) => s,
            PermissionCode::Number(n) => n.to_string(),
        }
    }
}

impl From<&str> for PermissionCode {
    fn from(s: &str) -> Self {
        PermissionCode::Text(s.to_string())
    }
}

/// One entry of `grievance_types`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CategoryInput {
    Name(String),
    Node(CategoryEntry),
}

/// Structured category entry. Every attribute is optional; missing ones are inherited.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<PermissionCode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_flags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution_times: Option<String>,
    #[serde(default, deserialize_with = "lenient_list", skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<CategoryInput>,
}

impl CategoryEntry {
    pub fn named(name: &str) -> Self {
        CategoryEntry { name: Some(name.to_string()), ..Default::default() }
    }

    pub fn priority(mut self, priority: &str) -> Self {
        self.priority = Some(priority.to_string());
        self
    }

    pub fn permissions(mut self, codes: &[&str]) -> Self {
        self.permissions = Some(codes.iter().map(|c| PermissionCode::from(*c)).collect());
        self
    }

    pub fn default_flags(mut self, flags: &[&str]) -> Self {
        self.default_flags = Some(flags.iter().map(|f| f.to_string()).collect());
        self
    }

    pub fn resolution_times(mut self, sla: &str) -> Self {
        self.resolution_times = Some(sla.to_string());
        self
    }

    pub fn child(mut self, child: impl Into<CategoryInput>) -> Self {
        self.children.push(child.into());
        self
    }
}

impl From<CategoryEntry> for CategoryInput {
    fn from(entry: CategoryEntry) -> Self {
        CategoryInput::Node(entry)
    }
}

impl From<&str> for CategoryInput {
    fn from(name: &str) -> Self {
        CategoryInput::Name(name.to_string())
    }
}

/// One entry of `grievance_flags`. Flags are flat; there are no children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlagInput {
    Name(String),
    Node(FlagEntry),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlagEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<PermissionCode>>,
}

impl FlagEntry {
    pub fn named(name: &str) -> Self {
        FlagEntry { name: Some(name.to_string()), ..Default::default() }
    }

    pub fn priority(mut self, priority: &str) -> Self {
        self.priority = Some(priority.to_string());
        self
    }

    pub fn permissions(mut self, codes: &[&str]) -> Self {
        self.permissions = Some(codes.iter().map(|c| PermissionCode::from(*c)).collect());
        self
    }
}

impl From<FlagEntry> for FlagInput {
    fn from(entry: FlagEntry) -> Self {
        FlagInput::Node(entry)
    }
}

impl From<&str> for FlagInput {
    fn from(name: &str) -> Self {
        FlagInput::Name(name.to_string())
    }
}

fn default_resolution_time() -> String {
    DEFAULT_RESOLUTION_TIME.to_string()
}

fn codes(list: &[&str]) -> Vec<String> {
    list.iter().map(|c| c.to_string()).collect()
}

fn default_query_tickets() -> Vec<String> { codes(&[RIGHT_QUERY_TICKETS]) }
fn default_create_tickets() -> Vec<String> { codes(&[RIGHT_CREATE_TICKETS]) }
fn default_update_tickets() -> Vec<String> { codes(&[RIGHT_UPDATE_TICKETS]) }
fn default_delete_tickets() -> Vec<String> { codes(&[RIGHT_DELETE_TICKETS]) }
fn default_query_comments() -> Vec<String> { codes(&[RIGHT_QUERY_COMMENTS]) }
fn default_create_comment() -> Vec<String> { codes(&[RIGHT_CREATE_COMMENT]) }
fn default_resolve_grievance() -> Vec<String> { codes(&[RIGHT_RESOLVE_GRIEVANCE]) }

/// Module-level rights, one list of permission codes per ticket operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RightsConfig {
    #[serde(rename = "gql_query_tickets_perms", default = "default_query_tickets")]
    pub query_tickets: Vec<String>,
    #[serde(rename = "gql_mutation_create_tickets_perms", default = "default_create_tickets")]
    pub create_tickets: Vec<String>,
    #[serde(rename = "gql_mutation_update_tickets_perms", default = "default_update_tickets")]
    pub update_tickets: Vec<String>,
    #[serde(rename = "gql_mutation_delete_tickets_perms", default = "default_delete_tickets")]
    pub delete_tickets: Vec<String>,
    #[serde(rename = "gql_query_comments_perms", default = "default_query_comments")]
    pub query_comments: Vec<String>,
    #[serde(rename = "gql_mutation_create_comment_perms", default = "default_create_comment")]
    pub create_comment: Vec<String>,
    #[serde(rename = "gql_mutation_resolve_grievance_perms", default = "default_resolve_grievance")]
    pub resolve_grievance: Vec<String>,
}

impl Default for RightsConfig {
    fn default() -> Self {
        RightsConfig {
            query_tickets: default_query_tickets(),
            create_tickets: default_create_tickets(),
            update_tickets: default_update_tickets(),
            delete_tickets: default_delete_tickets(),
            query_comments: default_query_comments(),
            create_comment: default_create_comment(),
            resolve_grievance: default_resolve_grievance(),
        }
    }
}

/// The whole configuration document. Missing keys deserialize to empty collections, the
/// global `"5,0"` resolution time and the stock right codes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawConfig {
    #[serde(default, deserialize_with = "lenient_list")]
    pub grievance_types: Vec<CategoryInput>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub grievance_flags: Vec<FlagInput>,
    #[serde(default)]
    pub grievance_channels: Vec<String>,
    /// Global resolution time used when a legacy entry is empty.
    #[serde(default = "default_resolution_time")]
    pub resolution_times: String,
    /// Legacy flat map, category name -> `"{days},{hours}"`. `null` and `""` mean "use the
    /// global default".
    #[serde(default)]
    pub default_resolution: BTreeMap<String, Option<String>>,
    #[serde(default)]
    pub default_responses: BTreeMap<String, Value>,
    #[serde(default)]
    pub grievance_anonymized_fields: BTreeMap<String, Value>,
    #[serde(default)]
    pub default_attending_staff_role_ids: BTreeMap<String, Vec<u64>>,
    #[serde(flatten)]
    pub rights: RightsConfig,
}

impl Default for RawConfig {
    fn default() -> Self {
        RawConfig {
            grievance_types: Vec::new(),
            grievance_flags: Vec::new(),
            grievance_channels: Vec::new(),
            resolution_times: default_resolution_time(),
            default_resolution: BTreeMap::new(),
            default_responses: BTreeMap::new(),
            grievance_anonymized_fields: BTreeMap::new(),
            default_attending_staff_role_ids: BTreeMap::new(),
            rights: RightsConfig::default(),
        }
    }
}

impl RawConfig {
    /// Configuration the module ships with when nothing has been stored.
    pub fn stock() -> Self {
        let mut cfg = RawConfig {
            grievance_types: STOCK_GRIEVANCE_TYPES.iter().map(|n| CategoryInput::from(*n)).collect(),
            grievance_flags: STOCK_GRIEVANCE_FLAGS.iter().map(|n| FlagInput::from(*n)).collect(),
            grievance_channels: STOCK_CHANNELS.iter().map(|c| c.to_string()).collect(),
            default_resolution: STOCK_DEFAULT_RESOLUTION
                .iter()
                .map(|(k, v)| (k.to_string(), Some(v.to_string())))
                .collect(),
            ..Default::default()
        };
        cfg.default_responses.insert(DEFAULT_STRING.into(), DEFAULT_STRING.into());
        cfg.grievance_anonymized_fields.insert(DEFAULT_STRING.into(), Value::Array(Vec::new()));
        cfg.default_attending_staff_role_ids.insert(DEFAULT_STRING.into(), vec![1, 2]);
        cfg
    }

    pub fn from_json(doc: &str) -> Result<Self> {
        Ok(serde_json::from_str(doc)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

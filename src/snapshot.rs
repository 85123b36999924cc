//! Configuration snapshots and their publication.
//!
//! A snapshot is built once from a [`RawConfig`] and never mutated. Reconfiguration builds a
//! fresh snapshot and publishes it with a single pointer swap, so readers observe either
//! the whole old configuration or the whole new one.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, RwLock};

use serde_json::Value;
use sha2::{Digest, Sha256};
use tracing::{info, warn};

use crate::config::{RawConfig, RightsConfig};
use crate::error::Result;
use crate::normalize::{normalize_categories, normalize_flags, CategoryTable, FlagTable};
use crate::sla;

/// Fully resolved configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigurationSnapshot {
    pub(crate) categories: CategoryTable,
    pub(crate) flags: FlagTable,
    pub(crate) unified_resolution_times: BTreeMap<String, String>,
    pub(crate) global_resolution_time: String,
    pub(crate) channels: Vec<String>,
    pub(crate) staff_role_ids: BTreeMap<String, Vec<u64>>,
    pub(crate) default_responses: BTreeMap<String, Value>,
    pub(crate) anonymized_fields: BTreeMap<String, Value>,
    pub(crate) rights: RightsConfig,
    fingerprint: String,
}

impl ConfigurationSnapshot {
    /// Resolve a raw document. Malformed entries are logged and skipped or defaulted; this
    /// never fails.
    pub fn load(raw: &RawConfig) -> Self {
        let categories = normalize_categories(&raw.grievance_types);
        let flags = normalize_flags(&raw.grievance_flags);

        warn_unknown_keys(&categories, "default_responses", raw.default_responses.keys());
        warn_unknown_keys(&categories, "grievance_anonymized_fields", raw.grievance_anonymized_fields.keys());
        warn_unknown_keys(&categories, "default_resolution", raw.default_resolution.keys());

        let unified_resolution_times = sla::reconcile(&raw.default_resolution, &raw.resolution_times, &categories);
        let fingerprint = fingerprint(raw);
        info!(
            categories = categories.len(),
            flags = flags.len(),
            resolution_times = unified_resolution_times.len(),
            fingerprint = %fingerprint,
            "grievance configuration loaded"
        );

        ConfigurationSnapshot {
            categories,
            flags,
            unified_resolution_times,
            global_resolution_time: raw.resolution_times.clone(),
            channels: raw.grievance_channels.clone(),
            staff_role_ids: raw.default_attending_staff_role_ids.clone(),
            default_responses: raw.default_responses.clone(),
            anonymized_fields: raw.grievance_anonymized_fields.clone(),
            rights: raw.rights.clone(),
            fingerprint,
        }
    }

    /// Parse and resolve a JSON configuration document.
    pub fn from_json(doc: &str) -> Result<Self> {
        Ok(Self::load(&RawConfig::from_json(doc)?))
    }

    /// Snapshot with no categories and no flags; every check is open.
    pub fn empty() -> Self {
        Self::load(&RawConfig::default())
    }

    pub fn categories(&self) -> &CategoryTable {
        &self.categories
    }

    pub fn flags(&self) -> &FlagTable {
        &self.flags
    }

    /// Category path -> `"{days},{hours}"`, category-specific values over legacy ones.
    pub fn unified_resolution_times(&self) -> &BTreeMap<String, String> {
        &self.unified_resolution_times
    }

    pub fn global_resolution_time(&self) -> &str {
        &self.global_resolution_time
    }

    /// Flat backward-compatible category list (`grievance_types` after normalization).
    pub fn grievance_types(&self) -> &[String] {
        self.categories.paths()
    }

    /// Flat flag list (`grievance_flags` after normalization).
    pub fn grievance_flags(&self) -> &[String] {
        self.flags.names()
    }

    pub fn channels(&self) -> &[String] {
        &self.channels
    }

    /// Category -> attending staff role ids.
    pub fn staff_role_ids(&self) -> &BTreeMap<String, Vec<u64>> {
        &self.staff_role_ids
    }

    pub fn default_responses(&self) -> &BTreeMap<String, Value> {
        &self.default_responses
    }

    pub fn anonymized_fields(&self) -> &BTreeMap<String, Value> {
        &self.anonymized_fields
    }

    pub fn rights(&self) -> &RightsConfig {
        &self.rights
    }

    /// Hex SHA-256 of the raw document this snapshot was built from.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// True when a category configuration is in effect.
    pub fn has_category_config(&self) -> bool {
        !self.categories.is_empty()
    }

    /// True when a flag configuration is in effect.
    pub fn has_flag_config(&self) -> bool {
        !self.flags.is_empty()
    }
}

impl Default for ConfigurationSnapshot {
    fn default() -> Self {
        Self::empty()
    }
}

fn fingerprint(raw: &RawConfig) -> String {
    let doc = serde_json::to_vec(raw).unwrap_or_else(|e| {
        warn!("cannot serialize configuration for fingerprinting: {}", e);
        Vec::new()
    });
    hex::encode(Sha256::digest(&doc))
}

fn warn_unknown_keys<'a>(categories: &CategoryTable, field: &str, keys: impl ExactSizeIterator<Item = &'a String>) {
    if keys.len() == 0 {
        return;
    }
    if categories.is_empty() {
        warn!("please specify grievance_types if you want to set up {}", field);
        return;
    }
    let mut reported = false;
    for key in keys {
        if !categories.contains(key) {
            warn!(key = %key, "{} key is not in grievance_types", field);
            reported = true;
        }
    }
    if reported {
        info!("available grievance types: {}", categories.paths().join(", "));
    }
}

/// Shared, atomically replaceable reference to the live snapshot.
#[derive(Debug)]
pub struct SnapshotHandle {
    live: RwLock<Arc<ConfigurationSnapshot>>,
    writer: Mutex<()>,
}

impl SnapshotHandle {
    pub fn new(snapshot: ConfigurationSnapshot) -> Self {
        SnapshotHandle {
            live: RwLock::new(Arc::new(snapshot)),
            writer: Mutex::new(()),
        }
    }

    /// The snapshot in effect right now. Holding the `Arc` pins it across a reload.
    pub fn current(&self) -> Arc<ConfigurationSnapshot> {
        self.live.read().unwrap_or_else(|p| p.into_inner()).clone()
    }

    /// Build a snapshot from `raw` and publish it. Reloads are serialized; the read lock is
    /// only contended for the swap itself.
    pub fn reload(&self, raw: &RawConfig) -> Arc<ConfigurationSnapshot> {
        let _writer = self.writer.lock().unwrap_or_else(|p| p.into_inner());
        let next = Arc::new(ConfigurationSnapshot::load(raw));
        if next.fingerprint() == self.current().fingerprint() {
            info!(fingerprint = %next.fingerprint(), "configuration unchanged; keeping live snapshot");
            return self.current();
        }
        self.swap(next.clone());
        next
    }

    /// Replace the live snapshot with an already built one.
    pub fn publish(&self, snapshot: Arc<ConfigurationSnapshot>) {
        let _writer = self.writer.lock().unwrap_or_else(|p| p.into_inner());
        self.swap(snapshot);
    }

    fn swap(&self, snapshot: Arc<ConfigurationSnapshot>) {
        *self.live.write().unwrap_or_else(|p| p.into_inner()) = snapshot;
    }
}

impl Default for SnapshotHandle {
    fn default() -> Self {
        Self::new(ConfigurationSnapshot::empty())
    }
}

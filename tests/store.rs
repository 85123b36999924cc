//! Persisted configuration document

use grievance_access::*;
use tempfile::TempDir;

fn open() -> (TempDir, ConfigStore) {
    let dir = TempDir::new().unwrap();
    let store = ConfigStore::open(dir.path().join("config.mdb")).unwrap();
    (dir, store)
}

#[test]
fn test_empty_store_falls_back_to_stock() {
    let (_dir, store) = open();
    assert!(store.load().unwrap().is_none());
    assert_eq!(store.load_or_default().unwrap(), RawConfig::stock());
    assert_eq!(store.snapshot().unwrap().grievance_types()[0], "Default");
}

#[test]
fn test_save_and_load() {
    let (_dir, store) = open();
    let raw = RawConfig {
        grievance_types: vec![CategoryEntry::named("complaint")
            .permissions(&["127000"])
            .child("service")
            .into()],
        grievance_flags: vec!["urgent".into()],
        resolution_times: "2,0".into(),
        ..Default::default()
    };
    store.save(&raw).unwrap();
    assert_eq!(store.load().unwrap(), Some(raw.clone()));

    let snapshot = store.snapshot().unwrap();
    assert_eq!(snapshot.grievance_types(), ["complaint", "complaint|service"].map(String::from));
    assert_eq!(snapshot.fingerprint(), ConfigurationSnapshot::load(&raw).fingerprint());
}

#[test]
fn test_save_replaces_previous_document() {
    let (_dir, store) = open();
    store.save(&RawConfig::stock()).unwrap();
    store.save(&RawConfig::default()).unwrap();
    assert_eq!(store.load().unwrap(), Some(RawConfig::default()));
}

#[test]
fn test_clear() {
    let (_dir, store) = open();
    store.save(&RawConfig::default()).unwrap();
    store.clear().unwrap();
    assert!(store.load().unwrap().is_none());
}

#[test]
fn test_clones_share_the_environment() {
    let (_dir, store) = open();
    let other = store.clone();
    store.save(&RawConfig::default()).unwrap();
    assert_eq!(other.load().unwrap(), Some(RawConfig::default()));
}

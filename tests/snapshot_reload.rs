//! Publishing new snapshots while readers are active

use std::sync::Arc;
use std::thread;

use grievance_access::*;

fn config(code: &str) -> RawConfig {
    RawConfig {
        grievance_types: vec![
            CategoryEntry::named("complaint").permissions(&[code]).child("service").into(),
            CategoryEntry::named("feedback").permissions(&[code]).into(),
        ],
        grievance_flags: vec![FlagEntry::named("sensitive").permissions(&[code]).into()],
        ..Default::default()
    }
}

#[test]
fn test_reload_swaps_snapshot() {
    let handle = SnapshotHandle::new(ConfigurationSnapshot::load(&config("1")));
    let user = User::new("u", &["1"]);
    let before = handle.current();
    assert!(before.authorize_category(&user, "complaint"));

    handle.reload(&config("2"));
    assert!(!handle.current().authorize_category(&user, "complaint"));
    // a pinned snapshot is unaffected by the reload
    assert!(before.authorize_category(&user, "complaint"));
}

#[test]
fn test_unchanged_reload_keeps_live_snapshot() {
    let handle = SnapshotHandle::new(ConfigurationSnapshot::load(&config("1")));
    let before = handle.current();
    let after = handle.reload(&config("1"));
    assert!(Arc::ptr_eq(&before, &after));
}

#[test]
fn test_publish() {
    let handle = SnapshotHandle::default();
    assert!(!handle.current().has_category_config());
    handle.publish(Arc::new(ConfigurationSnapshot::load(&config("1"))));
    assert!(handle.current().has_category_config());
}

#[test]
fn test_readers_never_observe_a_mixed_configuration() {
    let handle = Arc::new(SnapshotHandle::new(ConfigurationSnapshot::load(&config("1"))));
    let one = User::new("one", &["1"]);

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let handle = handle.clone();
            let user = one.clone();
            thread::spawn(move || {
                for _ in 0..500 {
                    let s = handle.current();
                    let complaint = s.authorize_category(&user, "complaint");
                    assert_eq!(s.authorize_category(&user, "complaint|service"), complaint);
                    assert_eq!(s.authorize_category(&user, "feedback"), complaint);
                    assert_eq!(s.authorize_flag(&user, "sensitive"), complaint);
                }
            })
        })
        .collect();

    for i in 0..50 {
        handle.reload(&config(if i % 2 == 0 { "2" } else { "1" }));
    }
    for r in readers {
        r.join().unwrap();
    }
}

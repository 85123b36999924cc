//! New-ticket gating and default population

use grievance_access::*;

fn snapshot() -> ConfigurationSnapshot {
    let raw = RawConfig {
        grievance_types: vec![
            "simple_category".into(),
            CategoryEntry::named("complaint")
                .priority("High")
                .permissions(&["127000", "127001"])
                .default_flags(&["urgent"])
                .resolution_times("2,12")
                .into(),
            CategoryEntry::named("restricted_category")
                .priority("Critical")
                .permissions(&["127002", "127003"])
                .default_flags(&["sensitive"])
                .into(),
            CategoryEntry::named("protected_defaults")
                .default_flags(&["sensitive"])
                .into(),
        ],
        grievance_flags: vec![
            FlagEntry::named("urgent").priority("High").into(),
            FlagEntry::named("sensitive").priority("Critical").permissions(&["127004", "127005"]).into(),
            "public".into(),
        ],
        resolution_times: "4,0".to_string(),
        ..Default::default()
    };
    ConfigurationSnapshot::load(&raw)
}

#[test]
fn test_category_defaults_are_applied() {
    let s = snapshot();
    let user = User::new("clerk", &["127000", "127001"]);
    let ticket = TicketValidator::new(&s)
        .prepare(&user, TicketDraft::new("broken pump").category("complaint"))
        .unwrap();
    assert_eq!(ticket.category.as_deref(), Some("complaint"));
    assert_eq!(ticket.flags.as_deref(), Some("urgent"));
    assert_eq!(ticket.priority, Priority::High);
    assert_eq!(ticket.resolution, "2,12");
    assert_eq!(ticket.due_in_hours(), Some(60));
}

#[test]
fn test_explicit_values_win() {
    let s = snapshot();
    let user = User::new("clerk", &["127000"]);
    let draft = TicketDraft::new("t")
        .category("complaint")
        .flags("public")
        .priority(Priority::Low)
        .resolution("1,0");
    let ticket = TicketValidator::new(&s).prepare(&user, draft).unwrap();
    assert_eq!(ticket.flags.as_deref(), Some("public"));
    assert_eq!(ticket.priority, Priority::Low);
    assert_eq!(ticket.resolution, "1,0");
}

#[test]
fn test_priority_from_flags() {
    let s = snapshot();
    let user = User::superuser("admin");
    let ticket = TicketValidator::new(&s)
        .prepare(&user, TicketDraft::new("t").category("simple_category").flags("sensitive"))
        .unwrap();
    assert_eq!(ticket.priority, Priority::Critical);
    assert_eq!(ticket.resolution, "4,0");
}

#[test]
fn test_uncategorized_ticket() {
    let s = snapshot();
    let ticket = TicketValidator::new(&s)
        .prepare(&User::new("u", &[]), TicketDraft::new("t"))
        .unwrap();
    assert_eq!(ticket.category, None);
    assert_eq!(ticket.flags, None);
    assert_eq!(ticket.priority, Priority::Medium);
    assert_eq!(ticket.resolution, "4,0");
}

#[test]
fn test_anonymous_rejected() {
    let s = snapshot();
    let err = TicketValidator::new(&s)
        .prepare(&User::anonymous(), TicketDraft::new("t").category("simple_category"))
        .unwrap_err();
    assert_eq!(err, ValidationError::AuthenticationRequired);

    let absent: Option<User> = None;
    let err = TicketValidator::new(&s).prepare(&absent, TicketDraft::new("t")).unwrap_err();
    assert_eq!(err, ValidationError::AuthenticationRequired);
}

#[test]
fn test_denied_category() {
    let s = snapshot();
    let user = User::new("clerk", &["127000"]);
    let err = TicketValidator::new(&s)
        .prepare(&user, TicketDraft::new("t").category("restricted_category"))
        .unwrap_err();
    match err {
        ValidationError::PermissionDenied(msg) => assert!(msg.contains("restricted_category")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_denied_flag() {
    let s = snapshot();
    let user = User::new("clerk", &["127000"]);
    let err = TicketValidator::new(&s)
        .prepare(&user, TicketDraft::new("t").flags("public sensitive"))
        .unwrap_err();
    assert_eq!(
        err,
        ValidationError::PermissionDenied("user does not have permission to use flag: sensitive".into())
    );
}

#[test]
fn test_default_flags_are_not_gated() {
    let s = snapshot();
    let user = User::new("clerk", &[]);
    let ticket = TicketValidator::new(&s)
        .prepare(&user, TicketDraft::new("t").category("protected_defaults"))
        .unwrap();
    assert_eq!(ticket.flags.as_deref(), Some("sensitive"));
    assert_eq!(ticket.priority, Priority::Critical);
}

#[test]
fn test_create_right_required_when_enabled() {
    let s = snapshot();
    let viewer = User::new("viewer", &["127000"]);
    let validator = TicketValidator::new(&s).require_create_right(true);
    let err = validator.prepare(&viewer, TicketDraft::new("t")).unwrap_err();
    assert_eq!(err, ValidationError::MissingRight("create tickets"));

    let creator = User::new("creator", &["127001"]);
    assert!(validator.prepare(&creator, TicketDraft::new("t")).is_ok());
}

#[test]
fn test_validation_error_from_denial() {
    assert_eq!(ValidationError::from(AccessDenied::Unauthenticated), ValidationError::AuthenticationRequired);
    assert_eq!(
        ValidationError::from(AccessDenied::CategoryDenied("x".into())).to_string(),
        "permission denied: user does not have permission to create ticket with category: x"
    );
}

//! Restricting ticket collections to what a principal may see

use grievance_access::*;

fn snapshot() -> ConfigurationSnapshot {
    ConfigurationSnapshot::from_json(
        r#"{
            "grievance_types": [
                "public_category",
                {"name": "restricted_category", "permissions": ["127002", "127003"]},
                {"name": "sensitive_category", "permissions": [127006], "default_flags": ["sensitive"]}
            ],
            "grievance_flags": [
                "urgent",
                {"name": "sensitive", "permissions": ["127004", "127005"]},
                {"name": "confidential", "permissions": ["127006"]}
            ]
        }"#,
    )
    .unwrap()
}

fn ticket(title: &str, category: Option<&str>, flags: Option<&str>) -> Ticket {
    Ticket {
        title: title.to_string(),
        category: category.map(String::from),
        flags: flags.map(String::from),
        priority: Priority::Medium,
        resolution: "5,0".to_string(),
    }
}

fn tickets() -> Vec<Ticket> {
    vec![
        ticket("public", Some("public_category"), Some("urgent")),
        ticket("restricted", Some("restricted_category"), Some("urgent")),
        ticket("sensitive", Some("sensitive_category"), Some("sensitive")),
        ticket("confidential", Some("public_category"), Some("confidential")),
    ]
}

fn titles(tickets: &[Ticket]) -> Vec<&str> {
    tickets.iter().map(|t| t.title.as_str()).collect()
}

#[test]
fn test_all_permissions_see_everything() {
    let s = snapshot();
    let visible = s.filter_tickets(tickets(), &User::superuser("admin"));
    assert_eq!(titles(&visible), ["public", "restricted", "sensitive", "confidential"]);
}

#[test]
fn test_limited_permissions() {
    let s = snapshot();
    let user = User::new("limited", &["127000", "127001"]);
    let visible = s.filter_tickets(tickets(), &user);
    assert_eq!(titles(&visible), ["public"]);
}

#[test]
fn test_mixed_permissions() {
    let s = snapshot();
    let user = User::new("mixed", &["127000", "127004"]);
    assert_eq!(s.restricted_flags(&user), vec!["confidential".to_string()]);

    let mut all = tickets();
    all.push(ticket("mixed flags", Some("public_category"), Some("urgent sensitive")));
    all.push(ticket("mixed confidential", Some("public_category"), Some("urgent confidential")));
    let visible = s.filter_tickets(all, &user);
    assert_eq!(titles(&visible), ["public", "mixed flags"]);
}

#[test]
fn test_no_configuration_returns_everything() {
    let s = ConfigurationSnapshot::empty();
    let user = User::new("limited", &["127000"]);
    let visible = s.filter_tickets(tickets(), &user);
    assert_eq!(visible.len(), 4);
}

#[test]
fn test_flags_only_configuration_skips_category_filter() {
    let s = ConfigurationSnapshot::from_json(
        r#"{"grievance_flags": [{"name": "confidential", "permissions": ["127006"]}]}"#,
    )
    .unwrap();
    let user = User::new("u", &[]);
    let mut all = tickets();
    all.push(ticket("uncategorized", None, None));
    let visible = s.filter_tickets(all, &user);
    assert_eq!(titles(&visible), ["public", "restricted", "sensitive", "uncategorized"]);
}

#[test]
fn test_uncategorized_tickets_are_dropped_under_category_config() {
    let s = snapshot();
    let all = vec![ticket("none", None, None), ticket("public", Some("public_category"), None)];
    let visible = s.filter_tickets(all, &User::superuser("admin"));
    assert_eq!(titles(&visible), ["public"]);
}

#[test]
fn test_flag_exclusion_is_case_insensitive_substring() {
    let all = vec![
        ticket("upper", Some("x"), Some("URGENT")),
        ticket("longer", Some("x"), Some("nonurgent")),
        ticket("other", Some("x"), Some("public")),
        ticket("none", Some("x"), None),
    ];
    let visible = all.exclude_flag_icontains("urgent");
    assert_eq!(titles(&visible), ["other", "none"]);
}

#[test]
fn test_category_filter_is_exact() {
    let all = vec![
        ticket("parent", Some("a"), None),
        ticket("child", Some("a|b"), None),
        ticket("none", None, None),
    ];
    let visible = all.filter_category_in(&["a|b".to_string()]);
    assert_eq!(titles(&visible), ["child"]);
}

#[test]
fn test_anonymous_sees_nothing_under_category_config() {
    let s = snapshot();
    let visible = s.filter_tickets(tickets(), &User::anonymous());
    assert!(visible.is_empty());
}

use roster_directory::{DisplayName, HostClassifier, UserId};

/// Test default external prefixes
#[test]
fn test_external_hosts() {
    let classifier = HostClassifier::default();
    assert!(classifier.is_external_host("agent.externe.tchap.gouv.fr"));
    assert!(classifier.is_external_host("e.tchap.gouv.fr"));
    assert!(!classifier.is_external_host("agent.tchap.gouv.fr"));
    assert!(!classifier.is_external_host("x.org"));
}

/// Test custom prefixes and raw ids
#[test]
fn test_external_users() {
    let classifier = HostClassifier::new(["ext."]);
    let internal: UserId = "@alice:x.org".parse().unwrap();
    let external: UserId = "@carol:ext.x.org".parse().unwrap();
    assert!(!classifier.is_external_user(&internal));
    assert!(classifier.is_external_user(&external));
    // Unparseable ids are considered external.
    assert!(classifier.is_external_raw("not-a-user-id"));
    assert!(!classifier.is_external_raw("@alice:x.org"));
}

/// Test federation relative to the own host
#[test]
fn test_federation() {
    let classifier = HostClassifier::default();
    let alice: UserId = "@alice:x.org".parse().unwrap();
    assert!(!classifier.is_federated(&alice, "x.org"));
    assert!(classifier.is_federated(&alice, "y.org"));
}

#[test]
fn test_display_name_with_domain() {
    let name = DisplayName::parse("Jean-Martin [Modernisation]");
    assert_eq!(name.name, "Jean-Martin");
    assert_eq!(name.domain.as_deref(), Some("Modernisation"));

    let name = DisplayName::parse("Jean Martin");
    assert_eq!(name.name, "Jean Martin");
    assert_eq!(name.domain, None);
}

#[test]
fn test_display_name_from_user_id() {
    let cases = [
        ("@jean.martin-modernisation.fr:matrix.org", "Jean Martin"),
        ("@jean-philippe.martin-modernisation.fr:matrix.org", "Jean-Philippe Martin"),
        (
            "@jean.martin.de-la-rampe-modernisation.gouv.fr:a.tchap.gouv.fr",
            "Jean Martin De-La-Rampe",
        ),
        ("@jean.martin-dev-durable.gouv.fr:a.tchap.gouv.fr", "Jean Martin-Dev"),
        ("@alice:x.org", "Alice"),
    ];
    for (raw, expected) in cases {
        let user_id: UserId = raw.parse().unwrap();
        let name = DisplayName::from_user_id(&user_id);
        assert_eq!(name.name, expected, "for {raw}");
        assert_eq!(name.domain, None);
    }
}

use std::collections::BTreeSet;

use roster::models::{Contact, ContactId, RoomSummary};
use roster_directory::{DirectoryUser, UserId};

fn user_id(raw: &str) -> UserId {
    raw.parse().unwrap()
}

#[test]
fn test_identifier_prefers_matrix_id() {
    let mut contact = Contact::local("Alice", ["alice@x.org"], ["+33600000000"]);
    assert_eq!(
        contact.identifier(),
        Some(ContactId::Email("alice@x.org".into()))
    );
    contact.matrix_id = Some(user_id("@alice:x.org"));
    assert_eq!(
        contact.identifier(),
        Some(ContactId::Matrix(user_id("@alice:x.org")))
    );

    let phone_only = Contact::local("Bob", Vec::<String>::new(), ["+33611111111"]);
    assert_eq!(
        phone_only.identifier(),
        Some(ContactId::Phone("+33611111111".into()))
    );

    let nothing = Contact::local("Nobody", Vec::<String>::new(), Vec::<String>::new());
    assert_eq!(nothing.identifier(), None);
}

#[test]
fn test_email_identifier_is_lowercased() {
    let contact = Contact::from_email("Alice@X.org");
    assert_eq!(
        contact.identifier(),
        Some(ContactId::Email("alice@x.org".into()))
    );
    assert_eq!(contact.display_name, "Alice@X.org");
    assert!(!contact.is_local);
}

#[test]
fn test_split_by_email() {
    let contact = Contact::local(
        "Alice",
        ["alice@x.org", "alice@home.org"],
        ["+33600000000"],
    );
    let rows = contact.split_by_email();
    assert_eq!(rows.len(), 2);
    for row in &rows {
        assert_eq!(row.emails.len(), 1);
        assert_eq!(row.display_name, "Alice");
        assert!(row.phone_numbers.contains("+33600000000"));
    }
    let ids: BTreeSet<_> = rows.iter().filter_map(Contact::identifier).collect();
    assert_eq!(ids.len(), 2);

    let single = Contact::local("Bob", ["bob@y.org"], Vec::<String>::new());
    assert_eq!(single.clone().split_by_email(), vec![single]);
}

#[test]
fn test_matrix_user_name_fallback() {
    let contact = Contact::matrix_user(user_id("@jean.martin-modernisation.fr:x.org"), None);
    assert_eq!(contact.display_name, "Jean Martin");
    let contact = Contact::matrix_user(user_id("@alice:x.org"), Some(String::new()));
    assert_eq!(contact.display_name, "Alice");
    let contact = Contact::matrix_user(user_id("@alice:x.org"), Some("Alice L.".into()));
    assert_eq!(contact.display_name, "Alice L.");
}

#[test]
fn test_from_directory_user() {
    let contact = Contact::from_directory_user(DirectoryUser {
        user_id: user_id("@bob:y.org"),
        display_name: Some("Bob [Finances]".into()),
        emails: vec!["bob@y.org".into()],
    });
    assert_eq!(contact.matrix_id, Some(user_id("@bob:y.org")));
    assert!(contact.emails.contains("bob@y.org"));
    assert!(!contact.is_local);
    let name = contact.name_components();
    assert_eq!(name.name, "Bob");
    assert_eq!(name.domain.as_deref(), Some("Finances"));
}

#[test]
fn test_contact_id_parse() {
    assert_eq!(
        ContactId::parse("@alice:x.org"),
        ContactId::Matrix(user_id("@alice:x.org"))
    );
    assert_eq!(
        ContactId::parse("Alice@X.org"),
        ContactId::Email("alice@x.org".into())
    );
    assert_eq!(
        ContactId::parse("+33600000000"),
        ContactId::Phone("+33600000000".into())
    );
    assert_eq!(ContactId::parse("@alice:x.org").to_string(), "@alice:x.org");
}

#[test]
fn test_contact_from_json() {
    let contact: Contact = serde_json::from_str(
        r#"{"display_name": "Alice", "matrix_id": "@alice:x.org", "emails": ["alice@x.org"], "is_local": true}"#,
    )
    .unwrap();
    assert_eq!(contact.matrix_id, Some(user_id("@alice:x.org")));
    assert!(contact.phone_numbers.is_empty());
    assert!(contact.is_local);

    let invalid = serde_json::from_str::<Contact>(
        r#"{"display_name": "Alice", "matrix_id": "alice"}"#,
    );
    assert!(invalid.is_err());
}

#[test]
fn test_room_summary_flags() {
    let room = RoomSummary {
        room_id: "!a:x.org".into(),
        display_name: "A".into(),
        is_invite: false,
        notification_count: 2,
        highlight_count: 0,
    };
    assert!(room.has_unread());
    assert!(!room.has_highlight());
}

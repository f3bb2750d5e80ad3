use std::io::Write;

use roster::Config;
use roster::contact::FilterVariant;

#[test]
fn test_defaults() {
    let config = Config::default();
    assert!(!config.contacts.show_invite_button);
    assert!(!config.contacts.show_add_email_button);
    assert_eq!(config.contacts.filter, FilterVariant::All);
    assert_eq!(config.directory.search_limit, 50);
    assert_eq!(
        config.directory.external_host_prefixes,
        vec!["agent.externe.".to_string(), "e.".to_string()]
    );
    assert_eq!(config.rooms.banner_header_height, 0.0);
}

#[test]
fn test_partial_json_keeps_defaults() {
    let config = Config::from_json(
        r#"{
            "contacts": { "show_invite_button": true, "filter": "MatrixUsersOnly" },
            "directory": { "search_limit": 20 }
        }"#,
    )
    .unwrap();
    assert!(config.contacts.show_invite_button);
    assert_eq!(config.contacts.filter, FilterVariant::MatrixUsersOnly);
    assert_eq!(config.contacts.local_title, "Contacts");
    assert_eq!(config.directory.search_limit, 20);
    assert_eq!(config.rooms, Config::default().rooms);

    assert_eq!(Config::from_json("{}").unwrap(), Config::default());
}

#[test]
fn test_invalid_config() {
    let err = Config::from_json(r#"{ "directory": { "search_limit": 0 } }"#).unwrap_err();
    assert!(err.to_string().contains("search_limit"));
    assert!(Config::from_json("not json").is_err());
    assert!(Config::from_json(r#"{ "contacts": { "filter": "Nope" } }"#).is_err());
}

#[test]
fn test_load_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{ "directory": {{ "external_host_prefixes": ["guest."] }} }}"#
    )
    .unwrap();
    let config = Config::load(file.path()).unwrap();
    let classifier = config.directory.host_classifier();
    assert!(classifier.is_external_host("guest.x.org"));
    assert!(!classifier.is_external_host("e.x.org"));
}

#[test]
fn test_load_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = Config::load(&dir.path().join("missing.json")).unwrap_err();
    assert!(err.to_string().contains("Failed to read config"));
}

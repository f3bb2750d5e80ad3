use std::str::FromStr as _;

use roster_directory::{UserId, UserIdError};

/// Test parsing a well formed user id
#[test]
fn test_user_id_parse() {
    let user_id = UserId::from_str("@alice:x.org").unwrap();
    assert_eq!(user_id.localpart(), "alice");
    assert_eq!(user_id.host(), "x.org");
}

/// Test that Display gives back the original string
#[test]
fn test_user_id_display_roundtrip() {
    let raw = "@jean.martin-modernisation.fr:a.tchap.gouv.fr";
    let user_id = UserId::from_str(raw).unwrap();
    assert_eq!(user_id.to_string(), raw);
    assert_eq!(format!("{user_id:?}"), raw);
}

/// Test the parse failures
#[test]
fn test_user_id_invalid() {
    assert_eq!(UserId::from_str("alice:x.org"), Err(UserIdError::MissingPrefix));
    assert_eq!(UserId::from_str("@alice"), Err(UserIdError::MissingHost));
    assert_eq!(UserId::from_str("@:x.org"), Err(UserIdError::EmptyLocalpart));
    assert_eq!(UserId::from_str("@alice:"), Err(UserIdError::EmptyHost));
    assert_eq!(
        UserId::from_str("@alice:x.org:8448"),
        Err(UserIdError::TooManySeparators)
    );
    assert!(!UserId::is_user_id("alice@x.org"));
    assert!(UserId::is_user_id("@alice:x.org"));
}

/// Test conversions through the string form
#[test]
fn test_user_id_string_conversion() {
    let user_id = UserId::new("bob", "y.org").unwrap();
    assert_eq!(String::from(user_id.clone()), "@bob:y.org");
    let back: UserId = String::from("@bob:y.org").try_into().unwrap();
    assert_eq!(back, user_id);
}

/// Test ordering and equality are by value
#[test]
fn test_user_id_equality() {
    let a1 = UserId::from_str("@a:x.org").unwrap();
    let a2 = UserId::new("a", "x.org").unwrap();
    let b = UserId::from_str("@b:x.org").unwrap();
    assert_eq!(a1, a2);
    assert!(a1 < b);
}

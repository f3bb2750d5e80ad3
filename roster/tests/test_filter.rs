use roster::contact::{Exclusion, FilterPolicy, FilterVariant};
use roster::models::Contact;
use roster_directory::{HostClassifier, UserId};

fn policy() -> FilterPolicy {
    FilterPolicy::new("@me:x.org".parse().unwrap(), HostClassifier::default())
}

fn matrix(raw: &str, is_local: bool) -> Contact {
    let mut contact = Contact::matrix_user(raw.parse::<UserId>().unwrap(), None);
    contact.is_local = is_local;
    contact
}

/// Each column: local non-user, local user on own host, directory user on own
/// host, federated user, external user.
#[test]
fn test_filter_table() {
    let policy = policy();
    let contacts = [
        Contact::local("Bob", ["bob@y.org"], Vec::<String>::new()),
        matrix("@erin:x.org", true),
        matrix("@alice:x.org", false),
        matrix("@carol:y.org", false),
        matrix("@dave:agent.externe.x.org", false),
    ];
    let table = [
        (FilterVariant::All, [true, true, true, true, true]),
        (
            FilterVariant::AllWithoutExternals,
            [true, true, true, true, false],
        ),
        (
            FilterVariant::AllWithoutFederation,
            [true, true, true, false, false],
        ),
        (
            FilterVariant::MatrixUsersOnly,
            [false, true, true, true, true],
        ),
        (
            FilterVariant::MatrixUsersOnlyWithoutExternals,
            [false, true, true, true, false],
        ),
        (
            FilterVariant::MatrixUsersOnlyWithoutFederation,
            [false, true, true, false, false],
        ),
        (
            FilterVariant::AllWithoutMatrixUsers,
            [true, false, false, false, false],
        ),
    ];
    assert_eq!(table.len(), FilterVariant::ALL.len());
    for (variant, expected) in table {
        for (contact, expected) in contacts.iter().zip(expected) {
            assert_eq!(
                policy.allows(variant, contact),
                expected,
                "{variant:?} on {}",
                contact.display_name
            );
        }
    }
}

#[test]
fn test_non_users_have_no_host() {
    let policy = policy();
    let bob = Contact::local("Bob", ["bob@e.y.org"], Vec::<String>::new());
    assert!(!policy.is_external(&bob));
    assert!(!policy.is_federated(&bob));
    assert!(policy.excludes(Exclusion::NonMatrixUsers, &bob));
    assert!(!policy.excludes(Exclusion::MatrixUsers, &bob));
}

#[test]
fn test_directory_search_availability() {
    for variant in FilterVariant::ALL {
        assert_eq!(
            variant.searches_directory(),
            variant != FilterVariant::AllWithoutMatrixUsers
        );
    }
    assert!(!policy().is_own_user_external());
    let external = FilterPolicy::new(
        "@me:e.x.org".parse().unwrap(),
        HostClassifier::default(),
    );
    assert!(external.is_own_user_external());
}

#[test]
fn test_filter_variant_from_json() {
    let variant: FilterVariant = serde_json::from_str("\"MatrixUsersOnlyWithoutFederation\"").unwrap();
    assert_eq!(variant, FilterVariant::MatrixUsersOnlyWithoutFederation);
    assert_eq!(FilterVariant::default(), FilterVariant::All);
}

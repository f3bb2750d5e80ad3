use roster_directory::{HostClassifier, UserId};
use serde::{Deserialize, Serialize};

use crate::models::Contact;

/// Which contacts the list displays. Switching variants only changes the
/// visible subset, never the underlying data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterVariant {
    #[default]
    All,
    AllWithoutExternals,
    AllWithoutFederation,
    MatrixUsersOnly,
    MatrixUsersOnlyWithoutExternals,
    MatrixUsersOnlyWithoutFederation,
    AllWithoutMatrixUsers,
}

impl FilterVariant {
    pub const ALL: [FilterVariant; 7] = [
        Self::All,
        Self::AllWithoutExternals,
        Self::AllWithoutFederation,
        Self::MatrixUsersOnly,
        Self::MatrixUsersOnlyWithoutExternals,
        Self::MatrixUsersOnlyWithoutFederation,
        Self::AllWithoutMatrixUsers,
    ];

    pub fn exclusions(self) -> &'static [Exclusion] {
        use Exclusion::*;
        match self {
            Self::All => &[],
            Self::AllWithoutExternals => &[Externals],
            Self::AllWithoutFederation => &[Federated],
            Self::MatrixUsersOnly => &[NonMatrixUsers],
            Self::MatrixUsersOnlyWithoutExternals => &[NonMatrixUsers, Externals],
            Self::MatrixUsersOnlyWithoutFederation => &[NonMatrixUsers, Federated],
            Self::AllWithoutMatrixUsers => &[MatrixUsers],
        }
    }

    /// Whether the user directory can contribute anything under this variant.
    pub fn searches_directory(self) -> bool {
        !self.exclusions().contains(&Exclusion::MatrixUsers)
    }
}

/// A single exclusion rule. Variants are conjunctions of these.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Exclusion {
    Externals,
    Federated,
    NonMatrixUsers,
    MatrixUsers,
}

/// Classifies contacts relative to the current user's home server.
///
/// Contacts without a user id have no host: they are never external nor
/// federated, only the matrix-user rules apply to them.
#[derive(Clone, Debug)]
pub struct FilterPolicy {
    own_user_id: UserId,
    classifier: HostClassifier,
}

impl FilterPolicy {
    pub fn new(own_user_id: UserId, classifier: HostClassifier) -> Self {
        Self {
            own_user_id,
            classifier,
        }
    }

    pub fn own_user_id(&self) -> &UserId {
        &self.own_user_id
    }

    pub fn own_host(&self) -> &str {
        self.own_user_id.host()
    }

    pub fn is_own_user_external(&self) -> bool {
        self.classifier.is_external_user(&self.own_user_id)
    }

    pub fn is_external(&self, contact: &Contact) -> bool {
        contact
            .matrix_id
            .as_ref()
            .is_some_and(|user_id| self.classifier.is_external_user(user_id))
    }

    pub fn is_federated(&self, contact: &Contact) -> bool {
        contact
            .matrix_id
            .as_ref()
            .is_some_and(|user_id| self.classifier.is_federated(user_id, self.own_host()))
    }

    pub fn excludes(&self, exclusion: Exclusion, contact: &Contact) -> bool {
        match exclusion {
            Exclusion::Externals => self.is_external(contact),
            Exclusion::Federated => self.is_federated(contact),
            Exclusion::NonMatrixUsers => !contact.is_matrix_user(),
            Exclusion::MatrixUsers => contact.is_matrix_user(),
        }
    }

    pub fn allows(&self, variant: FilterVariant, contact: &Contact) -> bool {
        variant
            .exclusions()
            .iter()
            .all(|exclusion| !self.excludes(*exclusion, contact))
    }
}

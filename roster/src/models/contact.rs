use std::collections::BTreeSet;

use roster_directory::{DirectoryUser, DisplayName, UserId};
use serde::{Deserialize, Serialize};

/// Resolved identity of a contact, used as the deduplication and selection key.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ContactId {
    Matrix(UserId),
    Email(String),
    Phone(String),
}

impl ContactId {
    /// Builds an identifier from free text: user ids are recognized,
    /// anything containing `@` is an email, the rest a phone number.
    pub fn parse(raw: &str) -> Self {
        if let Ok(user_id) = raw.parse::<UserId>() {
            Self::Matrix(user_id)
        } else if raw.contains('@') {
            Self::Email(raw.to_lowercase())
        } else {
            Self::Phone(raw.to_string())
        }
    }
}

impl std::fmt::Display for ContactId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Matrix(user_id) => write!(f, "{user_id}"),
            Self::Email(email) => f.write_str(email),
            Self::Phone(phone) => f.write_str(phone),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub display_name: String,
    // Present once the identity is known to be a registered user.
    #[serde(default)]
    pub matrix_id: Option<UserId>,
    #[serde(default)]
    pub emails: BTreeSet<String>,
    #[serde(default)]
    pub phone_numbers: BTreeSet<String>,
    // Originates from the address book (or a direct chat) rather than the directory.
    #[serde(default)]
    pub is_local: bool,
}

impl Contact {
    pub fn local<E, P>(display_name: impl Into<String>, emails: E, phone_numbers: P) -> Self
    where
        E: IntoIterator,
        E::Item: Into<String>,
        P: IntoIterator,
        P::Item: Into<String>,
    {
        Self {
            display_name: display_name.into(),
            matrix_id: None,
            emails: emails.into_iter().map(Into::into).collect(),
            phone_numbers: phone_numbers.into_iter().map(Into::into).collect(),
            is_local: true,
        }
    }

    pub fn matrix_user(user_id: UserId, display_name: Option<String>) -> Self {
        let display_name = display_name
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| DisplayName::from_user_id(&user_id).name);
        Self {
            display_name,
            matrix_id: Some(user_id),
            emails: BTreeSet::new(),
            phone_numbers: BTreeSet::new(),
            is_local: false,
        }
    }

    /// Synthetic contact standing for a typed-in email address.
    pub fn from_email(email: impl Into<String>) -> Self {
        let email = email.into();
        Self {
            display_name: email.clone(),
            matrix_id: None,
            emails: BTreeSet::from([email]),
            phone_numbers: BTreeSet::new(),
            is_local: false,
        }
    }

    pub fn from_directory_user(user: DirectoryUser) -> Self {
        let mut contact = Self::matrix_user(user.user_id, user.display_name);
        contact.emails = user.emails.into_iter().collect();
        contact
    }

    pub fn identifier(&self) -> Option<ContactId> {
        if let Some(user_id) = &self.matrix_id {
            return Some(ContactId::Matrix(user_id.clone()));
        }
        if let Some(email) = self.emails.iter().next() {
            return Some(ContactId::Email(email.to_lowercase()));
        }
        self.phone_numbers
            .iter()
            .next()
            .map(|phone| ContactId::Phone(phone.clone()))
    }

    pub fn is_matrix_user(&self) -> bool {
        self.matrix_id.is_some()
    }

    pub fn name_components(&self) -> DisplayName {
        DisplayName::parse(&self.display_name)
    }

    /// Splits an address book entry into one contact per email so that each
    /// email can be resolved and selected on its own. Phone numbers stay on
    /// every split entry.
    pub fn split_by_email(self) -> Vec<Contact> {
        if self.emails.len() <= 1 {
            return vec![self];
        }
        self.emails
            .iter()
            .map(|email| Contact {
                display_name: self.display_name.clone(),
                matrix_id: self.matrix_id.clone(),
                emails: BTreeSet::from([email.clone()]),
                phone_numbers: self.phone_numbers.clone(),
                is_local: self.is_local,
            })
            .collect()
    }

    pub(crate) fn merge(&mut self, other: Contact) {
        if self.matrix_id.is_none() {
            self.matrix_id = other.matrix_id;
        }
        self.emails.extend(other.emails);
        self.phone_numbers.extend(other.phone_numbers);
        self.is_local |= other.is_local;
    }
}

use std::collections::HashMap;

use roster_directory::UserId;
use thiserror::Error;

use crate::models::{Contact, ContactId};
use crate::section::LookupError;

/// Capability deciding whether a contact may be selected. Supplied when the
/// aggregator is built; [`AllowAll`] is used otherwise.
pub trait SelectionPolicy: Send + Sync {
    fn can_select(&self, contact: &Contact) -> bool;
}

pub struct AllowAll;

impl SelectionPolicy for AllowAll {
    fn can_select(&self, _contact: &Contact) -> bool {
        true
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionChange {
    Selected,
    Deselected,
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("selection of {0} was refused")]
    Refused(ContactId),
    #[error("contact has no identifier")]
    NoIdentifier,
    #[error("no known contact for {0}")]
    UnknownContact(String),
    #[error(transparent)]
    Lookup(#[from] LookupError),
}

/// Selected and ignored contacts, keyed by resolved identifier. Independent
/// of filtering and search, so selections survive both.
#[derive(Clone, Debug, Default)]
pub struct SelectionTracker {
    selected: HashMap<ContactId, Contact>,
    ignored_by_email: HashMap<String, Contact>,
    ignored_by_matrix_id: HashMap<UserId, Contact>,
}

impl SelectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> impl Iterator<Item = (&ContactId, &Contact)> {
        self.selected.iter()
    }

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    pub fn is_selected(&self, contact: &Contact) -> bool {
        Self::keys(contact)
            .iter()
            .any(|key| self.selected.contains_key(key))
    }

    /// Selects the contact, or deselects it when it (or any of its emails)
    /// is already selected. A non-user contact is represented by a synthetic
    /// contact keyed by its email.
    pub fn toggle(
        &mut self,
        contact: &Contact,
        policy: &dyn SelectionPolicy,
    ) -> Result<SelectionChange, SelectionError> {
        let keys = Self::keys(contact);
        if keys.is_empty() {
            return Err(SelectionError::NoIdentifier);
        }
        let mut removed = false;
        for key in &keys {
            removed |= self.selected.remove(key).is_some();
        }
        if removed {
            return Ok(SelectionChange::Deselected);
        }
        let id = keys[0].clone();
        if !policy.can_select(contact) {
            return Err(SelectionError::Refused(id));
        }
        let entry = match &id {
            ContactId::Email(email) if !contact.is_matrix_user() => Contact::from_email(email),
            _ => contact.clone(),
        };
        self.selected.insert(id, entry);
        Ok(SelectionChange::Selected)
    }

    /// Adds a free-text email to the selection, reusing any selected entry
    /// that already carries it.
    pub fn add_email(&mut self, email: &str) -> Contact {
        let email_lower = email.to_lowercase();
        if let Some(existing) = self
            .selected
            .values()
            .find(|c| c.emails.iter().any(|e| e.to_lowercase() == email_lower))
        {
            return existing.clone();
        }
        self.selected
            .entry(ContactId::Email(email_lower))
            .or_insert_with(|| Contact::from_email(email))
            .clone()
    }

    /// Adds a contact unless it is already selected under one of its keys,
    /// in which case the selected entry is returned.
    pub fn add_contact(&mut self, contact: &Contact) -> Result<Contact, SelectionError> {
        let keys = Self::keys(contact);
        if let Some(existing) = keys.iter().find_map(|key| self.selected.get(key)) {
            return Ok(existing.clone());
        }
        let id = keys.into_iter().next().ok_or(SelectionError::NoIdentifier)?;
        self.selected.insert(id, contact.clone());
        Ok(contact.clone())
    }

    /// Re-keys a selected email entry to its newly resolved user, in place.
    pub fn resolve(&mut self, email: &str, resolved: &Contact) -> bool {
        let Some(user_id) = resolved.matrix_id.clone() else {
            return false;
        };
        let Some(mut entry) = self.selected.remove(&ContactId::Email(email.to_lowercase())) else {
            return false;
        };
        entry.matrix_id = Some(user_id.clone());
        entry.display_name = resolved.display_name.clone();
        let key = ContactId::Matrix(user_id);
        match self.selected.get_mut(&key) {
            Some(existing) => existing.merge(entry),
            None => {
                self.selected.insert(key, entry);
            }
        }
        true
    }

    pub fn ignore_email(&mut self, email: &str) {
        self.ignored_by_email
            .insert(email.to_lowercase(), Contact::from_email(email));
    }

    pub fn ignore_matrix_id(&mut self, user_id: UserId) {
        self.ignored_by_matrix_id
            .insert(user_id.clone(), Contact::matrix_user(user_id, None));
    }

    pub fn is_ignored(&self, contact: &Contact) -> bool {
        if contact
            .matrix_id
            .as_ref()
            .is_some_and(|user_id| self.ignored_by_matrix_id.contains_key(user_id))
        {
            return true;
        }
        contact
            .emails
            .iter()
            .any(|email| self.ignored_by_email.contains_key(&email.to_lowercase()))
    }

    // Primary identifier first, then the emails the selection may be keyed by.
    fn keys(contact: &Contact) -> Vec<ContactId> {
        let mut keys: Vec<ContactId> = contact.identifier().into_iter().collect();
        for email in &contact.emails {
            let key = ContactId::Email(email.to_lowercase());
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
        keys
    }
}

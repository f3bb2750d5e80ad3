use std::collections::HashSet;

use crate::config::ContactsConfig;
use crate::contact::DirectorySearchState;
use crate::models::{Contact, ContactId};

use super::{IndexPath, LookupError};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SectionKind {
    InviteButton,
    AddEmailButton,
    LocalContacts,
    DirectoryContacts,
}

impl SectionKind {
    pub fn is_data(self) -> bool {
        matches!(self, Self::LocalContacts | Self::DirectoryContacts)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ActionRow {
    InviteToService,
    AddEmail,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Row<'a> {
    Action(ActionRow),
    Contact(&'a Contact),
}

#[derive(Clone, Debug, PartialEq)]
struct Section {
    kind: SectionKind,
    contacts: Vec<Contact>,
    shrunk: bool,
}

impl Section {
    fn row_count(&self) -> usize {
        match self.kind {
            SectionKind::InviteButton | SectionKind::AddEmailButton => 1,
            _ if self.shrunk => 0,
            _ => self.contacts.len(),
        }
    }
}

/// Immutable section/row view of the contact list, rebuilt on every change.
#[derive(Clone, Debug, PartialEq)]
pub struct ContactsProjection {
    sections: Vec<Section>,
    selected: HashSet<ContactId>,
    directory_state: DirectorySearchState,
    header_height: f32,
    local_title: String,
    directory_title: String,
}

impl ContactsProjection {
    pub fn number_of_sections(&self) -> usize {
        self.sections.len()
    }

    pub fn number_of_rows(&self, section: usize) -> usize {
        self.sections.get(section).map_or(0, Section::row_count)
    }

    pub fn section_kind(&self, section: usize) -> Option<SectionKind> {
        self.sections.get(section).map(|s| s.kind)
    }

    pub fn section_index(&self, kind: SectionKind) -> Option<usize> {
        self.sections.iter().position(|s| s.kind == kind)
    }

    pub fn is_shrunk(&self, section: usize) -> bool {
        self.sections.get(section).is_some_and(|s| s.shrunk)
    }

    /// Contacts of a data section, including those hidden by shrinking.
    pub fn contacts(&self, kind: SectionKind) -> &[Contact] {
        self.sections
            .iter()
            .find(|s| s.kind == kind)
            .map(|s| s.contacts.as_slice())
            .unwrap_or(&[])
    }

    /// Every contact with a live row, in display order.
    pub fn visible_contacts(&self) -> impl Iterator<Item = &Contact> {
        self.sections
            .iter()
            .filter(|s| s.kind.is_data() && !s.shrunk)
            .flat_map(|s| s.contacts.iter())
    }

    pub fn directory_state(&self) -> DirectorySearchState {
        self.directory_state
    }

    pub fn row_at(&self, index: IndexPath) -> Result<Row<'_>, LookupError> {
        let section = self
            .sections
            .get(index.section)
            .ok_or(LookupError::SectionOutOfRange(index.section))?;
        match section.kind {
            SectionKind::InviteButton | SectionKind::AddEmailButton if index.row != 0 => {
                Err(LookupError::RowOutOfRange(index))
            }
            SectionKind::InviteButton => Ok(Row::Action(ActionRow::InviteToService)),
            SectionKind::AddEmailButton => Ok(Row::Action(ActionRow::AddEmail)),
            _ if section.shrunk => Err(LookupError::Shrunk(index.section)),
            _ => section
                .contacts
                .get(index.row)
                .map(Row::Contact)
                .ok_or(LookupError::RowOutOfRange(index)),
        }
    }

    pub fn contact_at(&self, index: IndexPath) -> Result<&Contact, LookupError> {
        match self.row_at(index)? {
            Row::Contact(contact) => Ok(contact),
            Row::Action(_) => Err(LookupError::ActionRow(index)),
        }
    }

    /// Inverse of [`Self::contact_at`]; `None` when the contact is not in
    /// the current list or its section is shrunk.
    pub fn index_of(&self, contact: &Contact) -> Option<IndexPath> {
        let id = contact.identifier()?;
        self.sections
            .iter()
            .enumerate()
            .filter(|(_, s)| s.kind.is_data() && !s.shrunk)
            .find_map(|(section, s)| {
                s.contacts
                    .iter()
                    .position(|c| c.identifier().as_ref() == Some(&id))
                    .map(|row| IndexPath::new(section, row))
            })
    }

    pub fn is_invite_row(&self, index: IndexPath) -> bool {
        matches!(self.row_at(index), Ok(Row::Action(ActionRow::InviteToService)))
    }

    pub fn is_add_email_row(&self, index: IndexPath) -> bool {
        matches!(self.row_at(index), Ok(Row::Action(ActionRow::AddEmail)))
    }

    pub fn is_selected(&self, contact: &Contact) -> bool {
        contact
            .identifier()
            .is_some_and(|id| self.selected.contains(&id))
            || contact
                .emails
                .iter()
                .any(|e| self.selected.contains(&ContactId::Email(e.to_lowercase())))
    }

    /// Header height; action rows have no header.
    pub fn height_for_section(&self, section: usize) -> f32 {
        match self.section_kind(section) {
            Some(kind) if kind.is_data() => self.header_height,
            _ => 0.0,
        }
    }

    pub fn title_for_section(&self, section: usize) -> Option<String> {
        let section = self.sections.get(section)?;
        let title = match section.kind {
            SectionKind::LocalContacts => &self.local_title,
            SectionKind::DirectoryContacts => &self.directory_title,
            _ => return None,
        };
        Some(format!("{} ({})", title, section.contacts.len()))
    }
}

/// Turns the filtered contact lists into a [`ContactsProjection`].
///
/// Section order is fixed: invite button, add email button, local contacts,
/// directory contacts. Disabled or empty sections are left out of the index
/// space entirely.
#[derive(Clone, Debug)]
pub struct SectionAssembler {
    show_invite_button: bool,
    show_add_email_button: bool,
    sections_shrinkable: bool,
    header_height: f32,
    local_title: String,
    directory_title: String,
}

impl SectionAssembler {
    pub fn new(config: &ContactsConfig) -> Self {
        Self {
            show_invite_button: config.show_invite_button,
            show_add_email_button: config.show_add_email_button,
            sections_shrinkable: config.sections_shrinkable,
            header_height: config.header_height,
            local_title: config.local_title.clone(),
            directory_title: config.directory_title.clone(),
        }
    }

    pub fn sections_shrinkable(&self) -> bool {
        self.sections_shrinkable
    }

    pub fn assemble(
        &self,
        local: Vec<Contact>,
        directory: Vec<Contact>,
        shrunk: &HashSet<SectionKind>,
        selected: HashSet<ContactId>,
        directory_state: DirectorySearchState,
    ) -> ContactsProjection {
        let mut sections = Vec::with_capacity(4);
        if self.show_invite_button {
            sections.push(Self::action(SectionKind::InviteButton));
        }
        if self.show_add_email_button {
            sections.push(Self::action(SectionKind::AddEmailButton));
        }
        for (kind, contacts) in [
            (SectionKind::LocalContacts, local),
            (SectionKind::DirectoryContacts, directory),
        ] {
            if contacts.is_empty() {
                continue;
            }
            sections.push(Section {
                kind,
                contacts,
                shrunk: self.sections_shrinkable && shrunk.contains(&kind),
            });
        }
        ContactsProjection {
            sections,
            selected,
            directory_state,
            header_height: self.header_height,
            local_title: self.local_title.clone(),
            directory_title: self.directory_title.clone(),
        }
    }

    fn action(kind: SectionKind) -> Section {
        Section {
            kind,
            contacts: Vec::new(),
            shrunk: false,
        }
    }
}

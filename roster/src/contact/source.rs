use crate::models::Contact;

/// Address book provider. Loaded at once, no paging.
pub trait AddressBook: Send + Sync {
    fn local_contacts(&self) -> Vec<Contact>;

    /// Users with an existing direct chat, listed among local contacts.
    fn direct_chat_partners(&self) -> Vec<Contact> {
        Vec::new()
    }
}

#[derive(Clone, Debug, Default)]
pub struct StaticAddressBook {
    pub contacts: Vec<Contact>,
    pub direct_chat_partners: Vec<Contact>,
}

impl AddressBook for StaticAddressBook {
    fn local_contacts(&self) -> Vec<Contact> {
        self.contacts.clone()
    }

    fn direct_chat_partners(&self) -> Vec<Contact> {
        self.direct_chat_partners.clone()
    }
}

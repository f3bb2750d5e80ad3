use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use roster_directory::{DirectoryError, DisplayName, SearchResponse, UserId};

use crate::config::Config;
use crate::models::{Contact, ContactId};
use crate::section::{ContactsProjection, IndexPath, SectionAssembler, SectionKind};

use super::{
    AllowAll, DirectorySearchState, FilterPolicy, FilterVariant, PendingSearch, SearchMatcher,
    SelectionChange, SelectionError, SelectionPolicy, SelectionTracker, fold,
};

/// Merges address book entries, direct chat partners and directory results
/// into one deduplicated, filtered and searchable contact list.
///
/// All mutation goes through `&mut self`; every mutating operation rebuilds
/// the immutable [`ContactsProjection`] handed to the UI.
pub struct ContactsAggregator {
    assembler: SectionAssembler,
    policy: FilterPolicy,
    selection_policy: Arc<dyn SelectionPolicy>,
    search_limit: usize,
    filter: FilterVariant,
    local_contacts: Vec<Contact>,
    direct_partners: Vec<Contact>,
    // Lowercased email -> user it is bound to.
    email_bindings: HashMap<String, UserId>,
    // Every directory user seen so far, used for names and offline search.
    known_users: HashMap<UserId, Contact>,
    directory_results: Vec<Contact>,
    matcher: SearchMatcher,
    local_matches: Option<(SearchMatcher, Vec<Contact>)>,
    generation: u64,
    pending: Option<PendingSearch>,
    directory_state: DirectorySearchState,
    state_changes: Vec<DirectorySearchState>,
    selection: SelectionTracker,
    shrunk: HashSet<SectionKind>,
    projection: Arc<ContactsProjection>,
}

impl ContactsAggregator {
    pub fn new(config: &Config, own_user_id: UserId) -> Self {
        Self::with_selection_policy(config, own_user_id, Arc::new(AllowAll))
    }

    pub fn with_selection_policy<P>(config: &Config, own_user_id: UserId, policy: Arc<P>) -> Self
    where
        P: SelectionPolicy + 'static,
    {
        let assembler = SectionAssembler::new(&config.contacts);
        let projection = Arc::new(assembler.assemble(
            Vec::new(),
            Vec::new(),
            &HashSet::new(),
            HashSet::new(),
            DirectorySearchState::default(),
        ));
        Self {
            assembler,
            policy: FilterPolicy::new(own_user_id, config.directory.host_classifier()),
            selection_policy: policy,
            search_limit: config.directory.search_limit,
            filter: config.contacts.filter,
            local_contacts: Vec::new(),
            direct_partners: Vec::new(),
            email_bindings: HashMap::new(),
            known_users: HashMap::new(),
            directory_results: Vec::new(),
            matcher: SearchMatcher::default(),
            local_matches: None,
            generation: 0,
            pending: None,
            directory_state: DirectorySearchState::default(),
            state_changes: Vec::new(),
            selection: SelectionTracker::new(),
            shrunk: HashSet::new(),
            projection,
        }
    }

    pub fn projection(&self) -> Arc<ContactsProjection> {
        self.projection.clone()
    }

    pub fn filter(&self) -> FilterVariant {
        self.filter
    }

    pub fn pattern(&self) -> &str {
        self.matcher.pattern()
    }

    pub fn directory_state(&self) -> DirectorySearchState {
        self.directory_state
    }

    pub fn pending_search(&self) -> Option<&PendingSearch> {
        self.pending.as_ref()
    }

    pub fn selection(&self) -> &SelectionTracker {
        &self.selection
    }

    pub fn policy(&self) -> &FilterPolicy {
        &self.policy
    }

    /// Directory states entered since the last call, oldest first.
    pub fn take_state_changes(&mut self) -> Vec<DirectorySearchState> {
        std::mem::take(&mut self.state_changes)
    }

    /// Replaces the address book contacts. Entries without any identifier
    /// are dropped; entries with several emails become one row per email.
    pub fn set_local_contacts(&mut self, contacts: Vec<Contact>) -> Arc<ContactsProjection> {
        let before = contacts.len();
        self.local_contacts = Self::ingest(contacts, true)
            .into_iter()
            .flat_map(Contact::split_by_email)
            .collect();
        tracing::debug!(
            received = before,
            rows = self.local_contacts.len(),
            "Local contacts loaded"
        );
        self.invalidate();
        self.recompute()
    }

    /// Users we already have a direct chat with. They are listed with the
    /// local contacts even when absent from the address book.
    pub fn set_direct_chat_partners(&mut self, partners: Vec<Contact>) -> Arc<ContactsProjection> {
        self.direct_partners = Self::ingest(partners, true)
            .into_iter()
            .filter(|partner| {
                if partner.is_matrix_user() {
                    true
                } else {
                    tracing::warn!(name = %partner.display_name, "Dropping direct chat partner without user id");
                    false
                }
            })
            .collect();
        self.invalidate();
        self.recompute()
    }

    /// Local emails whose binding to a user is still unknown.
    pub fn emails_to_resolve(&self) -> Vec<String> {
        let mut emails: Vec<String> = self
            .local_contacts
            .iter()
            .filter(|c| !c.is_matrix_user())
            .flat_map(|c| c.emails.iter())
            .filter(|e| !self.email_bindings.contains_key(&e.to_lowercase()))
            .cloned()
            .collect();
        emails.sort();
        emails.dedup();
        emails
    }

    pub fn apply_email_bindings(
        &mut self,
        bindings: HashMap<String, UserId>,
    ) -> Arc<ContactsProjection> {
        for (email, user_id) in bindings {
            self.bind_email(&email, user_id);
        }
        self.invalidate();
        self.recompute()
    }

    pub fn set_filter(&mut self, filter: FilterVariant) -> Arc<ContactsProjection> {
        tracing::debug!(?filter, "Filter changed");
        self.filter = filter;
        self.invalidate();
        self.recompute()
    }

    /// Reissues the directory search for the active pattern when its results
    /// came from known users only but the directory is reachable under the
    /// current filter, typically after a filter change.
    pub fn resume_directory_search(&mut self) -> Option<PendingSearch> {
        if self.matcher.is_empty()
            || self.pending.is_some()
            || !self.directory_state.is_offline()
            || !self.directory_available()
        {
            return None;
        }
        let pattern = self.matcher.pattern().to_string();
        tracing::debug!(%pattern, "Directory reachable again, searching");
        self.search(&pattern, true)
    }

    /// Updates the search pattern and returns the directory request to issue,
    /// if any. The projection is updated right away from known data.
    ///
    /// Any request issued for a previous pattern becomes stale.
    pub fn search(&mut self, pattern: &str, force_reset: bool) -> Option<PendingSearch> {
        let matcher = SearchMatcher::new(pattern);
        if force_reset || !matcher.refines(&self.matcher) {
            self.local_matches = None;
        }
        self.matcher = matcher;
        self.generation += 1;
        self.pending = None;
        let matcher = &self.matcher;
        self.directory_results.retain(|c| matcher.matches(c));

        if self.matcher.is_empty() {
            self.directory_results.clear();
            self.set_state(DirectorySearchState::Loaded);
            self.recompute();
            return None;
        }
        if !self.directory_available() {
            tracing::debug!(pattern = %self.matcher.pattern(), "Directory unavailable, searching known users");
            self.run_offline_search();
            self.recompute();
            return None;
        }
        let pending = PendingSearch::new(
            self.generation,
            self.matcher.pattern().to_string(),
            self.search_limit,
        );
        tracing::debug!(
            pattern = %pending.pattern(),
            generation = pending.generation(),
            "Issuing directory search"
        );
        self.pending = Some(pending.clone());
        self.set_state(DirectorySearchState::Loading);
        self.recompute();
        Some(pending)
    }

    /// Merges a directory response. Returns `false` when the response belongs
    /// to a superseded search and was discarded.
    pub fn apply_search_response(
        &mut self,
        pending: &PendingSearch,
        response: Result<SearchResponse, DirectoryError>,
    ) -> bool {
        if self.pending.as_ref() != Some(pending) {
            tracing::debug!(
                pattern = %pending.pattern(),
                generation = pending.generation(),
                current = self.generation,
                "Discarding stale directory response"
            );
            return false;
        }
        self.pending = None;
        match response {
            Ok(response) => {
                let contacts = Self::ingest(
                    response
                        .results
                        .into_iter()
                        .map(Contact::from_directory_user)
                        .collect(),
                    false,
                );
                for contact in &contacts {
                    if let Some(user_id) = &contact.matrix_id {
                        for email in &contact.emails {
                            self.bind_email(email, user_id.clone());
                        }
                        self.known_users.insert(user_id.clone(), contact.clone());
                    }
                }
                tracing::debug!(
                    pattern = %pending.pattern(),
                    count = contacts.len(),
                    limited = response.limited,
                    "Directory response merged"
                );
                self.directory_results = contacts;
                self.set_state(if response.limited {
                    DirectorySearchState::LoadedButLimited
                } else {
                    DirectorySearchState::Loaded
                });
            }
            Err(err) => {
                tracing::warn!(pattern = %pending.pattern(), %err, "Directory search failed, searching known users");
                self.run_offline_search();
            }
        }
        self.invalidate();
        self.recompute();
        true
    }

    /// Recomputes everything from the data already known, without any
    /// network round-trip.
    pub fn force_refresh(&mut self) -> Arc<ContactsProjection> {
        self.invalidate();
        self.recompute()
    }

    /// Toggles the selection of a contact given its identifier (user id,
    /// email or phone number). Works for contacts hidden by the filter too.
    pub fn toggle_selection(&mut self, identifier: &str) -> Result<SelectionChange, SelectionError> {
        let contact = self
            .contact_for_identifier(identifier)
            .ok_or_else(|| SelectionError::UnknownContact(identifier.to_string()))?;
        let change = self
            .selection
            .toggle(&contact, self.selection_policy.as_ref())?;
        self.recompute();
        Ok(change)
    }

    pub fn toggle_selection_at(
        &mut self,
        index: IndexPath,
    ) -> Result<SelectionChange, SelectionError> {
        let contact = self.projection.contact_at(index)?.clone();
        let change = self
            .selection
            .toggle(&contact, self.selection_policy.as_ref())?;
        self.recompute();
        Ok(change)
    }

    /// Selects a typed-in email and returns the contact representing it.
    /// An email already bound to a user selects that user.
    pub fn add_selected_email(&mut self, email: &str) -> Contact {
        let resolved = if self.email_bindings.contains_key(&email.to_lowercase()) {
            self.contact_for_identifier(email)
        } else {
            None
        };
        let contact = match resolved.map(|contact| self.selection.add_contact(&contact)) {
            Some(Ok(contact)) => contact,
            _ => self.selection.add_email(email),
        };
        self.recompute();
        contact
    }

    pub fn ignore_email(&mut self, email: &str) -> Arc<ContactsProjection> {
        self.selection.ignore_email(email);
        self.invalidate();
        self.recompute()
    }

    pub fn ignore_matrix_id(&mut self, user_id: UserId) -> Arc<ContactsProjection> {
        self.selection.ignore_matrix_id(user_id);
        self.invalidate();
        self.recompute()
    }

    /// Collapses or expands a data section. Returns `false` when sections are
    /// not shrinkable or the index is not a data section.
    pub fn toggle_section_shrink(&mut self, section: usize) -> bool {
        if !self.assembler.sections_shrinkable() {
            return false;
        }
        let Some(kind) = self.projection.section_kind(section).filter(|k| k.is_data()) else {
            return false;
        };
        if !self.shrunk.remove(&kind) {
            self.shrunk.insert(kind);
        }
        self.recompute();
        true
    }

    fn directory_available(&self) -> bool {
        self.filter.searches_directory() && !self.policy.is_own_user_external()
    }

    fn set_state(&mut self, state: DirectorySearchState) {
        self.directory_state = state;
        self.state_changes.push(state);
    }

    fn run_offline_search(&mut self) {
        self.set_state(DirectorySearchState::OfflineLoading);
        let mut results: Vec<Contact> = self
            .known_users
            .values()
            .filter(|c| self.matcher.matches(c))
            .cloned()
            .collect();
        results.sort_by_cached_key(|c| (fold(&c.display_name), c.identifier()));
        self.directory_results = results;
        self.set_state(DirectorySearchState::OfflineLoaded);
    }

    fn bind_email(&mut self, email: &str, user_id: UserId) {
        let email = email.to_lowercase();
        let resolved = Contact::matrix_user(user_id.clone(), Some(self.resolved_name(&user_id)));
        self.selection.resolve(&email, &resolved);
        self.email_bindings.insert(email, user_id);
    }

    fn invalidate(&mut self) {
        self.local_matches = None;
    }

    fn ingest(contacts: Vec<Contact>, is_local: bool) -> Vec<Contact> {
        contacts
            .into_iter()
            .filter_map(|mut contact| {
                if contact.identifier().is_none() {
                    tracing::warn!(name = %contact.display_name, "Dropping contact without identifier");
                    return None;
                }
                contact.is_local = is_local;
                Some(contact)
            })
            .collect()
    }

    fn resolved_name(&self, user_id: &UserId) -> String {
        self.known_users
            .get(user_id)
            .or_else(|| {
                self.direct_partners
                    .iter()
                    .find(|p| p.matrix_id.as_ref() == Some(user_id))
            })
            .map(|c| c.display_name.clone())
            .unwrap_or_else(|| DisplayName::from_user_id(user_id).name)
    }

    // A local entry whose email is bound to a user takes that user's identity.
    fn resolve(&self, contact: &Contact) -> Contact {
        if contact.is_matrix_user() {
            return contact.clone();
        }
        let bound = contact
            .emails
            .iter()
            .find_map(|email| self.email_bindings.get(&email.to_lowercase()));
        match bound {
            Some(user_id) => Contact {
                display_name: self.resolved_name(user_id),
                matrix_id: Some(user_id.clone()),
                emails: contact.emails.clone(),
                phone_numbers: contact.phone_numbers.clone(),
                is_local: true,
            },
            None => contact.clone(),
        }
    }

    fn resolved_local_contacts(&self) -> Vec<Contact> {
        let own = self.policy.own_user_id();
        let mut merged: Vec<Contact> = Vec::new();
        let mut index: HashMap<ContactId, usize> = HashMap::new();
        let candidates = self
            .local_contacts
            .iter()
            .map(|c| self.resolve(c))
            .chain(self.direct_partners.iter().cloned());
        for contact in candidates {
            let Some(id) = contact.identifier() else {
                continue;
            };
            if contact.matrix_id.as_ref() == Some(own) {
                continue;
            }
            match index.get(&id) {
                Some(&i) => merged[i].merge(contact),
                None => {
                    index.insert(id, merged.len());
                    merged.push(contact);
                }
            }
        }
        merged.sort_by_cached_key(|c| fold(&c.display_name));
        merged
    }

    fn is_visible(&self, contact: &Contact) -> bool {
        self.policy.allows(self.filter, contact) && !self.selection.is_ignored(contact)
    }

    fn local_matches(&mut self) -> Vec<Contact> {
        let narrowed: Vec<Contact> = match &self.local_matches {
            Some((previous, cached)) if self.matcher.refines(previous) => cached
                .iter()
                .filter(|c| self.matcher.matches(c))
                .cloned()
                .collect(),
            _ => self
                .resolved_local_contacts()
                .into_iter()
                .filter(|c| self.is_visible(c) && self.matcher.matches(c))
                .collect(),
        };
        self.local_matches = Some((self.matcher.clone(), narrowed.clone()));
        narrowed
    }

    // Emails bound to a user designate that user, so an identity has a
    // single selection entry whichever identifier it is selected by.
    fn contact_for_identifier(&self, identifier: &str) -> Option<Contact> {
        let (id, bound_email) = match ContactId::parse(identifier) {
            ContactId::Email(email) => match self.email_bindings.get(&email) {
                Some(user_id) => (ContactId::Matrix(user_id.clone()), Some(email)),
                None => (ContactId::Email(email), None),
            },
            id => (id, None),
        };
        let mut contact = match self.find_contact(&id) {
            Some(contact) => contact,
            None => match id {
                ContactId::Email(email) => Contact::from_email(email),
                ContactId::Matrix(user_id) => {
                    let name = self.resolved_name(&user_id);
                    Contact::matrix_user(user_id, Some(name))
                }
                ContactId::Phone(_) => return None,
            },
        };
        if let Some(email) =
            bound_email.filter(|email| !contact.emails.iter().any(|e| e.to_lowercase() == *email))
        {
            contact.emails.insert(email);
        }
        Some(contact)
    }

    fn find_contact(&self, id: &ContactId) -> Option<Contact> {
        let same = |c: &Contact| c.identifier().as_ref() == Some(id);
        if let Some(contact) = self.projection.visible_contacts().find(|&c| same(c)) {
            return Some(contact.clone());
        }
        if let Some(contact) = self.resolved_local_contacts().into_iter().find(|c| same(c)) {
            return Some(contact);
        }
        if let ContactId::Matrix(user_id) = id {
            return self.known_users.get(user_id).cloned();
        }
        None
    }

    fn recompute(&mut self) -> Arc<ContactsProjection> {
        let local = self.local_matches();
        let mut seen: HashSet<ContactId> = local.iter().filter_map(Contact::identifier).collect();
        let own = self.policy.own_user_id();
        let directory: Vec<Contact> = self
            .directory_results
            .iter()
            .filter(|c| c.matrix_id.as_ref() != Some(own))
            .filter(|c| self.is_visible(c) && self.matcher.matches(c))
            .filter(|c| c.identifier().is_some_and(|id| seen.insert(id)))
            .cloned()
            .collect();
        let selected = self.selection.selected().map(|(id, _)| id.clone()).collect();
        self.projection = Arc::new(self.assembler.assemble(
            local,
            directory,
            &self.shrunk,
            selected,
            self.directory_state,
        ));
        tracing::trace!(
            sections = self.projection.number_of_sections(),
            state = ?self.directory_state,
            "Contacts projection rebuilt"
        );
        self.projection.clone()
    }
}

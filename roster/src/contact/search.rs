use unicode_normalization::UnicodeNormalization as _;
use unicode_normalization::char::is_combining_mark;

use crate::models::Contact;

/// Lowercases and strips diacritics: `"Élodie"` folds to `"elodie"`.
pub fn fold(s: &str) -> String {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Prefix predicate over the searchable fields of a contact.
///
/// Matches when the pattern prefixes the display name (or one of its words)
/// ignoring case and diacritics, the user id or its localpart, or any email
/// or phone number ignoring case. Every predicate is a prefix test, so a
/// longer pattern never matches more than a shorter one it extends.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchMatcher {
    pattern: String,
    folded: String,
    lower: String,
}

impl SearchMatcher {
    pub fn new(pattern: &str) -> Self {
        let pattern = pattern.trim_start();
        Self {
            pattern: pattern.to_string(),
            folded: fold(pattern),
            lower: pattern.to_lowercase(),
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn is_empty(&self) -> bool {
        self.pattern.is_empty()
    }

    /// True when `self` can only narrow the results of `previous`.
    pub fn refines(&self, previous: &SearchMatcher) -> bool {
        !previous.is_empty() && self.pattern.starts_with(&previous.pattern)
    }

    pub fn matches(&self, contact: &Contact) -> bool {
        if self.is_empty() {
            return true;
        }
        self.matches_name(&contact.display_name)
            || self.matches_user_id(contact)
            || contact
                .emails
                .iter()
                .chain(contact.phone_numbers.iter())
                .any(|method| method.to_lowercase().starts_with(&self.lower))
    }

    fn matches_name(&self, display_name: &str) -> bool {
        let name = fold(display_name);
        name.starts_with(&self.folded)
            || name
                .split_whitespace()
                .any(|word| word.starts_with(&self.folded))
    }

    fn matches_user_id(&self, contact: &Contact) -> bool {
        match &contact.matrix_id {
            Some(user_id) => {
                user_id.to_string().to_lowercase().starts_with(&self.lower)
                    || user_id.localpart().to_lowercase().starts_with(&self.lower)
            }
            None => false,
        }
    }
}

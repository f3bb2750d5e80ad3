use crate::UserId;

/// Classifies home servers as internal or external to the primary
/// organisation, and user ids as local or federated relative to a host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HostClassifier {
    external_prefixes: Vec<String>,
}

impl HostClassifier {
    pub const DEFAULT_EXTERNAL_PREFIXES: [&'static str; 2] = ["agent.externe.", "e."];

    pub fn new<I, S>(external_prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            external_prefixes: external_prefixes.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_external_host(&self, host: &str) -> bool {
        self.external_prefixes
            .iter()
            .any(|prefix| host.starts_with(prefix.as_str()))
    }

    pub fn is_external_user(&self, user_id: &UserId) -> bool {
        self.is_external_host(user_id.host())
    }

    /// Like [`Self::is_external_user`], but for raw strings. Anything that
    /// does not parse as a user id is considered external.
    pub fn is_external_raw(&self, user_id: &str) -> bool {
        match user_id.parse::<UserId>() {
            Ok(user_id) => self.is_external_user(&user_id),
            Err(_) => true,
        }
    }

    pub fn is_federated(&self, user_id: &UserId, own_host: &str) -> bool {
        user_id.host() != own_host
    }
}

impl Default for HostClassifier {
    fn default() -> Self {
        Self::new(Self::DEFAULT_EXTERNAL_PREFIXES)
    }
}

use serde::{Deserialize, Serialize};

use crate::UserIdError;

/// Fully qualified user identifier of the form `@localpart:host`.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId {
    localpart: String,
    host: String,
}

impl UserId {
    pub const PREFIX: char = '@';
    pub const HOST_SEPARATOR: char = ':';

    pub fn new(localpart: impl Into<String>, host: impl Into<String>) -> Result<Self, UserIdError> {
        let localpart = localpart.into();
        let host = host.into();
        if localpart.is_empty() {
            return Err(UserIdError::EmptyLocalpart);
        }
        if host.is_empty() {
            return Err(UserIdError::EmptyHost);
        }
        if localpart.contains(Self::HOST_SEPARATOR) || host.contains(Self::HOST_SEPARATOR) {
            return Err(UserIdError::TooManySeparators);
        }
        Ok(Self { localpart, host })
    }

    pub fn localpart(&self) -> &str {
        &self.localpart
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Cheap syntactic check, used to tell typed-in user ids from emails.
    pub fn is_user_id(s: &str) -> bool {
        s.parse::<UserId>().is_ok()
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}{}{}", Self::PREFIX, self.localpart, Self::HOST_SEPARATOR, self.host)
    }
}

impl std::fmt::Debug for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self}")
    }
}

impl std::str::FromStr for UserId {
    type Err = UserIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rest = s
            .strip_prefix(Self::PREFIX)
            .ok_or(UserIdError::MissingPrefix)?;
        let (localpart, host) = rest
            .split_once(Self::HOST_SEPARATOR)
            .ok_or(UserIdError::MissingHost)?;
        Self::new(localpart, host)
    }
}

impl TryFrom<String> for UserId {
    type Error = UserIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<UserId> for String {
    fn from(user_id: UserId) -> Self {
        user_id.to_string()
    }
}

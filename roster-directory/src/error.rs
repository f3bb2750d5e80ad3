use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserIdError {
    #[error("user id must start with '@'")]
    MissingPrefix,
    #[error("user id has no host part")]
    MissingHost,
    #[error("user id has an empty localpart")]
    EmptyLocalpart,
    #[error("user id has an empty host")]
    EmptyHost,
    #[error("user id contains more than one ':'")]
    TooManySeparators,
}

/// Failure of a directory request. None of these are fatal for the caller:
/// the contact engine falls back to already known contacts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectoryError {
    #[error("directory is unreachable")]
    Offline,
    #[error("directory rate limited the request, retry after {retry_after_ms} ms")]
    RateLimited { retry_after_ms: u64 },
    #[error("directory transport error: {0}")]
    Transport(String),
}

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{DirectoryError, UserId};

/// One registered user returned by the user directory.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryUser {
    pub user_id: UserId,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub emails: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchResponse {
    pub results: Vec<DirectoryUser>,
    // The server capped the result list; more users match the pattern.
    pub limited: bool,
}

#[async_trait]
pub trait DirectoryClient: Send + Sync {
    /// Searches registered users whose name or id starts with `pattern`.
    async fn search_users(
        &self,
        pattern: &str,
        limit: usize,
    ) -> Result<SearchResponse, DirectoryError>;

    /// Resolves which of the given emails are bound to a user account.
    /// Unbound emails are simply absent from the result.
    async fn lookup_emails(
        &self,
        emails: &[String],
    ) -> Result<HashMap<String, UserId>, DirectoryError>;
}

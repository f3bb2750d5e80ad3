use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio::time::sleep;

use crate::{DirectoryClient, DirectoryError, DirectoryUser, SearchResponse, UserId};

/// In-process user directory.
///
/// Matches users by case-insensitive prefix on the display name (or any of
/// its words), the user id and the localpart. Responses are capped by the
/// smaller of the request limit and the server limit, flagging `limited`
/// when matches were dropped. A latency can be attached to a pattern to
/// reproduce responses arriving out of order.
pub struct MemoryDirectory {
    users: RwLock<Vec<DirectoryUser>>,
    latencies: RwLock<HashMap<String, Duration>>,
    offline: AtomicBool,
    server_limit: usize,
}

impl MemoryDirectory {
    pub const DEFAULT_SERVER_LIMIT: usize = 50;

    pub fn new() -> Self {
        Self::with_server_limit(Self::DEFAULT_SERVER_LIMIT)
    }

    pub fn with_server_limit(server_limit: usize) -> Self {
        Self {
            users: RwLock::new(Vec::new()),
            latencies: RwLock::new(HashMap::new()),
            offline: AtomicBool::new(false),
            server_limit,
        }
    }

    pub async fn register(&self, user: DirectoryUser) {
        let mut users = self.users.write().await;
        match users.iter_mut().find(|u| u.user_id == user.user_id) {
            Some(existing) => *existing = user,
            None => users.push(user),
        }
    }

    pub async fn set_latency(&self, pattern: impl Into<String>, latency: Duration) {
        self.latencies.write().await.insert(pattern.into(), latency);
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn is_offline(&self) -> bool {
        self.offline.load(Ordering::SeqCst)
    }

    fn matches(user: &DirectoryUser, pattern: &str) -> bool {
        let user_id = user.user_id.to_string().to_lowercase();
        if user_id.starts_with(pattern) || user.user_id.localpart().to_lowercase().starts_with(pattern)
        {
            return true;
        }
        match &user.display_name {
            Some(name) => {
                let name = name.to_lowercase();
                name.starts_with(pattern) || name.split_whitespace().any(|w| w.starts_with(pattern))
            }
            None => false,
        }
    }
}

impl Default for MemoryDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DirectoryClient for MemoryDirectory {
    async fn search_users(
        &self,
        pattern: &str,
        limit: usize,
    ) -> Result<SearchResponse, DirectoryError> {
        let latency = self.latencies.read().await.get(pattern).copied();
        if let Some(latency) = latency {
            sleep(latency).await;
        }
        if self.is_offline() {
            tracing::debug!(pattern, "Directory is offline");
            return Err(DirectoryError::Offline);
        }
        let pattern = pattern.to_lowercase();
        let users = self.users.read().await;
        let mut matched: Vec<DirectoryUser> = users
            .iter()
            .filter(|user| Self::matches(user, &pattern))
            .cloned()
            .collect();
        let cap = limit.min(self.server_limit);
        let limited = matched.len() > cap;
        matched.truncate(cap);
        tracing::trace!(pattern = %pattern, count = matched.len(), limited, "Directory search");
        Ok(SearchResponse {
            results: matched,
            limited,
        })
    }

    async fn lookup_emails(
        &self,
        emails: &[String],
    ) -> Result<HashMap<String, UserId>, DirectoryError> {
        if self.is_offline() {
            return Err(DirectoryError::Offline);
        }
        let users = self.users.read().await;
        let mut result = HashMap::new();
        for email in emails {
            let email_lower = email.to_lowercase();
            let bound = users
                .iter()
                .find(|user| user.emails.iter().any(|e| e.to_lowercase() == email_lower));
            if let Some(user) = bound {
                result.insert(email.clone(), user.user_id.clone());
            }
        }
        Ok(result)
    }
}

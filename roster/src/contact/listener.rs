use std::sync::Arc;

use async_trait::async_trait;

use crate::section::ContactsProjection;

use super::DirectorySearchState;

#[async_trait]
pub trait ContactsListener: Send + Sync {
    /// The visible projection changed; the UI re-renders from it.
    async fn on_contacts_changed(&self, projection: Arc<ContactsProjection>);

    async fn on_directory_state_changed(&self, state: DirectorySearchState);
}

pub(super) struct StubListener;

#[async_trait]
impl ContactsListener for StubListener {
    async fn on_contacts_changed(&self, _projection: Arc<ContactsProjection>) {}

    async fn on_directory_state_changed(&self, _state: DirectorySearchState) {}
}

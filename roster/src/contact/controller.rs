use std::collections::HashMap;
use std::sync::Arc;

use roster_directory::{DirectoryClient, DirectoryError, SearchResponse, UserId};
use tokio::sync::{Mutex as TokioMutex, mpsc};
use tokio::task::JoinHandle;

use crate::models::Contact;
use crate::section::ContactsProjection;

use super::{
    AddressBook, ContactsAggregator, ContactsListener, DirectorySearchState, FilterVariant,
    PendingSearch, SelectionChange, SelectionError, StubListener,
};

/// Drives a [`ContactsAggregator`] against a directory.
///
/// Calls return as soon as the local projection is updated. Directory
/// requests run on spawned tasks and their responses are funneled back to a
/// single loop that applies them to the aggregator, so all mutation happens
/// in one place. Must be created inside a tokio runtime.
pub struct ContactsController {
    aggregator: Arc<TokioMutex<ContactsAggregator>>,
    directory: Arc<dyn DirectoryClient>,
    listener: Arc<dyn ContactsListener>,
    command_tx: mpsc::Sender<ControllerCommand>,
    main_task: JoinHandle<()>,
}

impl ContactsController {
    const MAX_COMMANDS: usize = 16;

    pub fn new<D>(aggregator: ContactsAggregator, directory: Arc<D>) -> Self
    where
        D: DirectoryClient + 'static,
    {
        Self::with_listener(aggregator, directory, Arc::new(StubListener))
    }

    pub fn with_listener<D, L>(
        aggregator: ContactsAggregator,
        directory: Arc<D>,
        listener: Arc<L>,
    ) -> Self
    where
        D: DirectoryClient + 'static,
        L: ContactsListener + 'static,
    {
        let aggregator = Arc::new(TokioMutex::new(aggregator));
        let listener: Arc<dyn ContactsListener> = listener;
        let (command_tx, command_rx) = mpsc::channel(Self::MAX_COMMANDS);
        let main_task = tokio::spawn(Self::main_loop(
            aggregator.clone(),
            listener.clone(),
            command_rx,
        ));
        Self {
            aggregator,
            directory,
            listener,
            command_tx,
            main_task,
        }
    }

    pub fn aggregator(&self) -> &Arc<TokioMutex<ContactsAggregator>> {
        &self.aggregator
    }

    pub async fn projection(&self) -> Arc<ContactsProjection> {
        self.aggregator.lock().await.projection()
    }

    pub async fn directory_state(&self) -> DirectorySearchState {
        self.aggregator.lock().await.directory_state()
    }

    /// Loads the address book, then resolves its emails against the
    /// directory in the background.
    pub async fn load(&self, address_book: &dyn AddressBook) {
        let emails = {
            let mut aggregator = self.aggregator.lock().await;
            aggregator.set_local_contacts(address_book.local_contacts());
            aggregator.set_direct_chat_partners(address_book.direct_chat_partners());
            aggregator.emails_to_resolve()
        };
        self.notify().await;
        if emails.is_empty() {
            return;
        }
        let directory = self.directory.clone();
        let command_tx = self.command_tx.clone();
        tokio::spawn(async move {
            let result = directory.lookup_emails(&emails).await;
            if command_tx
                .send(ControllerCommand::EmailsResolved(result))
                .await
                .is_err()
            {
                tracing::trace!("Controller dropped before email lookup completed");
            }
        });
    }

    /// Changes the filter. A search answered from known users only is sent
    /// to the directory again once the new filter allows it.
    pub async fn set_filter(&self, filter: FilterVariant) {
        let pending = {
            let mut aggregator = self.aggregator.lock().await;
            aggregator.set_filter(filter);
            aggregator.resume_directory_search()
        };
        self.notify().await;
        if let Some(pending) = pending {
            self.spawn_search(pending);
        }
    }

    pub async fn search(&self, pattern: &str, force_reset: bool) {
        let pending = self.aggregator.lock().await.search(pattern, force_reset);
        self.notify().await;
        if let Some(pending) = pending {
            self.spawn_search(pending);
        }
    }

    pub async fn force_refresh(&self) {
        self.aggregator.lock().await.force_refresh();
        self.notify().await;
    }

    pub async fn toggle_selection(
        &self,
        identifier: &str,
    ) -> Result<SelectionChange, SelectionError> {
        let change = self.aggregator.lock().await.toggle_selection(identifier)?;
        self.notify().await;
        Ok(change)
    }

    pub async fn add_selected_email(&self, email: &str) -> Contact {
        let contact = self.aggregator.lock().await.add_selected_email(email);
        self.notify().await;
        contact
    }

    fn spawn_search(&self, pending: PendingSearch) {
        let directory = self.directory.clone();
        let command_tx = self.command_tx.clone();
        tokio::spawn(async move {
            let response = directory
                .search_users(pending.pattern(), pending.limit())
                .await;
            if command_tx
                .send(ControllerCommand::SearchCompleted { pending, response })
                .await
                .is_err()
            {
                tracing::trace!("Controller dropped before directory search completed");
            }
        });
    }

    async fn notify(&self) {
        Self::notify_listener(&self.aggregator, self.listener.as_ref()).await;
    }

    async fn notify_listener(
        aggregator: &TokioMutex<ContactsAggregator>,
        listener: &dyn ContactsListener,
    ) {
        let (projection, states) = {
            let mut aggregator = aggregator.lock().await;
            (aggregator.projection(), aggregator.take_state_changes())
        };
        for state in states {
            listener.on_directory_state_changed(state).await;
        }
        listener.on_contacts_changed(projection).await;
    }

    async fn main_loop(
        aggregator: Arc<TokioMutex<ContactsAggregator>>,
        listener: Arc<dyn ContactsListener>,
        mut command_rx: mpsc::Receiver<ControllerCommand>,
    ) {
        while let Some(command) = command_rx.recv().await {
            let changed = {
                let mut aggregator = aggregator.lock().await;
                match command {
                    ControllerCommand::SearchCompleted { pending, response } => {
                        aggregator.apply_search_response(&pending, response)
                    }
                    ControllerCommand::EmailsResolved(Ok(bindings)) => {
                        tracing::debug!(count = bindings.len(), "Resolved local emails");
                        aggregator.apply_email_bindings(bindings);
                        true
                    }
                    ControllerCommand::EmailsResolved(Err(err)) => {
                        tracing::warn!(%err, "Cannot resolve local emails");
                        false
                    }
                }
            };
            if changed {
                Self::notify_listener(&aggregator, listener.as_ref()).await;
            }
        }
    }
}

impl Drop for ContactsController {
    fn drop(&mut self) {
        self.main_task.abort();
    }
}

enum ControllerCommand {
    SearchCompleted {
        pending: PendingSearch,
        response: Result<SearchResponse, DirectoryError>,
    },
    EmailsResolved(Result<HashMap<String, UserId>, DirectoryError>),
}

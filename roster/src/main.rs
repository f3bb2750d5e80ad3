use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context as _, anyhow};
use async_trait::async_trait;
use roster::Config;
use roster::contact::{
    ContactsAggregator, ContactsController, ContactsListener, DirectorySearchState,
    FilterVariant, StaticAddressBook,
};
use roster::models::{BackupState, Contact, CrossSigningState, RoomSummary};
use roster::room::{RoomsSectionAssembler, RoomsSnapshot, SnapshotProvider};
use roster::section::{ContactsProjection, IndexPath, Row};
use roster_directory::{DirectoryUser, MemoryDirectory, UserId};
use serde::Deserialize;
use tokio::sync::mpsc;
use tokio::time::timeout;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;

/// Everything the engine needs, in one JSON document.
#[derive(Deserialize)]
struct Fixture {
    own_user_id: UserId,
    #[serde(default)]
    config: Option<Config>,
    #[serde(default)]
    contacts: Vec<Contact>,
    #[serde(default)]
    direct_chats: Vec<Contact>,
    #[serde(default)]
    directory: Vec<DirectoryUser>,
    #[serde(default)]
    rooms: Vec<RoomSummary>,
    #[serde(default)]
    backup_state: BackupState,
    #[serde(default)]
    cross_signing_state: CrossSigningState,
}

struct StateListener {
    state_tx: mpsc::UnboundedSender<DirectorySearchState>,
}

#[async_trait]
impl ContactsListener for StateListener {
    async fn on_contacts_changed(&self, projection: Arc<ContactsProjection>) {
        tracing::debug!(sections = projection.number_of_sections(), "Contacts changed");
    }

    async fn on_directory_state_changed(&self, state: DirectorySearchState) {
        _ = self.state_tx.send(state);
    }
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "roster=info,roster_directory=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
    let mut args = std::env::args().skip(1);
    let path = PathBuf::from(
        args.next()
            .ok_or(anyhow!("usage: roster <fixture.json> [pattern] [filter]"))?,
    );
    let pattern = args.next().unwrap_or_default();
    let filter = match args.next() {
        Some(raw) => serde_json::from_value::<FilterVariant>(serde_json::Value::String(raw.clone()))
            .map_err(|_| anyhow!("Unknown filter '{}'", raw))?,
        None => FilterVariant::All,
    };
    let raw = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read fixture '{}'", path.display()))?;
    let fixture: Fixture = serde_json::from_str(&raw).context("Failed to parse fixture")?;
    let config = match fixture.config {
        Some(config) => config,
        None => Config::load_default()?,
    };

    let directory = Arc::new(MemoryDirectory::new());
    for user in fixture.directory {
        directory.register(user).await;
    }
    let (state_tx, mut state_rx) = mpsc::unbounded_channel();
    let aggregator = ContactsAggregator::new(&config, fixture.own_user_id.clone());
    let controller = ContactsController::with_listener(
        aggregator,
        directory,
        Arc::new(StateListener { state_tx }),
    );
    let address_book = StaticAddressBook {
        contacts: fixture.contacts,
        direct_chat_partners: fixture.direct_chats,
    };
    controller.load(&address_book).await;
    controller.set_filter(filter).await;
    controller.search(&pattern, true).await;
    while controller.directory_state().await.is_loading() {
        match timeout(Duration::from_secs(5), state_rx.recv()).await {
            Ok(Some(state)) if !state.is_loading() => break,
            Ok(Some(_)) => continue,
            Ok(None) | Err(_) => return Err(anyhow!("Directory search did not complete")),
        }
    }
    let projection = controller.projection().await;
    print_contacts(projection.as_ref());

    let provider = Arc::new(SnapshotProvider::new(RoomsSnapshot {
        rooms: fixture.rooms,
        backup_state: fixture.backup_state,
        cross_signing_state: fixture.cross_signing_state,
    }));
    let rooms = RoomsSectionAssembler::new(&config.rooms, provider).projection();
    println!(
        "rooms: {} sections, {} missed, {} highlighted",
        rooms.number_of_sections(),
        rooms.missed_conversations_count(),
        rooms.missed_highlight_conversations_count()
    );
    Ok(())
}

fn print_contacts(projection: &ContactsProjection) {
    println!("directory: {:?}", projection.directory_state());
    for section in 0..projection.number_of_sections() {
        if let Some(title) = projection.title_for_section(section) {
            println!("# {title}");
        }
        for row in 0..projection.number_of_rows(section) {
            match projection.row_at(IndexPath::new(section, row)) {
                Ok(Row::Action(action)) => println!("  [{action:?}]"),
                Ok(Row::Contact(contact)) => {
                    let id = contact
                        .identifier()
                        .map(|id| id.to_string())
                        .unwrap_or_default();
                    let mark = if projection.is_selected(contact) { "*" } else { " " };
                    println!(" {mark}{} <{}>", contact.display_name, id);
                }
                Err(err) => tracing::warn!(%err, "Row vanished while printing"),
            }
        }
    }
}

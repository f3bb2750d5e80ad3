use std::sync::Arc;

use roster::config::RoomsConfig;
use roster::models::{BackupState, CrossSigningState, RoomSummary};
use roster::room::{
    CrossSigningBannerDisplay, RoomRow, RoomSectionKind, RoomsSectionAssembler, RoomsSnapshot,
    SecureBackupBannerDisplay, SnapshotProvider,
};
use roster::section::{IndexPath, LookupError};

fn room(id: &str, is_invite: bool, notifications: u32, highlights: u32) -> RoomSummary {
    RoomSummary {
        room_id: id.to_string(),
        display_name: id.trim_start_matches('!').to_string(),
        is_invite,
        notification_count: notifications,
        highlight_count: highlights,
    }
}

fn trusted(rooms: Vec<RoomSummary>) -> RoomsSnapshot {
    RoomsSnapshot {
        rooms,
        backup_state: BackupState::Ready,
        cross_signing_state: CrossSigningState::Bootstrapped,
    }
}

fn rooms_assembler(snapshot: RoomsSnapshot) -> (RoomsSectionAssembler, Arc<SnapshotProvider>) {
    let provider = Arc::new(SnapshotProvider::new(snapshot));
    (
        RoomsSectionAssembler::new(&RoomsConfig::default(), provider.clone()),
        provider,
    )
}

#[test]
fn test_banner_displays() {
    assert_eq!(
        SecureBackupBannerDisplay::from_state(BackupState::Absent),
        SecureBackupBannerDisplay::Setup
    );
    assert_eq!(
        SecureBackupBannerDisplay::from_state(BackupState::NotVerified),
        SecureBackupBannerDisplay::Setup
    );
    assert!(!SecureBackupBannerDisplay::from_state(BackupState::Ready).is_shown());
    assert!(!SecureBackupBannerDisplay::from_state(BackupState::Unknown).is_shown());
    assert_eq!(
        CrossSigningBannerDisplay::from_state(CrossSigningState::NotBootstrapped),
        CrossSigningBannerDisplay::Setup
    );
    assert!(!CrossSigningBannerDisplay::from_state(CrossSigningState::Bootstrapped).is_shown());
}

#[test]
fn test_section_order_with_banners() {
    let (assembler, _) = rooms_assembler(RoomsSnapshot {
        rooms: vec![room("!inv", true, 0, 0), room("!chat", false, 0, 0)],
        backup_state: BackupState::Absent,
        cross_signing_state: CrossSigningState::NotBootstrapped,
    });
    let projection = assembler.projection();
    assert_eq!(projection.number_of_sections(), 4);
    assert_eq!(projection.cross_signing_banner_section(), Some(0));
    assert_eq!(projection.secure_backup_banner_section(), Some(1));
    assert_eq!(projection.invites_section(), Some(2));
    assert_eq!(projection.conversation_section(), Some(3));
    assert_eq!(projection.number_of_rows(0), 1);
    assert_eq!(
        projection.row_at(IndexPath::new(0, 0)),
        Ok(RoomRow::CrossSigningBanner)
    );
    assert_eq!(
        projection.row_at(IndexPath::new(1, 0)),
        Ok(RoomRow::SecureBackupBanner)
    );
    assert_eq!(
        projection.row_at(IndexPath::new(1, 1)),
        Err(LookupError::RowOutOfRange(IndexPath::new(1, 1)))
    );
    assert_eq!(projection.room_at(IndexPath::new(3, 0)).unwrap().room_id, "!chat");
    assert_eq!(
        projection.room_at(IndexPath::new(0, 0)),
        Err(LookupError::ActionRow(IndexPath::new(0, 0)))
    );
}

#[test]
fn test_empty_sections_are_omitted() {
    let (assembler, _) = rooms_assembler(trusted(vec![room("!chat", false, 0, 0)]));
    let projection = assembler.projection();
    assert_eq!(projection.number_of_sections(), 1);
    assert_eq!(projection.invites_section(), None);
    assert_eq!(projection.cross_signing_banner_section(), None);
    assert_eq!(projection.conversation_section(), Some(0));
    assert!(projection.invites_cell_data().is_empty());
    assert_eq!(
        projection.row_at(IndexPath::new(1, 0)),
        Err(LookupError::SectionOutOfRange(1))
    );

    let (assembler, _) = rooms_assembler(trusted(Vec::new()));
    assert_eq!(assembler.projection().number_of_sections(), 0);
}

#[test]
fn test_missed_counts() {
    let (assembler, _) = rooms_assembler(trusted(vec![
        room("!invite", true, 0, 0),
        room("!quiet", false, 0, 0),
        room("!unread", false, 3, 0),
        room("!mention", false, 2, 1),
    ]));
    let projection = assembler.projection();
    assert_eq!(projection.missed_conversations_count(), 3);
    assert_eq!(projection.missed_highlight_conversations_count(), 1);
    let conversations: Vec<_> = projection
        .conversation_cell_data()
        .iter()
        .map(|r| r.room_id.as_str())
        .collect();
    assert_eq!(conversations, vec!["!quiet", "!unread", "!mention"]);
    assert_eq!(projection.title_for_section(0).as_deref(), Some("Invites (1)"));
    assert_eq!(
        projection.title_for_section(1).as_deref(),
        Some("Conversations (3)")
    );
}

#[test]
fn test_refresh_reads_provider() {
    let (mut assembler, provider) = rooms_assembler(trusted(vec![room("!chat", false, 0, 0)]));
    provider.replace(RoomsSnapshot {
        rooms: vec![room("!chat", false, 1, 0), room("!new", true, 0, 0)],
        backup_state: BackupState::NotVerified,
        cross_signing_state: CrossSigningState::Bootstrapped,
    });
    // Nothing changes until refreshed.
    assert_eq!(assembler.projection().number_of_sections(), 1);
    let projection = assembler.force_refresh();
    assert_eq!(projection.number_of_sections(), 3);
    assert_eq!(projection.secure_backup_banner_section(), Some(0));
    assert_eq!(projection.missed_conversations_count(), 2);
    assert_eq!(*assembler.force_refresh(), *projection);
}

#[test]
fn test_section_shrink() {
    let provider = Arc::new(SnapshotProvider::new(RoomsSnapshot {
        rooms: vec![room("!a", false, 0, 0), room("!b", false, 0, 0)],
        backup_state: BackupState::Absent,
        cross_signing_state: CrossSigningState::Bootstrapped,
    }));
    let config = RoomsConfig {
        sections_shrinkable: true,
        ..RoomsConfig::default()
    };
    let mut assembler = RoomsSectionAssembler::new(&config, provider);
    assert!(!assembler.toggle_section_shrink(0));
    assert!(assembler.toggle_section_shrink(1));
    let projection = assembler.projection();
    assert_eq!(projection.section_kind(1), Some(RoomSectionKind::Conversations));
    assert_eq!(projection.number_of_rows(1), 0);
    assert_eq!(
        projection.room_at(IndexPath::new(1, 0)),
        Err(LookupError::Shrunk(1))
    );
    // Counters ignore shrinking.
    assert_eq!(projection.conversation_cell_data().len(), 2);
    assert!(assembler.toggle_section_shrink(1));
    assert_eq!(assembler.projection().number_of_rows(1), 2);
}

#[test]
fn test_shrink_disabled() {
    let (mut assembler, _) = rooms_assembler(trusted(vec![room("!a", false, 0, 0)]));
    assert!(!assembler.toggle_section_shrink(0));
    assert_eq!(assembler.projection().number_of_rows(0), 1);
}

#[test]
fn test_section_heights() {
    let config = RoomsConfig {
        header_height: 24.0,
        banner_header_height: 4.0,
        ..RoomsConfig::default()
    };
    let provider = Arc::new(SnapshotProvider::new(RoomsSnapshot {
        rooms: vec![room("!a", false, 0, 0)],
        backup_state: BackupState::Ready,
        cross_signing_state: CrossSigningState::NotBootstrapped,
    }));
    let projection = RoomsSectionAssembler::new(&config, provider).projection();
    assert_eq!(projection.height_for_section(0), 4.0);
    assert_eq!(projection.height_for_section(1), 24.0);
    assert_eq!(projection.height_for_section(7), 0.0);
    assert_eq!(projection.title_for_section(0), None);
}

use serde::{Deserialize, Serialize};

/// Per-room data the conversation list needs. Ordering of rooms is decided
/// by whoever supplies them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSummary {
    pub room_id: String,
    pub display_name: String,
    #[serde(default)]
    pub is_invite: bool,
    #[serde(default)]
    pub notification_count: u32,
    #[serde(default)]
    pub highlight_count: u32,
}

impl RoomSummary {
    pub fn has_unread(&self) -> bool {
        self.notification_count > 0
    }

    pub fn has_highlight(&self) -> bool {
        self.highlight_count > 0
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BackupState {
    #[default]
    Unknown,
    Absent,
    NotVerified,
    Ready,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CrossSigningState {
    #[default]
    NotBootstrapped,
    Bootstrapped,
}

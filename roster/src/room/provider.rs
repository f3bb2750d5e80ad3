use std::sync::RwLock;

use crate::models::{BackupState, CrossSigningState, RoomSummary};

/// Source of the room list and the session trust flags.
pub trait RoomStateProvider: Send + Sync {
    /// Rooms in display order; invites and conversations mixed.
    fn rooms(&self) -> Vec<RoomSummary>;

    fn backup_state(&self) -> BackupState;

    fn cross_signing_state(&self) -> CrossSigningState;
}

#[derive(Clone, Debug, Default)]
pub struct RoomsSnapshot {
    pub rooms: Vec<RoomSummary>,
    pub backup_state: BackupState,
    pub cross_signing_state: CrossSigningState,
}

/// Provider holding a replaceable snapshot.
#[derive(Debug, Default)]
pub struct SnapshotProvider {
    snapshot: RwLock<RoomsSnapshot>,
}

impl SnapshotProvider {
    pub fn new(snapshot: RoomsSnapshot) -> Self {
        Self {
            snapshot: RwLock::new(snapshot),
        }
    }

    pub fn replace(&self, snapshot: RoomsSnapshot) {
        *self.snapshot.write().unwrap_or_else(|e| e.into_inner()) = snapshot;
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, RoomsSnapshot> {
        self.snapshot.read().unwrap_or_else(|e| e.into_inner())
    }
}

impl RoomStateProvider for SnapshotProvider {
    fn rooms(&self) -> Vec<RoomSummary> {
        self.read().rooms.clone()
    }

    fn backup_state(&self) -> BackupState {
        self.read().backup_state
    }

    fn cross_signing_state(&self) -> CrossSigningState {
        self.read().cross_signing_state
    }
}

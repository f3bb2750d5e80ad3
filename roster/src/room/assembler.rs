use std::collections::HashSet;
use std::sync::Arc;

use crate::config::RoomsConfig;
use crate::models::RoomSummary;
use crate::section::{IndexPath, LookupError};

use super::{CrossSigningBannerDisplay, RoomStateProvider, SecureBackupBannerDisplay};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RoomSectionKind {
    CrossSigningBanner,
    SecureBackupBanner,
    Invites,
    Conversations,
}

impl RoomSectionKind {
    pub fn is_banner(self) -> bool {
        matches!(self, Self::CrossSigningBanner | Self::SecureBackupBanner)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RoomRow<'a> {
    CrossSigningBanner,
    SecureBackupBanner,
    Room(&'a RoomSummary),
}

#[derive(Clone, Debug, PartialEq)]
struct RoomSection {
    kind: RoomSectionKind,
    rooms: Vec<RoomSummary>,
    shrunk: bool,
}

/// Immutable section view of the conversation list with its aggregates.
#[derive(Clone, Debug, PartialEq)]
pub struct RoomsProjection {
    sections: Vec<RoomSection>,
    secure_backup_banner: SecureBackupBannerDisplay,
    cross_signing_banner: CrossSigningBannerDisplay,
    missed_conversations_count: usize,
    missed_highlight_conversations_count: usize,
    header_height: f32,
    banner_header_height: f32,
    invites_title: String,
    conversations_title: String,
}

impl RoomsProjection {
    pub fn number_of_sections(&self) -> usize {
        self.sections.len()
    }

    pub fn number_of_rows(&self, section: usize) -> usize {
        match self.sections.get(section) {
            Some(s) if s.kind.is_banner() => 1,
            Some(s) if s.shrunk => 0,
            Some(s) => s.rooms.len(),
            None => 0,
        }
    }

    pub fn section_kind(&self, section: usize) -> Option<RoomSectionKind> {
        self.sections.get(section).map(|s| s.kind)
    }

    pub fn section_index(&self, kind: RoomSectionKind) -> Option<usize> {
        self.sections.iter().position(|s| s.kind == kind)
    }

    pub fn cross_signing_banner_section(&self) -> Option<usize> {
        self.section_index(RoomSectionKind::CrossSigningBanner)
    }

    pub fn secure_backup_banner_section(&self) -> Option<usize> {
        self.section_index(RoomSectionKind::SecureBackupBanner)
    }

    pub fn invites_section(&self) -> Option<usize> {
        self.section_index(RoomSectionKind::Invites)
    }

    pub fn conversation_section(&self) -> Option<usize> {
        self.section_index(RoomSectionKind::Conversations)
    }

    pub fn invites_cell_data(&self) -> &[RoomSummary] {
        self.rooms_of(RoomSectionKind::Invites)
    }

    pub fn conversation_cell_data(&self) -> &[RoomSummary] {
        self.rooms_of(RoomSectionKind::Conversations)
    }

    pub fn secure_backup_banner_display(&self) -> SecureBackupBannerDisplay {
        self.secure_backup_banner
    }

    pub fn cross_signing_banner_display(&self) -> CrossSigningBannerDisplay {
        self.cross_signing_banner
    }

    /// Rooms with missed notifications, pending invites included.
    pub fn missed_conversations_count(&self) -> usize {
        self.missed_conversations_count
    }

    pub fn missed_highlight_conversations_count(&self) -> usize {
        self.missed_highlight_conversations_count
    }

    pub fn row_at(&self, index: IndexPath) -> Result<RoomRow<'_>, LookupError> {
        let section = self
            .sections
            .get(index.section)
            .ok_or(LookupError::SectionOutOfRange(index.section))?;
        match section.kind {
            RoomSectionKind::CrossSigningBanner | RoomSectionKind::SecureBackupBanner
                if index.row != 0 =>
            {
                Err(LookupError::RowOutOfRange(index))
            }
            RoomSectionKind::CrossSigningBanner => Ok(RoomRow::CrossSigningBanner),
            RoomSectionKind::SecureBackupBanner => Ok(RoomRow::SecureBackupBanner),
            _ if section.shrunk => Err(LookupError::Shrunk(index.section)),
            _ => section
                .rooms
                .get(index.row)
                .map(RoomRow::Room)
                .ok_or(LookupError::RowOutOfRange(index)),
        }
    }

    pub fn room_at(&self, index: IndexPath) -> Result<&RoomSummary, LookupError> {
        match self.row_at(index)? {
            RoomRow::Room(room) => Ok(room),
            _ => Err(LookupError::ActionRow(index)),
        }
    }

    pub fn height_for_section(&self, section: usize) -> f32 {
        match self.section_kind(section) {
            Some(kind) if kind.is_banner() => self.banner_header_height,
            Some(_) => self.header_height,
            None => 0.0,
        }
    }

    pub fn title_for_section(&self, section: usize) -> Option<String> {
        let section = self.sections.get(section)?;
        let title = match section.kind {
            RoomSectionKind::Invites => &self.invites_title,
            RoomSectionKind::Conversations => &self.conversations_title,
            _ => return None,
        };
        Some(format!("{} ({})", title, section.rooms.len()))
    }

    fn rooms_of(&self, kind: RoomSectionKind) -> &[RoomSummary] {
        self.sections
            .iter()
            .find(|s| s.kind == kind)
            .map(|s| s.rooms.as_slice())
            .unwrap_or(&[])
    }
}

/// Builds the conversation list sections: cross-signing banner, secure
/// backup banner, invites, conversations. Empty sections are omitted.
pub struct RoomsSectionAssembler {
    config: RoomsConfig,
    provider: Arc<dyn RoomStateProvider>,
    shrunk: HashSet<RoomSectionKind>,
    projection: Arc<RoomsProjection>,
}

impl RoomsSectionAssembler {
    pub fn new<P>(config: &RoomsConfig, provider: Arc<P>) -> Self
    where
        P: RoomStateProvider + 'static,
    {
        let provider: Arc<dyn RoomStateProvider> = provider;
        let shrunk = HashSet::new();
        let projection = Arc::new(Self::build(config, provider.as_ref(), &shrunk));
        Self {
            config: config.clone(),
            provider,
            shrunk,
            projection,
        }
    }

    pub fn projection(&self) -> Arc<RoomsProjection> {
        self.projection.clone()
    }

    /// Recomputes sections and counters from the provider's current rooms.
    pub fn force_refresh(&mut self) -> Arc<RoomsProjection> {
        self.projection = Arc::new(Self::build(
            &self.config,
            self.provider.as_ref(),
            &self.shrunk,
        ));
        self.projection.clone()
    }

    pub fn toggle_section_shrink(&mut self, section: usize) -> bool {
        if !self.config.sections_shrinkable {
            return false;
        }
        let Some(kind) = self
            .projection
            .section_kind(section)
            .filter(|k| !k.is_banner())
        else {
            return false;
        };
        if !self.shrunk.remove(&kind) {
            self.shrunk.insert(kind);
        }
        self.force_refresh();
        true
    }

    fn build(
        config: &RoomsConfig,
        provider: &dyn RoomStateProvider,
        shrunk: &HashSet<RoomSectionKind>,
    ) -> RoomsProjection {
        let rooms = provider.rooms();
        let cross_signing_banner =
            CrossSigningBannerDisplay::from_state(provider.cross_signing_state());
        let secure_backup_banner = SecureBackupBannerDisplay::from_state(provider.backup_state());
        let missed_conversations_count = rooms
            .iter()
            .filter(|r| r.is_invite || r.has_unread())
            .count();
        let missed_highlight_conversations_count =
            rooms.iter().filter(|r| r.has_highlight()).count();
        let (invites, conversations): (Vec<_>, Vec<_>) =
            rooms.into_iter().partition(|r| r.is_invite);

        let mut sections = Vec::with_capacity(4);
        if cross_signing_banner.is_shown() {
            sections.push(RoomSection {
                kind: RoomSectionKind::CrossSigningBanner,
                rooms: Vec::new(),
                shrunk: false,
            });
        }
        if secure_backup_banner.is_shown() {
            sections.push(RoomSection {
                kind: RoomSectionKind::SecureBackupBanner,
                rooms: Vec::new(),
                shrunk: false,
            });
        }
        for (kind, rooms) in [
            (RoomSectionKind::Invites, invites),
            (RoomSectionKind::Conversations, conversations),
        ] {
            if rooms.is_empty() {
                continue;
            }
            sections.push(RoomSection {
                kind,
                rooms,
                shrunk: config.sections_shrinkable && shrunk.contains(&kind),
            });
        }
        tracing::debug!(
            sections = sections.len(),
            missed = missed_conversations_count,
            highlighted = missed_highlight_conversations_count,
            "Rooms projection rebuilt"
        );
        RoomsProjection {
            sections,
            secure_backup_banner,
            cross_signing_banner,
            missed_conversations_count,
            missed_highlight_conversations_count,
            header_height: config.header_height,
            banner_header_height: config.banner_header_height,
            invites_title: config.invites_title.clone(),
            conversations_title: config.conversations_title.clone(),
        }
    }
}

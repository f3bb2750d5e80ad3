/// Lifecycle of the remote user directory search for the active pattern.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DirectorySearchState {
    Loading,
    LoadedButLimited,
    #[default]
    Loaded,
    // The directory is unavailable; results come from known contacts only.
    OfflineLoading,
    OfflineLoaded,
}

impl DirectorySearchState {
    pub fn is_loading(self) -> bool {
        matches!(self, Self::Loading | Self::OfflineLoading)
    }

    pub fn is_offline(self) -> bool {
        matches!(self, Self::OfflineLoading | Self::OfflineLoaded)
    }
}

/// Ticket for one in-flight directory search. Responses are merged only
/// while the ticket's generation is still the current one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingSearch {
    generation: u64,
    pattern: String,
    limit: usize,
}

impl PendingSearch {
    pub(crate) fn new(generation: u64, pattern: String, limit: usize) -> Self {
        Self {
            generation,
            pattern,
            limit,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}

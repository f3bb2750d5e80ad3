use crate::models::{BackupState, CrossSigningState};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SecureBackupBannerDisplay {
    #[default]
    None,
    Setup,
}

impl SecureBackupBannerDisplay {
    pub fn from_state(state: BackupState) -> Self {
        match state {
            BackupState::Absent | BackupState::NotVerified => Self::Setup,
            BackupState::Unknown | BackupState::Ready => Self::None,
        }
    }

    pub fn is_shown(self) -> bool {
        self != Self::None
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CrossSigningBannerDisplay {
    #[default]
    None,
    Setup,
}

impl CrossSigningBannerDisplay {
    pub fn from_state(state: CrossSigningState) -> Self {
        match state {
            CrossSigningState::NotBootstrapped => Self::Setup,
            CrossSigningState::Bootstrapped => Self::None,
        }
    }

    pub fn is_shown(self) -> bool {
        self != Self::None
    }
}

use std::path::{Path, PathBuf};

use anyhow::{Context as _, anyhow};
use roster_directory::HostClassifier;
use serde::{Deserialize, Serialize};

use crate::contact::FilterVariant;

/// Engine configuration, usually read from `roster/config.json` in the
/// platform config directory. Every field has a default.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub contacts: ContactsConfig,
    pub directory: DirectoryConfig,
    pub rooms: RoomsConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactsConfig {
    pub show_invite_button: bool,
    pub show_add_email_button: bool,
    pub sections_shrinkable: bool,
    pub filter: FilterVariant,
    pub header_height: f32,
    pub local_title: String,
    pub directory_title: String,
}

impl Default for ContactsConfig {
    fn default() -> Self {
        Self {
            show_invite_button: false,
            show_add_email_button: false,
            sections_shrinkable: false,
            filter: FilterVariant::All,
            header_height: 30.0,
            local_title: "Contacts".to_string(),
            directory_title: "Directory".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectoryConfig {
    pub search_limit: usize,
    pub external_host_prefixes: Vec<String>,
}

impl DirectoryConfig {
    pub fn host_classifier(&self) -> HostClassifier {
        HostClassifier::new(self.external_host_prefixes.iter().cloned())
    }
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            search_limit: 50,
            external_host_prefixes: HostClassifier::DEFAULT_EXTERNAL_PREFIXES
                .iter()
                .map(|prefix| prefix.to_string())
                .collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomsConfig {
    pub sections_shrinkable: bool,
    pub header_height: f32,
    // Banners render as cells, without a header of their own.
    pub banner_header_height: f32,
    pub invites_title: String,
    pub conversations_title: String,
}

impl Default for RoomsConfig {
    fn default() -> Self {
        Self {
            sections_shrinkable: false,
            header_height: 30.0,
            banner_header_height: 0.0,
            invites_title: "Invites".to_string(),
            conversations_title: "Conversations".to_string(),
        }
    }
}

impl Config {
    pub fn from_json(raw: &str) -> Result<Self, anyhow::Error> {
        let config: Config =
            serde_json::from_str(raw).map_err(|e| anyhow!("Failed to parse config: {}", e))?;
        if config.directory.search_limit == 0 {
            return Err(anyhow!("directory.search_limit must be positive"));
        }
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, anyhow::Error> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config '{}'", path.display()))?;
        Self::from_json(&raw)
    }

    /// Loads the config from [`Self::default_path`], falling back to defaults
    /// when the file does not exist.
    pub fn load_default() -> Result<Self, anyhow::Error> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("roster").join("config.json"))
    }
}

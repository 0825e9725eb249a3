//! Configuration loading and management

mod io;
mod settings;

pub use settings::{
    AuthSettings, ContentSettings, ProgressionSettings, ServerSettings, StorageSettings,
};

use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerSettings,

    #[serde(default)]
    pub storage: StorageSettings,

    #[serde(default)]
    pub content: ContentSettings,

    #[serde(default)]
    pub progression: ProgressionSettings,

    #[serde(default)]
    pub auth: AuthSettings,
}

//! CLI command implementations

pub mod admin;
pub mod init;
pub mod levels;
pub mod serve;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::config::Config;
use crate::content::ContentCatalog;
use crate::service::ProgressService;
use crate::store::Database;

/// Open the database and content named by `config`
pub(crate) fn open_services(config: &Config) -> Result<(Database, ProgressService)> {
    let content = ContentCatalog::load(&config.content).context("Failed to load trick content")?;
    let db = Database::open_configured(&config.storage)?;
    let progress = ProgressService::new(
        Arc::new(db.clone()),
        Arc::new(content),
        config.progression.clone(),
    );
    Ok((db, progress))
}

pub(crate) fn load_config(config_path: Option<&Path>) -> Result<Config> {
    Config::load(config_path)
}

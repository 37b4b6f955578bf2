#![allow(missing_docs)]

//! Application settings for the setup guide.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use crate::{models::DetailMode, store::FileStore};

/// Directory under the platform config directory holding `config.toml`.
pub const CONFIG_DIR: &str = "verse-setup";

/// Prefix of environment overrides, e.g. `VERSE_SETUP_DETAIL_MODE=detailed`.
pub const ENV_PREFIX: &str = "VERSE_SETUP";

const DEFAULT_CONFIG: &str = r#"# Verse setup guide settings.

# Where the saved table configuration and logs are kept.
# data_root = "/home/captain/.local/share/verse-setup"

# "concise" hides callouts an active module already implies; "detailed" shows all.
detail_mode = "concise"
"#;

/// Settings read at start-up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Root for the configuration store and log files.
    pub data_root: PathBuf,
    pub detail_mode: DetailMode,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_root: FileStore::default_root(),
            detail_mode: DetailMode::default(),
        }
    }
}

impl AppConfig {
    /// Defaults, then `config.toml` if present, then `VERSE_SETUP_*` variables.
    pub fn load() -> Result<Self> {
        Self::load_from(&config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let settings = Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()
            .with_context(|| format!("failed to read settings from {}", path.display()))?;
        settings
            .try_deserialize()
            .context("failed to parse settings")
    }

    pub fn log_dir(&self) -> PathBuf {
        self.data_root.join("logs")
    }
}

/// Location of the settings file.
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR)
        .join("config.toml")
}

/// Write a commented default settings file if none exists yet.
pub fn ensure_default_config() -> Result<PathBuf> {
    let path = config_path();
    write_default_config(&path)?;
    Ok(path)
}

fn write_default_config(path: &Path) -> Result<()> {
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(path, DEFAULT_CONFIG).with_context(|| format!("failed to write {}", path.display()))
}

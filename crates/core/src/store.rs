#![allow(missing_docs)]

//! Persistence of the table configuration.

use std::{
    collections::HashMap,
    fs, io,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::models::Configuration;

/// Namespaced, versioned key of the persisted configuration record.
pub const STORAGE_KEY: &str = "verse-setup.v2.configuration";

/// Directory under the platform data directory used by [`FileStore::default_root`].
pub const DEFAULT_DATA_DIR: &str = "verse-setup";

/// Field whose absence marks a record as legacy.
const MARKER_FIELD: &str = "edition";

/// Key-value storage for serialized records.
pub trait ConfigStore {
    fn read(&self, key: &str) -> Result<Option<String>>;
    fn write(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// Stores each key as `<root>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Default location under the user's data directory.
    pub fn default_root() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(DEFAULT_DATA_DIR)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", sanitize_component(key)))
    }
}

impl ConfigStore for FileStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err).with_context(|| format!("failed to read {}", path.display())),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.root)
            .with_context(|| format!("failed to create {}", self.root.display()))?;
        let path = self.path_for(key);
        fs::write(&path, value).with_context(|| format!("failed to write {}", path.display()))
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err).with_context(|| format!("failed to remove {}", path.display())),
        }
    }
}

/// In-process store for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ConfigStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        self.entries.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.lock().remove(key);
        Ok(())
    }
}

/// Serialized representation of the stored configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigRecord {
    pub saved_at: DateTime<Utc>,
    pub configuration: Configuration,
}

/// Load the stored configuration, or defaults.
///
/// Records without an edition or that fail to parse are deleted and replaced by defaults.
pub fn load_configuration(store: &dyn ConfigStore) -> Result<Configuration> {
    let Some(raw) = store.read(STORAGE_KEY)? else {
        debug!("No stored configuration; using defaults");
        return Ok(Configuration::default());
    };

    match parse_record(&raw) {
        Ok(record) => Ok(record.configuration.normalized()),
        Err(reason) => {
            warn!(key = STORAGE_KEY, %reason, "Discarding stored configuration");
            store
                .remove(STORAGE_KEY)
                .context("failed to remove invalid configuration record")?;
            Ok(Configuration::default())
        }
    }
}

/// Write `config` under [`STORAGE_KEY`] and return the stored record.
pub fn save_configuration(store: &dyn ConfigStore, config: &Configuration) -> Result<ConfigRecord> {
    let record = ConfigRecord {
        saved_at: Utc::now(),
        configuration: config.clone(),
    };
    let serialised =
        serde_json::to_string_pretty(&record).context("failed to serialise configuration")?;
    store.write(STORAGE_KEY, &serialised)?;
    Ok(record)
}

fn parse_record(raw: &str) -> Result<ConfigRecord, String> {
    let value: Value = serde_json::from_str(raw).map_err(|err| err.to_string())?;
    let has_marker = value
        .get("configuration")
        .and_then(|configuration| configuration.get(MARKER_FIELD))
        .is_some();
    if !has_marker {
        return Err(format!("record has no `{MARKER_FIELD}` field"));
    }
    serde_json::from_value(value).map_err(|err| err.to_string())
}

fn sanitize_component(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    for ch in input.chars() {
        if ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.') {
            result.push(ch);
        }
    }
    let result = result.trim_matches('.').to_string();
    if result.is_empty() {
        "record".to_string()
    } else {
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Edition, ExpansionId, TimerMode};
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn file_store_round_trip() -> Result<()> {
        let dir = tempdir()?;
        let store = FileStore::new(dir.path().join("data"));

        let mut config = Configuration {
            edition: Edition::Tenth,
            player_count: 2,
            story_card: Some("harkens_folly".to_string()),
            ..Configuration::default()
        }
        .normalized();
        config.expansions.set(ExpansionId::Tenth, true);

        let record = save_configuration(&store, &config)?;
        assert!(store.root().join("verse-setup.v2.configuration.json").exists());
        assert_eq!(record.configuration, config);
        assert_eq!(load_configuration(&store)?, config);
        Ok(())
    }

    #[test]
    fn missing_record_yields_defaults() -> Result<()> {
        let dir = tempdir()?;
        let store = FileStore::new(dir.path());
        assert_eq!(load_configuration(&store)?, Configuration::default());
        Ok(())
    }

    #[test]
    fn legacy_record_is_reset_and_removed() -> Result<()> {
        let store = MemoryStore::new();
        let legacy = json!({
            "saved_at": "2024-03-01T10:00:00Z",
            "configuration": { "player_count": 3, "setup_card": "browncoat_way" }
        });
        store.write(STORAGE_KEY, &legacy.to_string())?;

        assert_eq!(load_configuration(&store)?, Configuration::default());
        assert_eq!(store.read(STORAGE_KEY)?, None);
        Ok(())
    }

    #[test]
    fn unparseable_record_is_reset() -> Result<()> {
        let store = MemoryStore::new();
        store.write(STORAGE_KEY, "{ not json")?;
        assert_eq!(load_configuration(&store)?, Configuration::default());
        assert_eq!(store.read(STORAGE_KEY)?, None);
        Ok(())
    }

    #[test]
    fn nested_groups_merge_against_defaults() -> Result<()> {
        let store = MemoryStore::new();
        let partial = json!({
            "saved_at": "2024-03-01T10:00:00Z",
            "configuration": {
                "edition": "original",
                "player_count": 3,
                "timer": { "mode": "unpredictable" },
                "expansions": { "blue_sun": true }
            }
        });
        store.write(STORAGE_KEY, &partial.to_string())?;

        let config = load_configuration(&store)?;
        assert_eq!(config.player_count, 3);
        assert_eq!(config.player_names.len(), 3);
        assert_eq!(config.timer.mode, TimerMode::Unpredictable);
        assert_eq!(config.timer.game_length_tokens, 20);
        assert!(config.expansions.is_active(ExpansionId::BlueSun));
        assert!(!config.expansions.is_active(ExpansionId::Kalidasa));
        assert_eq!(config.setup_card, "standard");
        assert!(!config.optional_rules.resolve_conflicts_manually);
        Ok(())
    }

    #[test]
    fn sanitize_creates_safe_filenames() {
        assert_eq!(sanitize_component("../verse setup/v2"), "versesetupv2");
        assert_eq!(sanitize_component(STORAGE_KEY), STORAGE_KEY);
        assert_eq!(sanitize_component("///"), "record");
    }
}

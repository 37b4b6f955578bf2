mod app;

use std::{
    fs::{self, OpenOptions},
    path::Path,
    sync::Mutex,
};

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{prelude::*, EnvFilter};
use verse_setup_core::{
    config::{self, AppConfig},
    store, Catalog, FileStore,
};

#[tokio::main]
async fn main() -> Result<()> {
    let settings_path = config::ensure_default_config()?;
    let settings = AppConfig::load()?;
    init_logging(&settings.log_dir())?;
    info!(settings = %settings_path.display(), data_root = %settings.data_root.display(), "Starting");

    let catalog = Catalog::builtin().context("failed to load built-in content")?;
    let store = FileStore::new(settings.data_root.clone());
    let configuration = store::load_configuration(&store)?;

    let mut app = app::VerseSetupApp::new(catalog, store, configuration, settings.detail_mode);
    app.run().await
}

fn init_logging(log_dir: &Path) -> Result<()> {
    fs::create_dir_all(log_dir)
        .with_context(|| format!("failed to create {}", log_dir.display()))?;
    let log_path = log_dir.join("verse-setup.log");
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("failed to open {}", log_path.display()))?;

    let env_filter = EnvFilter::from_default_env();

    let file_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_ansi(false)
        .compact()
        .with_writer(Mutex::new(log_file));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    Ok(())
}

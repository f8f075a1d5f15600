use anyhow::{Context, Result};
use env_logger::{Env, Target};
use std::fs::{self, OpenOptions};
use std::path::PathBuf;

use crate::config::LogConfig;

/// Send logs to a file, the terminal belongs to the UI.
pub fn init(config: &LogConfig) -> Result<PathBuf> {
    let path = match &config.file {
        Some(path) => path.clone(),
        None => default_path().context("Can not determine a cache directory for the log file")?,
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    env_logger::Builder::from_env(Env::default().default_filter_or(config.level.as_str()))
        .target(Target::Pipe(Box::new(file)))
        .init();

    Ok(path)
}

fn default_path() -> Option<PathBuf> {
    dirs::cache_dir().map(|dir| dir.join("wlscan").join("wlscan.log"))
}

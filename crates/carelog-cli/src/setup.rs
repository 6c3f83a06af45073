//! CLI setup module
//!
//! Handles configuration, logging and core initialization for CLI usage.

use anyhow::{Context, Result};
use carelog_core::{AppCore, CarelogConfig, paths};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

use crate::cli::BackendArg;

const LOG_FILE: &str = "carelog.log";

/// Load the config file. An explicit path must exist and parse.
pub fn load_config(path: Option<&Path>, backend: Option<BackendArg>) -> Result<CarelogConfig> {
    let mut config = match path {
        Some(path) => CarelogConfig::from_file(path)?,
        None => CarelogConfig::load(),
    };
    if let Some(backend) = backend {
        config.storage.backend = backend.into();
    }
    config.validate()?;
    Ok(config)
}

/// Resolve and create the data directory.
pub fn prepare_data_dir(data_dir: Option<PathBuf>) -> Result<PathBuf> {
    let Some(dir) = data_dir else {
        return paths::ensure_data_dir();
    };
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create data directory {}", dir.display()))?;
    Ok(dir)
}

/// Log to stderr (filtered by RUST_LOG) and to a daily file under the data dir.
pub fn init_logging(data_dir: &Path, verbose: bool) -> Result<WorkerGuard> {
    let log_dir = paths::logs_dir_in(data_dir);
    std::fs::create_dir_all(&log_dir).ok();

    let file_appender = tracing_appender::rolling::daily(log_dir, LOG_FILE);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(false)
                .with_level(true),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    Ok(guard)
}

/// Build the embedded Carelog core
pub fn prepare_core(config: CarelogConfig, data_dir: &Path) -> Result<Arc<AppCore>> {
    Ok(Arc::new(AppCore::new(config, data_dir)?))
}

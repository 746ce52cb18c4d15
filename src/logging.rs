//! Log setup
//!
//! The library only emits `tracing` events. Drivers that want them on disk
//! call [`init`] once at startup and keep the returned guard alive.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directive
pub const LOG_ENV: &str = "ZABBIX_LLD_LOG";

/// Default log file location
pub fn default_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("zabbix-lld").join("zabbix-lld.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".zabbix-lld").join("zabbix-lld.log");
    }
    PathBuf::from("zabbix-lld.log")
}

/// Install a file-backed subscriber.
///
/// `ZABBIX_LLD_LOG` overrides `default_filter` when set.
pub fn init(default_filter: &str, log_path: Option<&Path>) -> Result<WorkerGuard> {
    let log_path = log_path
        .map(Path::to_path_buf)
        .unwrap_or_else(default_log_path);

    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory {}", parent.display()))?;
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {}", log_path.display()))?;

    let filter = match std::env::var(LOG_ENV) {
        Ok(directive) if !directive.trim().is_empty() => EnvFilter::try_new(directive),
        _ => EnvFilter::try_new(default_filter),
    }
    .context("Invalid log filter")?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install log subscriber: {}", e))?;

    tracing::info!("Log file: {:?}", log_path);

    Ok(guard)
}

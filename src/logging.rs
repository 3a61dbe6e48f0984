use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 日志文件路径（TUI 占用终端，日志只写文件）
pub fn get_log_path() -> PathBuf {
    crate::fs::get_data_dir().join("logs").join("dlg.log")
}

/// Install the tracing subscriber. `RUST_LOG` wins when set; otherwise the
/// level is INFO, or DEBUG with `--verbose`.
pub fn init(verbose: bool) -> Result<()> {
    let log_path = get_log_path();
    if let Some(dir) = log_path.parent() {
        fs::create_dir_all(dir).context("Failed to create log directory")?;
    }

    let log_file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .context("Failed to open log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(env_filter(verbose))
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
        .context("Failed to install log subscriber")?;

    info!(verbose, path = %log_path.display(), "logging initialized");
    Ok(())
}

fn env_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(verbose))
}

fn default_filter(verbose: bool) -> EnvFilter {
    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };
    EnvFilter::default().add_directive(level.into())
}

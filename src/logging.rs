//! Tracing subscriber setup for the command-line front end

use std::path::Path;

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

use crate::config::LOG_ENV_VAR;

/// Install a global subscriber that writes to `log_path`
///
/// The filter is read from `VERSION_UPDATER_LOG` and defaults to `info`.
/// Keep the returned guard alive for as long as logs should be flushed.
pub fn init_logging(log_path: &Path, json: bool) -> anyhow::Result<WorkerGuard> {
    let dir = log_path.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory {:?}", dir))?;

    let file_name = log_path
        .file_name()
        .context("Log path has no file name")?;

    let appender = tracing_appender::rolling::never(dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(fmt::layer().json().with_ansi(false).with_writer(writer))
            .try_init()?;
    } else {
        registry
            .with(fmt::layer().with_ansi(false).with_writer(writer))
            .try_init()?;
    }

    Ok(guard)
}

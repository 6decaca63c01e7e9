use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::EnvFilter;

use crate::infra::{config::LogConfig, error::AppError, storage_layout::StorageLayout};

/// Installs the global subscriber. `RUST_LOG` wins over the configured level.
///
/// With a log file (always the case for the full-screen UI) events go through
/// a non-blocking file writer; the returned guard must live until exit so
/// buffered lines are flushed.
pub fn init(
    config: &LogConfig,
    layout: &StorageLayout,
    full_screen: bool,
) -> Result<Option<WorkerGuard>, AppError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    match resolve_log_file(config, layout, full_screen) {
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .with_target(true)
                .try_init()
                .map_err(AppError::LoggingInit)?;
            Ok(None)
        }
        Some(path) => {
            let appender = file_appender(&path)?;
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true)
                .try_init()
                .map_err(AppError::LoggingInit)?;
            Ok(Some(guard))
        }
    }
}

fn resolve_log_file(config: &LogConfig, layout: &StorageLayout, full_screen: bool) -> Option<PathBuf> {
    match &config.file {
        Some(file) if file.is_absolute() => Some(file.clone()),
        Some(file) => Some(layout.config_dir.join(file)),
        None if full_screen => Some(layout.default_log_file()),
        None => None,
    }
}

fn file_appender(path: &Path) -> Result<RollingFileAppender, AppError> {
    let dir = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir).map_err(|source| AppError::StorageDirCreate {
        path: dir.to_path_buf(),
        source,
    })?;

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "pdesk.log".to_owned());

    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name)
        .build(dir)
        .map_err(|error| AppError::LoggingInit(Box::new(error)))
}

//! Console and daily log file output

use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::LoggingError;
use crate::settings::APP_DIR;

pub struct LogOptions {
    pub directory: PathBuf,
    /// Rotated files beyond this count are deleted by the appender
    pub max_files: usize,
    /// Used when `RUST_LOG` is unset or invalid
    pub default_filter: String,
}

impl LogOptions {
    /// One file per day under `<local data dir>/custom-rpc/logs`, a week kept.
    pub fn for_app() -> Self {
        let directory = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
            .join("logs");

        Self {
            directory,
            max_files: 7,
            default_filter: "info".to_string(),
        }
    }
}

fn file_appender(options: &LogOptions) -> Result<RollingFileAppender, LoggingError> {
    std::fs::create_dir_all(&options.directory).map_err(|source| LoggingError::Directory {
        path: options.directory.clone(),
        source,
    })?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(APP_DIR)
        .filename_suffix("log")
        .max_log_files(options.max_files)
        .build(&options.directory)?;

    Ok(appender)
}

/// Install the global subscriber. Hold the returned guard until exit so
/// buffered file output gets flushed.
pub fn init_logging(options: &LogOptions) -> Result<WorkerGuard, LoggingError> {
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender(options)?);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&options.default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .with(fmt::layer().with_ansi(false).with_writer(file_writer))
        .try_init()?;

    tracing::info!(
        "custom-rpc {} logging to {}",
        env!("CARGO_PKG_VERSION"),
        options.directory.display()
    );

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn app_logs_live_next_to_other_app_data() {
        let options = LogOptions::for_app();
        assert!(options.directory.ends_with("custom-rpc/logs"));
        assert_eq!(options.max_files, 7);
    }

    #[test]
    fn file_appender_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let options = LogOptions {
            directory: dir.path().join("nested").join("logs"),
            max_files: 2,
            default_filter: "debug".to_string(),
        };

        let mut appender = file_appender(&options).unwrap();
        appender.write_all(b"connected\n").unwrap();
        appender.flush().unwrap();

        let names: Vec<String> = std::fs::read_dir(&options.directory)
            .unwrap()
            .flatten()
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names.len(), 1);
        assert!(names[0].starts_with("custom-rpc."));
        assert!(names[0].ends_with(".log"));
    }
}

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use peppa_core::AppInfo;
use tracing::{Level, event};
use tracing_appender::non_blocking::{self, WorkerGuard};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::LoggingConfig;

/// Keeps the background writer alive; logs are flushed when it drops.
pub struct LoggingGuard {
    _guard: WorkerGuard,
    pub log_path: PathBuf,
}

/// Installs the global subscriber. `RUST_LOG` overrides the configured level.
///
/// With `json_file` set, events go to that file as JSON lines and the returned
/// guard must be held for the lifetime of the session. Otherwise a plain fmt
/// subscriber writes to stderr and `None` is returned.
pub fn init_logging(logging: &LoggingConfig) -> Result<Option<LoggingGuard>> {
    let level = logging.level().unwrap_or(Level::INFO);
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    let Some(log_path) = logging.json_file.clone() else {
        let subscriber = fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .finish();
        // Ignore error if a global subscriber is already set (e.g., when running in tests)
        let _ = tracing::subscriber::set_global_default(subscriber);
        announce(None);
        return Ok(None);
    };

    let log_dir = log_path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    fs::create_dir_all(&log_dir)
        .with_context(|| format!("creating log directory at {}", log_dir.display()))?;

    let file = File::create(&log_path)
        .with_context(|| format!("creating log file at {}", log_path.display()))?;

    let (writer, guard) = non_blocking::NonBlockingBuilder::default()
        .lossy(false)
        .finish(file);

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .json()
        .with_current_span(false)
        .with_span_events(FmtSpan::NONE)
        .with_writer(writer)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
    announce(Some(&log_path));

    Ok(Some(LoggingGuard {
        _guard: guard,
        log_path,
    }))
}

fn announce(log_path: Option<&Path>) {
    event!(
        target: "peppa_table::table",
        Level::INFO,
        app = AppInfo::name(),
        version = AppInfo::version(),
        log_path = ?log_path,
        "logging initialised"
    );
}

#[cfg(test)]
mod tests {
    use super::init_logging;
    use crate::config::LoggingConfig;

    #[test]
    fn json_file_is_created_under_missing_directories() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("nested").join("table.jsonl");
        let config = LoggingConfig {
            level: "debug".to_string(),
            json_file: Some(path.clone()),
        };
        let guard = init_logging(&config).expect("init").expect("guard");
        assert_eq!(guard.log_path, path);
        assert!(path.exists());

        // A second install is tolerated.
        let again = LoggingConfig::default();
        assert!(init_logging(&again).expect("second init").is_none());
    }
}

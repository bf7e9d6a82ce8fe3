use std::path::Path;

use tracing::{info, warn};
use tracing_appender::non_blocking;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{self, RollingFileAppender};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Keeps the non-blocking log writers flushing. Hold it for the life of the process.
pub struct LogGuards {
    _guards: Vec<WorkerGuard>,
}

/// Initialize service logging: console always, plus `{log_dir}/{service_name}.log`
/// when that directory is writable. Level comes from `RUST_LOG`.
pub fn init_service_logging(log_dir: &str, service_name: &str) -> Result<LogGuards, anyhow::Error> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let (stdout_writer, stdout_guard) = non_blocking(std::io::stdout());

    if !can_write_to(log_dir) {
        let console_layer = fmt::layer()
            .with_writer(stdout_writer)
            .with_ansi(true)
            .with_target(false);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(console_layer)
            .try_init()?;
        info!("Logging initialized - console output only (could not create {log_dir})");
        return Ok(LogGuards {
            _guards: vec![stdout_guard],
        });
    }

    // Rotate before the appender opens the file
    let rotation = rotate_logs_on_startup(log_dir, service_name);

    let (file_writer, file_guard) = non_blocking(open_log_file(log_dir, service_name));
    let file_layer = fmt::layer()
        .with_writer(file_writer)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true);

    let console_layer = fmt::layer()
        .with_writer(stdout_writer)
        .with_ansi(true)
        .with_target(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .try_init()?;

    match rotation {
        Ok(Some(backup)) => info!("Previous log file backed up to: {backup}"),
        Ok(None) => {}
        Err(e) => warn!("Could not rotate previous log file: {}", e),
    }
    info!("Logging initialized - logs will be written to {log_dir}/{service_name}.log");

    Ok(LogGuards {
        _guards: vec![file_guard, stdout_guard],
    })
}

/// One file per process run; older runs are kept by `rotate_logs_on_startup`.
fn open_log_file(log_dir: &str, service_name: &str) -> RollingFileAppender {
    rolling::never(log_dir, format!("{service_name}.log"))
}

fn can_write_to(log_dir: &str) -> bool {
    let marker = format!("{log_dir}/.test_write");
    std::fs::create_dir_all(log_dir)
        .and_then(|_| std::fs::File::create(&marker))
        .and_then(|_| std::fs::remove_file(&marker))
        .is_ok()
}

/// Moves the previous run's log aside with a timestamp suffix and returns the
/// backup path, or `None` when there was nothing to move.
pub fn rotate_logs_on_startup(
    log_dir: &str,
    service_name: &str,
) -> Result<Option<String>, anyhow::Error> {
    let log_file = format!("{log_dir}/{service_name}.log");

    if !Path::new(&log_file).exists() {
        return Ok(None);
    }

    let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");
    let backup_file = format!("{log_dir}/{service_name}.{timestamp}.log");
    std::fs::rename(&log_file, &backup_file)?;
    Ok(Some(backup_file))
}

//! Logging setup for the pipestore binary

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Create the log file, truncating an earlier one
pub fn create_log_file(path: &Path) -> Result<std::fs::File, std::io::Error> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)
}

/// Console output filtered by `RUST_LOG` (default `info`), plus a full debug log
/// when a log file is given
pub fn init(log_file: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let console = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_level(true)
        .with_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")));

    let file = match log_file {
        Some(path) => Some(
            fmt::layer()
                .with_writer(Mutex::new(create_log_file(path)?))
                .with_ansi(false)
                .with_target(false)
                .with_thread_ids(false)
                .with_level(true)
                .with_filter(EnvFilter::new("debug")),
        ),
        None => None,
    };

    tracing_subscriber::registry().with(console).with(file).try_init()?;
    Ok(())
}

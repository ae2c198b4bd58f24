//! Tracing subscriber setup
//!
//! Logs go to a JSON file in the data directory. `--verbose` adds a
//! human-readable stderr layer. `RUST_LOG` overrides the default filter.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const DEFAULT_FILTER: &str = "app_update=info";
const VERBOSE_FILTER: &str = "app_update=debug";

/// Install the global subscriber.
///
/// The returned guard flushes the file writer on drop and must be kept alive
/// for the lifetime of the program. Without a usable log directory only the
/// stderr layer (if requested) is installed.
pub fn init(log_path: &Path, verbose: bool) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose { VERBOSE_FILTER } else { DEFAULT_FILTER })
    });

    let (file_layer, guard) = match file_writer(log_path) {
        Some((writer, guard)) => (
            Some(fmt::layer().json().with_writer(writer).with_ansi(false)),
            Some(guard),
        ),
        None => (None, None),
    };

    let stderr_layer = verbose.then(|| {
        fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .init();

    guard
}

fn file_writer(
    log_path: &Path,
) -> Option<(tracing_appender::non_blocking::NonBlocking, WorkerGuard)> {
    let dir = log_path.parent()?;
    let file_name = log_path.file_name()?;

    if let Err(e) = std::fs::create_dir_all(dir) {
        eprintln!("Failed to create log directory {:?}: {}", dir, e);
        return None;
    }

    let appender = tracing_appender::rolling::never(dir, file_name);
    Some(tracing_appender::non_blocking(appender))
}

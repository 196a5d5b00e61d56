//! Logging utilities for the figure toolkit.
//!
//! Structured tracing setup shared by the demo binaries, plus small
//! helpers for timing render passes and recording export statistics.

use std::path::Path;
use std::time::Instant;

use tracing::{debug, error, info};

/// Initialize the tracing subscriber with the given log level.
///
/// `RUST_LOG` takes precedence over `log_level` when set.
pub fn init_tracing(log_level: &str) {
    let filter = match std::env::var("RUST_LOG") {
        Ok(val) => val,
        Err(_) => log_level.to_string(),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}

/// Run an operation with timing logged in a single statement.
pub fn log_timed_operation<F, R>(operation: &str, f: F) -> R
where
    F: FnOnce() -> R,
{
    let start = Instant::now();

    debug!(operation = operation, "Starting operation");

    let result = f();

    info!(
        operation = operation,
        duration_ms = start.elapsed().as_secs_f64() * 1000.0,
        "Operation completed"
    );

    result
}

/// Log statistics for an exported figure file.
pub fn log_export_stats(path: &Path, width: u32, height: u32, kind: &str) {
    let size_bytes = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);
    info!(
        operation = "export",
        path = %path.display(),
        width = width,
        height = height,
        kind = kind,
        size_kb = size_bytes / 1024,
        "Figure exported"
    );
}

/// Log an error with context.
pub fn log_error(error: &crate::error::TufteError, context: &str) {
    error!(
        error = %error,
        context = context,
        "Error occurred"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_log_timed_operation() {
        // Functional test to ensure the wrapper passes the result through
        let result = log_timed_operation("test_operation", || {
            std::thread::sleep(Duration::from_millis(1));
            42
        });

        assert_eq!(result, 42);
    }
}

//! Tracing setup.
//!
//! Logs go to a daily rolling file so they never garble the prompt.
//! `--verbose` raises the filter to debug.

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use tutor_infrastructure::TutorPaths;

const LOG_FILE_PREFIX: &str = "tutor.log";

fn filter(verbose: bool) -> EnvFilter {
    let level = if verbose { "debug" } else { "info" };
    let default_filter = format!(
        "tutor={level},tutor_core={level},tutor_application={level},tutor_infrastructure={level}"
    );
    if verbose {
        return default_filter.into();
    }
    EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into())
}

/// Installs the global subscriber. The returned guard must live until exit
/// so buffered lines reach the file.
pub fn init(verbose: bool) -> Option<WorkerGuard> {
    let log_dir = match TutorPaths::log_dir() {
        Ok(dir) => match std::fs::create_dir_all(&dir) {
            Ok(()) => Some(dir),
            Err(e) => {
                eprintln!("Warning: Could not create log directory {:?}: {}", dir, e);
                None
            }
        },
        Err(e) => {
            eprintln!("Warning: Could not resolve log directory: {}", e);
            None
        }
    };

    match log_dir {
        Some(dir) => {
            let file_appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            tracing_subscriber::registry()
                .with(filter(verbose))
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(non_blocking)
                        .with_ansi(false),
                )
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry()
                .with(filter(verbose))
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
            None
        }
    }
}

//! Logging setup
//!
//! Console output always; with a log directory, also a daily rolling file
//! (POS machines usually run the client without anyone watching the
//! console).

use std::path::Path;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Initialize the global subscriber
///
/// `RUST_LOG` wins over `level` when set.
pub fn init_logger(level: &str, log_dir: Option<&Path>) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("print_client={level},ticket_printer={level},shared={level}").into()
    });

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    if let Some(dir) = log_dir {
        match std::fs::create_dir_all(dir) {
            Ok(()) => {
                let file_appender = tracing_appender::rolling::daily(dir, "print-client");
                subscriber
                    .with_writer(std::io::stdout.and(file_appender))
                    .with_ansi(false)
                    .init();
                return;
            }
            Err(e) => eprintln!("Log directory {} unavailable: {e}", dir.display()),
        }
    }

    subscriber.init();
}

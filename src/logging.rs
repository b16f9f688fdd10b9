//! Tracing setup for binaries embedding this crate.

use tracing::Level;

/// Initializes the global tracing subscriber with the given level name.
///
/// Unrecognized names fall back to `info`; `"off"` coerces to the error
/// level so genuine failures still surface. A second call is a no-op, so
/// tests and embedding binaries can both call it freely.
pub fn init(level: &str) {
    let level = match level {
        "off" | "error" => Level::ERROR,
        "warn" => Level::WARN,
        "debug" => Level::DEBUG,
        "trace" => Level::TRACE,
        _ => Level::INFO,
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}

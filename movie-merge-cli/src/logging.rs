// movie-merge-cli/src/logging.rs
//
// Logging setup for the CLI. The application uses the standard `log` crate
// with `env_logger` as the backend; verbosity is selected via the RUST_LOG
// environment variable (info by default):
// - RUST_LOG=debug: detailed pipeline and ffmpeg command tracing
// - RUST_LOG=warn: problems only

use env_logger::Env;

/// Initializes env_logger with an `info` default filter.
pub fn init() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();
}

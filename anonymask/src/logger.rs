// anonymask/src/logger.rs
//! Logger setup for the CLI.
//!
//! The core library only emits through the `log` facade; this module installs
//! `env_logger` as the backend. `RUST_LOG` is honored unless the command line
//! forces a level with `--quiet` or `--debug`. Log lines go to stderr as
//! `[LEVEL target] message` so they never mix with masked output on stdout.

use std::io::Write;

use env_logger::{Builder, Env};
use log::LevelFilter;

/// Default filter when neither `RUST_LOG` nor a flag says otherwise.
const DEFAULT_FILTER: &str = "warn";

/// Initializes the global logger. Calling it twice is harmless.
pub fn init_logger(level_override: Option<LevelFilter>) {
    let mut builder = Builder::from_env(Env::default().default_filter_or(DEFAULT_FILTER));
    if let Some(level) = level_override {
        builder.filter_level(level);
    }
    builder.format(|buf, record| writeln!(buf, "[{} {}] {}", record.level(), record.target(), record.args()));
    // A logger may already be installed, e.g. by a test harness.
    let _ = builder.try_init();
}

/// Maps the `--quiet` / `--debug` flags to a level override.
pub fn level_from_flags(quiet: bool, debug: bool) -> Option<LevelFilter> {
    match (quiet, debug) {
        (true, _) => Some(LevelFilter::Error),
        (false, true) => Some(LevelFilter::Debug),
        (false, false) => None,
    }
}

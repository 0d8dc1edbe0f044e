//! Tracing subscriber setup.
//!
//! Diagnostics go to stderr through `tracing`; the user-facing report goes to
//! stdout through [`crate::output`], so piping `taskol plan --json` stays
//! clean. `RUST_LOG` overrides the configured level.

use crate::config::LoggingConfig;
use std::fs::File;
use std::sync::Mutex;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

static LOG_GUARD: Mutex<Option<tracing_appender::non_blocking::WorkerGuard>> = Mutex::new(None);

/// Install the global subscriber. Later calls are ignored.
pub fn init(cfg: &LoggingConfig) {
    let console_level = parse_level(&cfg.level).unwrap_or(LevelFilter::INFO);
    let console_filter = EnvFilter::builder()
        .with_default_directive(console_level.into())
        .from_env_lossy();

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .with_filter(console_filter);

    let registry = tracing_subscriber::registry().with(console_layer);

    let Some(path) = &cfg.file else {
        let _ = registry.try_init();
        return;
    };

    let file = match File::create(path) {
        Ok(file) => file,
        Err(err) => {
            let _ = registry.try_init();
            tracing::warn!(file = %path.display(), error = %err, "cannot open log file");
            return;
        }
    };

    let (writer, guard) = tracing_appender::non_blocking(file);
    if let Ok(mut g) = LOG_GUARD.lock() {
        *g = Some(guard);
    }

    let file_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::DEBUG.into())
        .from_env_lossy();
    let file_layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_filter(file_filter);

    let _ = registry.with(file_layer).try_init();
}

/// Parse a level name, case-insensitively.
pub fn parse_level(s: &str) -> Option<LevelFilter> {
    match s.to_lowercase().as_str() {
        "error" => Some(LevelFilter::ERROR),
        "warn" => Some(LevelFilter::WARN),
        "info" => Some(LevelFilter::INFO),
        "debug" => Some(LevelFilter::DEBUG),
        "trace" => Some(LevelFilter::TRACE),
        _ => None,
    }
}

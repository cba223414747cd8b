//! Process-wide logging setup.
//!
//! Mirrors the teacher's `tracing` + `tracing-subscriber` stack: an
//! `EnvFilter` driven by `RUST_LOG` (defaulting to `info`), with an optional
//! JSON formatter for environments that ship logs to a collector.

use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Installs the global `tracing` subscriber. Must be called once, as early as
/// possible in `main`.
pub fn init(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);

    match format {
        LogFormat::Text => subscriber.init(),
        LogFormat::Json => subscriber.json().init(),
    }
}

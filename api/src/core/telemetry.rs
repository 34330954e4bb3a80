//! Global `tracing` subscriber setup shared by the server and the seeder.
//!
//! - `RUST_LOG` wins over `logging.level`
//! - RFC3339 UTC timestamps via `chrono`
//! - compact or JSON stdout output
//! - optional plain-text file sink through a non-blocking writer

use std::io::{self, IsTerminal};

use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::layer::{Layered, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

use crate::core::app_config::{LogFormat, LoggingConfig};

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("invalid log filter '{directive}': {reason}")]
    Filter { directive: String, reason: String },

    #[error("cannot open log file: {0}")]
    File(#[from] io::Error),

    #[error("global subscriber already set: {0}")]
    Init(String),
}

/// RFC3339 UTC timer implemented via `chrono`.
/// Example output: `2025-09-12T10:20:30Z`
#[derive(Clone, Debug, Default)]
struct ChronoRfc3339Utc;

impl FormatTime for ChronoRfc3339Utc {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        let now = chrono::Utc::now();
        w.write_str(&now.to_rfc3339_opts(chrono::SecondsFormat::Secs, true))
    }
}

type Base = Layered<EnvFilter, Registry>;
type BoxedLayer = Box<dyn Layer<Base> + Send + Sync>;

/// Install the global subscriber.
///
/// The returned guard flushes the file writer on drop; keep it alive for
/// the lifetime of the process.
pub fn init(cfg: &LoggingConfig) -> Result<Option<WorkerGuard>, TelemetryError> {
    let filter = build_filter(&cfg.level)?;
    let mut layers: Vec<BoxedLayer> = vec![stdout_layer(cfg)];

    let guard = match &cfg.path {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| std::path::Path::new("."));
            let file_name = path.file_name().ok_or_else(|| {
                io::Error::new(io::ErrorKind::InvalidInput, "logging.path has no file name")
            })?;
            std::fs::create_dir_all(dir)?;

            let appender = tracing_appender::rolling::never(dir, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            layers.push(
                fmt::layer()
                    .with_timer(ChronoRfc3339Utc)
                    .with_ansi(false)
                    .with_target(true)
                    .with_writer(writer)
                    .boxed(),
            );
            Some(guard)
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(layers)
        .try_init()
        .map_err(|e| TelemetryError::Init(e.to_string()))?;

    Ok(guard)
}

fn build_filter(level: &str) -> Result<EnvFilter, TelemetryError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(level).map_err(|e| TelemetryError::Filter {
        directive: level.to_string(),
        reason: e.to_string(),
    })
}

fn stdout_layer(cfg: &LoggingConfig) -> BoxedLayer {
    match cfg.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_timer(ChronoRfc3339Utc)
            .with_current_span(true)
            .with_span_list(false)
            .boxed(),
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_timer(ChronoRfc3339Utc)
            .with_target(true)
            .with_ansi(cfg.ansi && io::stdout().is_terminal())
            .boxed(),
    }
}

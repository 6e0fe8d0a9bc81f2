//! Logging setup
//!
//! `RUST_LOG` filters (default `brewline=info`). `BREWLINE_LOG_FORMAT=json`
//! switches stdout to structured JSON; anything else is pretty. When
//! `BREWLINE_LOG_DIR` is set, a daily-rotated JSON copy is written there too.

use crate::telemetry;
use anyhow::{anyhow, Result};
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const ENV_LOG_FORMAT: &str = "BREWLINE_LOG_FORMAT";
pub const ENV_LOG_DIR: &str = "BREWLINE_LOG_DIR";
const DEFAULT_FILTER: &str = "brewline=info";
const LOG_FILE_PREFIX: &str = "brewline.log";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LogSettings {
    pub format: LogFormat,
    pub dir: Option<PathBuf>,
}

impl LogSettings {
    pub fn from_env() -> Self {
        let format = LogFormat::parse(std::env::var(ENV_LOG_FORMAT).ok().as_deref());
        let dir = std::env::var(ENV_LOG_DIR)
            .ok()
            .filter(|d| !d.trim().is_empty())
            .map(|d| PathBuf::from(shellexpand::tilde(d.trim()).into_owned()));
        Self { format, dir }
    }
}

/// Install the global subscriber. Keep the returned guard alive for the
/// life of the process or buffered file output is lost.
pub fn init(settings: &LogSettings) -> Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(DEFAULT_FILTER))
        .map_err(|e| anyhow!("Failed to create env filter: {}", e))?;

    let (file_layer, guard) = match &settings.dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().json().with_ansi(false).with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let registry = tracing_subscriber::registry()
        .with(telemetry::layer())
        .with(env_filter)
        .with(file_layer);

    let installed = match settings.format {
        LogFormat::Json => registry.with(fmt::layer().json()).try_init(),
        LogFormat::Pretty => registry.with(fmt::layer().pretty()).try_init(),
    };
    installed.map_err(|e| anyhow!("Failed to install subscriber: {}", e))?;

    Ok(guard)
}

//! Tracing setup: console layer (pretty or JSON) plus an optional JSON-lines file.

use std::path::Path;

use receipt_config::Logging;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::FILE_GUARD;

fn console_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Install the global subscriber. Console output goes to stderr so stdout
/// stays clean for results and `--json` objects.
pub fn init_tracing(json: bool, level: &str, logging: Option<&Logging>) -> eyre::Result<()> {
    let console_json = json.then(|| {
        fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_filter(console_filter(level))
    });
    let console_pretty = (!json).then(|| {
        fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
            .with_filter(console_filter(level))
    });

    let file_layer = match logging.and_then(|l| l.file.as_deref()) {
        Some(file) => {
            let cfg = logging.cloned().unwrap_or_default();
            let appender = file_appender(Path::new(file), cfg.rotation.as_deref());
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let _ = FILE_GUARD.set(guard);
            let file_level = cfg.level.unwrap_or_else(|| "info".to_string());
            Some(
                fmt::layer()
                    .json()
                    .with_ansi(false)
                    .with_writer(writer)
                    .with_filter(EnvFilter::try_new(&file_level).unwrap_or_else(|_| EnvFilter::new("info"))),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(console_json)
        .with(console_pretty)
        .with(file_layer)
        .try_init()
        .map_err(|e| eyre::eyre!("init logging: {e}"))
}

fn file_appender(
    path: &Path,
    rotation: Option<&str>,
) -> tracing_appender::rolling::RollingFileAppender {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let name = path
        .file_name()
        .map_or_else(|| "receipt-o-matic.log".into(), |n| n.to_os_string());
    match rotation {
        Some("daily") => tracing_appender::rolling::daily(dir, name),
        Some("hourly") => tracing_appender::rolling::hourly(dir, name),
        _ => tracing_appender::rolling::never(dir, name),
    }
}

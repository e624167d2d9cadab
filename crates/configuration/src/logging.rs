//! Tracing subscriber setup shared by the CLI and the web server.

use crate::error::ConfigError;
use crate::settings::{LogFormat, LoggingConfig};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::{Layered, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer, Registry};

type Filtered = Layered<EnvFilter, Registry>;
type BoxedLayer = Box<dyn Layer<Filtered> + Send + Sync>;

/// Installs the global subscriber.
///
/// `RUST_LOG` wins over `config.level`. Console output goes to stderr so that
/// calculator results on stdout stay pipeable. When a log directory is set, a
/// daily rolling file is added; the returned guard must be held until exit to
/// flush it.
pub fn init_tracing(config: &LoggingConfig) -> Result<Option<WorkerGuard>, ConfigError> {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = build_filter(rust_log.as_deref(), &config.level)?;

    let console: BoxedLayer = match config.format {
        LogFormat::Full => Box::new(fmt::layer().with_writer(std::io::stderr)),
        LogFormat::Pretty => Box::new(fmt::layer().pretty().with_writer(std::io::stderr)),
        LogFormat::Compact => Box::new(fmt::layer().compact().with_writer(std::io::stderr)),
        LogFormat::Json => Box::new(fmt::layer().json().with_writer(std::io::stderr)),
    };
    let mut layers = vec![console];

    let mut guard = None;
    if let Some(dir) = &config.directory {
        let appender = tracing_appender::rolling::daily(dir, &config.file_prefix);
        let (writer, worker_guard) = tracing_appender::non_blocking(appender);
        layers.push(Box::new(fmt::layer().with_ansi(false).with_writer(writer)));
        guard = Some(worker_guard);
    }

    tracing_subscriber::registry()
        .with(filter)
        .with(layers)
        .try_init()
        .map_err(|e| ConfigError::Logging(e.to_string()))?;

    Ok(guard)
}

/// A valid `RUST_LOG` directive wins; otherwise the configured level must parse.
fn build_filter(rust_log: Option<&str>, level: &str) -> Result<EnvFilter, ConfigError> {
    if let Some(filter) = rust_log.and_then(|directive| EnvFilter::try_new(directive).ok()) {
        return Ok(filter);
    }
    EnvFilter::try_new(level).map_err(|e| ConfigError::Logging(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_level_is_used_without_rust_log() {
        let filter = build_filter(None, "debug").unwrap();
        assert_eq!(filter.to_string(), "debug");
    }

    #[test]
    fn valid_rust_log_overrides_the_level() {
        let filter = build_filter(Some("warn"), "info").unwrap();
        assert_eq!(filter.to_string(), "warn");
    }

    #[test]
    fn invalid_rust_log_falls_back_to_the_level() {
        let filter = build_filter(Some("news=loud"), "info").unwrap();
        assert_eq!(filter.to_string(), "info");
    }

    #[test]
    fn invalid_level_is_a_logging_error() {
        let err = build_filter(None, "news=loud").unwrap_err();
        assert!(matches!(err, ConfigError::Logging(_)));
    }

    #[test]
    fn second_install_is_a_logging_error() {
        let config = LoggingConfig {
            format: LogFormat::Pretty,
            ..LoggingConfig::default()
        };
        // Only one global subscriber can ever be installed.
        let _ = init_tracing(&config);
        assert!(matches!(init_tracing(&config), Err(ConfigError::Logging(_))));
    }
}

use crate::error::ConfigError;
use std::path::Path;
use std::time::Duration;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use logging::init_tracing;
pub use settings::{Config, LogFormat, LoggingConfig, NewsConfig, ServerConfig};

/// Environment variables with this prefix override file settings,
/// e.g. `FINKIT__NEWS__POLL_INTERVAL=10m`.
const ENV_PREFIX: &str = "FINKIT";

/// Loads the application configuration from an optional `config.toml` in the
/// working directory, layered under environment overrides.
pub fn load_config() -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::with_name("config").required(false))
        .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
        .build()?;

    let config = builder.try_deserialize::<Config>()?;
    validate(&config)?;
    Ok(config)
}

/// Loads the configuration from an explicit file, which must exist.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from(path.to_path_buf()).required(true))
        .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
        .build()?;

    let config = builder.try_deserialize::<Config>()?;
    validate(&config)?;
    Ok(config)
}

/// Rejects settings that would make the news system misbehave.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    let news = &config.news;
    if news.proxy_url.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "news.proxy_url must not be empty".to_string(),
        ));
    }
    if news.max_items == 0 {
        return Err(ConfigError::ValidationError(
            "news.max_items must be greater than 0".to_string(),
        ));
    }
    if news.poll_interval < Duration::from_secs(1) {
        return Err(ConfigError::ValidationError(
            "news.poll_interval must be at least one second".to_string(),
        ));
    }
    if news.cache_key.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "news.cache_key must not be empty".to_string(),
        ));
    }
    if let Some(feed) = news.feeds.iter().find(|f| f.url.trim().is_empty()) {
        return Err(ConfigError::ValidationError(format!(
            "feed '{}' has an empty url",
            feed.source
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults_match_the_ticker_behaviour() {
        let config = Config::default();
        assert_eq!(config.news.feeds.len(), 4);
        assert_eq!(config.news.max_items, 25);
        assert_eq!(config.news.freshness, Duration::from_secs(300));
        assert_eq!(config.news.poll_interval, Duration::from_secs(300));
        assert_eq!(config.news.cache_key, "marketNews_v1");
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn cache_path_uses_configured_directory() {
        let mut news = NewsConfig::default();
        news.cache_dir = Some("/tmp/finkit-test".into());
        assert_eq!(
            news.cache_path(),
            Path::new("/tmp/finkit-test/marketNews_v1.json")
        );
    }

    #[test]
    fn file_overrides_are_merged_with_defaults() {
        let file = write_config(
            r#"
            [news]
            poll_interval = "10m"
            max_items = 10

            [[news.feeds]]
            url = "https://example.com/rss"
            source = "Example"

            [logging]
            level = "debug"
            format = "json"
            "#,
        );

        let config = load_config_from(file.path()).unwrap();
        assert_eq!(config.news.poll_interval, Duration::from_secs(600));
        assert_eq!(config.news.max_items, 10);
        assert_eq!(config.news.feeds.len(), 1);
        assert_eq!(config.news.feeds[0].source, "Example");
        // Untouched fields keep their defaults.
        assert_eq!(config.news.freshness, Duration::from_secs(300));
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.server.addr.port(), 3000);
    }

    #[test]
    fn zero_max_items_is_rejected() {
        let file = write_config("[news]\nmax_items = 0\n");
        let err = load_config_from(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn empty_feed_url_is_rejected() {
        let mut config = Config::default();
        config.news.feeds[1].url = " ".to_string();
        let err = validate(&config).unwrap_err();
        assert!(err.to_string().contains("NDTV Profit"));
    }
}

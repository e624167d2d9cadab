use core_types::FeedSource;
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// The root configuration structure for the entire application.
///
/// Every section is optional in `config.toml`; a missing section or field
/// falls back to the defaults below.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub news: NewsConfig,
    pub logging: LoggingConfig,
    pub server: ServerConfig,
}

/// Contains parameters for the market-news ticker.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NewsConfig {
    /// The CORS proxy prefix. The URL-encoded feed address is appended to it.
    pub proxy_url: String,
    /// The feeds to poll, in display priority order.
    pub feeds: Vec<FeedSource>,
    /// Where the cache file lives. Defaults to the platform cache directory.
    pub cache_dir: Option<PathBuf>,
    /// The cache key; the cache file is `<cache_key>.json`.
    pub cache_key: String,
    /// How long a cached snapshot is served without refetching.
    #[serde(with = "humantime_serde")]
    pub freshness: Duration,
    /// How often the poller refreshes.
    #[serde(with = "humantime_serde")]
    pub poll_interval: Duration,
    /// Per-feed HTTP timeout.
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
    /// How many headlines survive aggregation.
    pub max_items: usize,
}

impl NewsConfig {
    /// The full path of the cache file.
    pub fn cache_path(&self) -> PathBuf {
        let dir = self.cache_dir.clone().unwrap_or_else(|| {
            dirs::cache_dir()
                .map(|d| d.join("finkit"))
                .unwrap_or_else(|| PathBuf::from("."))
        });
        dir.join(format!("{}.json", self.cache_key))
    }
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            proxy_url: "https://api.codetabs.com/v1/proxy/?quest=".to_string(),
            feeds: vec![
                FeedSource::new(
                    "https://www.business-standard.com/rss/markets-106.rss",
                    "Business Standard",
                ),
                FeedSource::new("https://feeds.feedburner.com/ndtvprofit-latest", "NDTV Profit"),
                FeedSource::new(
                    "https://economictimes.indiatimes.com/markets/rssfeeds/1977021501.cms",
                    "Economic Times",
                ),
                FeedSource::new(
                    "https://www.cnbc.com/id/10000664/device/rss/rss.html",
                    "CNBC World",
                ),
            ],
            cache_dir: None,
            cache_key: "marketNews_v1".to_string(),
            freshness: Duration::from_secs(5 * 60),
            poll_interval: Duration::from_secs(5 * 60),
            request_timeout: Duration::from_secs(15),
            max_items: 25,
        }
    }
}

/// Output format for log lines written to stderr.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Single-line output with targets and timestamps.
    #[default]
    Full,
    /// Multi-line, indented output for local debugging.
    Pretty,
    Compact,
    Json,
}

/// Contains parameters for tracing output.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive, used when `RUST_LOG` is not set.
    pub level: String,
    pub format: LogFormat,
    /// When set, logs are also written to a daily rolling file in this directory.
    pub directory: Option<PathBuf>,
    pub file_prefix: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
            directory: None,
            file_prefix: "finkit.log".to_string(),
        }
    }
}

/// Contains parameters for the HTTP API.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub addr: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
        }
    }
}

use crate::error::NewsError;
use async_trait::async_trait;
use configuration::NewsConfig;
use core_types::FeedSource;
use reqwest::Client;
use std::time::Duration;

/// The interface for downloading a raw feed document.
/// This trait is the seam the news service depends on, allowing the
/// underlying implementation (proxy or mock) to be swapped out.
#[async_trait]
pub trait FeedFetcher: Send + Sync {
    /// Returns the feed body as text.
    async fn fetch(&self, feed: &FeedSource) -> Result<String, NewsError>;
}

/// Fetches feeds through a CORS proxy that takes the target URL as an
/// encoded suffix, e.g. `https://api.codetabs.com/v1/proxy/?quest=<url>`.
#[derive(Clone)]
pub struct ProxyFeedFetcher {
    client: Client,
    proxy_url: String,
}

impl ProxyFeedFetcher {
    pub fn new(proxy_url: impl Into<String>, timeout: Duration) -> Result<Self, NewsError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("finkit/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            proxy_url: proxy_url.into(),
        })
    }

    pub fn from_config(config: &NewsConfig) -> Result<Self, NewsError> {
        Self::new(config.proxy_url.clone(), config.request_timeout)
    }

    /// The proxied address for a feed.
    pub fn request_url(&self, feed: &FeedSource) -> String {
        format!("{}{}", self.proxy_url, urlencoding::encode(&feed.url))
    }
}

#[async_trait]
impl FeedFetcher for ProxyFeedFetcher {
    async fn fetch(&self, feed: &FeedSource) -> Result<String, NewsError> {
        let url = self.request_url(feed);
        tracing::debug!(source = %feed.source, %url, "Fetching feed.");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(NewsError::Status(status.as_u16()));
        }
        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feed_url_is_encoded_into_the_proxy_query() {
        let fetcher =
            ProxyFeedFetcher::new("https://api.codetabs.com/v1/proxy/?quest=", Duration::from_secs(5))
                .unwrap();
        let feed = FeedSource::new("https://www.cnbc.com/id/10000664/device/rss/rss.html?a=1&b=2", "CNBC World");
        assert_eq!(
            fetcher.request_url(&feed),
            "https://api.codetabs.com/v1/proxy/?quest=\
             https%3A%2F%2Fwww.cnbc.com%2Fid%2F10000664%2Fdevice%2Frss%2Frss.html%3Fa%3D1%26b%3D2"
        );
    }

    #[test]
    fn builds_from_config() {
        let fetcher = ProxyFeedFetcher::from_config(&NewsConfig::default()).unwrap();
        assert!(fetcher.request_url(&FeedSource::new("x", "y")).ends_with("?quest=x"));
    }
}

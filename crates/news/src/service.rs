use crate::aggregate::{aggregate, fetch_all};
use crate::cache::NewsCache;
use crate::error::NewsError;
use crate::fetcher::{FeedFetcher, ProxyFeedFetcher};
use chrono::{DateTime, Utc};
use configuration::NewsConfig;
use core_types::{FeedSource, NewsItem};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time::{interval, MissedTickBehavior};

/// The outcome of one refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "items", rename_all = "lowercase")]
pub enum NewsUpdate {
    /// Served from the cache file without fetching.
    Cached(Vec<NewsItem>),
    /// Freshly fetched and written to the cache.
    Fresh(Vec<NewsItem>),
    /// Every feed came back empty; the previous snapshot is still shown.
    Stale(Vec<NewsItem>),
    /// Nothing fetched and nothing cached.
    Unavailable,
}

impl NewsUpdate {
    pub fn items(&self) -> &[NewsItem] {
        match self {
            Self::Cached(items) | Self::Fresh(items) | Self::Stale(items) => items,
            Self::Unavailable => &[],
        }
    }

    pub fn is_available(&self) -> bool {
        !matches!(self, Self::Unavailable)
    }
}

/// Owns the feed list, the fetcher and the cache, and decides between them.
pub struct NewsService {
    fetcher: Arc<dyn FeedFetcher>,
    feeds: Vec<FeedSource>,
    cache: NewsCache,
    freshness: Duration,
    max_items: usize,
}

impl NewsService {
    pub fn new(fetcher: Arc<dyn FeedFetcher>, config: &NewsConfig) -> Self {
        Self {
            fetcher,
            feeds: config.feeds.clone(),
            cache: NewsCache::new(config.cache_path()),
            freshness: config.freshness,
            max_items: config.max_items,
        }
    }

    /// A service that fetches through the configured proxy.
    pub fn from_config(config: &NewsConfig) -> Result<Self, NewsError> {
        let fetcher = ProxyFeedFetcher::from_config(config)?;
        Ok(Self::new(Arc::new(fetcher), config))
    }

    pub fn cache(&self) -> &NewsCache {
        &self.cache
    }

    /// The cached headlines regardless of age, if there are any.
    pub async fn cached_items(&self) -> Option<Vec<NewsItem>> {
        self.cache.load().await.map(|c| c.data).filter(|d| !d.is_empty())
    }

    /// Serves a fresh cache as is; otherwise fetches every feed, and falls
    /// back to whatever was cached when the fetch yields nothing.
    pub async fn refresh(&self, now: DateTime<Utc>) -> NewsUpdate {
        let cached = self.cache.load().await.filter(|c| !c.data.is_empty());
        if let Some(cached) = &cached {
            if cached.is_fresh(now, self.freshness) {
                tracing::debug!(count = cached.data.len(), "Serving news from a fresh cache.");
                return NewsUpdate::Cached(cached.data.clone());
            }
        }

        tracing::info!(feeds = self.feeds.len(), "Fetching fresh news.");
        let items = aggregate(fetch_all(self.fetcher.as_ref(), &self.feeds).await, self.max_items);

        if !items.is_empty() {
            if let Err(e) = self.cache.store(&items, now).await {
                tracing::warn!(error = %e, "Could not write the news cache.");
            }
            return NewsUpdate::Fresh(items);
        }

        match cached {
            Some(cached) => {
                tracing::warn!("All feeds came back empty; keeping the cached headlines.");
                NewsUpdate::Stale(cached.data)
            }
            None => {
                tracing::warn!("All feeds came back empty and nothing is cached.");
                NewsUpdate::Unavailable
            }
        }
    }
}

/// A long-running task that refreshes the news every `poll_interval` and
/// publishes each update. A stale cache is published before the first fetch
/// so subscribers have something to show at once.
pub async fn run_news_poller(
    service: Arc<NewsService>,
    tx: broadcast::Sender<NewsUpdate>,
    poll_interval: Duration,
    mut shutdown: broadcast::Receiver<()>,
) {
    tracing::info!(interval = ?poll_interval, "News poller started.");

    let publish = |update: NewsUpdate| {
        if tx.send(update).is_err() {
            tracing::debug!("No subscribers for the news update.");
        }
    };

    if let Some(cached) = service.cache().load().await {
        if !cached.data.is_empty() && !cached.is_fresh(Utc::now(), service.freshness) {
            publish(NewsUpdate::Cached(cached.data));
        }
    }

    let mut timer = interval(poll_interval);
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = shutdown.recv() => {
                tracing::info!("News poller shutting down.");
                break;
            }
            // The first tick is immediate.
            _ = timer.tick() => {
                publish(service.refresh(Utc::now()).await);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const FEED: &str = r#"<rss><channel>
        <item><title>Sensex up</title><pubDate>Mon, 19 Oct 2026 09:15:00 +0530</pubDate></item>
        <item><title>Nifty flat</title><pubDate>Mon, 19 Oct 2026 08:00:00 +0530</pubDate></item>
    </channel></rss>"#;

    /// Serves `body` for every feed, or fails every feed when `body` is `None`.
    struct MockFetcher {
        body: Option<&'static str>,
        calls: AtomicUsize,
    }

    impl MockFetcher {
        fn new(body: Option<&'static str>) -> Arc<Self> {
            Arc::new(Self {
                body,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl FeedFetcher for MockFetcher {
        async fn fetch(&self, _feed: &FeedSource) -> Result<String, NewsError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.body.map(str::to_string).ok_or(NewsError::Status(502))
        }
    }

    fn config(dir: &tempfile::TempDir) -> NewsConfig {
        NewsConfig {
            cache_dir: Some(dir.path().to_path_buf()),
            feeds: vec![FeedSource::new("https://a", "A")],
            ..NewsConfig::default()
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 6, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn fetches_and_caches_when_nothing_is_cached() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = MockFetcher::new(Some(FEED));
        let service = NewsService::new(fetcher.clone(), &config(&dir));

        let update = service.refresh(now()).await;
        assert!(matches!(update, NewsUpdate::Fresh(_)));
        assert_eq!(update.items()[0].title, "Sensex up");
        assert_eq!(update.items()[0].source, "A");

        let stored = service.cache().load().await.unwrap();
        assert_eq!(stored.timestamp, now().timestamp_millis());
        assert_eq!(stored.data, update.items());
    }

    #[tokio::test]
    async fn fresh_cache_skips_the_network() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = MockFetcher::new(Some(FEED));
        let service = NewsService::new(fetcher.clone(), &config(&dir));

        service.refresh(now()).await;
        let later = now() + chrono::Duration::minutes(4);
        let update = service.refresh(later).await;

        assert!(matches!(update, NewsUpdate::Cached(ref items) if items.len() == 2));
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn expired_cache_is_refetched() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = MockFetcher::new(Some(FEED));
        let service = NewsService::new(fetcher.clone(), &config(&dir));

        service.refresh(now()).await;
        let update = service.refresh(now() + chrono::Duration::minutes(5)).await;

        assert!(matches!(update, NewsUpdate::Fresh(_)));
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn failed_fetch_falls_back_to_stale_cache() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config(&dir);
        NewsService::new(MockFetcher::new(Some(FEED)), &cfg).refresh(now()).await;

        let offline = NewsService::new(MockFetcher::new(None), &cfg);
        let update = offline.refresh(now() + chrono::Duration::hours(1)).await;

        assert!(matches!(update, NewsUpdate::Stale(ref items) if items.len() == 2));
        // The stale snapshot keeps its original timestamp.
        assert_eq!(offline.cache().load().await.unwrap().timestamp, now().timestamp_millis());
    }

    #[tokio::test]
    async fn nothing_fetched_and_nothing_cached_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let service = NewsService::new(MockFetcher::new(None), &config(&dir));

        let update = service.refresh(now()).await;
        assert_eq!(update, NewsUpdate::Unavailable);
        assert!(update.items().is_empty());
        assert!(service.cache().load().await.is_none());
    }

    #[tokio::test]
    async fn an_empty_cached_list_counts_as_no_cache() {
        let dir = tempfile::tempdir().unwrap();
        let service = NewsService::new(MockFetcher::new(None), &config(&dir));
        service.cache().store(&[], now()).await.unwrap();

        assert_eq!(service.refresh(now()).await, NewsUpdate::Unavailable);
        assert_eq!(service.cached_items().await, None);
    }

    #[test]
    fn updates_serialize_with_a_status_tag() {
        let json = serde_json::to_value(NewsUpdate::Unavailable).unwrap();
        assert_eq!(json["status"], "unavailable");
        let json = serde_json::to_value(NewsUpdate::Fresh(vec![])).unwrap();
        assert_eq!(json["status"], "fresh");
        assert!(json["items"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn poller_publishes_until_shutdown() {
        let dir = tempfile::tempdir().unwrap();
        let service = Arc::new(NewsService::new(MockFetcher::new(Some(FEED)), &config(&dir)));
        let (tx, mut rx) = broadcast::channel(8);
        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);

        let handle = tokio::spawn(run_news_poller(
            service,
            tx,
            Duration::from_secs(300),
            shutdown_rx,
        ));

        let first = rx.recv().await.unwrap();
        assert!(matches!(first, NewsUpdate::Fresh(ref items) if items.len() == 2));

        shutdown_tx.send(()).unwrap();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn poller_shows_a_stale_cache_before_fetching() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config(&dir);
        let old = Utc::now() - chrono::Duration::hours(2);
        NewsService::new(MockFetcher::new(Some(FEED)), &cfg).refresh(old).await;

        let service = Arc::new(NewsService::new(MockFetcher::new(None), &cfg));
        let (tx, mut rx) = broadcast::channel(8);
        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
        let handle = tokio::spawn(run_news_poller(service, tx, Duration::from_secs(300), shutdown_rx));

        assert!(matches!(rx.recv().await.unwrap(), NewsUpdate::Cached(_)));
        assert!(matches!(rx.recv().await.unwrap(), NewsUpdate::Stale(_)));

        drop(shutdown_tx);
        handle.await.unwrap();
    }
}

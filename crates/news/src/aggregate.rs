use crate::fetcher::FeedFetcher;
use crate::parser::parse_feed;
use core_types::{FeedSource, NewsItem};
use futures::future::join_all;
use std::cmp::Reverse;
use std::collections::HashSet;

/// Fetches and parses every feed concurrently. A feed that fails at any step
/// is logged and contributes nothing; the others are unaffected. Items keep
/// the order of `feeds`.
pub async fn fetch_all(fetcher: &dyn FeedFetcher, feeds: &[FeedSource]) -> Vec<NewsItem> {
    let tasks = feeds.iter().map(|feed| async move {
        let result = match fetcher.fetch(feed).await {
            Ok(body) => parse_feed(&body, feed),
            Err(e) => Err(e),
        };
        match result {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!(source = %feed.source, error = %e, "Feed failed.");
                Vec::new()
            }
        }
    });

    join_all(tasks).await.into_iter().flatten().collect()
}

/// Orders headlines newest first, drops repeated titles and keeps `limit`.
///
/// The sort is stable; items whose date cannot be read sort as if published
/// at the Unix epoch. When titles repeat, the first in sorted order is kept.
pub fn aggregate(mut items: Vec<NewsItem>, limit: usize) -> Vec<NewsItem> {
    items.sort_by_key(|item| {
        Reverse(item.published_at().map_or(0, |d| d.timestamp_millis()))
    });

    let mut seen = HashSet::new();
    items.retain(|item| seen.insert(item.title.clone()));
    items.truncate(limit);
    items
}

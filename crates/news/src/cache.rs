use crate::error::NewsError;
use chrono::{DateTime, Utc};
use core_types::NewsItem;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// The cached snapshot: `{ "timestamp": <unix millis>, "data": [...] }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedNews {
    /// When the snapshot was stored, in Unix milliseconds. Missing means 0.
    #[serde(default)]
    pub timestamp: i64,
    #[serde(default)]
    pub data: Vec<NewsItem>,
}

impl CachedNews {
    /// True while less than `ttl` has passed since the snapshot was stored.
    pub fn is_fresh(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        let ttl_ms = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);
        now.timestamp_millis().saturating_sub(self.timestamp) < ttl_ms
    }
}

/// A single JSON file holding the last good set of headlines.
#[derive(Debug, Clone)]
pub struct NewsCache {
    path: PathBuf,
}

impl NewsCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the snapshot. A missing or unreadable file is not an error; it
    /// simply means there is nothing cached.
    pub async fn load(&self) -> Option<CachedNews> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "No news cache yet.");
                return None;
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Could not read the news cache.");
                return None;
            }
        };
        match serde_json::from_slice(&bytes) {
            Ok(cached) => Some(cached),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Ignoring a corrupt news cache.");
                None
            }
        }
    }

    /// Replaces the snapshot with `items`, stamped with `now`.
    pub async fn store(&self, items: &[NewsItem], now: DateTime<Utc>) -> Result<(), NewsError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir).await?;
        }
        let snapshot = CachedNews {
            timestamp: now.timestamp_millis(),
            data: items.to_vec(),
        };
        tokio::fs::write(&self.path, serde_json::to_vec(&snapshot)?).await?;
        tracing::debug!(path = %self.path.display(), count = items.len(), "Stored news cache.");
        Ok(())
    }
}

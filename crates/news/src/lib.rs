//! # Finkit News
//!
//! Market headlines pulled from public RSS feeds through a CORS proxy,
//! merged newest first and cached on disk for five minutes.
//!
//! ## Architectural Principles
//!
//! - **Layer 2 Service:** This crate talks to the outside world (HTTP, the
//!   file system). It depends on `core-types` for its data and on
//!   `configuration` for its settings.
//! - **Swappable I/O:** All network access goes through the `FeedFetcher`
//!   trait, so tests drive the service with an in-memory fetcher.
//! - **Degrade, don't fail:** A broken feed is logged and skipped. When every
//!   feed fails the last cached headlines are kept.
//!
//! ## Public API
//!
//! - `NewsService`: the refresh decision (cache, fetch, fall back).
//! - `run_news_poller`: the periodic refresh loop publishing `NewsUpdate`s.
//! - `FeedFetcher`, `ProxyFeedFetcher`: feed download.
//! - `parse_feed`, `fetch_all`, `aggregate`, `NewsCache`: the individual steps.

pub mod aggregate;
pub mod cache;
pub mod error;
pub mod fetcher;
pub mod parser;
pub mod service;

pub use aggregate::{aggregate, fetch_all};
pub use cache::{CachedNews, NewsCache};
pub use error::NewsError;
pub use fetcher::{FeedFetcher, ProxyFeedFetcher};
pub use parser::{parse_feed, strip_markup};
pub use service::{run_news_poller, NewsService, NewsUpdate};

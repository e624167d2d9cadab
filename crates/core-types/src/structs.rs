use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A public RSS feed and the display name of its publisher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedSource {
    pub url: String,
    pub source: String,
}

impl FeedSource {
    pub fn new(url: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            source: source.into(),
        }
    }
}

/// A single headline pulled from a feed.
///
/// `pub_date` is kept as the raw string from the feed; it is parsed only when
/// sorting or rendering, and an unparseable date is not an error.
/// The field names match the cached JSON blob (`pubDate`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    pub link: String,
    #[serde(rename = "pubDate")]
    pub pub_date: String,
    pub description: String,
    pub source: String,
}

impl NewsItem {
    /// The publication time, if the feed's date string is RFC 2822 (`pubDate`)
    /// or RFC 3339 (`dc:date`).
    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        parse_pub_date(&self.pub_date)
    }
}

/// Parses a feed date. Unrecognised formats yield `None`.
pub fn parse_pub_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    DateTime::parse_from_rfc2822(raw)
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .map(|d| d.with_timezone(&Utc))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn news_item_uses_cache_field_names() {
        let item = NewsItem {
            title: "Sensex climbs".to_string(),
            link: "https://example.com/a".to_string(),
            pub_date: "Mon, 19 Oct 2026 09:15:00 +0530".to_string(),
            description: "Markets rallied.".to_string(),
            source: "Economic Times".to_string(),
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["pubDate"], "Mon, 19 Oct 2026 09:15:00 +0530");
        assert!(json.get("pub_date").is_none());

        let back: NewsItem = serde_json::from_value(json).unwrap();
        assert_eq!(back, item);
    }

    #[test]
    fn parses_both_feed_date_styles() {
        let rfc2822 = parse_pub_date("Mon, 19 Oct 2026 09:15:00 +0530").unwrap();
        assert_eq!(rfc2822.to_rfc3339(), "2026-10-19T03:45:00+00:00");

        let rfc3339 = parse_pub_date("2026-10-19T03:45:00Z").unwrap();
        assert_eq!(rfc3339, rfc2822);

        assert_eq!(parse_pub_date(""), None);
        assert_eq!(parse_pub_date("yesterday"), None);
    }
}

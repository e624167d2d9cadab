//! Rendering of aggregated headlines: the scrolling ticker, the news cards
//! and their terminal equivalents.

use crate::render::escape_html;
use chrono::{DateTime, Utc};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, ContentArrangement, Table};
use core_types::{parse_pub_date, NewsItem};

/// Shown in the ticker when nothing could be fetched and nothing is cached.
pub const UNAVAILABLE_MESSAGE: &str = "News temporarily unavailable";

const SUMMARY_CHARS: usize = 140;

/// Age of a headline: `"Just now"` when the date is unreadable, `"{m}m ago"`
/// under an hour, `"{h}h {m}m ago"` otherwise. Future dates count as zero.
pub fn relative_time(pub_date: &str, now: DateTime<Utc>) -> String {
    let Some(published) = parse_pub_date(pub_date) else {
        return "Just now".to_string();
    };
    let minutes = (now - published).num_minutes().max(0);
    if minutes < 60 {
        format!("{minutes}m ago")
    } else {
        format!("{}h {}m ago", minutes / 60, minutes % 60)
    }
}

/// The first 140 characters of a description followed by `...`.
pub fn summarize(description: &str) -> String {
    let cut: String = description.chars().take(SUMMARY_CHARS).collect();
    format!("{cut}...")
}

fn ticker_items(items: &[NewsItem]) -> String {
    items
        .iter()
        .map(|n| {
            format!(
                "<span class=\"ticker-item\"><a href=\"{}\" target=\"_blank\">{}</a></span>",
                escape_html(&n.link),
                escape_html(&n.title)
            )
        })
        .collect()
}

/// Ticker markup. The item list is emitted twice so the CSS marquee loops
/// without a gap. Empty input renders nothing.
pub fn render_ticker_html(items: &[NewsItem]) -> String {
    let html = ticker_items(items);
    format!("{html}{html}")
}

pub fn unavailable_html() -> String {
    format!("<span class=\"ticker-item\">{UNAVAILABLE_MESSAGE}</span>")
}

/// One line for a terminal ticker, headlines separated by a bullet.
pub fn render_ticker_line(items: &[NewsItem]) -> String {
    if items.is_empty() {
        return UNAVAILABLE_MESSAGE.to_string();
    }
    items
        .iter()
        .map(|n| n.title.as_str())
        .collect::<Vec<_>>()
        .join("  •  ")
}

pub fn render_news_cards_html(items: &[NewsItem], now: DateTime<Utc>) -> String {
    items
        .iter()
        .map(|n| {
            format!(
                "<a href=\"{link}\" target=\"_blank\" class=\"news-card\">\
                 <div class=\"news-card-title\">{title}</div>\
                 <div class=\"news-card-summary\">{summary}</div>\
                 <div class=\"news-card-meta\"><span>{age}</span><span>—</span>\
                 <span class=\"news-source-tag\">{source}</span></div></a>",
                link = escape_html(&n.link),
                title = escape_html(&n.title),
                summary = escape_html(&summarize(&n.description)),
                age = relative_time(&n.pub_date, now),
                source = escape_html(&n.source),
            )
        })
        .collect()
}

/// Headlines as a terminal table: age, source, title and link.
pub fn render_news_table(items: &[NewsItem], now: DateTime<Utc>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Age", "Source", "Headline", "Link"]);
    for n in items {
        table.add_row(vec![
            Cell::new(relative_time(&n.pub_date, now)),
            Cell::new(&n.source),
            Cell::new(&n.title),
            Cell::new(&n.link),
        ]);
    }
    table
}

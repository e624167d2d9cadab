//! RSS parsing. Every `<item>` becomes a `NewsItem`; elements are matched by
//! local name, so `dc:date` is found as `date`.

use crate::error::NewsError;
use core_types::{FeedSource, NewsItem};
use quick_xml::escape::unescape_with;
use quick_xml::events::Event;
use quick_xml::Reader;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Field {
    Title,
    Link,
    PubDate,
    Date,
    Description,
}

impl Field {
    fn from_local_name(name: &[u8]) -> Option<Self> {
        match name {
            b"title" => Some(Self::Title),
            b"link" => Some(Self::Link),
            b"pubDate" => Some(Self::PubDate),
            b"date" => Some(Self::Date),
            b"description" => Some(Self::Description),
            _ => None,
        }
    }
}

#[derive(Default)]
struct ItemBuilder {
    title: Option<String>,
    link: Option<String>,
    pub_date: Option<String>,
    date: Option<String>,
    description: Option<String>,
}

impl ItemBuilder {
    fn slot(&mut self, field: Field) -> &mut Option<String> {
        match field {
            Field::Title => &mut self.title,
            Field::Link => &mut self.link,
            Field::PubDate => &mut self.pub_date,
            Field::Date => &mut self.date,
            Field::Description => &mut self.description,
        }
    }

    fn build(self, source: &str) -> NewsItem {
        let non_empty = |value: Option<String>| value.filter(|v| !v.is_empty());
        NewsItem {
            title: self.title.unwrap_or_default(),
            link: non_empty(self.link).unwrap_or_else(|| "#".to_string()),
            pub_date: non_empty(self.pub_date)
                .or_else(|| non_empty(self.date))
                .unwrap_or_default(),
            description: self.description.map(|d| strip_markup(&d)).unwrap_or_default(),
            source: source.to_string(),
        }
    }
}

/// The element currently being captured and the depth it was opened at.
struct Capture {
    field: Field,
    depth: usize,
    text: String,
}

/// Named entities that show up in feed text besides the XML five.
fn resolve_entity(name: &str) -> Option<&'static str> {
    match name {
        "amp" => Some("&"),
        "lt" => Some("<"),
        "gt" => Some(">"),
        "quot" => Some("\""),
        "apos" => Some("'"),
        "nbsp" => Some("\u{a0}"),
        "ndash" => Some("–"),
        "mdash" => Some("—"),
        "lsquo" => Some("‘"),
        "rsquo" => Some("’"),
        "ldquo" => Some("“"),
        "rdquo" => Some("”"),
        "hellip" => Some("…"),
        "rupee" => Some("₹"),
        _ => None,
    }
}

/// Reduces an HTML fragment to its text: tags are dropped, then entities
/// are decoded. Text that carries an unknown entity is kept as written.
pub fn strip_markup(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => text.push(c),
            _ => {}
        }
    }
    unescape_with(&text, resolve_entity)
        .map(|decoded| decoded.into_owned())
        .unwrap_or(text)
}

/// Extracts every `<item>` of an RSS document, tagging each with the feed's
/// display name.
pub fn parse_feed(xml: &str, feed: &FeedSource) -> Result<Vec<NewsItem>, NewsError> {
    let mut reader = Reader::from_str(xml);
    let mut items = Vec::new();
    let mut current: Option<ItemBuilder> = None;
    let mut capture: Option<Capture> = None;
    // Depth below the current <item>.
    let mut depth = 0usize;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = e.local_name();
                if let Some(item) = current.as_mut() {
                    depth += 1;
                    if capture.is_none() {
                        if let Some(field) = Field::from_local_name(name.as_ref()) {
                            // The first matching element wins.
                            if item.slot(field).is_none() {
                                capture = Some(Capture {
                                    field,
                                    depth,
                                    text: String::new(),
                                });
                            }
                        }
                    }
                } else if name.as_ref() == b"item" {
                    current = Some(ItemBuilder::default());
                    depth = 0;
                }
            }
            Event::Empty(e) => {
                if let (Some(item), None) = (current.as_mut(), capture.as_ref()) {
                    if let Some(field) = Field::from_local_name(e.local_name().as_ref()) {
                        let slot = item.slot(field);
                        if slot.is_none() {
                            *slot = Some(String::new());
                        }
                    }
                }
            }
            Event::Text(e) => {
                if let Some(capture) = capture.as_mut() {
                    capture.text.push_str(&e.unescape_with(resolve_entity)?);
                }
            }
            Event::CData(e) => {
                if let Some(capture) = capture.as_mut() {
                    capture.text.push_str(&String::from_utf8_lossy(&e));
                }
            }
            Event::End(e) => {
                let Some(item) = current.as_mut() else { continue };
                if depth == 0 {
                    if e.local_name().as_ref() == b"item" {
                        if let Some(done) = current.take() {
                            items.push(done.build(&feed.source));
                        }
                    }
                    continue;
                }
                if capture.as_ref().is_some_and(|c| c.depth == depth) {
                    if let Some(done) = capture.take() {
                        *item.slot(done.field) = Some(done.text.trim().to_string());
                    }
                }
                depth -= 1;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    tracing::debug!(source = %feed.source, count = items.len(), "Parsed feed.");
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed() -> FeedSource {
        FeedSource::new("https://example.com/rss", "Economic Times")
    }

    const RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:dc="http://purl.org/dc/elements/1.1/">
  <channel>
    <title>Markets</title>
    <link>https://example.com</link>
    <item>
      <title><![CDATA[Sensex jumps 500 points]]></title>
      <link>https://example.com/sensex</link>
      <pubDate>Mon, 19 Oct 2026 09:15:00 +0530</pubDate>
      <description>&lt;p&gt;Banks &amp;amp; IT led the &lt;b&gt;rally&lt;/b&gt;.&lt;/p&gt;</description>
    </item>
    <item>
      <title>Rupee steady</title>
      <dc:date>2026-10-19T03:00:00Z</dc:date>
      <description><![CDATA[<img src="x.jpg"/>Forex traders&nbsp;wait]]></description>
    </item>
    <item>
      <link/>
    </item>
  </channel>
</rss>"#;

    #[test]
    fn parses_every_item() {
        let items = parse_feed(RSS, &feed()).unwrap();
        assert_eq!(items.len(), 3);

        let first = &items[0];
        assert_eq!(first.title, "Sensex jumps 500 points");
        assert_eq!(first.link, "https://example.com/sensex");
        assert_eq!(first.pub_date, "Mon, 19 Oct 2026 09:15:00 +0530");
        assert_eq!(first.description, "Banks & IT led the rally.");
        assert_eq!(first.source, "Economic Times");
    }

    #[test]
    fn falls_back_to_dc_date_and_default_link() {
        let items = parse_feed(RSS, &feed()).unwrap();
        let second = &items[1];
        assert_eq!(second.pub_date, "2026-10-19T03:00:00Z");
        assert_eq!(second.link, "#");
        assert_eq!(second.description, "Forex traders\u{a0}wait");
    }

    #[test]
    fn missing_fields_use_defaults() {
        let items = parse_feed(RSS, &feed()).unwrap();
        let third = &items[2];
        assert_eq!(third.title, "");
        assert_eq!(third.link, "#");
        assert_eq!(third.pub_date, "");
        assert_eq!(third.description, "");
    }

    #[test]
    fn channel_fields_are_not_items() {
        let xml = "<rss><channel><title>Only a channel</title></channel></rss>";
        assert!(parse_feed(xml, &feed()).unwrap().is_empty());
    }

    #[test]
    fn malformed_documents_are_errors() {
        let xml = "<rss><channel><item><title>Broken</channel></rss>";
        assert!(matches!(parse_feed(xml, &feed()), Err(NewsError::Xml(_))));
    }

    #[test]
    fn strip_markup_handles_plain_and_unknown_entities() {
        assert_eq!(strip_markup("plain text"), "plain text");
        assert_eq!(strip_markup("<p>Q3 &lt; Q2</p>"), "Q3 < Q2");
        assert_eq!(strip_markup("R&amp;D &unknown; spend"), "R&amp;D &unknown; spend");
    }
}

//! # Finkit Panels
//!
//! Presentation for calculator reports and headlines. Every report becomes a
//! `ResultPanel` (labelled rows plus an optional note), which can then be
//! drawn as a terminal table or as the HTML fragment used by the web pages.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** No I/O. Depends on `core-types` and `calculators` only.
//! - **Format once:** Numbers are formatted into strings when the panel is
//!   built, so the HTML and terminal renderers show identical values.
//!
//! ## Public API
//!
//! - `IntoPanel`, `ResultPanel`, `PanelRow`: the renderer-neutral model.
//! - `render_html`, `render_table`, `render_text`: result box renderers.
//! - `render_ticker_html`, `render_news_cards_html`, `relative_time`: news.
//! - `format_inr` and friends: en-IN number formatting.

pub mod format;
pub mod news;
pub mod panel;
pub mod render;

pub use format::{format_fixed2, format_grouped, format_inr, format_pct, format_plain};
pub use news::{
    relative_time, render_news_cards_html, render_news_table, render_ticker_html,
    render_ticker_line, summarize, unavailable_html, UNAVAILABLE_MESSAGE,
};
pub use panel::{IntoPanel, PanelLayout, PanelRow, ResultPanel};
pub use render::{escape_html, render_html, render_table, render_text};

pub mod enums;
pub mod error;
pub mod numeric;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::{LevelKind, PivotMethod, Tone};
pub use error::CoreError;
pub use numeric::{number_or_zero, parse_number};
pub use structs::{parse_pub_date, FeedSource, NewsItem};

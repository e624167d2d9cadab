use thiserror::Error;

#[derive(Error, Debug)]
pub enum NewsError {
    #[error("Failed to send the feed request: {0}")]
    Http(#[from] reqwest::Error),

    #[error("The feed proxy responded with status {0}")]
    Status(u16),

    #[error("Failed to parse the feed XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("News cache I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to (de)serialize the news cache: {0}")]
    Serialization(#[from] serde_json::Error),
}

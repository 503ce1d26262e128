#[derive(Debug, thiserror::Error)]
pub enum StorefrontError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Channel closed")]
    ChannelClosed,

    #[error("Searcher limit exceeded")]
    SearcherLimitExceeded,

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Unexpected HTTP status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Payload error: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("Invalid inquiry: {0}")]
    InvalidInquiry(String),
}

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    /// No response was obtained: DNS failure, refused connection, timeout.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("store {store} is unreachable: {source}")]
    StoreUnreachable {
        store: String,
        #[source]
        source: Box<ScraperError>,
    },
}

impl ScraperError {
    /// Returns `true` when the error means the remote host never answered.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        match self {
            ScraperError::Http(_) => true,
            ScraperError::StoreUnreachable { source, .. } => source.is_transport(),
            _ => false,
        }
    }
}

use std::path::PathBuf;
use thiserror::Error;

/// A search provider failure for a single keyword. Recovered by the
/// discoverer, which treats the keyword as having no results.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("search request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("search provider returned status {0}")]
    Status(u16),
    #[error("could not read search results: {0}")]
    Parse(String),
}

/// A failed fetch of one candidate URL. The controller marks the URL as
/// attempted and moves on; the same URL is never fetched again.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned status {0}")]
    Status(u16),
    #[error("unreadable response body: {0}")]
    Body(String),
}

impl FetchError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, FetchError::Http(e) if e.is_timeout())
    }
}

/// The corpus could not be written. Fatal for the run.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("failed to serialize corpus: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

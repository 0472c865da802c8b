use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE};
use std::time::Duration;
use crate::error::FetchError;

/// Retrieves the raw HTML of a page.
pub trait PageFetcher {
    fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

impl<T: PageFetcher + ?Sized> PageFetcher for &T {
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        (**self).fetch(url)
    }
}

/// One GET per call, no retries. Transport errors, timeouts and non-2xx
/// statuses all come back as `FetchError`.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .default_headers(headers)
            .cookie_store(true)
            .build()?;

        Ok(HttpFetcher { client })
    }
}

impl PageFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let resp = self.client.get(url).send()?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        resp.text().map_err(|e| FetchError::Body(e.to_string()))
    }
}

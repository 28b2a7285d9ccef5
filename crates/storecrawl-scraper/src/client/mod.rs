//! Plain HTTP fetcher shared by every store in a run.

use std::time::Duration;

use reqwest::{Client, StatusCode};

use crate::error::ScraperError;

/// Connect phase timeout, applied on top of the per-request timeout.
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// A fetched response. HTTP error statuses are returned as pages, not errors,
/// so callers decide whether a 404 matters.
#[derive(Debug, Clone)]
pub struct Page {
    pub url: String,
    pub status: StatusCode,
    pub body: String,
}

impl Page {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// HTTP client for storefront pages and JSON endpoints.
///
/// Only transport failures (no response at all) surface as
/// [`ScraperError::Http`]; any response, whatever its status, comes back as a
/// [`Page`]. Nothing is retried.
#[derive(Debug, Clone)]
pub struct StoreClient {
    client: Client,
}

impl StoreClient {
    /// Creates a `StoreClient` with the given per-request timeout and
    /// `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed (e.g., invalid TLS config).
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS.min(timeout_secs)))
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }

    /// Issues a GET and reads the whole body as text.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::InvalidUrl`]: `url` is not an absolute URL.
    /// - [`ScraperError::Http`]: connection, DNS, TLS, timeout or body read
    ///   failure.
    pub async fn get(&self, url: &str) -> Result<Page, ScraperError> {
        let parsed = reqwest::Url::parse(url).map_err(|e| ScraperError::InvalidUrl {
            url: url.to_owned(),
            reason: e.to_string(),
        })?;

        let response = self
            .client
            .get(parsed)
            .header(
                reqwest::header::ACCEPT,
                "text/html,application/json;q=0.9,*/*;q=0.8",
            )
            .header(reqwest::header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;

        tracing::trace!(url, status = status.as_u16(), bytes = body.len(), "fetched");

        Ok(Page {
            url: url.to_owned(),
            status,
            body,
        })
    }
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;

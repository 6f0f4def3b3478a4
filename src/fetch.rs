//! The fetch module retrieves raw page content over HTTP.

use std::time::Duration;

use log::debug;
use reqwest::{Client, StatusCode};
use thiserror::Error;

use crate::constants::{FETCH_TIMEOUT_SECS, USER_AGENT};

/// Failure to retrieve a page.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request could not be sent, timed out, or the body could not be read.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// The server answered with a non-success status.
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: StatusCode },
}

/// Source of raw HTML for a URL.
#[allow(async_fn_in_trait)]
pub trait Fetch {
    /// Retrieves the body of `url` as text.
    ///
    /// # Errors
    ///
    /// Returns a [`FetchError`] on transport failure or a non-2xx status.
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// HTTP fetcher identifying itself as a desktop browser.
#[derive(Clone, Debug)]
pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    /// Builds a fetcher with the default timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialised.
    pub fn new() -> Result<Self, FetchError> {
        Self::with_timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
    }

    /// Builds a fetcher with a custom timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialised.
    pub fn with_timeout(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

impl Fetch for PageFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        debug!("GET {url} -> {status}");

        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        Ok(response.text().await?)
    }
}

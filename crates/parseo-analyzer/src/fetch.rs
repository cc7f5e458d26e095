//! Page fetching with a browser user agent and a hard timeout.

use std::time::Duration;

/// Some sites serve bots an empty shell; a browser UA gets the real page.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("failed to build http client")]
    Client {
        #[source]
        source: reqwest::Error,
    },

    #[error("request to {url} failed")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
}

/// Reusable HTTP client for page downloads.
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: reqwest::Client,
}

impl PageFetcher {
    pub fn new() -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(FETCH_TIMEOUT)
            .build()
            .map_err(|source| FetchError::Client { source })?;
        Ok(Self { client })
    }

    /// Download the page body as text.
    ///
    /// # Errors
    ///
    /// [`FetchError::Request`] for transport failures (including timeouts),
    /// [`FetchError::Status`] for non-success responses.
    pub async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Request {
                url: url.to_owned(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_owned(),
                status,
            });
        }

        response.text().await.map_err(|source| FetchError::Request {
            url: url.to_owned(),
            source,
        })
    }
}

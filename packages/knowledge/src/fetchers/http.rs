//! reqwest-backed transport.

use async_trait::async_trait;
use tracing::{debug, warn};
use url::Url;

use crate::error::{FetchError, FetchResult};
use crate::traits::fetcher::{FetchRequest, FetchedPage, Fetcher};

/// Plain HTTP GET over a shared reqwest client.
///
/// Follows redirects (reqwest default policy) and reports whatever status the
/// server answered with. Header rotation and retries belong to
/// [`PoliteFetcher`](super::PoliteFetcher).
#[derive(Clone, Default)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a custom HTTP client.
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, request: &FetchRequest) -> FetchResult<FetchedPage> {
        let url = Url::parse(&request.url).map_err(|_| FetchError::InvalidUrl {
            url: request.url.clone(),
        })?;

        debug!(url = %url, "HTTP fetch starting");
        let mut builder = self.client.get(url).timeout(request.timeout);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder.send().await.map_err(|e| {
            warn!(url = %request.url, error = %e, "HTTP request failed");
            transport_error(&request.url, e)
        })?;

        let status = response.status().as_u16();
        let final_url = response.url().to_string();
        let body = response
            .text()
            .await
            .map_err(|e| transport_error(&request.url, e))?;

        debug!(url = %final_url, status, bytes = body.len(), "HTTP fetch complete");
        Ok(FetchedPage::new(final_url, status, body))
    }

    fn name(&self) -> &str {
        "http"
    }
}

fn transport_error(url: &str, e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        FetchError::Network {
            url: url.to_string(),
            source: Box::new(e),
        }
    }
}

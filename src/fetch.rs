use reqwest::{StatusCode, Url};
use tracing::{debug, error};

use crate::{config::FetchConfig, error::FetchError};

/// Shared GET primitive used by every stage.
///
/// One request per call: no retry, no cache. The status must be exactly 200.
/// A timeout and `User-Agent` are always set from [`FetchConfig`].
#[derive(Debug, Clone)]
pub struct HttpJsonFetcher {
    client: reqwest::Client,
}

impl HttpJsonFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            // a 3xx is reported as a status failure, never followed
            .redirect(reqwest::redirect::Policy::none())
            .build()?;
        Ok(Self { client })
    }

    /// Fetches `url` and parses the body as a JSON document.
    ///
    /// # Errors
    /// * `InvalidInput` if `url` is not an absolute http(s) URL (nothing is sent)
    /// * `NetworkFailure` on transport faults, including timeouts
    /// * `HttpStatusFailure` for any status other than 200
    /// * `MalformedResponse` if the body is not JSON
    pub async fn fetch(&self, url: &str) -> Result<serde_json::Value, FetchError> {
        let body = self.fetch_text(url).await?;
        let document = serde_json::from_str(&body)?;
        Ok(document)
    }

    /// Same contract as [`fetch`](Self::fetch) but returns the raw body.
    pub async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        let url = parse_url(url)?;
        debug!("GET {}", url);

        let response = self.client.get(url.clone()).send().await.map_err(|e| {
            error!("Request to {} failed: {}", url, e);
            FetchError::NetworkFailure(e)
        })?;

        let status = response.status();
        if status != StatusCode::OK {
            error!("Unexpected status from {}: {}", url, status);
            return Err(FetchError::HttpStatusFailure {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        debug!("Received {} bytes from {}", body.len(), url);
        Ok(body)
    }
}

fn parse_url(url: &str) -> Result<Url, FetchError> {
    let parsed =
        Url::parse(url).map_err(|e| FetchError::InvalidInput(format!("invalid URL {url:?}: {e}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(FetchError::InvalidInput(format!(
            "unsupported URL scheme {other:?} in {url:?}"
        ))),
    }
}

use tracing::{debug, info};

use crate::{error::FetchError, fetch::HttpJsonFetcher};

/// Discovers the caller's public IP address from a plain-text reporting service.
#[derive(Debug, Clone)]
pub struct IpAddressResolver {
    fetcher: HttpJsonFetcher,
    endpoint: String,
}

impl IpAddressResolver {
    pub fn new(fetcher: HttpJsonFetcher, endpoint: impl Into<String>) -> Self {
        Self {
            fetcher,
            endpoint: endpoint.into(),
        }
    }

    /// Returns the trimmed body reported by the service.
    ///
    /// The value is passed through as-is; its IPv4 shape is checked by the
    /// geolocation stage, not here.
    pub async fn resolve(&self) -> Result<String, FetchError> {
        info!("Fetching public IP address from {}", self.endpoint);
        let body = self.fetcher.fetch_text(&self.endpoint).await?;
        let address = body.trim();

        debug!("Public IP address: {}", address);
        Ok(address.to_string())
    }
}

// Module containing response data structures for geolocation lookups
mod response;

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, error, info};

use crate::{coordinate::Coordinate, error::FetchError, fetch::HttpJsonFetcher};

// Four dot-separated octets, 0-255 each. Leading zeros are accepted.
static IPV4_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(?:[01]?[0-9][0-9]?|2[0-4][0-9]|25[0-5])\.){3}(?:[01]?[0-9][0-9]?|2[0-4][0-9]|25[0-5])$")
        .expect("Invalid IPv4 regex")
});

/// Returns whether `address` has dotted-quad IPv4 shape.
///
/// Syntactic only: loopback, private and reserved ranges all pass.
pub fn is_valid_ipv4(address: &str) -> bool {
    IPV4_PATTERN.is_match(address)
}

/// Resolves an IPv4 address to approximate coordinates.
#[derive(Debug, Clone)]
pub struct GeolocationResolver {
    fetcher: HttpJsonFetcher,
    base_url: String,
}

impl GeolocationResolver {
    pub fn new(fetcher: HttpJsonFetcher, base_url: impl Into<String>) -> Self {
        Self {
            fetcher,
            base_url: base_url.into(),
        }
    }

    /// Fetches the approximate location of `ip_address`.
    ///
    /// # Returns
    /// * `Coordinate` with latitude and longitude as reported by the service
    /// * `InvalidInput` if `ip_address` is not a dotted quad; no request is made
    /// * `MalformedResponse` if `latitude` or `longitude` is missing or not numeric
    /// * `EmptyResult` if the service declined the lookup
    pub async fn resolve(&self, ip_address: &str) -> Result<Coordinate, FetchError> {
        if !is_valid_ipv4(ip_address) {
            return Err(FetchError::InvalidInput(format!(
                "IP address is not valid IPv4: {ip_address:?}"
            )));
        }

        info!("Fetching geolocation for IP address: {}", ip_address);
        let url = format!(
            "{}/{}/json/",
            self.base_url.trim_end_matches('/'),
            ip_address
        );
        let document = self.fetcher.fetch(&url).await?;
        let response: response::GeolocationResponse = serde_json::from_value(document)?;

        if response.error {
            let reason = response
                .reason
                .unwrap_or_else(|| "lookup refused".to_string());
            error!("Geolocation lookup for {} refused: {}", ip_address, reason);
            return Err(FetchError::EmptyResult(format!(
                "no geolocation for {ip_address}: {reason}"
            )));
        }

        let latitude = response.latitude.ok_or_else(|| {
            FetchError::MalformedResponse("geolocation response has no latitude".to_string())
        })?;
        let longitude = response.longitude.ok_or_else(|| {
            FetchError::MalformedResponse("geolocation response has no longitude".to_string())
        })?;

        let coordinate = Coordinate::new(latitude, longitude).map_err(|e| {
            FetchError::MalformedResponse(format!("geolocation out of range: {e}"))
        })?;
        debug!(
            "Geolocation for {} ({}): {}",
            ip_address,
            response.city.as_deref().unwrap_or("unknown city"),
            coordinate
        );
        Ok(coordinate)
    }
}

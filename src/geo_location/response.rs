/// Response structure for the ipapi.co `/{ip}/json/` endpoint.
/// Only the fields the resolver reads are modeled.
#[derive(serde::Deserialize, Debug)]
pub struct GeolocationResponse {
    /// Decimal latitude; absent on failed lookups
    pub latitude: Option<f64>,
    /// Decimal longitude; absent on failed lookups
    pub longitude: Option<f64>,
    /// Set when the service refused the lookup (reserved range, rate limit)
    #[serde(default)]
    pub error: bool,
    /// Human-readable reason accompanying `error`
    pub reason: Option<String>,
    /// City name, logged only
    pub city: Option<String>,
}

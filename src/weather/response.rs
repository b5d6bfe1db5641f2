/// Response structure for the weather.gov `/points/{lat},{lon}` endpoint
#[derive(serde::Deserialize, Debug)]
pub struct PointResponse {
    pub properties: PointProperties,
}

/// Forecast-zone descriptor for a point
#[derive(serde::Deserialize, Debug)]
pub struct PointProperties {
    /// Absolute URL of the forecast document; null for points without coverage
    pub forecast: Option<String>,
}

/// Response structure for the forecast document linked from a point
#[derive(serde::Deserialize, Debug)]
pub struct ForecastResponse {
    pub properties: ForecastProperties,
}

#[derive(serde::Deserialize, Debug)]
pub struct ForecastProperties {
    /// Ordered forecast periods; only the first one is read, so the rest
    /// are kept as raw JSON
    pub periods: Vec<serde_json::Value>,
}

/// A single forecast period
#[derive(serde::Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ForecastPeriod {
    /// Period label (e.g., "Tonight")
    pub name: Option<String>,
    /// Narrative forecast text
    pub detailed_forecast: String,
}

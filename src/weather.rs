use tracing::{debug, error, info};

use crate::{coordinate::Coordinate, error::FetchError, fetch::HttpJsonFetcher};

mod response;

/// Resolves a coordinate to the narrative text of its current forecast period.
///
/// Two requests: the point lookup maps the coordinate to a forecast URL, then
/// that URL yields the forecast periods.
#[derive(Debug, Clone)]
pub struct ForecastResolver {
    fetcher: HttpJsonFetcher,
    base_url: String,
}

impl ForecastResolver {
    pub fn new(fetcher: HttpJsonFetcher, base_url: impl Into<String>) -> Self {
        Self {
            fetcher,
            base_url: base_url.into(),
        }
    }

    /// Positional entry point: `[latitude, longitude]`, in that order.
    ///
    /// Any other length is `InvalidInput` and nothing is fetched.
    pub async fn resolve_positional<S: AsRef<str>>(
        &self,
        coordinates: &[S],
    ) -> Result<String, FetchError> {
        let coordinate = Coordinate::from_lat_lon_strs(coordinates)?;
        self.resolve(coordinate).await
    }

    pub async fn resolve(&self, coordinate: Coordinate) -> Result<String, FetchError> {
        info!("Fetching forecast for coordinate: {}", coordinate);

        let forecast_url = self.forecast_url(coordinate).await?;
        let document = self
            .fetcher
            .fetch(&forecast_url)
            .await
            .map_err(|e| match e {
                // the URL came from the point lookup, so a bad one is bad upstream data
                FetchError::InvalidInput(msg) => FetchError::MalformedResponse(format!(
                    "point lookup returned an unusable forecast URL: {msg}"
                )),
                other => other,
            })?;
        let forecast: response::ForecastResponse = serde_json::from_value(document)?;

        let Some(first) = forecast.properties.periods.into_iter().next() else {
            error!("Forecast at {} has no periods", forecast_url);
            return Err(FetchError::EmptyResult(
                "no forecast information available".to_string(),
            ));
        };
        let period: response::ForecastPeriod = serde_json::from_value(first)?;

        debug!(
            "Forecast period {}: {}",
            period.name.as_deref().unwrap_or("(unnamed)"),
            period.detailed_forecast
        );
        Ok(period.detailed_forecast)
    }

    /// Point lookup: `{base}/points/{latitude},{longitude}` -> `properties.forecast`
    async fn forecast_url(&self, coordinate: Coordinate) -> Result<String, FetchError> {
        let url = format!(
            "{}/points/{}",
            self.base_url.trim_end_matches('/'),
            coordinate
        );
        let document = self.fetcher.fetch(&url).await?;
        let point: response::PointResponse = serde_json::from_value(document)?;

        point.properties.forecast.ok_or_else(|| {
            FetchError::MalformedResponse(format!(
                "point lookup for {coordinate} has no forecast URL"
            ))
        })
    }
}

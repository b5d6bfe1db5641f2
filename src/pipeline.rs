use tracing::{Instrument, error, info, info_span};

use crate::{
    config::Config,
    coordinate::Coordinate,
    error::{FetchError, PipelineError, Stage},
    fetch::HttpJsonFetcher,
    geo_location::GeolocationResolver,
    ip_address::IpAddressResolver,
    weather::ForecastResolver,
};

/// Every value produced by a successful run, in stage order
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineReport {
    pub ip_address: String,
    pub coordinate: Coordinate,
    pub forecast: String,
}

/// IP address -> geolocation -> forecast.
///
/// Stages run strictly in order, each exactly once. The first failure ends
/// the run and is returned tagged with its stage; nothing is retried.
#[derive(Debug, Clone)]
pub struct Pipeline {
    ip_address: IpAddressResolver,
    geolocation: GeolocationResolver,
    forecast: ForecastResolver,
}

impl Pipeline {
    pub fn new(
        ip_address: IpAddressResolver,
        geolocation: GeolocationResolver,
        forecast: ForecastResolver,
    ) -> Self {
        Self {
            ip_address,
            geolocation,
            forecast,
        }
    }

    /// Builds all three resolvers over one shared HTTP client.
    pub fn from_config(config: &Config) -> Result<Self, FetchError> {
        let fetcher = HttpJsonFetcher::new(&config.fetch)?;
        let endpoints = &config.endpoints;
        Ok(Self::new(
            IpAddressResolver::new(fetcher.clone(), endpoints.ip_url.as_str()),
            GeolocationResolver::new(fetcher.clone(), endpoints.geolocation_base.as_str()),
            ForecastResolver::new(fetcher, endpoints.weather_base.as_str()),
        ))
    }

    pub fn ip_address(&self) -> &IpAddressResolver {
        &self.ip_address
    }

    pub fn geolocation(&self) -> &GeolocationResolver {
        &self.geolocation
    }

    pub fn forecast(&self) -> &ForecastResolver {
        &self.forecast
    }

    /// Runs the pipeline and returns the forecast text.
    pub async fn run(&self) -> Result<String, PipelineError> {
        self.run_report().await.map(|report| report.forecast)
    }

    /// Runs the pipeline and keeps every intermediate value.
    pub async fn run_report(&self) -> Result<PipelineReport, PipelineError> {
        let ip_address = run_stage(Stage::IpAddress, self.ip_address.resolve()).await?;

        let coordinate =
            run_stage(Stage::Geolocation, self.geolocation.resolve(&ip_address)).await?;

        let forecast = run_stage(Stage::Forecast, self.forecast.resolve(coordinate)).await?;

        info!("Pipeline completed for {}", ip_address);
        Ok(PipelineReport {
            ip_address,
            coordinate,
            forecast,
        })
    }
}

// Runs one stage inside its span and tags a failure with the stage.
async fn run_stage<T>(
    stage: Stage,
    fut: impl Future<Output = Result<T, FetchError>>,
) -> Result<T, PipelineError> {
    let span = info_span!("stage", name = %stage);
    fut.instrument(span).await.map_err(|e| {
        error!("{} stage failed ({}): {}", stage, e.kind(), e);
        PipelineError::new(stage, e)
    })
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::{config::Endpoints, error::ErrorKind};

    fn config_for(mock_server: &MockServer) -> Config {
        let uri = mock_server.uri();
        Config {
            endpoints: Endpoints {
                ip_url: format!("{uri}/ip"),
                geolocation_base: uri.clone(),
                weather_base: uri,
            },
            ..Config::default()
        }
    }

    #[tokio::test]
    async fn test_invalid_ip_stops_at_geolocation() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ip"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not-an-ip"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let pipeline = Pipeline::from_config(&config_for(&mock_server)).unwrap();
        let err = pipeline.run().await.unwrap_err();

        assert_eq!(err.stage, Stage::Geolocation);
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert_eq!(mock_server.received_requests().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_ip_body_fails_at_geolocation() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ip"))
            .respond_with(ResponseTemplate::new(200).set_body_string(""))
            .expect(1)
            .mount(&mock_server)
            .await;

        let err = Pipeline::from_config(&config_for(&mock_server))
            .unwrap()
            .run()
            .await
            .unwrap_err();

        assert_eq!(err.stage, Stage::Geolocation);
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert_eq!(mock_server.received_requests().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_report_keeps_intermediate_values() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ip"))
            .respond_with(ResponseTemplate::new(200).set_body_string("8.8.8.8"))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/8.8.8.8/json/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "latitude": 40.0,
                "longitude": -75.5
            })))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/points/40,-75.5"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "properties": { "forecast": format!("{}/fc", mock_server.uri()) }
            })))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/fc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "properties": { "periods": [{ "detailedForecast": "Rain likely." }] }
            })))
            .mount(&mock_server)
            .await;

        let report = Pipeline::from_config(&config_for(&mock_server))
            .unwrap()
            .run_report()
            .await
            .unwrap();

        assert_eq!(report.ip_address, "8.8.8.8");
        assert_eq!(report.coordinate, Coordinate::new(40.0, -75.5).unwrap());
        assert_eq!(report.forecast, "Rain likely.");
    }
}

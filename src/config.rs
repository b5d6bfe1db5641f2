use std::{env, time::Duration};

use tracing::debug;

// Public upstream services
const IP_ENDPOINT: &str = "https://api.ipify.org";
const GEOLOCATION_ENDPOINT: &str = "https://ipapi.co";
const WEATHER_ENDPOINT: &str = "https://api.weather.gov";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

// api.weather.gov rejects requests without a User-Agent
const DEFAULT_USER_AGENT: &str = concat!("ip-forecast/", env!("CARGO_PKG_VERSION"));

/// Where each stage sends its requests
#[derive(Debug, Clone)]
pub struct Endpoints {
    /// Plain-text public IP reporting endpoint
    pub ip_url: String,
    /// Base of `{base}/{ip}/json/`
    pub geolocation_base: String,
    /// Base of `{base}/points/{lat},{lon}`
    pub weather_base: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            ip_url: IP_ENDPOINT.to_string(),
            geolocation_base: GEOLOCATION_ENDPOINT.to_string(),
            weather_base: WEATHER_ENDPOINT.to_string(),
        }
    }
}

/// Per-request transport settings
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Deadline for a single request, connect through body
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub endpoints: Endpoints,
    pub fetch: FetchConfig,
}

impl Config {
    /// Defaults overlaid with `IP_FORECAST_*` environment variables.
    ///
    /// Unparseable values are ignored and the default is kept.
    pub fn from_env() -> Self {
        let config = Self::from_lookup(|key| env::var(key).ok());
        debug!("Loaded configuration: {:?}", config);
        config
    }

    /// Same overlay as [`from_env`](Self::from_env), reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Config::default();

        if let Some(url) = lookup("IP_FORECAST_IP_URL") {
            config.endpoints.ip_url = url;
        }
        if let Some(url) = lookup("IP_FORECAST_GEOLOCATION_URL") {
            config.endpoints.geolocation_base = url;
        }
        if let Some(url) = lookup("IP_FORECAST_WEATHER_URL") {
            config.endpoints.weather_base = url;
        }
        // zero would time out every request
        if let Some(secs) = lookup("IP_FORECAST_TIMEOUT_SECS")
            .and_then(|s| s.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
        {
            config.fetch.timeout = Duration::from_secs(secs);
        }
        if let Some(agent) = lookup("IP_FORECAST_USER_AGENT") {
            config.fetch.user_agent = agent;
        }

        config
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.fetch.timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_lookup_overlays_every_variable() {
        let config = Config::from_lookup(lookup_from(&[
            ("IP_FORECAST_IP_URL", "http://127.0.0.1:9000/ip"),
            ("IP_FORECAST_GEOLOCATION_URL", "http://127.0.0.1:9001"),
            ("IP_FORECAST_WEATHER_URL", "http://127.0.0.1:9002"),
            ("IP_FORECAST_TIMEOUT_SECS", "25"),
            ("IP_FORECAST_USER_AGENT", "forecast-bot/2.0"),
        ]));
        assert_eq!(config.endpoints.ip_url, "http://127.0.0.1:9000/ip");
        assert_eq!(config.endpoints.geolocation_base, "http://127.0.0.1:9001");
        assert_eq!(config.endpoints.weather_base, "http://127.0.0.1:9002");
        assert_eq!(config.fetch.timeout, Duration::from_secs(25));
        assert_eq!(config.fetch.user_agent, "forecast-bot/2.0");
    }

    #[test]
    fn test_lookup_without_variables_keeps_defaults() {
        let config = Config::from_lookup(lookup_from(&[]));
        assert_eq!(config.endpoints.ip_url, "https://api.ipify.org");
        assert_eq!(config.fetch.timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_bad_timeout_keeps_default() {
        for value in ["abc", "-5", "1.5", "0", ""] {
            let config = Config::from_lookup(lookup_from(&[("IP_FORECAST_TIMEOUT_SECS", value)]));
            assert_eq!(
                config.fetch.timeout,
                Duration::from_secs(10),
                "value: {value:?}"
            );
        }
    }

    #[test]
    fn test_defaults_point_at_public_services() {
        let config = Config::default();
        assert_eq!(config.endpoints.ip_url, "https://api.ipify.org");
        assert_eq!(config.endpoints.geolocation_base, "https://ipapi.co");
        assert_eq!(config.endpoints.weather_base, "https://api.weather.gov");
        assert_eq!(config.fetch.timeout, Duration::from_secs(10));
        assert!(config.fetch.user_agent.starts_with("ip-forecast/"));
    }

    #[test]
    fn test_with_timeout_overrides_default() {
        let config = Config::default().with_timeout(Duration::from_secs(3));
        assert_eq!(config.fetch.timeout, Duration::from_secs(3));
    }
}

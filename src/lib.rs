//! Public IP address to local weather forecast.
//!
//! Three stages run in sequence, each feeding the next:
//! [`IpAddressResolver`] discovers the caller's public address,
//! [`GeolocationResolver`] maps it to a [`Coordinate`], and
//! [`ForecastResolver`] turns that coordinate into forecast text.
//! [`Pipeline`] chains them and reports the first failure with its [`Stage`].

pub mod config;
pub mod coordinate;
pub mod error;
pub mod fetch;
pub mod geo_location;
pub mod ip_address;
pub mod pipeline;
pub mod weather;

pub use config::{Config, Endpoints, FetchConfig};
pub use coordinate::Coordinate;
pub use error::{ErrorKind, FetchError, PipelineError, Stage};
pub use fetch::HttpJsonFetcher;
pub use geo_location::GeolocationResolver;
pub use ip_address::IpAddressResolver;
pub use pipeline::{Pipeline, PipelineReport};
pub use weather::ForecastResolver;

use std::fmt;

use crate::error::FetchError;

/// A point in EPSG:4326 axis order: latitude first, then longitude.
///
/// Fields are labeled so that a transposed pair cannot be passed silently.
/// Many systems (PostGIS, WFS 1.0) use longitude/latitude instead, so any
/// positional input has to be converted explicitly through
/// [`Coordinate::from_lat_lon_strs`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, FetchError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(FetchError::InvalidInput(format!(
                "latitude out of range: {latitude}"
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(FetchError::InvalidInput(format!(
                "longitude out of range: {longitude}"
            )));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Builds a coordinate from a positional pair, `[latitude, longitude]`.
    ///
    /// Any length other than 2, or an element that is not a decimal number,
    /// is `InvalidInput`.
    pub fn from_lat_lon_strs<S: AsRef<str>>(values: &[S]) -> Result<Self, FetchError> {
        let [latitude, longitude] = values else {
            return Err(FetchError::InvalidInput(format!(
                "expecting 2 coordinates (latitude longitude), got {}",
                values.len()
            )));
        };
        Self::new(
            parse_axis("latitude", latitude.as_ref())?,
            parse_axis("longitude", longitude.as_ref())?,
        )
    }
}

fn parse_axis(name: &str, value: &str) -> Result<f64, FetchError> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| FetchError::InvalidInput(format!("{name} is not a decimal number: {value:?}")))
}

/// Renders `latitude,longitude`, the path segment used by the weather point lookup.
impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

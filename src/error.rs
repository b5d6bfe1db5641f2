use std::fmt;

use thiserror::Error;

/// Failure classes shared by every stage.
///
/// Callers branch on this, never on the error message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    NetworkFailure,
    HttpStatusFailure,
    MalformedResponse,
    EmptyResult,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::InvalidInput => "invalid input",
            ErrorKind::NetworkFailure => "network failure",
            ErrorKind::HttpStatusFailure => "http status failure",
            ErrorKind::MalformedResponse => "malformed response",
            ErrorKind::EmptyResult => "empty result",
        };
        f.write_str(name)
    }
}

/// Classified error returned by the fetcher and every resolver
#[derive(Error, Debug)]
pub enum FetchError {
    /// Bad argument count, IP shape, coordinate or URL. No request was sent.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// DNS, connect, reset, timeout or body read failure
    #[error("Network failure: {0}")]
    NetworkFailure(#[from] reqwest::Error),

    /// Upstream answered with something other than 200
    #[error("Unexpected HTTP status {status} from {url}")]
    HttpStatusFailure { status: u16, url: String },

    /// Body is not JSON, or a required field is missing
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Well-formed response without usable data
    #[error("Empty result: {0}")]
    EmptyResult(String),
}

impl FetchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FetchError::InvalidInput(_) => ErrorKind::InvalidInput,
            FetchError::NetworkFailure(_) => ErrorKind::NetworkFailure,
            FetchError::HttpStatusFailure { .. } => ErrorKind::HttpStatusFailure,
            FetchError::MalformedResponse(_) => ErrorKind::MalformedResponse,
            FetchError::EmptyResult(_) => ErrorKind::EmptyResult,
        }
    }

    /// Status code carried by an `HttpStatusFailure`
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::HttpStatusFailure { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::MalformedResponse(err.to_string())
    }
}

/// Pipeline stage, used to tag where a run failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    IpAddress,
    Geolocation,
    Forecast,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::IpAddress => "ip address",
            Stage::Geolocation => "geolocation",
            Stage::Forecast => "forecast",
        };
        f.write_str(name)
    }
}

/// A stage failure, forwarded with its original classification
#[derive(Error, Debug)]
#[error("{stage} stage failed ({}): {source}", .source.kind())]
pub struct PipelineError {
    pub stage: Stage,
    #[source]
    pub source: FetchError,
}

impl PipelineError {
    pub fn new(stage: Stage, source: FetchError) -> Self {
        Self { stage, source }
    }

    pub fn kind(&self) -> ErrorKind {
        self.source.kind()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_matches_variant() {
        assert_eq!(
            FetchError::InvalidInput("x".into()).kind(),
            ErrorKind::InvalidInput
        );
        assert_eq!(
            FetchError::EmptyResult("x".into()).kind(),
            ErrorKind::EmptyResult
        );
        let err = FetchError::HttpStatusFailure {
            status: 503,
            url: "http://localhost/".into(),
        };
        assert_eq!(err.kind(), ErrorKind::HttpStatusFailure);
        assert_eq!(err.status(), Some(503));
    }

    #[test]
    fn test_json_error_is_malformed_response() {
        let parse_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err: FetchError = parse_err.into();
        assert_eq!(err.kind(), ErrorKind::MalformedResponse);
    }

    #[test]
    fn test_pipeline_error_message_names_stage_and_kind() {
        let err = PipelineError::new(
            Stage::Geolocation,
            FetchError::InvalidInput("IP address is not valid IPv4: abc".into()),
        );
        let msg = err.to_string();
        assert!(msg.starts_with("geolocation stage failed (invalid input)"));
        assert!(msg.contains("abc"));
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }
}

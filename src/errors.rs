use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};

/// Header carrying the failure kind on `404` lookup responses.
pub const LOOKUP_FAILURE_HEADER: &str = "x-lookup-failure";

/// Upstream service involved in a failed lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upstream {
    Geocoding,
    Weather,
    AirQuality,
}

impl std::fmt::Display for Upstream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Upstream::Geocoding => "geocoding",
            Upstream::Weather => "weather",
            Upstream::AirQuality => "air quality",
        })
    }
}

/// Failure of the location → weather aggregation chain.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("No geocoding result for '{0}'")]
    GeocodeNotFound(String),

    #[error("{service} service unavailable: {message}")]
    UpstreamUnavailable { service: Upstream, message: String },

    #[error("{service} service returned a malformed response: {message}")]
    MalformedResponse { service: Upstream, message: String },
}

impl LookupError {
    pub(crate) fn unavailable(service: Upstream, message: impl Into<String>) -> Self {
        LookupError::UpstreamUnavailable {
            service,
            message: message.into(),
        }
    }

    pub(crate) fn malformed(service: Upstream, message: impl Into<String>) -> Self {
        LookupError::MalformedResponse {
            service,
            message: message.into(),
        }
    }

    /// Stable machine-readable name of the failure kind.
    pub fn kind(&self) -> &'static str {
        match self {
            LookupError::GeocodeNotFound(_) => "geocode_not_found",
            LookupError::UpstreamUnavailable { .. } => "upstream_unavailable",
            LookupError::MalformedResponse { .. } => "malformed_response",
        }
    }
}

impl IntoResponse for LookupError {
    /// Every lookup failure is a `404` with an empty body; the kind travels
    /// in the `X-Lookup-Failure` header.
    fn into_response(self) -> Response {
        match &self {
            LookupError::GeocodeNotFound(_) => tracing::info!("{}", self),
            _ => tracing::warn!("{}", self),
        }

        let mut response = StatusCode::NOT_FOUND.into_response();
        response.headers_mut().insert(
            LOOKUP_FAILURE_HEADER,
            HeaderValue::from_static(self.kind()),
        );
        response
    }
}

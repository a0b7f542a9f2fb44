//! Client for this service's own `GET /weather/:location` endpoint, used by
//! the terminal presenter.

use chrono::Utc;
use reqwest::StatusCode;
use thiserror::Error;
use url::Url;

use crate::errors::LOOKUP_FAILURE_HEADER;
use crate::models::AggregatedResponse;
use crate::presenter::WeatherView;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Lookup failed with HTTP {status} ({kind})")]
    Status { status: StatusCode, kind: String },

    #[error("Unexpected response: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
pub struct WeatherApiClient {
    client: reqwest::Client,
    base_url: Url,
}

impl WeatherApiClient {
    pub fn new(client: reqwest::Client, base_url: &str) -> Result<Self, ClientError> {
        let base_url =
            Url::parse(base_url).map_err(|e| ClientError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(base_url.to_string()));
        }
        Ok(Self { client, base_url })
    }

    fn weather_url(&self, location: &str) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .push("weather")
            .push(location);
        Ok(url)
    }

    /// Fetch the merged weather document for `location`.
    pub async fn fetch_weather(&self, location: &str) -> Result<AggregatedResponse, ClientError> {
        let response = self.client.get(self.weather_url(location)?).send().await?;

        let status = response.status();
        if !status.is_success() {
            let kind = response
                .headers()
                .get(LOOKUP_FAILURE_HEADER)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("unknown")
                .to_string();
            return Err(ClientError::Status { status, kind });
        }

        let bytes = response.bytes().await?;
        Ok(AggregatedResponse::from_json(serde_json::from_slice(&bytes)?)?)
    }

    /// Fetch `location` and build its view as of now.
    pub async fn load_view(&self, location: &str) -> Result<WeatherView, ClientError> {
        let response = self.fetch_weather(location).await?;
        Ok(WeatherView::from_response(&response, Utc::now()))
    }
}

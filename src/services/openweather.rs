//! OpenWeather client: One Call weather and air pollution forecast.
//!
//! See: https://openweathermap.org/api/one-call-api
//! and https://openweathermap.org/api/air-pollution

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::errors::{LookupError, Upstream};
use crate::models::WeatherDocument;
use crate::services::geocode::Coordinates;

/// Valid range of OpenWeather's air-quality index.
pub const AQI_RANGE: std::ops::RangeInclusive<u8> = 1..=5;

#[derive(Debug, Deserialize)]
struct AirPollutionResponse {
    #[serde(default)]
    list: Vec<AirPollutionEntry>,
}

#[derive(Debug, Deserialize)]
struct AirPollutionEntry {
    main: AirPollutionMain,
}

#[derive(Debug, Deserialize)]
struct AirPollutionMain {
    aqi: u8,
}

/// Client for the OpenWeather One Call and air pollution endpoints.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
}

impl OpenWeatherClient {
    pub fn new(client: reqwest::Client, api_url: &str, api_key: &str) -> Self {
        Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    async fn get_json(
        &self,
        service: Upstream,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Value, LookupError> {
        let url = format!("{}/{}", self.api_url, path);

        let response = self
            .client
            .get(&url)
            .query(query)
            .query(&[("appid", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| LookupError::unavailable(service, format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(LookupError::unavailable(
                service,
                format!("HTTP {}", response.status()),
            ));
        }

        response
            .json()
            .await
            .map_err(|e| LookupError::malformed(service, format!("JSON parse error: {}", e)))
    }

    /// Fetch current, hourly and daily weather in metric units.
    ///
    /// Returns the payload verbatim together with its [`WeatherDocument`]
    /// view; a payload that does not parse as one is malformed.
    pub async fn fetch_weather(
        &self,
        at: Coordinates,
    ) -> Result<(Map<String, Value>, WeatherDocument), LookupError> {
        let raw = self
            .get_json(
                Upstream::Weather,
                "onecall",
                &[
                    ("lat", at.lat.to_string()),
                    ("lon", at.lng.to_string()),
                    ("units", "metric".to_string()),
                ],
            )
            .await?;

        let document = WeatherDocument::from_value(&raw);
        let Value::Object(payload) = raw else {
            return Err(LookupError::malformed(
                Upstream::Weather,
                "payload is not a JSON object",
            ));
        };
        let document = document.map_err(|e| {
            LookupError::malformed(Upstream::Weather, format!("response structure error: {}", e))
        })?;

        Ok((payload, document))
    }

    /// Fetch the air pollution forecast and return the first entry's AQI.
    pub async fn fetch_aqi(&self, at: Coordinates) -> Result<u8, LookupError> {
        let raw = self
            .get_json(
                Upstream::AirQuality,
                "air_pollution/forecast",
                &[("lat", at.lat.to_string()), ("lon", at.lng.to_string())],
            )
            .await?;

        parse_first_aqi(raw)
    }
}

/// Pull `list[0].main.aqi` out of an air pollution payload.
fn parse_first_aqi(raw: Value) -> Result<u8, LookupError> {
    let body: AirPollutionResponse = serde_json::from_value(raw).map_err(|e| {
        LookupError::malformed(Upstream::AirQuality, format!("response structure error: {}", e))
    })?;

    let aqi = body
        .list
        .first()
        .map(|entry| entry.main.aqi)
        .ok_or_else(|| LookupError::malformed(Upstream::AirQuality, "empty forecast list"))?;

    if !AQI_RANGE.contains(&aqi) {
        return Err(LookupError::malformed(
            Upstream::AirQuality,
            format!("AQI {} outside 1..=5", aqi),
        ));
    }

    Ok(aqi)
}

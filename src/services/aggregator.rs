//! Weather aggregation service.
//!
//! Resolves a free-text location into one merged document:
//! 1. Geocode the normalized query and take the first match
//! 2. Fetch One Call weather for its coordinates
//! 3. Fetch the air pollution forecast and take the first AQI
//! 4. Build the display label and merge everything
//!
//! The calls run in sequence; any failure aborts the whole lookup so a
//! partial document is never produced.

use crate::config::AppConfig;
use crate::errors::LookupError;
use crate::models::AggregatedResponse;
use crate::services::geocode::{GeocodeClient, LocationQuery};
use crate::services::openweather::OpenWeatherClient;

/// Composes the geocoding and OpenWeather clients.
#[derive(Debug, Clone)]
pub struct WeatherAggregator {
    geocoder: GeocodeClient,
    openweather: OpenWeatherClient,
}

impl WeatherAggregator {
    pub fn new(geocoder: GeocodeClient, openweather: OpenWeatherClient) -> Self {
        Self {
            geocoder,
            openweather,
        }
    }

    /// Build both clients from the configuration, sharing one connection pool.
    pub fn from_config(config: &AppConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!("weather-lookup-api/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self::new(
            GeocodeClient::new(
                client.clone(),
                &config.geocode_api_url,
                &config.places_api_key,
            ),
            OpenWeatherClient::new(
                client,
                &config.openweather_api_url,
                &config.openweather_api_key,
            ),
        ))
    }

    /// Resolve `raw_location` to weather, air quality and a display label.
    pub async fn resolve_weather(
        &self,
        raw_location: &str,
    ) -> Result<AggregatedResponse, LookupError> {
        let query = LocationQuery::parse(raw_location);

        let place = self.geocoder.locate(&query).await?;
        let coords = place.geometry;
        tracing::debug!(
            "Resolved '{}' to ({:.4}, {:.4})",
            query,
            coords.lat,
            coords.lng
        );

        let (weather, document) = self.openweather.fetch_weather(coords).await?;
        let aqi = self.openweather.fetch_aqi(coords).await?;
        let location = place.components.display_label();

        tracing::info!("Weather lookup for '{}' → '{}' (aqi={})", query, location, aqi);

        Ok(AggregatedResponse::merge(weather, document, aqi, location))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Upstream;
    use crate::models::fixtures;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn paris_geocode() -> serde_json::Value {
        json!({
            "results": [{
                "geometry": { "lat": 48.8566, "lng": 2.3522 },
                "components": { "city": "Paris", "state": "Île-de-France", "country": "France" }
            }]
        })
    }

    fn aggregator_for(server: &MockServer) -> WeatherAggregator {
        let client = reqwest::Client::new();
        WeatherAggregator::new(
            GeocodeClient::new(client.clone(), &format!("{}/geocode", server.uri()), "places"),
            OpenWeatherClient::new(client, &server.uri(), "owm"),
        )
    }

    async fn mount_geocode(server: &MockServer, body: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path("/geocode"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_resolve_weather_merges_all_sources() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/geocode"))
            .and(query_param("q", "Paris"))
            .and(query_param("key", "places"))
            .respond_with(ResponseTemplate::new(200).set_body_json(paris_geocode()))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/onecall"))
            .and(query_param("units", "metric"))
            .and(query_param("appid", "owm"))
            .respond_with(ResponseTemplate::new(200).set_body_json(fixtures::one_call(48)))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/air_pollution/forecast"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "list": [{ "main": { "aqi": 3 } }] })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let response = aggregator_for(&server)
            .resolve_weather("Paris")
            .await
            .unwrap();

        assert_eq!(response.location, "Paris, Île-de-France");
        assert_eq!(response.aqi, 3);
        assert_eq!(response.weather["timezone"], "Europe/Paris");
        assert_eq!(response.document().hourly.len(), 48);
        assert_eq!(response.document().current.temp, 12.34);
    }

    #[tokio::test]
    async fn test_zero_results_is_geocode_not_found() {
        let server = MockServer::start().await;
        mount_geocode(&server, json!({ "results": [] })).await;

        let err = aggregator_for(&server)
            .resolve_weather("Nowhereville")
            .await
            .unwrap_err();

        assert!(matches!(err, LookupError::GeocodeNotFound(ref q) if q == "Nowhereville"));
    }

    #[tokio::test]
    async fn test_weather_error_status_is_upstream_unavailable() {
        let server = MockServer::start().await;
        mount_geocode(&server, paris_geocode()).await;
        Mock::given(method("GET"))
            .and(path("/onecall"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let err = aggregator_for(&server)
            .resolve_weather("Paris")
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            LookupError::UpstreamUnavailable {
                service: Upstream::Weather,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_weather_without_current_block_is_malformed() {
        let server = MockServer::start().await;
        mount_geocode(&server, paris_geocode()).await;
        Mock::given(method("GET"))
            .and(path("/onecall"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "hourly": [] })))
            .mount(&server)
            .await;

        let err = aggregator_for(&server)
            .resolve_weather("Paris")
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            LookupError::MalformedResponse {
                service: Upstream::Weather,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_geocode_error_status_is_upstream_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/geocode"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/onecall"))
            .respond_with(ResponseTemplate::new(200).set_body_json(fixtures::one_call(1)))
            .expect(0)
            .mount(&server)
            .await;

        let err = aggregator_for(&server)
            .resolve_weather("Paris")
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            LookupError::UpstreamUnavailable {
                service: Upstream::Geocoding,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_geocode_undecodable_body_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/geocode"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = aggregator_for(&server)
            .resolve_weather("Paris")
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            LookupError::MalformedResponse {
                service: Upstream::Geocoding,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_unreachable_geocoder_is_upstream_unavailable() {
        let server = MockServer::start().await;
        let client = reqwest::Client::new();
        let aggregator = WeatherAggregator::new(
            GeocodeClient::new(client.clone(), "http://127.0.0.1:1/geocode", "places"),
            OpenWeatherClient::new(client, &server.uri(), "owm"),
        );

        let err = aggregator.resolve_weather("Paris").await.unwrap_err();

        assert_eq!(err.kind(), "upstream_unavailable");
        assert!(matches!(
            err,
            LookupError::UpstreamUnavailable {
                service: Upstream::Geocoding,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_weather_array_body_is_malformed() {
        let server = MockServer::start().await;
        mount_geocode(&server, paris_geocode()).await;
        Mock::given(method("GET"))
            .and(path("/onecall"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([1, 2])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/air_pollution/forecast"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "list": [{ "main": { "aqi": 1 } }] })),
            )
            .expect(0)
            .mount(&server)
            .await;

        let err = aggregator_for(&server)
            .resolve_weather("Paris")
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            LookupError::MalformedResponse {
                service: Upstream::Weather,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_air_quality_failure_discards_weather() {
        let server = MockServer::start().await;
        mount_geocode(&server, paris_geocode()).await;
        Mock::given(method("GET"))
            .and(path("/onecall"))
            .respond_with(ResponseTemplate::new(200).set_body_json(fixtures::one_call(2)))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/air_pollution/forecast"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = aggregator_for(&server)
            .resolve_weather("Paris")
            .await
            .unwrap_err();

        assert_eq!(err.kind(), "upstream_unavailable");
    }

    #[tokio::test]
    async fn test_blank_query_skips_upstream() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&server)
            .await;

        let err = aggregator_for(&server)
            .resolve_weather("   ")
            .await
            .unwrap_err();

        assert_eq!(err.kind(), "geocode_not_found");
    }
}

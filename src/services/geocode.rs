//! OpenCage forward geocoding client.
//!
//! Resolves a free-text location into coordinates and address components.
//! See: https://opencagedata.com/api

use serde::Deserialize;
use url::form_urlencoded::byte_serialize;
use url::Url;

use crate::errors::{LookupError, Upstream};

/// A user-supplied location, split into words.
///
/// Both whitespace and `+` separate words, so `"San Francisco"` and
/// `"San+Francisco"` are the same query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationQuery {
    words: Vec<String>,
}

impl LocationQuery {
    pub fn parse(raw: &str) -> Self {
        let words = raw
            .split(|c: char| c.is_whitespace() || c == '+')
            .filter(|w| !w.is_empty())
            .map(str::to_string)
            .collect();
        Self { words }
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Words joined with `+`, each word form-url-encoded.
    pub fn normalized(&self) -> String {
        self.words
            .iter()
            .map(|w| byte_serialize(w.as_bytes()).collect::<String>())
            .collect::<Vec<_>>()
            .join("+")
    }
}

impl std::fmt::Display for LocationQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.words.join(" "))
    }
}

/// Latitude / longitude pair from the geocoder.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// Address components used to build the display label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AddressComponents {
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
}

impl AddressComponents {
    /// Build the display label: city, then state, then country unless the
    /// label already has two comma-separated parts.
    pub fn display_label(&self) -> String {
        let mut label = String::new();

        if let Some(city) = non_empty(&self.city) {
            push_part(&mut label, city);
        }
        if let Some(state) = non_empty(&self.state) {
            push_part(&mut label, state);
        }
        if let Some(country) = non_empty(&self.country) {
            if label.split(',').count() != 2 {
                push_part(&mut label, country);
            }
        }

        label
    }
}

fn push_part(label: &mut String, part: &str) {
    if !label.is_empty() {
        label.push_str(", ");
    }
    label.push_str(part);
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// First-ranked geocoding match.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GeocodeMatch {
    pub geometry: Coordinates,
    #[serde(default)]
    pub components: AddressComponents,
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    results: Vec<GeocodeMatch>,
}

/// Client for the OpenCage geocoding API.
#[derive(Debug, Clone)]
pub struct GeocodeClient {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
}

impl GeocodeClient {
    pub fn new(client: reqwest::Client, api_url: &str, api_key: &str) -> Self {
        Self {
            client,
            api_url: api_url.to_string(),
            api_key: api_key.to_string(),
        }
    }

    fn request_url(&self, query: &LocationQuery) -> Result<Url, LookupError> {
        let mut url = Url::parse(&self.api_url).map_err(|e| {
            LookupError::unavailable(Upstream::Geocoding, format!("invalid API URL: {}", e))
        })?;
        // `q` is already form-encoded; appending it as a pair would escape the '+'.
        let q = format!("q={}", query.normalized());
        let full_query = match url.query() {
            Some(existing) if !existing.is_empty() => format!("{}&{}", existing, q),
            _ => q,
        };
        url.set_query(Some(&full_query));
        url.query_pairs_mut().append_pair("key", &self.api_key);
        Ok(url)
    }

    /// Geocode `query` and return the first-ranked match.
    pub async fn locate(&self, query: &LocationQuery) -> Result<GeocodeMatch, LookupError> {
        if query.is_empty() {
            return Err(LookupError::GeocodeNotFound(String::new()));
        }

        let url = self.request_url(query)?;
        tracing::debug!("Geocoding '{}'", query);

        let response = self.client.get(url).send().await.map_err(|e| {
            LookupError::unavailable(Upstream::Geocoding, format!("request failed: {}", e))
        })?;

        if !response.status().is_success() {
            return Err(LookupError::unavailable(
                Upstream::Geocoding,
                format!("HTTP {}", response.status()),
            ));
        }

        let body: GeocodeResponse = response
            .json()
            .await
            .map_err(|e| LookupError::malformed(Upstream::Geocoding, e.to_string()))?;

        // Ambiguous names ("Springfield") resolve to the provider's top match.
        body.results
            .into_iter()
            .next()
            .ok_or_else(|| LookupError::GeocodeNotFound(query.to_string()))
    }
}

//! Weather payload types shared by the aggregator and the presenter.
//!
//! The upstream One Call payload is forwarded verbatim, so the response keeps
//! it as a JSON object. [`WeatherDocument`] is the typed view parsed out of
//! that object: it validates the shape and feeds the presenter.

use serde::{de, Deserialize, Serialize};
use serde_json::{Map, Value};

/// Condition entry (`weather[0]` in OpenWeather payloads).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Condition {
    pub main: String,
    #[serde(default)]
    pub description: String,
    pub icon: String,
}

/// `current` block of the One Call payload.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CurrentWeather {
    pub dt: i64,
    pub temp: f64,
    pub humidity: f64,
    #[serde(default)]
    pub uvi: f64,
    pub wind_speed: f64,
    #[serde(default)]
    pub visibility: Option<f64>,
    pub sunrise: Option<i64>,
    pub sunset: Option<i64>,
    pub dew_point: f64,
    pub weather: Vec<Condition>,
}

/// One entry of the `hourly` block.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HourlySnapshot {
    pub dt: i64,
    pub temp: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DailyTemperature {
    pub day: f64,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// One entry of the `daily` block.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DailySnapshot {
    pub dt: i64,
    pub temp: DailyTemperature,
    pub weather: Vec<Condition>,
}

/// Typed view over a One Call payload.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WeatherDocument {
    /// Seconds east of UTC for the forecast location.
    #[serde(default)]
    pub timezone_offset: i32,
    pub current: CurrentWeather,
    #[serde(default)]
    pub hourly: Vec<HourlySnapshot>,
    #[serde(default)]
    pub daily: Vec<DailySnapshot>,
}

impl WeatherDocument {
    /// Parse the typed view without taking or copying the payload.
    pub fn from_value(value: &Value) -> Result<Self, serde_json::Error> {
        Self::deserialize(value)
    }
}

/// Merged document returned by `GET /weather/:location`.
///
/// Serializes as the weather payload's own fields plus `aqi` and `location`.
/// The typed [`WeatherDocument`] parsed from the same payload travels with it
/// and is not serialized.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedResponse {
    #[serde(flatten)]
    pub weather: Map<String, Value>,
    /// Air-quality index, 1 (good) to 5 (very poor).
    pub aqi: u8,
    /// Display label built from the geocoder's address components.
    pub location: String,
    #[serde(skip)]
    document: WeatherDocument,
}

impl AggregatedResponse {
    /// Merge a weather payload with the air-quality index and location label.
    /// Upstream keys named `aqi` or `location` are replaced.
    pub fn merge(
        mut weather: Map<String, Value>,
        document: WeatherDocument,
        aqi: u8,
        location: String,
    ) -> Self {
        weather.remove("aqi");
        weather.remove("location");
        Self {
            weather,
            aqi,
            location,
            document,
        }
    }

    /// Decode a merged document as served by `GET /weather/:location`.
    pub fn from_json(value: Value) -> Result<Self, serde_json::Error> {
        let document = WeatherDocument::from_value(&value)?;
        let Value::Object(mut weather) = value else {
            return Err(de::Error::custom("expected a JSON object"));
        };
        let aqi = weather
            .remove("aqi")
            .ok_or_else(|| de::Error::missing_field("aqi"))
            .and_then(u8::deserialize)?;
        let location = weather
            .remove("location")
            .ok_or_else(|| de::Error::missing_field("location"))
            .and_then(String::deserialize)?;

        Ok(Self {
            weather,
            aqi,
            location,
            document,
        })
    }

    pub fn document(&self) -> &WeatherDocument {
        &self.document
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use serde_json::{json, Value};

    /// A trimmed One Call payload with `hours` hourly entries.
    pub(crate) fn one_call(hours: usize) -> Value {
        let start = 1_700_000_000_i64;
        let hourly: Vec<Value> = (0..hours)
            .map(|i| json!({ "dt": start + 3600 * i as i64, "temp": 10.0 + i as f64, "humidity": 60 }))
            .collect();
        json!({
            "lat": 48.8566,
            "lon": 2.3522,
            "timezone": "Europe/Paris",
            "timezone_offset": 3600,
            "current": {
                "dt": start,
                "sunrise": start - 7200,
                "sunset": start + 30000,
                "temp": 12.34,
                "feels_like": 11.0,
                "humidity": 81,
                "uvi": 0.5,
                "visibility": 9500,
                "wind_speed": 4.12,
                "dew_point": 9.1,
                "weather": [{ "id": 803, "main": "Clouds", "description": "broken clouds", "icon": "04d" }]
            },
            "hourly": hourly,
            "daily": [
                {
                    "dt": start,
                    "temp": { "day": 13.2, "min": 8.0, "max": 14.1 },
                    "weather": [{ "id": 500, "main": "Rain", "description": "light rain", "icon": "10d" }]
                },
                {
                    "dt": start + 86400,
                    "temp": { "day": 15.0, "min": 9.5, "max": 16.0 },
                    "weather": [{ "id": 800, "main": "Clear", "description": "clear sky", "icon": "01d" }]
                }
            ]
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn merge_fixture(value: Value, aqi: u8) -> AggregatedResponse {
        let document = WeatherDocument::from_value(&value).unwrap();
        match value {
            Value::Object(map) => AggregatedResponse::merge(map, document, aqi, "Paris, France".to_string()),
            _ => panic!("fixture must be an object"),
        }
    }

    #[test]
    fn test_document_parses_one_call_payload() {
        let doc = WeatherDocument::from_value(&fixtures::one_call(48)).unwrap();
        assert_eq!(doc.timezone_offset, 3600);
        assert_eq!(doc.current.humidity, 81.0);
        assert_eq!(doc.current.weather[0].icon, "04d");
        assert_eq!(doc.hourly.len(), 48);
        assert_eq!(doc.daily[1].temp.day, 15.0);
    }

    #[test]
    fn test_document_requires_current_block() {
        let result = WeatherDocument::from_value(&json!({ "hourly": [] }));
        assert!(result.is_err());
    }

    #[test]
    fn test_merge_overwrites_aqi_and_location() {
        let mut payload = fixtures::one_call(1);
        payload["aqi"] = json!(99);
        payload["location"] = json!("upstream");
        let merged = merge_fixture(payload, 2);

        let value = serde_json::to_value(&merged).unwrap();
        assert_eq!(value["aqi"], 2);
        assert_eq!(value["location"], "Paris, France");
        assert_eq!(value["lat"], 48.8566);
    }

    #[test]
    fn test_merge_keeps_parsed_document() {
        let merged = merge_fixture(fixtures::one_call(5), 3);
        assert_eq!(merged.document().hourly.len(), 5);
        assert_eq!(merged.document().current.temp, 12.34);
        assert_eq!(merged.weather["hourly"].as_array().unwrap().len(), 5);
    }

    #[test]
    fn test_aggregated_response_roundtrips_extra_fields() {
        let merged = merge_fixture(fixtures::one_call(3), 1);

        let text = serde_json::to_string(&merged).unwrap();
        let back = AggregatedResponse::from_json(serde_json::from_str(&text).unwrap()).unwrap();
        assert_eq!(back.aqi, 1);
        assert_eq!(back.location, "Paris, France");
        assert_eq!(back.weather["timezone"], "Europe/Paris");
        assert!(!back.weather.contains_key("aqi"));
        assert_eq!(back.document().hourly.len(), 3);
        assert_eq!(back, merged);
    }

    #[test]
    fn test_from_json_rejects_missing_fields() {
        let mut payload = fixtures::one_call(1);
        payload["location"] = json!("Paris");
        assert!(AggregatedResponse::from_json(payload).is_err());

        assert!(AggregatedResponse::from_json(json!([1, 2])).is_err());
    }
}

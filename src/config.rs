use std::time::Duration;

use thiserror::Error;

const DEFAULT_PORT: u16 = 3001;
const DEFAULT_GEOCODE_API_URL: &str = "https://api.opencagedata.com/geocode/v1/json";
const DEFAULT_OPENWEATHER_API_URL: &str = "https://api.openweathermap.org/data/2.5";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Errors raised while building [`AppConfig`] at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} has an invalid value '{value}'")]
    Invalid { name: &'static str, value: String },
}

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Application configuration, built once at startup and handed to the
/// aggregator and router.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    /// OpenCage geocoding API key.
    pub places_api_key: String,
    /// OpenWeather API key, shared by the One Call and air pollution endpoints.
    pub openweather_api_key: String,
    /// Full URL of the geocoding JSON endpoint.
    pub geocode_api_url: String,
    /// Base URL under which `onecall` and `air_pollution/forecast` live.
    pub openweather_api_url: String,
    pub request_timeout: Duration,
    pub log_format: LogFormat,
}

impl AppConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from any name → value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(name))
        };

        let port = match lookup("PORT") {
            Some(v) => v.parse().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                value: v,
            })?,
            None => DEFAULT_PORT,
        };

        let timeout_secs = match lookup("REQUEST_TIMEOUT_SECS") {
            Some(v) => v.parse().map_err(|_| ConfigError::Invalid {
                name: "REQUEST_TIMEOUT_SECS",
                value: v,
            })?,
            None => DEFAULT_REQUEST_TIMEOUT_SECS,
        };

        let log_format = match lookup("LOG_FORMAT").as_deref() {
            None | Some("text") => LogFormat::Text,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: "LOG_FORMAT",
                    value: other.to_string(),
                })
            }
        };

        Ok(Self {
            port,
            places_api_key: required("PLACES_APIKEY")?,
            openweather_api_key: required("OPENWEATHER_APIKEY")?,
            geocode_api_url: lookup("GEOCODE_API_URL")
                .unwrap_or_else(|| DEFAULT_GEOCODE_API_URL.to_string()),
            openweather_api_url: lookup("OPENWEATHER_API_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_OPENWEATHER_API_URL.to_string()),
            request_timeout: Duration::from_secs(timeout_secs),
            log_format,
        })
    }
}

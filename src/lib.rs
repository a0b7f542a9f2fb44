//! Weather Lookup: resolves a free-text location to OpenWeather current,
//! hourly and daily weather plus air quality, and presents it.

pub mod client;
pub mod config;
pub mod errors;
pub mod models;
pub mod presenter;
pub mod routes;
pub mod services;
pub mod telemetry;

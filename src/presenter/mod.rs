//! Turns an aggregated weather document into what the weather page shows.

pub mod aqi;
pub mod render;
pub mod session;
pub mod view;

pub use aqi::{AirQuality, AqiBand};
pub use session::{QuerySession, RequestToken, ViewState};
pub use view::WeatherView;

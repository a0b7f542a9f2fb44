//! Weather HTTP endpoints.
//!
//! - GET /weather/:location
//! - GET /weather/:location/view

use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;

use crate::errors::LookupError;
use crate::models::AggregatedResponse;
use crate::presenter::WeatherView;
use crate::routes::AppState;

/// Look up weather and air quality for a free-text location.
///
/// Returns the upstream One Call payload (`current`, `hourly`, `daily`, ...)
/// with `aqi` and `location` added. Any failure along the way yields an
/// empty `404`; the cause is named in the `X-Lookup-Failure` header.
#[utoipa::path(
    get,
    path = "/weather/{location}",
    tag = "Weather",
    params(
        ("location" = String, Path, description = "Free-text location; words separated by spaces or '+'"),
    ),
    responses(
        (status = 200, description = "One Call weather payload plus `aqi` (1-5) and `location` label"),
        (status = 404, description = "Lookup failed (empty body)",
         headers(
             ("X-Lookup-Failure" = String, description = "geocode_not_found, upstream_unavailable or malformed_response")
         )),
    )
)]
pub async fn get_weather(
    State(state): State<AppState>,
    Path(location): Path<String>,
) -> Result<Json<AggregatedResponse>, LookupError> {
    let response = state.aggregator.resolve_weather(&location).await?;
    Ok(Json(response))
}

/// Look up a location and return the rendered weather page model.
///
/// Hourly entries are cut to the first 10 and all times are local to the
/// location.
#[utoipa::path(
    get,
    path = "/weather/{location}/view",
    tag = "Weather",
    params(
        ("location" = String, Path, description = "Free-text location; words separated by spaces or '+'"),
    ),
    responses(
        (status = 200, description = "Weather page model", body = WeatherView),
        (status = 404, description = "Lookup failed (empty body)",
         headers(
             ("X-Lookup-Failure" = String, description = "geocode_not_found, upstream_unavailable or malformed_response")
         )),
    )
)]
pub async fn get_weather_view(
    State(state): State<AppState>,
    Path(location): Path<String>,
) -> Result<Json<WeatherView>, LookupError> {
    let response = state.aggregator.resolve_weather(&location).await?;
    Ok(Json(WeatherView::from_response(&response, Utc::now())))
}

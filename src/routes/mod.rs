use axum::http::{HeaderName, Method};
use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::errors::LOOKUP_FAILURE_HEADER;
use crate::presenter::{aqi, view};
use crate::services::aggregator::WeatherAggregator;

pub mod health;
pub mod weather;

/// Shared application state for the weather endpoints.
#[derive(Debug, Clone)]
pub struct AppState {
    pub aggregator: WeatherAggregator,
}

/// OpenAPI document for the Weather Lookup API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Weather Lookup API",
        version = "0.1.0",
        description = "Resolves a free-text location with OpenCage, then returns \
            OpenWeather current, hourly and daily weather together with the \
            air-quality index and a display label for the place.",
        license(name = "MIT"),
    ),
    tags(
        (name = "Health", description = "Service health check"),
        (name = "Weather", description = "Location weather lookup"),
    ),
    paths(
        health::health_check,
        weather::get_weather,
        weather::get_weather_view,
    ),
    components(
        schemas(
            health::HealthResponse,
            view::WeatherView,
            view::Header,
            view::TodayCard,
            view::HourlyPoint,
            view::DailyCard,
            aqi::AirQuality,
        )
    )
)]
pub struct ApiDoc;

/// Build the HTTP router.
pub fn router(state: AppState) -> Router {
    // Read-only API: GET only, and let browsers see the failure header.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET])
        .allow_headers(Any)
        .expose_headers([HeaderName::from_static(LOOKUP_FAILURE_HEADER)]);

    Router::new()
        .route("/health", get(health::health_check))
        .route("/weather/:location", get(weather::get_weather))
        .route("/weather/:location/view", get(weather::get_weather_view))
        .with_state(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

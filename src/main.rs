// Weather Lookup API v0.1
use std::net::SocketAddr;
use std::process::ExitCode;

use weather_lookup_api::config::AppConfig;
use weather_lookup_api::routes::{self, AppState};
use weather_lookup_api::services::aggregator::WeatherAggregator;
use weather_lookup_api::telemetry;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    telemetry::init(
        config.log_format,
        "weather_lookup_api=debug,tower_http=debug",
    );

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let aggregator = WeatherAggregator::from_config(&config)?;
    let app = routes::router(AppState { aggregator });

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("API server listening on {}", addr);
    tracing::info!(
        "Swagger UI available at http://localhost:{}/swagger-ui/",
        config.port
    );

    axum::serve(listener, app).await?;
    Ok(())
}

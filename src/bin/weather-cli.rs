//! Terminal presenter for the weather lookup API.
//!
//! Type a location per line; the latest submitted location always wins, even
//! when an earlier lookup answers later.

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use weather_lookup_api::client::{ClientError, WeatherApiClient};
use weather_lookup_api::config::LogFormat;
use weather_lookup_api::presenter::render::render_state;
use weather_lookup_api::presenter::{QuerySession, RequestToken, ViewState, WeatherView};
use weather_lookup_api::telemetry;

type Outcome = (RequestToken, Result<WeatherView, ClientError>);

#[derive(Debug, Parser)]
#[command(version, about = "Look up weather and air quality for a location")]
struct Cli {
    /// Base URL of the weather lookup API
    #[arg(long, env = "WEATHER_API_URL", default_value = "http://localhost:3001")]
    api_url: String,

    /// Location to show on start-up
    location: Vec<String>,
}

fn submit(
    session: &mut QuerySession,
    client: &WeatherApiClient,
    results: &mpsc::UnboundedSender<Outcome>,
    location: String,
) {
    let token = session.submit(&location);
    println!("{}", render_state(session.state()));

    let client = client.clone();
    let results = results.clone();
    tokio::spawn(async move {
        let outcome = client.load_view(&location).await;
        // The receiver only goes away on shutdown.
        let _ = results.send((token, outcome));
    });
}

#[tokio::main]
async fn main() -> Result<(), ClientError> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    telemetry::init(LogFormat::Text, "weather_lookup_api=warn");

    let client = WeatherApiClient::new(reqwest::Client::new(), &cli.api_url)?;
    let (tx, mut rx) = mpsc::unbounded_channel::<Outcome>();
    let mut session = QuerySession::new();

    let initial = cli.location.join(" ");
    if initial.trim().is_empty() {
        println!("{}", render_state(session.state()));
    } else {
        submit(&mut session, &client, &tx, initial);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    loop {
        if !stdin_open && !matches!(session.state(), ViewState::Loading { .. }) {
            break;
        }

        tokio::select! {
            line = lines.next_line(), if stdin_open => match line {
                Ok(Some(line)) => {
                    let location = line.trim();
                    match location {
                        "" => continue,
                        "quit" | "exit" => break,
                        _ => submit(&mut session, &client, &tx, location.to_string()),
                    }
                }
                Ok(None) => stdin_open = false,
                Err(e) => {
                    tracing::error!("Failed to read stdin: {}", e);
                    stdin_open = false;
                }
            },
            Some((token, outcome)) = rx.recv() => {
                if session.complete(token, outcome) {
                    println!("{}", render_state(session.state()));
                }
            }
        }
    }

    Ok(())
}

use std::fmt::Write;

use crate::presenter::session::ViewState;
use crate::presenter::view::WeatherView;

/// Render a session state as plain text for a terminal.
pub fn render_state(state: &ViewState) -> String {
    match state {
        ViewState::Idle => "Enter a location.".to_string(),
        ViewState::Loading { location, .. } => format!("Loading weather for {}...", location),
        ViewState::Ready(view) => render_view(view),
        ViewState::Failed { location } => {
            format!("Something went wrong looking up '{}'. Try another location.", location)
        }
    }
}

pub fn render_view(view: &WeatherView) -> String {
    let mut out = String::new();
    let today = &view.today;
    let aq = &view.air_quality;

    // Writing into a String cannot fail.
    let _ = writeln!(out, "{}  {}", view.header.clock, view.header.date);
    let _ = writeln!(out, "{}", view.header.greeting);
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", today.location);
    let _ = writeln!(
        out,
        "{}: {}°C, {} ({})",
        today.date, today.temperature_c, today.condition, today.description
    );
    let _ = writeln!(
        out,
        "UV index {} | Wind {} km/h | Humidity {}% | Visibility {}",
        today.uv_index,
        today.wind_speed,
        today.humidity_pct,
        today
            .visibility_km
            .map(|km| format!("{} km", km))
            .unwrap_or_else(|| "n/a".to_string())
    );
    let _ = writeln!(
        out,
        "Sunrise {} | Sunset {} | Dew point {}°C",
        today.sunrise.as_deref().unwrap_or("n/a"),
        today.sunset.as_deref().unwrap_or("n/a"),
        today.dew_point_c
    );
    let _ = writeln!(out, "Air quality: {} ({})", aq.name, aq.value);

    if !view.hourly.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Hourly");
        for point in &view.hourly {
            let _ = writeln!(out, "  {}  {:>6.1}°C", point.time, point.temperature_c);
        }
    }

    if !view.daily.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Daily");
        for day in &view.daily {
            let _ = writeln!(
                out,
                "  {:<12} {:>6.1}°C  {}",
                day.day, day.temperature_c, day.description
            );
        }
    }

    out
}

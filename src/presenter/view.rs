//! View model built from an aggregated weather document.
//!
//! All times are shown in the forecast location's local time, derived from
//! the payload's `timezone_offset`.

use chrono::{DateTime, FixedOffset, Offset, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::{AggregatedResponse, Condition, HourlySnapshot, WeatherDocument};
use crate::presenter::aqi::AirQuality;

/// Number of hourly entries shown.
pub const HOURLY_LIMIT: usize = 10;

const MISSING_TIME: &str = "--:--";

/// Clock, date and greeting shown above the cards.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Header {
    /// 12-hour clock, e.g. "9:05 AM"
    pub clock: String,
    /// Long date, e.g. "Saturday, 17 October, 2026"
    pub date: String,
    /// "Good Morning!" or "Good Evening!"
    pub greeting: String,
}

/// Current conditions card.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct TodayCard {
    pub location: String,
    /// e.g. "Today, 17 October"
    pub date: String,
    pub temperature_c: f64,
    pub condition: String,
    pub description: String,
    pub icon: String,
    pub uv_index: f64,
    /// Wind speed with one decimal
    pub wind_speed: String,
    pub humidity_pct: f64,
    /// Visibility rounded to whole kilometres
    pub visibility_km: Option<i64>,
    /// Local "HH:mm"
    pub sunrise: Option<String>,
    /// Local "HH:mm"
    pub sunset: Option<String>,
    pub dew_point_c: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct HourlyPoint {
    /// Local "HH:mm"
    pub time: String,
    pub temperature_c: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DailyCard {
    /// Unix timestamp of the day
    pub timestamp: i64,
    /// e.g. "Sat, 17 Oct"
    pub day: String,
    pub temperature_c: f64,
    pub icon: String,
    pub description: String,
}

/// Everything the weather page shows for one location.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct WeatherView {
    pub header: Header,
    pub today: TodayCard,
    pub air_quality: AirQuality,
    pub hourly: Vec<HourlyPoint>,
    pub daily: Vec<DailyCard>,
}

impl WeatherView {
    /// Build the view from a merged response, as of `now`.
    pub fn from_response(response: &AggregatedResponse, now: DateTime<Utc>) -> Self {
        Self::build(
            response.document(),
            i64::from(response.aqi),
            &response.location,
            now,
        )
    }

    pub fn build(doc: &WeatherDocument, aqi: i64, location: &str, now: DateTime<Utc>) -> Self {
        let offset = location_offset(doc.timezone_offset);
        let local_now = now.with_timezone(&offset);

        let clock = local_now.format("%-I:%M %p").to_string();
        let header = Header {
            date: local_now.format("%A, %-d %B, %Y").to_string(),
            greeting: greeting(&clock).to_string(),
            clock,
        };

        let current = &doc.current;
        let condition = current.weather.first();
        let today = TodayCard {
            location: location.to_string(),
            date: local_now.format("Today, %d %B").to_string(),
            temperature_c: current.temp,
            condition: condition.map(|c| c.main.clone()).unwrap_or_default(),
            description: condition.map(|c| c.description.clone()).unwrap_or_default(),
            icon: condition.map(|c| c.icon.clone()).unwrap_or_default(),
            uv_index: current.uvi,
            wind_speed: format!("{:.1}", current.wind_speed),
            humidity_pct: current.humidity,
            visibility_km: current.visibility.map(|m| (m / 1000.0).round() as i64),
            sunrise: current.sunrise.map(|ts| clock_24h(ts, offset)),
            sunset: current.sunset.map(|ts| clock_24h(ts, offset)),
            dew_point_c: current.dew_point,
        };

        let daily = doc
            .daily
            .iter()
            .map(|d| {
                let condition: Option<&Condition> = d.weather.first();
                DailyCard {
                    timestamp: d.dt,
                    day: local_time(d.dt, offset)
                        .map(|t| t.format("%a, %-d %b").to_string())
                        .unwrap_or_default(),
                    temperature_c: d.temp.day,
                    icon: condition.map(|c| c.icon.clone()).unwrap_or_default(),
                    description: condition.map(|c| c.description.clone()).unwrap_or_default(),
                }
            })
            .collect();

        Self {
            header,
            today,
            air_quality: AirQuality::from_index(aqi),
            hourly: hourly_points(&doc.hourly, offset),
            daily,
        }
    }
}

/// "Good Morning!" when the 12-hour clock label is AM, else "Good Evening!".
pub fn greeting(clock: &str) -> &'static str {
    if clock.contains("AM") {
        "Good Morning!"
    } else {
        "Good Evening!"
    }
}

/// First [`HOURLY_LIMIT`] hourly entries with local "HH:mm" labels.
pub fn hourly_points(hourly: &[HourlySnapshot], offset: FixedOffset) -> Vec<HourlyPoint> {
    hourly
        .iter()
        .take(HOURLY_LIMIT)
        .map(|h| HourlyPoint {
            time: clock_24h(h.dt, offset),
            temperature_c: h.temp,
        })
        .collect()
}

fn location_offset(seconds: i32) -> FixedOffset {
    FixedOffset::east_opt(seconds).unwrap_or_else(|| {
        tracing::warn!("Ignoring invalid timezone offset {}s, using UTC", seconds);
        Utc.fix()
    })
}

fn local_time(timestamp: i64, offset: FixedOffset) -> Option<DateTime<FixedOffset>> {
    DateTime::from_timestamp(timestamp, 0).map(|t| t.with_timezone(&offset))
}

fn clock_24h(timestamp: i64, offset: FixedOffset) -> String {
    local_time(timestamp, offset)
        .map(|t| t.format("%H:%M").to_string())
        .unwrap_or_else(|| MISSING_TIME.to_string())
}

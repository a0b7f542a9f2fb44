use serde::Serialize;
use utoipa::ToSchema;

/// Qualitative band of OpenWeather's 1–5 air-quality index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AqiBand {
    Good,
    Fair,
    Moderate,
    Poor,
    VeryPoor,
    /// Any value outside 1..=5.
    Unknown,
}

impl AqiBand {
    pub fn classify(aqi: i64) -> Self {
        match aqi {
            1 => AqiBand::Good,
            2 => AqiBand::Fair,
            3 => AqiBand::Moderate,
            4 => AqiBand::Poor,
            5 => AqiBand::VeryPoor,
            _ => AqiBand::Unknown,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            AqiBand::Good => "Good",
            AqiBand::Fair => "Fair",
            AqiBand::Moderate => "Moderate",
            AqiBand::Poor => "Poor",
            AqiBand::VeryPoor => "Very Poor",
            AqiBand::Unknown => "Unknown",
        }
    }

    /// CSS color used for the band.
    pub fn color(self) -> &'static str {
        match self {
            AqiBand::Good => "#90ee90",
            AqiBand::Fair => "green",
            AqiBand::Moderate => "yellow",
            AqiBand::Poor => "orange",
            AqiBand::VeryPoor => "red",
            AqiBand::Unknown => "gray",
        }
    }
}

/// Air-quality card.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct AirQuality {
    /// Raw index value
    pub value: i64,
    /// Band name, e.g. "Moderate"
    pub name: String,
    /// Display color for the band
    pub color: String,
}

impl AirQuality {
    pub fn from_index(value: i64) -> Self {
        let band = AqiBand::classify(value);
        Self {
            value,
            name: band.name().to_string(),
            color: band.color().to_string(),
        }
    }
}

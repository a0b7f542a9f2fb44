pub mod aggregator;
pub mod geocode;
pub mod openweather;

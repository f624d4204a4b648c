use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

// Database entity models
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LocationRecord {
    pub location_id: i32,
    pub location_name: String,
    pub province_name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub inserted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WeatherObservation {
    pub weather_id: i64,
    pub location_id: i32,
    pub location_name: String,
    pub province_name: String,
    pub weather_main: Option<String>,
    pub weather_description: Option<String>,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub temp_min_c: f64,
    pub temp_max_c: f64,
    pub pressure_hpa: i32,
    pub humidity_percent: i32,
    pub wind_speed_mps: f64,
    pub wind_direction_deg: Option<i32>,
    pub visibility_m: Option<i32>,
    pub rain_1h_mm: f64,
    pub cloudiness_percent: Option<i32>,
    pub sunrise: DateTime<Utc>,
    pub sunset: DateTime<Utc>,
    pub observed_at: DateTime<Utc>,
    pub inserted_at: DateTime<Utc>,
}

// Observation before it is persisted (no weather_id / inserted_at yet)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewWeatherObservation {
    pub location_id: i32,
    pub location_name: String,
    pub province_name: String,
    pub weather_main: Option<String>,
    pub weather_description: Option<String>,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub temp_min_c: f64,
    pub temp_max_c: f64,
    pub pressure_hpa: i32,
    pub humidity_percent: i32,
    pub wind_speed_mps: f64,
    pub wind_direction_deg: Option<i32>,
    pub visibility_m: Option<i32>,
    pub rain_1h_mm: f64,
    pub cloudiness_percent: Option<i32>,
    pub sunrise: DateTime<Utc>,
    pub sunset: DateTime<Utc>,
    pub observed_at: DateTime<Utc>,
}

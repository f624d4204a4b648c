use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_GEOCODE_URL: &str = "http://api.openweathermap.org/geo/1.0/direct";
pub const DEFAULT_WEATHER_URL: &str = "https://api.openweathermap.org/data/2.5/weather";
pub const DEFAULT_PSGC_CITIES_URL: &str = "https://psgc.gitlab.io/api/cities.json";
pub const DEFAULT_PSGC_PROVINCES_URL: &str = "https://psgc.gitlab.io/api/provinces.json";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub api_key: String,
    pub geocode_url: String,
    pub weather_url: String,
    pub psgc_cities_url: String,
    pub psgc_provinces_url: String,
    pub country_code: String,
    pub geocode_limit: u32,
    pub geocode_delay_ms: u64,
    pub snapshot_path: PathBuf,
    pub sync_interval_minutes: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Config {
            database_url: env::var("DATABASE_URL")?,
            api_key: env::var("OPENWEATHER_API_KEY")?,
            geocode_url: env::var("GEOCODE_URL").unwrap_or_else(|_| DEFAULT_GEOCODE_URL.to_string()),
            weather_url: env::var("WEATHER_URL").unwrap_or_else(|_| DEFAULT_WEATHER_URL.to_string()),
            psgc_cities_url: env::var("PSGC_CITIES_URL")
                .unwrap_or_else(|_| DEFAULT_PSGC_CITIES_URL.to_string()),
            psgc_provinces_url: env::var("PSGC_PROVINCES_URL")
                .unwrap_or_else(|_| DEFAULT_PSGC_PROVINCES_URL.to_string()),
            country_code: env::var("COUNTRY_CODE").unwrap_or_else(|_| "PH".to_string()),
            geocode_limit: env::var("GEOCODE_LIMIT")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .unwrap_or(5),
            geocode_delay_ms: env::var("GEOCODE_DELAY_MS")
                .unwrap_or_else(|_| "1000".to_string())
                .parse()
                .unwrap_or(1000),
            snapshot_path: env::var("SNAPSHOT_PATH")
                .unwrap_or_else(|_| "locations_snapshot.json".to_string())
                .into(),
            sync_interval_minutes: env::var("SYNC_INTERVAL_MINUTES")
                .unwrap_or_else(|_| "360".to_string())
                .parse()
                .unwrap_or(360),
        })
    }

    pub fn geocode_delay(&self) -> Duration {
        Duration::from_millis(self.geocode_delay_ms)
    }
}

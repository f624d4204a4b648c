#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use ph_weather_sync::db::{DbError, LocationStore, NewWeatherObservation, ObservationStore};
use ph_weather_sync::location::{Coordinates, RawLocation, ResolvedLocation};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

/// Persisted row in the in-memory location table
#[derive(Debug, Clone, PartialEq)]
pub struct StoredLocation {
    pub location_id: i32,
    pub location_name: String,
    pub province_name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// In-memory stand-in for the Postgres location table
#[derive(Clone, Default)]
pub struct InMemoryLocationStore {
    rows: Arc<Mutex<Vec<StoredLocation>>>,
    fail_replace: Arc<AtomicBool>,
}

impl InMemoryLocationStore {
    pub fn rows(&self) -> Vec<StoredLocation> {
        self.rows.lock().unwrap().clone()
    }

    pub fn fail_next_replace(&self) {
        self.fail_replace.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl LocationStore for InMemoryLocationStore {
    async fn replace_all(&self, locations: &[ResolvedLocation]) -> Result<usize, DbError> {
        if self.fail_replace.swap(false, Ordering::SeqCst) {
            return Err(DbError::SqlxError(sqlx::Error::PoolClosed));
        }

        let mut rows = self.rows.lock().unwrap();
        *rows = locations
            .iter()
            .enumerate()
            .map(|(idx, location)| StoredLocation {
                location_id: idx as i32 + 1,
                location_name: location.name().to_string(),
                province_name: location.province_label().to_string(),
                latitude: location.latitude(),
                longitude: location.longitude(),
            })
            .collect();
        Ok(rows.len())
    }

    async fn find_location_id(
        &self,
        location_name: &str,
        province_name: &str,
    ) -> Result<Option<i32>, DbError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|row| row.location_name == location_name && row.province_name == province_name)
            .map(|row| row.location_id))
    }
}

/// In-memory stand-in for the append-only observation table
#[derive(Clone, Default)]
pub struct InMemoryObservationStore {
    rows: Arc<Mutex<Vec<NewWeatherObservation>>>,
}

impl InMemoryObservationStore {
    pub fn rows(&self) -> Vec<NewWeatherObservation> {
        self.rows.lock().unwrap().clone()
    }
}

#[async_trait]
impl ObservationStore for InMemoryObservationStore {
    async fn insert_observation(&self, observation: &NewWeatherObservation) -> Result<i64, DbError> {
        let mut rows = self.rows.lock().unwrap();
        rows.push(observation.clone());
        Ok(rows.len() as i64)
    }
}

pub fn raw_location(code: &str, name: &str, province: Option<&str>) -> RawLocation {
    RawLocation {
        code: code.to_string(),
        name: name.to_string(),
        old_name: None,
        is_capital: false,
        province_code: province.map(|_| "035400000".to_string()),
        district_code: None,
        region_code: Some("030000000".to_string()),
        island_group_code: Some("luzon".to_string()),
        psgc_10_digit_code: None,
        province_name: province.map(str::to_string),
    }
}

pub fn resolved_location(
    code: &str,
    name: &str,
    province: Option<&str>,
    coordinates: Option<(f64, f64)>,
) -> ResolvedLocation {
    ResolvedLocation::new(
        raw_location(code, name, province),
        coordinates.map(|(lat, lon)| Coordinates::new(lat, lon)),
    )
}

/// Weather API payload with every optional field present
pub const WEATHER_BODY: &str = r#"{
    "coord": {"lon": 120.69, "lat": 15.03},
    "weather": [{"id": 803, "main": "Clouds", "description": "broken clouds", "icon": "04d"}],
    "main": {"temp": 31.2, "feels_like": 37.0, "temp_min": 30.8, "temp_max": 31.9,
             "pressure": 1008, "humidity": 66},
    "visibility": 10000,
    "wind": {"speed": 2.57, "deg": 250},
    "rain": {"1h": 0.25},
    "clouds": {"all": 75},
    "dt": 1727762400,
    "sys": {"country": "PH", "sunrise": 1727733000, "sunset": 1727776200}
}"#;

/// Weather API payload without rain, visibility or wind direction
pub const SPARSE_WEATHER_BODY: &str = r#"{
    "weather": [{"main": "Clear", "description": "clear sky"}],
    "main": {"temp": 27.0, "feels_like": 29.5, "temp_min": 26.1, "temp_max": 27.4,
             "pressure": 1011, "humidity": 80},
    "wind": {"speed": 1.2},
    "clouds": {"all": 5},
    "dt": 1727762400,
    "sys": {"sunrise": 1727733000, "sunset": 1727776200}
}"#;

/// Postgres pool for repository tests, `None` when DATABASE_URL is not set
pub async fn test_pool() -> Option<PgPool> {
    let database_url = std::env::var("DATABASE_URL").ok()?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(std::time::Duration::from_secs(60))
        .connect(&database_url)
        .await
        .expect("Failed to connect to test database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    sqlx::query("TRUNCATE TABLE weather_observations, locations RESTART IDENTITY")
        .execute(&pool)
        .await
        .expect("Failed to clean test tables");

    Some(pool)
}

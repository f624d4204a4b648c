use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, instrument};

use crate::db::{DbError, NewWeatherObservation, ObservationStore, WeatherObservation};

#[derive(Clone)]
pub struct WeatherRepository {
    pool: PgPool,
}

impl WeatherRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Observations for one location, newest first
    #[instrument(skip(self))]
    pub async fn find_by_location(&self, location_id: i32) -> Result<Vec<WeatherObservation>, DbError> {
        let observations = sqlx::query_as::<_, WeatherObservation>(
            r#"
            SELECT weather_id, location_id, location_name, province_name,
                   weather_main, weather_description,
                   temperature_c, feels_like_c, temp_min_c, temp_max_c,
                   pressure_hpa, humidity_percent, wind_speed_mps, wind_direction_deg,
                   visibility_m, rain_1h_mm, cloudiness_percent,
                   sunrise, sunset, observed_at, inserted_at
            FROM weather_observations
            WHERE location_id = $1
            ORDER BY weather_id DESC
            "#,
        )
        .bind(location_id)
        .fetch_all(&self.pool)
        .await?;

        debug!("Found {} observations", observations.len());
        Ok(observations)
    }
}

#[async_trait]
impl ObservationStore for WeatherRepository {
    #[instrument(skip(self, observation), fields(location_id = observation.location_id))]
    async fn insert_observation(&self, observation: &NewWeatherObservation) -> Result<i64, DbError> {
        let weather_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO weather_observations (
                location_id, location_name, province_name, weather_main, weather_description,
                temperature_c, feels_like_c, temp_min_c, temp_max_c,
                pressure_hpa, humidity_percent, wind_speed_mps, wind_direction_deg,
                visibility_m, rain_1h_mm, cloudiness_percent, sunrise, sunset, observed_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19)
            RETURNING weather_id
            "#,
        )
        .bind(observation.location_id)
        .bind(&observation.location_name)
        .bind(&observation.province_name)
        .bind(&observation.weather_main)
        .bind(&observation.weather_description)
        .bind(observation.temperature_c)
        .bind(observation.feels_like_c)
        .bind(observation.temp_min_c)
        .bind(observation.temp_max_c)
        .bind(observation.pressure_hpa)
        .bind(observation.humidity_percent)
        .bind(observation.wind_speed_mps)
        .bind(observation.wind_direction_deg)
        .bind(observation.visibility_m)
        .bind(observation.rain_1h_mm)
        .bind(observation.cloudiness_percent)
        .bind(observation.sunrise)
        .bind(observation.sunset)
        .bind(observation.observed_at)
        .fetch_one(&self.pool)
        .await?;

        debug!(weather_id, "Inserted weather observation");
        Ok(weather_id)
    }
}

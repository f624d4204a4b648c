use chrono::{DateTime, Utc};
use tracing::{debug, error, info, instrument, warn};

use crate::db::{DbError, LocationStore, NewWeatherObservation, ObservationStore};
use crate::fetch_error::FetchError;
use crate::location::ResolvedLocation;
use crate::weather_client::{CurrentWeather, WeatherClient};

/// What happened to one location during ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestOutcome {
    Inserted { weather_id: i64 },
    MissingCoordinates,
    MissingLocationId,
    WeatherUnavailable,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestSummary {
    pub inserted: usize,
    pub missing_coordinates: usize,
    pub missing_location_id: usize,
    pub weather_unavailable: usize,
}

impl IngestSummary {
    fn record(&mut self, outcome: IngestOutcome) {
        match outcome {
            IngestOutcome::Inserted { .. } => self.inserted += 1,
            IngestOutcome::MissingCoordinates => self.missing_coordinates += 1,
            IngestOutcome::MissingLocationId => self.missing_location_id += 1,
            IngestOutcome::WeatherUnavailable => self.weather_unavailable += 1,
        }
    }

    pub fn skipped(&self) -> usize {
        self.missing_coordinates + self.missing_location_id + self.weather_unavailable
    }
}

/// Fetches current weather per location and appends it as a new observation.
pub struct WeatherIngestService<S, O> {
    client: WeatherClient,
    locations: S,
    observations: O,
}

impl<S: LocationStore, O: ObservationStore> WeatherIngestService<S, O> {
    pub fn new(client: WeatherClient, locations: S, observations: O) -> Self {
        Self {
            client,
            locations,
            observations,
        }
    }

    /// Ingest one location. Per-location problems (no coordinates, no
    /// persisted id, weather API failure) are logged and reported as an
    /// outcome; only database errors are returned.
    #[instrument(skip(self, location), fields(location = %location.name(), province = %location.province_label()))]
    pub async fn ingest(&self, location: &ResolvedLocation) -> Result<IngestOutcome, DbError> {
        let Some(coordinates) = location.coordinates else {
            warn!("Missing latitude or longitude, skipping");
            return Ok(IngestOutcome::MissingCoordinates);
        };

        let (name, province) = location.natural_key();
        let Some(location_id) = self.locations.find_location_id(name, province).await? else {
            error!("No location_id found for location");
            return Ok(IngestOutcome::MissingLocationId);
        };

        let weather = match self.client.fetch_current(coordinates).await {
            Ok(weather) => weather,
            Err(e) => {
                error!(status = ?e.status(), error = %e, "Failed to fetch weather data");
                return Ok(IngestOutcome::WeatherUnavailable);
            }
        };

        let observation = match to_observation(location_id, location, &weather) {
            Ok(observation) => observation,
            Err(e) => {
                error!(error = %e, "Weather response could not be mapped");
                return Ok(IngestOutcome::WeatherUnavailable);
            }
        };

        let weather_id = self.observations.insert_observation(&observation).await?;
        debug!(location_id, weather_id, "Weather data inserted");
        Ok(IngestOutcome::Inserted { weather_id })
    }

    /// Ingest every location in order; one failure never stops the batch.
    #[instrument(skip(self, locations), fields(count = locations.len()))]
    pub async fn ingest_all(&self, locations: &[ResolvedLocation]) -> Result<IngestSummary, DbError> {
        let mut summary = IngestSummary::default();
        for location in locations {
            summary.record(self.ingest(location).await?);
        }

        info!(
            inserted = summary.inserted,
            skipped = summary.skipped(),
            "Weather ingestion finished"
        );
        Ok(summary)
    }
}

fn epoch_to_utc(secs: i64) -> Result<DateTime<Utc>, FetchError> {
    DateTime::from_timestamp(secs, 0)
        .ok_or_else(|| FetchError::Decode(format!("timestamp out of range: {secs}")))
}

/// Map a weather response onto an observation row.
///
/// Missing rain defaults to 0 mm; missing visibility, wind direction,
/// cloudiness and condition text stay null.
pub fn to_observation(
    location_id: i32,
    location: &ResolvedLocation,
    weather: &CurrentWeather,
) -> Result<NewWeatherObservation, FetchError> {
    let condition = weather.weather.first();

    Ok(NewWeatherObservation {
        location_id,
        location_name: location.name().to_string(),
        province_name: location.province_label().to_string(),
        weather_main: condition.map(|c| c.main.clone()),
        weather_description: condition.map(|c| c.description.clone()),
        temperature_c: weather.main.temp,
        feels_like_c: weather.main.feels_like,
        temp_min_c: weather.main.temp_min,
        temp_max_c: weather.main.temp_max,
        pressure_hpa: weather.main.pressure,
        humidity_percent: weather.main.humidity,
        wind_speed_mps: weather.wind.speed,
        wind_direction_deg: weather.wind.deg,
        visibility_m: weather.visibility,
        rain_1h_mm: weather
            .rain
            .as_ref()
            .and_then(|r| r.one_hour)
            .unwrap_or(0.0),
        cloudiness_percent: weather.clouds.as_ref().and_then(|c| c.all),
        sunrise: epoch_to_utc(weather.sys.sunrise)?,
        sunset: epoch_to_utc(weather.sys.sunset)?,
        observed_at: epoch_to_utc(weather.dt)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::{Coordinates, RawLocation};

    fn location() -> ResolvedLocation {
        ResolvedLocation::new(
            RawLocation {
                code: "035416000".to_string(),
                name: "City of San Fernando".to_string(),
                old_name: None,
                is_capital: true,
                province_code: Some("035400000".to_string()),
                district_code: None,
                region_code: Some("030000000".to_string()),
                island_group_code: Some("luzon".to_string()),
                psgc_10_digit_code: None,
                province_name: Some("Pampanga".to_string()),
            },
            Some(Coordinates::new(15.03, 120.69)),
        )
    }

    fn weather(json: &str) -> CurrentWeather {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_to_observation_maps_all_fields() {
        let weather = weather(
            r#"{
                "weather": [{"main": "Clouds", "description": "broken clouds"}],
                "main": {"temp": 30.1, "feels_like": 35.2, "temp_min": 29.0, "temp_max": 31.0,
                         "pressure": 1009, "humidity": 70},
                "visibility": 10000,
                "wind": {"speed": 4.1, "deg": 200},
                "rain": {"1h": 1.5},
                "clouds": {"all": 80},
                "dt": 1727762400,
                "sys": {"sunrise": 1727733000, "sunset": 1727776200}
            }"#,
        );

        let observation = to_observation(7, &location(), &weather).unwrap();
        assert_eq!(observation.location_id, 7);
        assert_eq!(observation.location_name, "City of San Fernando");
        assert_eq!(observation.province_name, "Pampanga");
        assert_eq!(observation.weather_main.as_deref(), Some("Clouds"));
        assert_eq!(observation.weather_description.as_deref(), Some("broken clouds"));
        assert_eq!(observation.pressure_hpa, 1009);
        assert_eq!(observation.wind_direction_deg, Some(200));
        assert_eq!(observation.visibility_m, Some(10000));
        assert_eq!(observation.rain_1h_mm, 1.5);
        assert_eq!(observation.cloudiness_percent, Some(80));
        assert_eq!(observation.observed_at.timestamp(), 1727762400);
        assert_eq!(observation.sunrise.timestamp(), 1727733000);
        assert_eq!(observation.sunset.timestamp(), 1727776200);
    }

    #[test]
    fn test_to_observation_applies_defaults() {
        let weather = weather(
            r#"{
                "weather": [],
                "main": {"temp": 25.0, "feels_like": 25.0, "temp_min": 24.0, "temp_max": 26.0,
                         "pressure": 1010, "humidity": 60},
                "wind": {"speed": 1.0},
                "clouds": {},
                "dt": 1727762400,
                "sys": {"sunrise": 1727733000, "sunset": 1727776200}
            }"#,
        );

        let observation = to_observation(1, &location(), &weather).unwrap();
        assert_eq!(observation.rain_1h_mm, 0.0);
        assert_eq!(observation.visibility_m, None);
        assert_eq!(observation.wind_direction_deg, None);
        assert_eq!(observation.cloudiness_percent, None);
        assert_eq!(observation.weather_main, None);
    }

    #[test]
    fn test_to_observation_rain_without_one_hour() {
        let weather = weather(
            r#"{
                "weather": [{"main": "Rain", "description": "moderate rain"}],
                "main": {"temp": 25.0, "feels_like": 25.0, "temp_min": 24.0, "temp_max": 26.0,
                         "pressure": 1010, "humidity": 60},
                "wind": {"speed": 1.0, "deg": 90},
                "rain": {"3h": 2.0},
                "dt": 1727762400,
                "sys": {"sunrise": 1727733000, "sunset": 1727776200}
            }"#,
        );

        let observation = to_observation(1, &location(), &weather).unwrap();
        assert_eq!(observation.rain_1h_mm, 0.0);
    }
}

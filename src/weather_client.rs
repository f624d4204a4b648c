use serde::Deserialize;
use tracing::{debug, instrument};

use crate::fetch_error::FetchError;
use crate::location::Coordinates;

/// Current-conditions payload from the weather API (metric units).
#[derive(Debug, Clone, Deserialize)]
pub struct CurrentWeather {
    #[serde(default)]
    pub weather: Vec<Condition>,
    pub main: MainReadings,
    pub wind: Wind,
    #[serde(default)]
    pub clouds: Option<Clouds>,
    #[serde(default)]
    pub visibility: Option<i32>,
    #[serde(default)]
    pub rain: Option<Rain>,
    pub sys: Sys,
    pub dt: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Condition {
    pub main: String,
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MainReadings {
    pub temp: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub pressure: i32,
    pub humidity: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Wind {
    pub speed: f64,
    #[serde(default)]
    pub deg: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Clouds {
    #[serde(default)]
    pub all: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Rain {
    #[serde(rename = "1h", default)]
    pub one_hour: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Sys {
    pub sunrise: i64,
    pub sunset: i64,
}

#[derive(Clone)]
pub struct WeatherClient {
    client: reqwest::Client,
    url: String,
    api_key: String,
}

impl WeatherClient {
    pub fn new(url: String, api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            url,
            api_key,
        }
    }

    #[instrument(skip(self), fields(url = %self.url))]
    pub async fn fetch_current(&self, coordinates: Coordinates) -> Result<CurrentWeather, FetchError> {
        let lat = coordinates.latitude.to_string();
        let lon = coordinates.longitude.to_string();
        debug!("Sending weather request for lat={}, lon={}", lat, lon);

        let response = self
            .client
            .get(&self.url)
            .query(&[
                ("lat", lat.as_str()),
                ("lon", lon.as_str()),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await?;

        let status = response.status();
        debug!("Received HTTP response with status: {}", status);
        if !status.is_success() {
            return Err(FetchError::Status {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }

        response
            .json()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_payload() {
        let json = r#"{
            "coord": {"lon": 120.69, "lat": 15.03},
            "weather": [{"id": 500, "main": "Rain", "description": "light rain", "icon": "10d"}],
            "main": {"temp": 29.5, "feels_like": 34.1, "temp_min": 29.5, "temp_max": 29.9,
                     "pressure": 1008, "humidity": 78},
            "visibility": 10000,
            "wind": {"speed": 3.6, "deg": 240},
            "rain": {"1h": 0.42},
            "clouds": {"all": 75},
            "dt": 1727762400,
            "sys": {"country": "PH", "sunrise": 1727733000, "sunset": 1727776200}
        }"#;
        let weather: CurrentWeather = serde_json::from_str(json).unwrap();
        assert_eq!(weather.weather[0].main, "Rain");
        assert_eq!(weather.main.pressure, 1008);
        assert_eq!(weather.wind.deg, Some(240));
        assert_eq!(weather.visibility, Some(10000));
        assert_eq!(weather.rain.unwrap().one_hour, Some(0.42));
        assert_eq!(weather.clouds.unwrap().all, Some(75));
    }

    #[test]
    fn test_parse_minimal_payload() {
        let json = r#"{
            "weather": [],
            "main": {"temp": 25.0, "feels_like": 25.0, "temp_min": 24.0, "temp_max": 26.0,
                     "pressure": 1010, "humidity": 60},
            "wind": {"speed": 1.0},
            "dt": 1727762400,
            "sys": {"sunrise": 1727733000, "sunset": 1727776200}
        }"#;
        let weather: CurrentWeather = serde_json::from_str(json).unwrap();
        assert!(weather.weather.is_empty());
        assert_eq!(weather.wind.deg, None);
        assert!(weather.visibility.is_none());
        assert!(weather.rain.is_none());
        assert!(weather.clouds.is_none());
    }
}

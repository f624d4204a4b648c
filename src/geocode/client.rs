use tracing::{debug, instrument};

use crate::fetch_error::FetchError;
use crate::geocode::matcher::GeoResult;

/// Client for the direct (name to coordinates) geocoding endpoint.
#[derive(Clone)]
pub struct GeocodingClient {
    client: reqwest::Client,
    url: String,
    api_key: String,
    country_code: String,
    limit: u32,
}

impl GeocodingClient {
    pub fn new(url: String, api_key: String, country_code: String, limit: u32) -> Self {
        Self {
            client: reqwest::Client::new(),
            url,
            api_key,
            country_code,
            limit,
        }
    }

    /// Look up `place` within the configured country.
    ///
    /// Results keep the provider's relevance order.
    #[instrument(skip(self), fields(url = %self.url))]
    pub async fn direct(&self, place: &str) -> Result<Vec<GeoResult>, FetchError> {
        let query = format!("{},{}", place, self.country_code);
        let limit = self.limit.to_string();
        debug!("Sending geocode request for '{}'", query);

        let response = self
            .client
            .get(&self.url)
            .query(&[
                ("q", query.as_str()),
                ("limit", limit.as_str()),
                ("appid", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }

        let results: Vec<GeoResult> = response
            .json()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))?;
        debug!("Geocoder returned {} candidates", results.len());
        Ok(results)
    }
}

use std::collections::HashMap;

use serde::{Deserialize, Deserializer};
use tracing::{debug, info, instrument, warn};

use crate::fetch_error::FetchError;
use crate::location::RawLocation;

/// City record as published by the PSGC registry.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PsgcCity {
    pub code: String,
    pub name: String,
    #[serde(default, deserialize_with = "code_or_false")]
    pub old_name: Option<String>,
    #[serde(default)]
    pub is_capital: bool,
    #[serde(default, deserialize_with = "code_or_false")]
    pub province_code: Option<String>,
    #[serde(default, deserialize_with = "code_or_false")]
    pub district_code: Option<String>,
    #[serde(default, deserialize_with = "code_or_false")]
    pub region_code: Option<String>,
    #[serde(default, deserialize_with = "code_or_false")]
    pub island_group_code: Option<String>,
    #[serde(default, rename = "psgc10DigitCode", deserialize_with = "code_or_false")]
    pub psgc_10_digit_code: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PsgcProvince {
    pub code: String,
    pub name: String,
}

/// The registry uses `false` (and sometimes `""`) where a code does not apply.
fn code_or_false<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum CodeOrFlag {
        Code(String),
        Flag(bool),
    }

    Ok(match Option::<CodeOrFlag>::deserialize(deserializer)? {
        Some(CodeOrFlag::Code(code)) if !code.is_empty() => Some(code),
        _ => None,
    })
}

/// Left-join cities to provinces on `provinceCode == code`.
pub fn join_provinces(cities: Vec<PsgcCity>, provinces: &[PsgcProvince]) -> Vec<RawLocation> {
    let province_names: HashMap<&str, &str> = provinces
        .iter()
        .map(|p| (p.code.as_str(), p.name.as_str()))
        .collect();

    cities
        .into_iter()
        .map(|city| {
            let province_name = city
                .province_code
                .as_deref()
                .and_then(|code| province_names.get(code))
                .map(|name| name.to_string());
            if province_name.is_none() {
                debug!(city = %city.name, province_code = ?city.province_code, "City has no province");
            }
            RawLocation {
                code: city.code,
                name: city.name,
                old_name: city.old_name,
                is_capital: city.is_capital,
                province_code: city.province_code,
                district_code: city.district_code,
                region_code: city.region_code,
                island_group_code: city.island_group_code,
                psgc_10_digit_code: city.psgc_10_digit_code,
                province_name,
            }
        })
        .collect()
}

/// Client for the PSGC location registry.
#[derive(Clone)]
pub struct RegistryFetcher {
    client: reqwest::Client,
    cities_url: String,
    provinces_url: String,
}

impl RegistryFetcher {
    pub fn new(cities_url: String, provinces_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            cities_url,
            provinces_url,
        }
    }

    /// Fetch cities and provinces and join them into registry locations.
    #[instrument(skip(self))]
    pub async fn fetch_locations(&self) -> Result<Vec<RawLocation>, FetchError> {
        let cities: Vec<PsgcCity> = self.fetch_json(&self.cities_url).await?;
        let provinces: Vec<PsgcProvince> = self.fetch_json(&self.provinces_url).await?;
        info!(
            "Fetched {} cities and {} provinces from registry",
            cities.len(),
            provinces.len()
        );
        Ok(join_provinces(cities, &provinces))
    }

    #[instrument(skip(self))]
    async fn fetch_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        debug!("Sending HTTP request to registry");
        let response = self.client.get(url).send().await?;
        let status = response.status();
        debug!("Received HTTP response with status: {}", status);

        if !status.is_success() {
            warn!(url, status = status.as_u16(), "Failed to retrieve registry data");
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response
            .json()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))
    }
}

use tracing::{debug, info, instrument, warn};

use crate::geocode::client::GeocodingClient;
use crate::geocode::matcher::{ProvinceMatch, ProvinceMatcher};
use crate::location::{RawLocation, ResolvedLocation};
use crate::normalize::normalize_city_name;
use crate::pacing::Pacer;

const CITY_SUFFIX: &str = " City";

/// Resolves a registry city to coordinates through an ordered fallback chain:
/// normalized name, then the raw name, then the raw name without a trailing
/// `" City"`. Steps run back-to-back; pacing applies only between locations.
pub struct GeocodeResolver {
    client: GeocodingClient,
    matcher: ProvinceMatcher,
    pacer: Pacer,
}

impl GeocodeResolver {
    pub fn new(client: GeocodingClient, matcher: ProvinceMatcher, pacer: Pacer) -> Self {
        Self {
            client,
            matcher,
            pacer,
        }
    }

    /// Names to try for `city_name`, in order.
    pub fn lookup_names(city_name: &str) -> Vec<String> {
        let mut names = vec![normalize_city_name(city_name), city_name.to_string()];
        if let Some(stripped) = city_name.strip_suffix(CITY_SUFFIX) {
            names.push(stripped.trim().to_string());
        }
        names
    }

    #[instrument(skip(self))]
    pub async fn resolve(&self, city_name: &str, province_name: Option<&str>) -> Option<ProvinceMatch> {
        for (step, lookup_name) in Self::lookup_names(city_name).iter().enumerate() {
            if step == 2 {
                info!("Trying with stripped city name: '{}'", lookup_name);
            }

            let candidates = match self.client.direct(lookup_name).await {
                Ok(candidates) => candidates,
                Err(e) => {
                    warn!(
                        location = %city_name,
                        province = province_name.unwrap_or_default(),
                        lookup_name = %lookup_name,
                        status = ?e.status(),
                        error = %e,
                        "Geocode request failed"
                    );
                    continue;
                }
            };

            if let Some(found) = self.matcher.find_match(&candidates, province_name, lookup_name) {
                debug!(step, lookup_name = %lookup_name, rule = ?found.rule, "Geocode resolved");
                return Some(found);
            }
        }

        warn!(
            location = %city_name,
            province = province_name.unwrap_or_default(),
            "Geocode unresolved, location will be stored without coordinates"
        );
        None
    }

    /// Resolve every location in order, pacing between locations.
    #[instrument(skip(self, locations), fields(count = locations.len()))]
    pub async fn resolve_all(&mut self, locations: &[RawLocation]) -> Vec<ResolvedLocation> {
        let mut resolved = Vec::with_capacity(locations.len());
        let mut unresolved = 0;

        for location in locations {
            self.pacer.ready().await;
            let found = self
                .resolve(&location.name, location.province_name.as_deref())
                .await;
            if found.is_none() {
                unresolved += 1;
            }
            resolved.push(ResolvedLocation::new(
                location.clone(),
                found.map(|m| m.coordinates),
            ));
        }

        info!(
            "Geocoded {} locations ({} unresolved)",
            resolved.len(),
            unresolved
        );
        resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_names_plain() {
        assert_eq!(GeocodeResolver::lookup_names("Naga"), vec!["Naga", "Naga"]);
    }

    #[test]
    fn test_lookup_names_with_prefix() {
        assert_eq!(
            GeocodeResolver::lookup_names("City of San Fernando"),
            vec!["San Fernando", "City of San Fernando"]
        );
    }

    #[test]
    fn test_lookup_names_with_city_suffix() {
        assert_eq!(
            GeocodeResolver::lookup_names("Quezon City"),
            vec!["Quezon City", "Quezon City", "Quezon"]
        );
    }

    #[test]
    fn test_lookup_names_suffix_checked_on_raw_name() {
        assert_eq!(
            GeocodeResolver::lookup_names("City of Sample City"),
            vec!["Sample City", "City of Sample City", "City of Sample"]
        );
    }
}

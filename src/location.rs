use serde::{Deserialize, Serialize};

/// A city as published by the location registry, joined with its province name.
///
/// Immutable once fetched. Codes the registry reports as `false` (e.g. NCR
/// cities that belong to no province) are carried as `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawLocation {
    pub code: String,
    pub name: String,
    pub old_name: Option<String>,
    pub is_capital: bool,
    pub province_code: Option<String>,
    pub district_code: Option<String>,
    pub region_code: Option<String>,
    pub island_group_code: Option<String>,
    pub psgc_10_digit_code: Option<String>,
    pub province_name: Option<String>,
}

impl RawLocation {
    /// Province name as persisted: locations without a province are stored
    /// with an empty string so the natural key stays non-null.
    pub fn province_label(&self) -> &str {
        self.province_name.as_deref().unwrap_or("")
    }

    /// Columns compared by the change detector.
    pub fn comparison_key(&self) -> ComparisonKey {
        ComparisonKey {
            code: self.code.clone(),
            name: self.name.clone(),
            old_name: self.old_name.clone(),
            is_capital: self.is_capital,
            province_code: self.province_code.clone(),
            district_code: self.district_code.clone(),
            region_code: self.region_code.clone(),
            island_group_code: self.island_group_code.clone(),
            psgc_10_digit_code: self.psgc_10_digit_code.clone(),
            province_name: self.province_name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComparisonKey {
    pub code: String,
    pub name: String,
    pub old_name: Option<String>,
    pub is_capital: bool,
    pub province_code: Option<String>,
    pub district_code: Option<String>,
    pub region_code: Option<String>,
    pub island_group_code: Option<String>,
    pub psgc_10_digit_code: Option<String>,
    pub province_name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// A registry location after normalization and geocoding.
///
/// Latitude and longitude travel together in `coordinates`, so a location is
/// either fully resolved or not resolved at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedLocation {
    #[serde(flatten)]
    pub location: RawLocation,
    pub coordinates: Option<Coordinates>,
}

impl ResolvedLocation {
    pub fn new(location: RawLocation, coordinates: Option<Coordinates>) -> Self {
        Self {
            location,
            coordinates,
        }
    }

    pub fn name(&self) -> &str {
        &self.location.name
    }

    pub fn province_label(&self) -> &str {
        self.location.province_label()
    }

    pub fn latitude(&self) -> Option<f64> {
        self.coordinates.map(|c| c.latitude)
    }

    pub fn longitude(&self) -> Option<f64> {
        self.coordinates.map(|c| c.longitude)
    }

    /// Natural key used to look up the persisted identity.
    pub fn natural_key(&self) -> (&str, &str) {
        (self.name(), self.province_label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(name: &str, province: Option<&str>) -> RawLocation {
        RawLocation {
            code: "0001".to_string(),
            name: name.to_string(),
            old_name: None,
            is_capital: false,
            province_code: province.map(|_| "P1".to_string()),
            district_code: None,
            region_code: Some("R1".to_string()),
            island_group_code: Some("luzon".to_string()),
            psgc_10_digit_code: None,
            province_name: province.map(str::to_string),
        }
    }

    #[test]
    fn test_province_label_defaults_to_empty() {
        assert_eq!(raw("City of Manila", None).province_label(), "");
        assert_eq!(raw("Naga", Some("Camarines Sur")).province_label(), "Camarines Sur");
    }

    #[test]
    fn test_resolved_coordinates_accessors() {
        let resolved = ResolvedLocation::new(
            raw("City of San Fernando", Some("Pampanga")),
            Some(Coordinates::new(15.03, 120.69)),
        );
        assert_eq!(resolved.latitude(), Some(15.03));
        assert_eq!(resolved.longitude(), Some(120.69));
        assert_eq!(resolved.natural_key(), ("City of San Fernando", "Pampanga"));

        let unresolved = ResolvedLocation::new(raw("Nowhere", None), None);
        assert_eq!(unresolved.latitude(), None);
        assert_eq!(unresolved.longitude(), None);
    }

    #[test]
    fn test_resolved_location_json_round_trip_keeps_flattened_fields() {
        let resolved = ResolvedLocation::new(
            raw("City of San Fernando", Some("Pampanga")),
            Some(Coordinates::new(15.03, 120.69)),
        );
        let json = serde_json::to_value(&resolved).unwrap();
        assert_eq!(json["name"], "City of San Fernando");
        assert_eq!(json["coordinates"]["latitude"], 15.03);

        let back: ResolvedLocation = serde_json::from_value(json).unwrap();
        assert_eq!(back, resolved);
    }
}

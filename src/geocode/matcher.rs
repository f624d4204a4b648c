use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::location::Coordinates;

/// One candidate returned by the geocoding API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoResult {
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub state: Option<String>,
}

impl GeoResult {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.lat, self.lon)
    }
}

/// How a candidate's `state` must look for an exception rule to fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatePattern {
    /// Case-insensitive substring of the state.
    Contains(&'static str),
    /// Empty, or the literal `nan` token some upstream records carry.
    Blank,
}

impl StatePattern {
    fn matches(&self, state: &str) -> bool {
        match self {
            StatePattern::Contains(needle) => state.to_lowercase().contains(&needle.to_lowercase()),
            StatePattern::Blank => state.is_empty() || state == "nan",
        }
    }
}

/// A named override for a known upstream data irregularity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExceptionRule {
    pub name: &'static str,
    /// Lookup name the rule applies to (case-insensitive equality).
    pub city_name: &'static str,
    pub state: StatePattern,
    /// When set, the target province must equal this (case-insensitive).
    pub target_province: Option<&'static str>,
}

impl ExceptionRule {
    fn applies(&self, city_name: &str, state: &str, target_province: Option<&str>) -> bool {
        if !city_name.eq_ignore_ascii_case(self.city_name) || !self.state.matches(state) {
            return false;
        }
        match self.target_province {
            Some(required) => target_province.is_some_and(|t| t.eq_ignore_ascii_case(required)),
            None => true,
        }
    }
}

/// Exceptions shipped by default, evaluated in order.
pub fn default_exception_rules() -> Vec<ExceptionRule> {
    vec![
        // The geocoder files Isabela City under Basilan, not Isabela province
        ExceptionRule {
            name: "isabela-basilan",
            city_name: "isabela",
            state: StatePattern::Contains("basilan"),
            target_province: None,
        },
        // Naga results come back without a state
        ExceptionRule {
            name: "naga-camarines-sur",
            city_name: "naga",
            state: StatePattern::Blank,
            target_province: Some("camarines sur"),
        },
    ]
}

/// Which rule accepted a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchRule {
    MissingState,
    Exception(&'static str),
    ExactProvince,
    PartialProvince,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProvinceMatch {
    pub coordinates: Coordinates,
    pub rule: MatchRule,
}

/// Picks the geocoding candidate that belongs to the target province.
///
/// Candidates are scanned in the order the geocoder returned them and the
/// first one satisfying any rule wins. Per candidate the rules run as:
///
/// 1. no `state` at all: accepted outright
/// 2. exception rules, in table order
/// 3. case-insensitive exact province match, then substring match
#[derive(Debug, Clone)]
pub struct ProvinceMatcher {
    exceptions: Vec<ExceptionRule>,
}

impl Default for ProvinceMatcher {
    fn default() -> Self {
        Self::new(default_exception_rules())
    }
}

impl ProvinceMatcher {
    pub fn new(exceptions: Vec<ExceptionRule>) -> Self {
        Self { exceptions }
    }

    pub fn exceptions(&self) -> &[ExceptionRule] {
        &self.exceptions
    }

    pub fn find_match(
        &self,
        candidates: &[GeoResult],
        target_province: Option<&str>,
        lookup_name: &str,
    ) -> Option<ProvinceMatch> {
        if candidates.is_empty() {
            warn!(lookup_name, "No location data found in the geocode response");
            return None;
        }

        for candidate in candidates {
            if let Some(rule) = self.evaluate(candidate, target_province, lookup_name) {
                let coordinates = candidate.coordinates();
                match rule {
                    MatchRule::MissingState => info!(
                        lookup_name,
                        lat = coordinates.latitude,
                        lon = coordinates.longitude,
                        "Using coordinates without province match"
                    ),
                    MatchRule::Exception(name) => info!(
                        lookup_name,
                        rule = name,
                        lat = coordinates.latitude,
                        lon = coordinates.longitude,
                        "Using coordinates from exception rule"
                    ),
                    MatchRule::PartialProvince => info!(
                        lookup_name,
                        province = target_province.unwrap_or_default(),
                        state = candidate.state.as_deref().unwrap_or_default(),
                        "Partial province match found"
                    ),
                    MatchRule::ExactProvince => debug!(lookup_name, "Exact province match found"),
                }
                return Some(ProvinceMatch { coordinates, rule });
            }
        }

        debug!(
            lookup_name,
            province = target_province.unwrap_or_default(),
            candidates = candidates.len(),
            "No candidate matched the province"
        );
        None
    }

    fn evaluate(
        &self,
        candidate: &GeoResult,
        target_province: Option<&str>,
        lookup_name: &str,
    ) -> Option<MatchRule> {
        let Some(state) = candidate.state.as_deref() else {
            return Some(MatchRule::MissingState);
        };

        if let Some(rule) = self
            .exceptions
            .iter()
            .find(|rule| rule.applies(lookup_name, state, target_province))
        {
            return Some(MatchRule::Exception(rule.name));
        }

        let target = target_province?;
        let state_lower = state.to_lowercase();
        let target_lower = target.to_lowercase();
        if state_lower == target_lower {
            Some(MatchRule::ExactProvince)
        } else if state_lower.contains(&target_lower) {
            Some(MatchRule::PartialProvince)
        } else {
            None
        }
    }
}

use tracing::debug;

/// Administrative prefixes stripped before geocoding, checked in order.
pub const ADMIN_PREFIXES: [&str; 4] = ["City of ", "Municipality of ", "Barangay ", "Town of "];

/// Strip the first matching administrative prefix from a place name.
///
/// At most one prefix is removed and the remainder is trimmed. Names without
/// a known prefix are returned unchanged.
///
/// # Examples
///
/// ```
/// use ph_weather_sync::normalize::normalize_city_name;
///
/// assert_eq!(normalize_city_name("City of San Fernando"), "San Fernando");
/// assert_eq!(normalize_city_name("Naga"), "Naga");
/// ```
pub fn normalize_city_name(name: &str) -> String {
    for prefix in ADMIN_PREFIXES {
        if let Some(rest) = name.strip_prefix(prefix) {
            let normalized = rest.trim().to_string();
            debug!("Normalized city name from '{}' to '{}'", name, normalized);
            return normalized;
        }
    }

    debug!("No normalization needed for city name: '{}'", name);
    name.to_string()
}

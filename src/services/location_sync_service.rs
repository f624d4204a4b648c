use std::collections::HashSet;

use tracing::{info, instrument, warn};

use crate::db::{DbError, LocationStore};
use crate::location::ResolvedLocation;

/// Replaces the persisted location table with a freshly resolved set.
///
/// The replace is destructive: ids are reassigned from the start of the
/// sequence on every run, so observations from earlier runs keep ids that may
/// now point at a different location.
#[derive(Clone)]
pub struct LocationSyncService<S> {
    store: S,
}

impl<S: LocationStore> LocationSyncService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Persist `locations`, keeping the first occurrence of each natural key.
    /// Returns the rows actually stored, in order.
    ///
    /// # Errors
    ///
    /// Any database failure aborts the replace and leaves the previous table
    /// intact.
    #[instrument(skip(self, locations), fields(count = locations.len()))]
    pub async fn replace_all(
        &self,
        locations: &[ResolvedLocation],
    ) -> Result<Vec<ResolvedLocation>, DbError> {
        let unique = dedupe_natural_keys(locations);
        if unique.len() < locations.len() {
            warn!(
                "Dropped {} locations with duplicate (name, province) keys",
                locations.len() - unique.len()
            );
        }

        let inserted = self.store.replace_all(&unique).await?;
        info!("Location table synchronized with {} rows", inserted);
        Ok(unique)
    }
}

/// First occurrence of each `(name, province)` key, order preserved.
pub fn dedupe_natural_keys(locations: &[ResolvedLocation]) -> Vec<ResolvedLocation> {
    let mut seen = HashSet::new();
    locations
        .iter()
        .filter(|location| {
            let (name, province) = location.natural_key();
            let first = seen.insert((name.to_string(), province.to_string()));
            if !first {
                warn!(location = %name, province = %province, "Duplicate natural key, keeping first");
            }
            first
        })
        .cloned()
        .collect()
}

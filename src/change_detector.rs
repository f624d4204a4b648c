use std::collections::BTreeSet;

use tracing::{debug, info};

use crate::location::{ComparisonKey, RawLocation, ResolvedLocation};

/// Rows present on only one side of the fresh/previous comparison.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationDiff {
    /// In the fresh set but not in the snapshot.
    pub added: Vec<ComparisonKey>,
    /// In the snapshot but not in the fresh set.
    pub removed: Vec<ComparisonKey>,
}

impl LocationDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Full outer join of fresh and previous rows over the comparison columns.
pub fn diff(fresh: &[RawLocation], previous: &[ResolvedLocation]) -> LocationDiff {
    let fresh_keys: BTreeSet<ComparisonKey> = fresh.iter().map(RawLocation::comparison_key).collect();
    let previous_keys: BTreeSet<ComparisonKey> = previous
        .iter()
        .map(|p| p.location.comparison_key())
        .collect();

    LocationDiff {
        added: fresh_keys.difference(&previous_keys).cloned().collect(),
        removed: previous_keys.difference(&fresh_keys).cloned().collect(),
    }
}

/// Whether geocoding and the location replace need to run.
///
/// A missing snapshot always counts as a change, even for an empty fresh set.
pub fn has_changes(fresh: &[RawLocation], previous: Option<&[ResolvedLocation]>) -> bool {
    let Some(previous) = previous else {
        info!("No previous snapshot, treating all {} locations as changed", fresh.len());
        return true;
    };

    let changes = diff(fresh, previous);
    if changes.is_empty() {
        info!("No changes detected in location data");
        return false;
    }

    info!(
        added = changes.added.len(),
        removed = changes.removed.len(),
        "Location data changed"
    );
    for key in changes.added.iter().chain(changes.removed.iter()).take(20) {
        debug!(code = %key.code, name = %key.name, "Changed location row");
    }
    true
}

use async_trait::async_trait;

use crate::db::{DbError, NewWeatherObservation};
use crate::location::ResolvedLocation;

/// Persisted location reference table.
#[async_trait]
pub trait LocationStore: Send + Sync {
    /// Delete every location, restart the id sequence and insert `locations`,
    /// all in one transaction. Returns the number of rows inserted.
    async fn replace_all(&self, locations: &[ResolvedLocation]) -> Result<usize, DbError>;

    /// Surrogate id for a natural key, if present.
    async fn find_location_id(
        &self,
        location_name: &str,
        province_name: &str,
    ) -> Result<Option<i32>, DbError>;
}

/// Append-only weather observation table.
#[async_trait]
pub trait ObservationStore: Send + Sync {
    async fn insert_observation(&self, observation: &NewWeatherObservation) -> Result<i64, DbError>;
}

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, error, info, instrument};

use crate::db::{DbError, LocationRecord, LocationStore};
use crate::location::ResolvedLocation;

#[derive(Clone)]
pub struct LocationRepository {
    pool: PgPool,
}

impl LocationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[instrument(skip(self))]
    pub async fn find_all(&self) -> Result<Vec<LocationRecord>, DbError> {
        let locations = sqlx::query_as::<_, LocationRecord>(
            r#"
            SELECT location_id, location_name, province_name, latitude, longitude, inserted_at
            FROM locations
            ORDER BY location_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!("Found {} locations", locations.len());
        Ok(locations)
    }

    #[instrument(skip(self))]
    pub async fn count(&self) -> Result<usize, DbError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM locations")
            .fetch_one(&self.pool)
            .await?;

        Ok(count as usize)
    }
}

#[async_trait]
impl LocationStore for LocationRepository {
    #[instrument(skip(self, locations), fields(count = locations.len()))]
    async fn replace_all(&self, locations: &[ResolvedLocation]) -> Result<usize, DbError> {
        debug!(
            "Beginning transaction to replace locations with {} rows",
            locations.len()
        );
        let mut tx = self.pool.begin().await?;

        // Transactional in Postgres, including the identity restart
        info!("Deleting existing locations from the database");
        sqlx::query("TRUNCATE TABLE locations RESTART IDENTITY")
            .execute(&mut *tx)
            .await?;

        let mut inserted = 0;
        for location in locations {
            sqlx::query(
                r#"
                INSERT INTO locations (location_name, province_name, latitude, longitude)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(location.name())
            .bind(location.province_label())
            .bind(location.latitude())
            .bind(location.longitude())
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                error!(
                    location = %location.name(),
                    province = %location.province_label(),
                    error = %e,
                    "Failed to insert location"
                );
                e
            })?;
            inserted += 1;
        }

        tx.commit().await?;
        info!("Replaced location table with {} rows", inserted);
        Ok(inserted)
    }

    #[instrument(skip(self))]
    async fn find_location_id(
        &self,
        location_name: &str,
        province_name: &str,
    ) -> Result<Option<i32>, DbError> {
        let location_id = sqlx::query_scalar::<_, i32>(
            r#"
            SELECT location_id
            FROM locations
            WHERE location_name = $1 AND province_name = $2
            ORDER BY location_id
            LIMIT 1
            "#,
        )
        .bind(location_name)
        .bind(province_name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(location_id)
    }
}

use tracing::{info, instrument, warn};

use crate::change_detector::has_changes;
use crate::config::Config;
use crate::db::{DbError, LocationStore, ObservationStore};
use crate::fetch_error::FetchError;
use crate::geocode::{GeocodeResolver, GeocodingClient, ProvinceMatcher};
use crate::location::ResolvedLocation;
use crate::pacing::Pacer;
use crate::registry::RegistryFetcher;
use crate::services::{
    dedupe_natural_keys, IngestSummary, LocationSyncService, WeatherIngestService,
};
use crate::snapshot::SnapshotStore;
use crate::weather_client::WeatherClient;

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Location registry unavailable: {0}")]
    Registry(#[from] FetchError),
    #[error(transparent)]
    Db(#[from] DbError),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub locations: usize,
    pub changed: bool,
    pub resolved: usize,
    pub unresolved: usize,
    pub weather: IngestSummary,
}

/// One synchronization run, start to finish:
/// registry fetch, change detection, geocoding and location replace (only
/// when something changed), snapshot write, then weather ingestion for every
/// stored location. Only registry and database failures end a run early.
pub struct SyncPipeline<S, O> {
    registry: RegistryFetcher,
    resolver: GeocodeResolver,
    snapshots: SnapshotStore,
    sync: LocationSyncService<S>,
    ingest: WeatherIngestService<S, O>,
}

impl<S, O> SyncPipeline<S, O>
where
    S: LocationStore + Clone,
    O: ObservationStore,
{
    pub fn new(
        registry: RegistryFetcher,
        resolver: GeocodeResolver,
        snapshots: SnapshotStore,
        weather: WeatherClient,
        locations: S,
        observations: O,
    ) -> Self {
        Self {
            registry,
            resolver,
            snapshots,
            sync: LocationSyncService::new(locations.clone()),
            ingest: WeatherIngestService::new(weather, locations, observations),
        }
    }

    pub fn from_config(config: &Config, locations: S, observations: O) -> Self {
        let registry = RegistryFetcher::new(
            config.psgc_cities_url.clone(),
            config.psgc_provinces_url.clone(),
        );
        let geocoder = GeocodingClient::new(
            config.geocode_url.clone(),
            config.api_key.clone(),
            config.country_code.clone(),
            config.geocode_limit,
        );
        let resolver = GeocodeResolver::new(
            geocoder,
            ProvinceMatcher::default(),
            Pacer::new(config.geocode_delay()),
        );
        let weather = WeatherClient::new(config.weather_url.clone(), config.api_key.clone());

        Self::new(
            registry,
            resolver,
            SnapshotStore::new(config.snapshot_path.clone()),
            weather,
            locations,
            observations,
        )
    }

    #[instrument(skip(self))]
    pub async fn run_once(&mut self) -> Result<RunSummary, PipelineError> {
        let fresh = self.registry.fetch_locations().await?;
        info!("Fetched {} locations from registry", fresh.len());

        let previous = match self.snapshots.load().await {
            Ok(previous) => previous,
            Err(e) => {
                warn!(error = %e, "Unreadable snapshot, forcing a full resync");
                None
            }
        };

        let mut summary = RunSummary {
            locations: fresh.len(),
            ..RunSummary::default()
        };

        let changed = has_changes(&fresh, previous.as_deref());
        let current: Vec<ResolvedLocation> = match previous {
            Some(previous) if !changed => {
                info!("Skipping geocode and location replace");
                dedupe_natural_keys(&previous)
            }
            _ => {
                summary.changed = true;
                let resolved = self.resolver.resolve_all(&fresh).await;
                let stored = self.sync.replace_all(&resolved).await?;
                // Snapshot mirrors the registry, duplicates included
                if let Err(e) = self.snapshots.save(&resolved).await {
                    warn!(error = %e, "Failed to save snapshot, next run will resync");
                }
                info!("Geocode performed and database updated with new changes");
                stored
            }
        };

        summary.resolved = current.iter().filter(|l| l.coordinates.is_some()).count();
        summary.unresolved = current.len() - summary.resolved;
        summary.weather = self.ingest.ingest_all(&current).await?;

        info!(
            locations = summary.locations,
            changed = summary.changed,
            resolved = summary.resolved,
            unresolved = summary.unresolved,
            observations = summary.weather.inserted,
            skipped = summary.weather.skipped(),
            "Sync run complete"
        );
        Ok(summary)
    }
}

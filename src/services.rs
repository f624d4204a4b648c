pub mod location_sync_service;
pub mod weather_ingest_service;

pub use location_sync_service::{dedupe_natural_keys, LocationSyncService};
pub use weather_ingest_service::{IngestOutcome, IngestSummary, WeatherIngestService};

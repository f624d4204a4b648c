use std::time::Duration;
use tokio::time;
use tracing::{debug, error, info, instrument};

use crate::db::{LocationStore, ObservationStore};
use crate::pipeline::SyncPipeline;

/// Run the pipeline immediately and then every `interval_minutes`.
///
/// A failed run is logged and the loop waits for the next tick.
#[instrument(skip(pipeline), fields(interval_minutes = %interval_minutes))]
pub async fn start_sync_scheduler<S, O>(mut pipeline: SyncPipeline<S, O>, interval_minutes: u64)
where
    S: LocationStore + Clone,
    O: ObservationStore,
{
    let mut interval = time::interval(Duration::from_secs(interval_minutes.max(1) * 60));
    interval.set_missed_tick_behavior(time::MissedTickBehavior::Delay);

    info!("Sync scheduler started with {} minute interval", interval_minutes);

    loop {
        interval.tick().await;
        debug!("Scheduler tick - starting sync run");

        match pipeline.run_once().await {
            Ok(summary) => {
                info!(
                    "Sync run stored {} observations ({} skipped)",
                    summary.weather.inserted,
                    summary.weather.skipped()
                );
            }
            Err(e) => {
                error!("Sync run failed: {}", e);
            }
        }
    }
}

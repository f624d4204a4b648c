use clap::Parser;
use tracing::{info, instrument};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use ph_weather_sync::config::Config;
use ph_weather_sync::db::{connect_and_migrate, LocationRepository, WeatherRepository};
use ph_weather_sync::pipeline::SyncPipeline;
use ph_weather_sync::scheduler;

#[derive(Parser)]
#[command(name = "ph-weather-sync")]
#[command(about = "Sync PSGC locations with geocoded coordinates and ingest current weather", long_about = None)]
struct Cli {
    /// Run a single sync and exit instead of looping on the schedule
    #[arg(long)]
    once: bool,
}

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing with environment filter support
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,ph_weather_sync=debug")),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_line_number(true),
        )
        .init();

    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = Config::from_env()?;
    info!(
        snapshot = %config.snapshot_path.display(),
        interval_minutes = config.sync_interval_minutes,
        "Starting weather sync"
    );

    let pool = connect_and_migrate(&config.database_url).await?;

    let pipeline = SyncPipeline::from_config(
        &config,
        LocationRepository::new(pool.clone()),
        WeatherRepository::new(pool),
    );

    if cli.once {
        let mut pipeline = pipeline;
        let summary = pipeline.run_once().await?;
        info!("Single run finished: {:?}", summary);
        return Ok(());
    }

    scheduler::start_sync_scheduler(pipeline, config.sync_interval_minutes).await;
    Ok(())
}

use clap::Parser;

use ph_weather_sync::config::DEFAULT_GEOCODE_URL;
use ph_weather_sync::geocode::{GeocodeResolver, GeocodingClient, ProvinceMatcher};
use ph_weather_sync::pacing::Pacer;

#[derive(Parser)]
#[command(name = "resolve-location")]
#[command(about = "Resolve one city through the geocode fallback chain", long_about = None)]
struct Cli {
    /// City name as it appears in the registry (e.g. "City of San Fernando")
    #[arg(long)]
    city: String,

    /// Province the city belongs to
    #[arg(long)]
    province: Option<String>,

    /// OpenWeather API key
    #[arg(long, env = "OPENWEATHER_API_KEY")]
    api_key: String,

    #[arg(long, env = "GEOCODE_URL", default_value = DEFAULT_GEOCODE_URL)]
    geocode_url: String,

    #[arg(long, env = "COUNTRY_CODE", default_value = "PH")]
    country_code: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
    let cli = Cli::parse();

    println!("Lookup order for '{}':", cli.city);
    for (step, name) in GeocodeResolver::lookup_names(&cli.city).iter().enumerate() {
        println!("  {}. {}", step + 1, name);
    }

    let client = GeocodingClient::new(cli.geocode_url, cli.api_key, cli.country_code, 5);
    let resolver = GeocodeResolver::new(client, ProvinceMatcher::default(), Pacer::disabled());

    match resolver.resolve(&cli.city, cli.province.as_deref()).await {
        Some(found) => {
            println!(
                "\nResolved: lat={}, lon={} (rule: {:?})",
                found.coordinates.latitude, found.coordinates.longitude, found.rule
            );
        }
        None => {
            println!(
                "\nUnresolved: no candidate matched province {:?}",
                cli.province.as_deref().unwrap_or("<none>")
            );
        }
    }

    Ok(())
}

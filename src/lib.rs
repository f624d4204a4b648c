pub mod change_detector;
pub mod config;
pub mod db;
pub mod fetch_error;
pub mod geocode;
pub mod location;
pub mod normalize;
pub mod pacing;
pub mod pipeline;
pub mod registry;
pub mod scheduler;
pub mod services;
pub mod snapshot;
pub mod weather_client;

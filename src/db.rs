pub mod error;
pub mod location_repository;
pub mod models;
pub mod pool;
pub mod store;
pub mod weather_repository;

pub use error::DbError;
pub use location_repository::LocationRepository;
pub use models::*;
pub use pool::connect_and_migrate;
pub use store::{LocationStore, ObservationStore};
pub use weather_repository::WeatherRepository;

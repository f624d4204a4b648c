pub mod client;
pub mod matcher;
pub mod resolver;

pub use client::GeocodingClient;
pub use matcher::{
    default_exception_rules, ExceptionRule, GeoResult, MatchRule, ProvinceMatch, ProvinceMatcher,
    StatePattern,
};
pub use resolver::GeocodeResolver;

//! `climascope` - climate lookup for a place name or coordinate pair
//!
//! Resolves user input to a location, fetches the latest daily observation
//! from NASA POWER and classifies it into a climate risk tier.

pub mod api;
pub mod cli;
pub mod climate;
pub mod config;
pub mod error;
pub mod geocoding;
pub mod location_resolver;
pub mod logging;
pub mod lookup;
pub mod models;
pub mod presentation;
pub mod risk;
pub mod weather;
pub mod web;

// Re-export core types for public API
pub use climate::ClimateDataFetcher;
pub use config::ClimascopeConfig;
pub use error::ClimateError;
pub use geocoding::{GeocodeCandidate, Geocoder, NominatimGeocoder};
pub use location_resolver::LocationResolver;
pub use lookup::{LiveOrchestrator, LookupOrchestrator, LookupStage};
pub use models::{Coordinates, LookupResult, Observation, ObservationSource, ResolvedLocation};
pub use presentation::{Dashboard, ErrorView, LookupView, MapState};
pub use risk::{RiskTier, classify};
pub use weather::{DailyParameters, DailyPointRequest, PowerClient, WeatherSource};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, ClimateError>;

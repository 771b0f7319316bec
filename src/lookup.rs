//! Lookup pipeline: input → location → observation → risk tier.

use serde::Serialize;
use std::fmt;
use tracing::{Instrument, debug, info, info_span, warn};

use crate::ClimateError;
use crate::climate::ClimateDataFetcher;
use crate::config::ClimascopeConfig;
use crate::geocoding::{Geocoder, NominatimGeocoder};
use crate::location_resolver::LocationResolver;
use crate::models::LookupResult;
use crate::risk::classify_observation;
use crate::weather::{PowerClient, WeatherSource};

/// Where a single lookup currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LookupStage {
    Idle,
    Resolving,
    Fetching,
    Classifying,
    Done,
    Failed,
}

impl fmt::Display for LookupStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LookupStage::Idle => "idle",
            LookupStage::Resolving => "resolving",
            LookupStage::Fetching => "fetching",
            LookupStage::Classifying => "classifying",
            LookupStage::Done => "done",
            LookupStage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Runs one lookup at a time; holds no state between lookups
pub struct LookupOrchestrator<G, W> {
    resolver: LocationResolver<G>,
    fetcher: ClimateDataFetcher<W>,
}

/// Orchestrator wired to Nominatim and NASA POWER
pub type LiveOrchestrator = LookupOrchestrator<NominatimGeocoder, PowerClient>;

impl LiveOrchestrator {
    pub fn from_config(config: &ClimascopeConfig) -> anyhow::Result<Self> {
        let resolver = LocationResolver::new(NominatimGeocoder::new(&config.geocoding)?)
            .with_coordinate_validation(config.resolver.validate_coordinates);
        let fetcher = ClimateDataFetcher::new(PowerClient::new(&config.weather)?)
            .with_lag_days(config.weather.lag_days);
        Ok(LookupOrchestrator::new(resolver, fetcher))
    }
}

impl<G: Geocoder, W: WeatherSource> LookupOrchestrator<G, W> {
    pub fn new(resolver: LocationResolver<G>, fetcher: ClimateDataFetcher<W>) -> Self {
        Self { resolver, fetcher }
    }

    pub async fn lookup(&self, raw_input: &str) -> Result<LookupResult, ClimateError> {
        self.lookup_observed(raw_input, |_| {}).await
    }

    /// Run a lookup, reporting every stage transition to `on_stage`
    pub async fn lookup_observed<F>(
        &self,
        raw_input: &str,
        mut on_stage: F,
    ) -> Result<LookupResult, ClimateError>
    where
        F: FnMut(LookupStage) + Send,
    {
        if raw_input.is_empty() {
            return Err(ClimateError::EmptyInput);
        }

        let span = info_span!("lookup", input = raw_input);
        async move {
            let mut advance = |stage: LookupStage| {
                debug!("Lookup stage: {}", stage);
                on_stage(stage);
            };

            advance(LookupStage::Resolving);
            let location = match self.resolver.resolve(raw_input).await {
                Ok(location) => location,
                Err(e) => {
                    warn!("Lookup failed during resolution: {}", e);
                    advance(LookupStage::Failed);
                    return Err(e);
                }
            };

            advance(LookupStage::Fetching);
            let observation = self
                .fetcher
                .fetch(location.latitude, location.longitude)
                .await;

            advance(LookupStage::Classifying);
            let risk = classify_observation(&observation);

            info!(
                "{} ({}): {} risk from {}",
                location.display_name,
                location.format_coordinates(),
                risk,
                observation.source
            );
            advance(LookupStage::Done);

            Ok(LookupResult {
                location,
                observation,
                risk,
            })
        }
        .instrument(span)
        .await
    }
}

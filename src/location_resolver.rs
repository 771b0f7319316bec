//! Location Resolution Module
//!
//! Turns free-form user input into a resolved location. A strict
//! "lat, lon" pair is parsed locally; anything else is geocoded.

use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, warn};

use crate::ClimateError;
use crate::geocoding::Geocoder;
use crate::models::ResolvedLocation;

/// Anchored at both ends: "19.07,72.87,extra" does not match.
static COORDINATE_PAIR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(-?\d+\.?\d*)\s*,\s*(-?\d+\.?\d*)$").expect("coordinate pattern is valid")
});

/// Parse a strict coordinate pair into (latitude, longitude)
#[must_use]
pub fn parse_coordinate_pair(input: &str) -> Option<(f64, f64)> {
    let captures = COORDINATE_PAIR.captures(input)?;
    let latitude = captures.get(1)?.as_str().parse::<f64>().ok()?;
    let longitude = captures.get(2)?.as_str().parse::<f64>().ok()?;
    Some((latitude, longitude))
}

/// Service for resolving location inputs
pub struct LocationResolver<G> {
    geocoder: G,
    validate_coordinates: bool,
}

impl<G: Geocoder> LocationResolver<G> {
    pub fn new(geocoder: G) -> Self {
        Self {
            geocoder,
            validate_coordinates: false,
        }
    }

    /// Reject directly entered coordinates outside [-90, 90] / [-180, 180]
    #[must_use]
    pub fn with_coordinate_validation(mut self, enabled: bool) -> Self {
        self.validate_coordinates = enabled;
        self
    }

    /// Resolve user input into a location
    pub async fn resolve(&self, input: &str) -> Result<ResolvedLocation, ClimateError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ClimateError::EmptyInput);
        }

        debug!("Resolving location input: {:?}", input);

        let location = match parse_coordinate_pair(input) {
            Some((lat, lon)) => self.resolve_coordinates(lat, lon)?,
            None => self.resolve_name(input).await?,
        };

        debug!(
            "Resolved location: {} at ({}, {})",
            location.display_name, location.latitude, location.longitude
        );

        Ok(location)
    }

    fn resolve_coordinates(&self, lat: f64, lon: f64) -> Result<ResolvedLocation, ClimateError> {
        let location = ResolvedLocation::from_coordinates(lat, lon);

        if !location.is_within_bounds() {
            if self.validate_coordinates {
                return Err(ClimateError::invalid_coordinates(format!(
                    "({lat}, {lon}) is outside latitude [-90, 90] / longitude [-180, 180]"
                )));
            }
            warn!("Coordinates ({}, {}) are out of range, passing through", lat, lon);
        }

        Ok(location)
    }

    /// Resolve a place name via geocoding
    async fn resolve_name(&self, name: &str) -> Result<ResolvedLocation, ClimateError> {
        debug!("Geocoding location name: {}", name);

        let candidates = self.geocoder.search(name, 1).await.map_err(|e| {
            warn!("Geocoding error: {:#}", e);
            ClimateError::geocoding(format!("{e:#}"))
        })?;

        let Some(candidate) = candidates.into_iter().next() else {
            return Err(ClimateError::not_found(name));
        };

        let latitude = parse_provider_coordinate(&candidate.latitude, "latitude")?;
        let longitude = parse_provider_coordinate(&candidate.longitude, "longitude")?;
        let display_name = candidate
            .display_name
            .split(',')
            .next()
            .unwrap_or_default()
            .trim()
            .to_string();

        debug!(
            "Found location: {} ({:.4}, {:.4})",
            display_name, latitude, longitude
        );

        Ok(ResolvedLocation::new(latitude, longitude, display_name))
    }
}

fn parse_provider_coordinate(value: &str, axis: &str) -> Result<f64, ClimateError> {
    value.trim().parse::<f64>().map_err(|_| {
        ClimateError::geocoding(format!("Malformed {axis} in geocoding response: {value:?}"))
    })
}

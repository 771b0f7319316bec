//! Presentation adapter
//!
//! Turns lookup outcomes into payloads for a map widget and data cards.
//! The core never touches the map; it only hands over data.

pub mod dashboard;

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

use crate::ClimateError;
use crate::config::MapConfig;
use crate::models::{Coordinates, LookupResult, ObservationSource};
use crate::risk::RiskTier;

pub use dashboard::{Dashboard, DashboardSnapshot, Panel};

/// Hint shown under every error
pub const RETRY_HINT: &str =
    "Please try again with a different location or use coordinates format (e.g., 19.07, 72.87)";

/// Map widget resource
pub trait MapView {
    fn set_marker(&mut self, coordinates: Coordinates, label: &str);
    fn center(&mut self, coordinates: Coordinates, zoom: u8);
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub coordinates: Coordinates,
    pub label: String,
    pub popup: String,
}

/// Serializable map state: one marker, one view center
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapState {
    pub marker: Option<Marker>,
    pub center: Coordinates,
    pub zoom: u8,
    #[serde(skip)]
    focus_zoom: u8,
}

impl MapState {
    /// Initial view with a marker at the default center
    #[must_use]
    pub fn new(config: &MapConfig) -> Self {
        let center = Coordinates::new(config.default_latitude, config.default_longitude);
        Self {
            marker: Some(Marker {
                coordinates: center,
                label: String::new(),
                popup: String::new(),
            }),
            center,
            zoom: config.default_zoom,
            focus_zoom: config.focus_zoom,
        }
    }

    /// Move the marker to a looked-up location and zoom in on it
    pub fn show(&mut self, coordinates: Coordinates, label: &str) {
        self.set_marker(coordinates, label);
        self.center(coordinates, self.focus_zoom);
    }
}

impl Default for MapState {
    fn default() -> Self {
        Self::new(&MapConfig::default())
    }
}

impl MapView for MapState {
    fn set_marker(&mut self, coordinates: Coordinates, label: &str) {
        self.marker = Some(Marker {
            coordinates,
            label: label.to_string(),
            popup: format!(
                "{label}\nLat: {:.4}, Lon: {:.4}",
                coordinates.latitude, coordinates.longitude
            ),
        });
    }

    fn center(&mut self, coordinates: Coordinates, zoom: u8) {
        self.center = coordinates;
        self.zoom = zoom;
    }
}

/// Data cards for a successful lookup
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LookupView {
    pub location: String,
    pub coordinates: Coordinates,
    pub temperature: String,
    pub rainfall: String,
    pub humidity: String,
    pub risk: RiskTier,
    pub risk_label: String,
    pub source: ObservationSource,
    pub data_source: String,
    pub updated_at: DateTime<Utc>,
}

impl LookupView {
    #[must_use]
    pub fn from_result(result: &LookupResult) -> Self {
        let observation = &result.observation;
        let data_source = match observation.source {
            ObservationSource::Live { .. } => "NASA POWER API",
            ObservationSource::Synthetic => "Synthetic estimate",
        };
        Self {
            location: result.location.display_name.clone(),
            coordinates: result.location.coordinates(),
            temperature: observation.format_temperature(),
            rainfall: observation.format_rainfall(),
            humidity: observation.format_humidity(),
            risk: result.risk,
            risk_label: result.risk.label().to_string(),
            source: observation.source.clone(),
            data_source: data_source.to_string(),
            updated_at: Utc::now(),
        }
    }
}

impl fmt::Display for LookupView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "📍 Location: {}", self.location)?;
        writeln!(f, "   Coordinates: {}", self.coordinates.format())?;
        writeln!(f, "🌡️ Current Temperature: {}", self.temperature)?;
        writeln!(f, "🌧️ Rainfall: {}", self.rainfall)?;
        writeln!(f, "💧 Humidity: {}", self.humidity)?;
        writeln!(f, "⚠️ Climate Risk Level: {}", self.risk.key().to_uppercase())?;
        write!(
            f,
            "🛰️ Data source: {} | Last updated: {}",
            self.data_source,
            self.updated_at.format("%Y-%m-%d %H:%M:%S UTC")
        )
    }
}

/// Error panel for a failed lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorView {
    pub kind: String,
    pub message: String,
    pub hint: String,
}

impl ErrorView {
    #[must_use]
    pub fn from_error(error: &ClimateError) -> Self {
        Self {
            kind: error.kind().to_string(),
            message: error.user_message(),
            hint: RETRY_HINT.to_string(),
        }
    }
}

impl fmt::Display for ErrorView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "⚠️ Error: {}", self.message)?;
        write!(f, "{}", self.hint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Observation, ResolvedLocation};

    fn mumbai() -> LookupResult {
        LookupResult {
            location: ResolvedLocation::new(19.076, 72.8777, "Mumbai".into()),
            observation: Observation::live("20261016".into(), Some(32.0), Some(5.0), Some(70.0)),
            risk: RiskTier::Low,
        }
    }

    #[test]
    fn test_map_state_starts_at_default_center() {
        let map = MapState::default();
        assert_eq!(map.center, Coordinates::new(20.5937, 78.9629));
        assert_eq!(map.zoom, 4);
        assert_eq!(map.marker.as_ref().map(|m| m.coordinates), Some(map.center));
    }

    #[test]
    fn test_map_state_show_moves_marker_and_zooms() {
        let mut map = MapState::default();
        map.show(Coordinates::new(19.076, 72.8777), "Mumbai");

        assert_eq!(map.center, Coordinates::new(19.076, 72.8777));
        assert_eq!(map.zoom, 10);
        let marker = map.marker.unwrap();
        assert_eq!(marker.label, "Mumbai");
        assert_eq!(marker.popup, "Mumbai\nLat: 19.0760, Lon: 72.8777");
    }

    #[test]
    fn test_lookup_view_formats_cards() {
        let view = LookupView::from_result(&mumbai());
        assert_eq!(view.location, "Mumbai");
        assert_eq!(view.temperature, "32.0°C");
        assert_eq!(view.rainfall, "5.0 mm");
        assert_eq!(view.humidity, "70%");
        assert_eq!(view.risk_label, "Low");
        assert_eq!(view.data_source, "NASA POWER API");

        let rendered = view.to_string();
        assert!(rendered.contains("📍 Location: Mumbai"));
        assert!(rendered.contains("Climate Risk Level: LOW"));
    }

    #[test]
    fn test_lookup_view_marks_synthetic_data() {
        let mut result = mumbai();
        result.observation = Observation::synthetic();
        let view = LookupView::from_result(&result);
        assert_eq!(view.data_source, "Synthetic estimate");
        assert_eq!(view.source, ObservationSource::Synthetic);
    }

    #[test]
    fn test_error_view() {
        let view = ErrorView::from_error(&ClimateError::not_found("Atlantis"));
        assert_eq!(view.kind, "location_not_found");
        assert!(view.message.contains("(lat, lon)"));
        assert!(view.to_string().contains("19.07, 72.87"));
    }
}

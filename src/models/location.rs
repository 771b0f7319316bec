//! Resolved location model

use serde::{Deserialize, Serialize};

/// A coordinate pair in decimal degrees
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Format as "lat, lon" with four decimals
    #[must_use]
    pub fn format(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }

    /// Whether latitude lies in [-90, 90] and longitude in [-180, 180]
    #[must_use]
    pub fn is_within_bounds(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// A location the user asked for, resolved to coordinates and a label
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ResolvedLocation {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Human-readable label
    pub display_name: String,
}

impl ResolvedLocation {
    #[must_use]
    pub fn new(latitude: f64, longitude: f64, display_name: String) -> Self {
        Self {
            latitude,
            longitude,
            display_name,
        }
    }

    /// Location labelled with its own coordinates
    #[must_use]
    pub fn from_coordinates(latitude: f64, longitude: f64) -> Self {
        let coordinates = Coordinates::new(latitude, longitude);
        Self::new(latitude, longitude, coordinates.format())
    }

    #[must_use]
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }

    /// Format location as coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        self.coordinates().format()
    }

    #[must_use]
    pub fn is_within_bounds(&self) -> bool {
        self.coordinates().is_within_bounds()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_coordinates_uses_four_decimals() {
        let location = ResolvedLocation::from_coordinates(19.07, 72.87);
        assert_eq!(location.display_name, "19.0700, 72.8700");
        assert_eq!(location.format_coordinates(), "19.0700, 72.8700");
    }

    #[test]
    fn test_bounds() {
        assert!(ResolvedLocation::from_coordinates(-90.0, 180.0).is_within_bounds());
        assert!(!ResolvedLocation::from_coordinates(200.0, 500.0).is_within_bounds());
        assert!(!Coordinates::new(10.0, -180.5).is_within_bounds());
    }
}

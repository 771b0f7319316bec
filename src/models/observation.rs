//! Environmental observation model

use rand::RngExt;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where an observation came from
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ObservationSource {
    /// Daily value reported by NASA POWER for the given YYYYMMDD date
    Live { date: String },
    /// Randomly generated stand-in after a failed fetch
    Synthetic,
}

impl ObservationSource {
    #[must_use]
    pub fn is_synthetic(&self) -> bool {
        matches!(self, ObservationSource::Synthetic)
    }
}

impl fmt::Display for ObservationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObservationSource::Live { date } => write!(f, "NASA POWER API ({date})"),
            ObservationSource::Synthetic => write!(f, "Synthetic estimate"),
        }
    }
}

/// One daily reading for a location
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Observation {
    /// Mean air temperature at 2 m in Celsius
    pub temperature: f64,
    /// Precipitation in mm
    pub rainfall: f64,
    /// Relative humidity at 2 m in percent
    pub humidity: f64,
    pub source: ObservationSource,
}

impl Observation {
    pub const DEFAULT_TEMPERATURE: f64 = 25.0;
    pub const DEFAULT_RAINFALL: f64 = 5.0;
    pub const DEFAULT_HUMIDITY: f64 = 60.0;

    /// Live observation; missing values fall back to 25 °C, 5 mm and 60 %
    #[must_use]
    pub fn live(
        date: String,
        temperature: Option<f64>,
        rainfall: Option<f64>,
        humidity: Option<f64>,
    ) -> Self {
        Self {
            temperature: temperature.unwrap_or(Self::DEFAULT_TEMPERATURE),
            rainfall: rainfall.unwrap_or(Self::DEFAULT_RAINFALL),
            humidity: humidity.unwrap_or(Self::DEFAULT_HUMIDITY),
            source: ObservationSource::Live { date },
        }
    }

    /// Plausible random observation: 20–35 °C, 0–30 mm, 40–80 %
    #[must_use]
    pub fn synthetic() -> Self {
        let mut rng = rand::rng();
        Self {
            temperature: rng.random_range(20.0..35.0),
            rainfall: rng.random_range(0.0..30.0),
            humidity: rng.random_range(40.0..80.0),
            source: ObservationSource::Synthetic,
        }
    }

    #[must_use]
    pub fn format_temperature(&self) -> String {
        format!("{:.1}°C", self.temperature)
    }

    #[must_use]
    pub fn format_rainfall(&self) -> String {
        format!("{:.1} mm", self.rainfall)
    }

    #[must_use]
    pub fn format_humidity(&self) -> String {
        format!("{:.0}%", self.humidity)
    }
}

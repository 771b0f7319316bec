//! Climate risk classification
//!
//! Readings are scored additively and the score is cut into three tiers.
//! Heat and cold are exclusive branches of one temperature check; humidity
//! and rainfall are scored independently of temperature.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::Observation;

/// Discrete climate risk
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    Low,
    Moderate,
    High,
}

impl RiskTier {
    /// Lowercase key, used for styling
    #[must_use]
    pub fn key(&self) -> &'static str {
        match self {
            RiskTier::Low => "low",
            RiskTier::Moderate => "moderate",
            RiskTier::High => "high",
        }
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            RiskTier::Low => "Low",
            RiskTier::Moderate => "Moderate",
            RiskTier::High => "High",
        }
    }

    fn from_score(score: u8) -> Self {
        if score >= 4 {
            RiskTier::High
        } else if score >= 2 {
            RiskTier::Moderate
        } else {
            RiskTier::Low
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Additive risk points for temperature (°C), humidity (%) and rainfall (mm)
#[must_use]
pub fn risk_score(temperature: f64, humidity: f64, rainfall: f64) -> u8 {
    let mut score = 0;

    if temperature > 35.0 {
        score += 2;
    } else if temperature > 30.0 {
        score += 1;
    } else if temperature < 5.0 {
        score += 2;
    }

    if humidity > 80.0 || humidity < 20.0 {
        score += 1;
    }

    if rainfall > 50.0 {
        score += 2;
    } else if rainfall > 20.0 {
        score += 1;
    }

    score
}

/// Classify readings into a risk tier: 4+ points is high, 2+ moderate
#[must_use]
pub fn classify(temperature: f64, humidity: f64, rainfall: f64) -> RiskTier {
    RiskTier::from_score(risk_score(temperature, humidity, rainfall))
}

/// Classify a fetched observation
#[must_use]
pub fn classify_observation(observation: &Observation) -> RiskTier {
    classify(
        observation.temperature,
        observation.humidity,
        observation.rainfall,
    )
}

//! Result of one completed lookup

use serde::{Deserialize, Serialize};

use super::{Observation, ResolvedLocation};
use crate::risk::RiskTier;

/// Everything a presentation needs after a successful lookup
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct LookupResult {
    pub location: ResolvedLocation,
    pub observation: Observation,
    pub risk: RiskTier,
}

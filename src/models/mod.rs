//! Data models for climascope
//!
//! - Location: resolved coordinates and their label
//! - Observation: one daily environmental reading
//! - Lookup: the pipeline's output

pub mod location;
pub mod lookup;
pub mod observation;

pub use location::{Coordinates, ResolvedLocation};
pub use lookup::LookupResult;
pub use observation::{Observation, ObservationSource};

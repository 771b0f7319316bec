//! Error types and handling for the climascope lookup pipeline

use thiserror::Error;

/// Shared guidance for every geocoding failure.
pub const GEOCODING_GUIDANCE: &str =
    "Could not find location. Please try coordinates (lat, lon) format.";

/// Main error type for the climascope application
#[derive(Error, Debug)]
pub enum ClimateError {
    /// The user submitted nothing
    #[error("Please enter a location or coordinates")]
    EmptyInput,

    /// Geocoding answered, but with zero candidates
    #[error("Location not found: {query}")]
    LocationNotFound { query: String },

    /// Geocoding transport, status or payload failure
    #[error("Geocoding service error: {message}")]
    GeocodingService { message: String },

    /// Directly entered coordinates rejected by range validation
    #[error("Invalid coordinates: {message}")]
    InvalidCoordinates { message: String },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// General application errors
    #[error("Application error: {message}")]
    General { message: String },
}

impl ClimateError {
    /// Create a new location-not-found error
    pub fn not_found<S: Into<String>>(query: S) -> Self {
        Self::LocationNotFound {
            query: query.into(),
        }
    }

    /// Create a new geocoding service error
    pub fn geocoding<S: Into<String>>(message: S) -> Self {
        Self::GeocodingService {
            message: message.into(),
        }
    }

    /// Create a new invalid-coordinates error
    pub fn invalid_coordinates<S: Into<String>>(message: S) -> Self {
        Self::InvalidCoordinates {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new general error
    pub fn general<S: Into<String>>(message: S) -> Self {
        Self::General {
            message: message.into(),
        }
    }

    /// Stable identifier of the error category, for surfaces that need to
    /// tell categories apart even where the user text is shared.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            ClimateError::EmptyInput => "empty_input",
            ClimateError::LocationNotFound { .. } => "location_not_found",
            ClimateError::GeocodingService { .. } => "geocoding_service",
            ClimateError::InvalidCoordinates { .. } => "invalid_coordinates",
            ClimateError::Config { .. } => "config",
            ClimateError::Io { .. } => "io",
            ClimateError::General { .. } => "general",
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            ClimateError::EmptyInput => "Please enter a location or coordinates".to_string(),
            ClimateError::LocationNotFound { .. } | ClimateError::GeocodingService { .. } => {
                GEOCODING_GUIDANCE.to_string()
            }
            ClimateError::InvalidCoordinates { message } => {
                format!("Invalid coordinates: {message}")
            }
            ClimateError::Config { .. } => {
                "Configuration error. Please check your config file.".to_string()
            }
            ClimateError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
            ClimateError::General { message } => message.clone(),
        }
    }
}

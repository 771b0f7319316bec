//! Configuration management for climascope
//!
//! Handles loading configuration from a TOML file and environment variables,
//! filling in defaults and validating every setting before use.

use crate::ClimateError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ClimascopeConfig {
    /// Geocoding provider settings
    #[serde(default)]
    pub geocoding: GeocodingConfig,
    /// Weather provider settings
    #[serde(default)]
    pub weather: WeatherConfig,
    /// Location resolution settings
    #[serde(default)]
    pub resolver: ResolverConfig,
    /// Map presentation settings
    #[serde(default)]
    pub map: MapConfig,
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Geocoding (Nominatim) settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodingConfig {
    /// Base URL of the Nominatim instance
    #[serde(default = "default_geocoding_base_url")]
    pub base_url: String,
    /// User agent sent with every request, required by Nominatim's usage policy
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
}

/// Weather (NASA POWER) settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Base URL of the POWER API
    #[serde(default = "default_weather_base_url")]
    pub base_url: String,
    /// POWER user community
    #[serde(default = "default_community")]
    pub community: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
    /// How many days back the observation date lies
    #[serde(default = "default_lag_days")]
    pub lag_days: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ResolverConfig {
    /// Reject directly entered coordinates outside the valid ranges
    #[serde(default)]
    pub validate_coordinates: bool,
}

/// Map presentation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapConfig {
    #[serde(default = "default_map_latitude")]
    pub default_latitude: f64,
    #[serde(default = "default_map_longitude")]
    pub default_longitude: f64,
    /// Zoom level before the first lookup
    #[serde(default = "default_zoom")]
    pub default_zoom: u8,
    /// Zoom level used when centering on a looked-up location
    #[serde(default = "default_focus_zoom")]
    pub focus_zoom: u8,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory with the browser widget, served as fallback when set
    #[serde(default)]
    pub static_dir: Option<String>,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_geocoding_base_url() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}

fn default_user_agent() -> String {
    format!("climascope/{}", crate::VERSION)
}

fn default_timeout() -> u32 {
    30
}

fn default_weather_base_url() -> String {
    "https://power.larc.nasa.gov/api".to_string()
}

fn default_community() -> String {
    "RE".to_string()
}

fn default_lag_days() -> u32 {
    2
}

fn default_map_latitude() -> f64 {
    20.5937
}

fn default_map_longitude() -> f64 {
    78.9629
}

fn default_zoom() -> u8 {
    4
}

fn default_focus_zoom() -> u8 {
    10
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            base_url: default_geocoding_base_url(),
            user_agent: default_user_agent(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: default_weather_base_url(),
            community: default_community(),
            timeout_seconds: default_timeout(),
            lag_days: default_lag_days(),
        }
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            default_latitude: default_map_latitude(),
            default_longitude: default_map_longitude(),
            default_zoom: default_zoom(),
            focus_zoom: default_focus_zoom(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            static_dir: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl ClimascopeConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // CLIMASCOPE_WEATHER__LAG_DAYS=3 overrides weather.lag_days
        builder = builder.add_source(
            Environment::with_prefix("CLIMASCOPE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: ClimascopeConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("climascope").join("config.toml"))
    }

    /// Apply default values to fields left empty or zeroed
    pub fn apply_defaults(&mut self) {
        if self.geocoding.base_url.is_empty() {
            self.geocoding.base_url = default_geocoding_base_url();
        }
        if self.geocoding.user_agent.is_empty() {
            self.geocoding.user_agent = default_user_agent();
        }
        if self.geocoding.timeout_seconds == 0 {
            self.geocoding.timeout_seconds = default_timeout();
        }
        if self.weather.base_url.is_empty() {
            self.weather.base_url = default_weather_base_url();
        }
        if self.weather.community.is_empty() {
            self.weather.community = default_community();
        }
        if self.weather.timeout_seconds == 0 {
            self.weather.timeout_seconds = default_timeout();
        }
        if self.weather.lag_days == 0 {
            self.weather.lag_days = default_lag_days();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.geocoding.timeout_seconds > 300 || self.weather.timeout_seconds > 300 {
            return Err(ClimateError::config("Request timeout cannot exceed 300 seconds").into());
        }

        if self.weather.lag_days > 30 {
            return Err(ClimateError::config("Weather lag cannot exceed 30 days").into());
        }

        if self.map.default_zoom > 18 || self.map.focus_zoom > 18 {
            return Err(ClimateError::config("Map zoom cannot exceed 18").into());
        }

        if !(-90.0..=90.0).contains(&self.map.default_latitude)
            || !(-180.0..=180.0).contains(&self.map.default_longitude)
        {
            return Err(ClimateError::config("Default map center is out of range").into());
        }

        Ok(())
    }

    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(ClimateError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(ClimateError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        for (name, url) in [
            ("Geocoding", &self.geocoding.base_url),
            ("Weather", &self.weather.base_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ClimateError::config(format!(
                    "{name} base URL must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        Ok(())
    }
}

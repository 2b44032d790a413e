//! Configuration management for the `AstroCalc` application
//!
//! Handles loading configuration from files and environment variables
//! and provides validation for all configuration settings.

use crate::AppError;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for the `AstroCalc` application
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AstroCalcConfig {
    /// Calculation API configuration
    #[serde(default)]
    pub api: ApiConfig,
    /// Geocoding service configuration
    #[serde(default)]
    pub geocoding: GeocodingConfig,
    /// Request defaults
    #[serde(default)]
    pub defaults: DefaultsConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Calculation API configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Bearer token sent with every calculation request
    pub api_key: Option<String>,
    /// Endpoint for planet and house positions
    #[serde(default)]
    pub position_url: String,
    /// Endpoint for aspects
    #[serde(default)]
    pub aspects_url: String,
    /// Endpoint for a single moon phase
    #[serde(default)]
    pub phase_url: String,
    /// Endpoint for planet transits
    #[serde(default)]
    pub transit_url: String,
    /// Endpoint for the moon phases of a whole month
    #[serde(default)]
    pub month_phase_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_api_timeout")]
    pub timeout_seconds: u32,
}

/// Geocoding service configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodingConfig {
    #[serde(default = "default_geocoding_base_url")]
    pub base_url: String,
    #[serde(default = "default_geocoding_user_agent")]
    pub user_agent: String,
}

/// Default request settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Timezone offset sent with every calculation
    #[serde(default = "default_timezone_offset")]
    pub timezone_offset_hours: f64,
    /// Sampling step for transit searches
    #[serde(default = "default_step_minutes")]
    pub step_minutes: u32,
    /// Display language (en, it)
    #[serde(default = "default_language")]
    pub language: String,
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
fn default_api_timeout() -> u32 {
    30
}

fn default_geocoding_base_url() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}

fn default_geocoding_user_agent() -> String {
    "HoroscopeCalculator/1.0".to_string()
}

fn default_timezone_offset() -> f64 {
    1.0
}

fn default_step_minutes() -> u32 {
    60
}

fn default_language() -> String {
    "en".to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            position_url: String::new(),
            aspects_url: String::new(),
            phase_url: String::new(),
            transit_url: String::new(),
            month_phase_url: String::new(),
            timeout_seconds: default_api_timeout(),
        }
    }
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            base_url: default_geocoding_base_url(),
            user_agent: default_geocoding_user_agent(),
        }
    }
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            timezone_offset_hours: default_timezone_offset(),
            step_minutes: default_step_minutes(),
            language: default_language(),
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

impl AstroCalcConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> crate::Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> crate::Result<Self> {
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

        // ASTROCALC_API__API_KEY, ASTROCALC_DEFAULTS__LANGUAGE, ...
        builder = builder.add_source(
            Environment::with_prefix("ASTROCALC")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder.build().map_err(|e| {
            AppError::config(format!("Failed to build configuration: {e}"))
                .with_detail("path", config_file.display().to_string())
        })?;

        let mut config: AstroCalcConfig = settings
            .try_deserialize()
            .map_err(|e| AppError::config(format!("Failed to deserialize configuration: {e}")))?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("astrocalc").join("config.toml"))
    }

    /// Apply default values to blank configuration fields
    pub fn apply_defaults(&mut self) {
        if self.api.timeout_seconds == 0 {
            self.api.timeout_seconds = default_api_timeout();
        }
        if self.geocoding.base_url.is_empty() {
            self.geocoding.base_url = default_geocoding_base_url();
        }
        if self.geocoding.user_agent.is_empty() {
            self.geocoding.user_agent = default_geocoding_user_agent();
        }
        if self.defaults.step_minutes == 0 {
            self.defaults.step_minutes = default_step_minutes();
        }
        if self.defaults.language.is_empty() {
            self.defaults.language = default_language();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> crate::Result<()> {
        self.validate_api_key()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    fn validate_api_key(&self) -> crate::Result<()> {
        if let Some(api_key) = &self.api.api_key
            && api_key.trim().is_empty()
        {
            return Err(AppError::config(
                "API key cannot be empty if provided. Either remove it or provide a valid key.",
            ));
        }
        Ok(())
    }

    fn validate_numeric_ranges(&self) -> crate::Result<()> {
        if self.api.timeout_seconds > 300 {
            return Err(AppError::config("API timeout cannot exceed 300 seconds"));
        }

        let offset = self.defaults.timezone_offset_hours;
        if !offset.is_finite() || !(-12.0..=14.0).contains(&offset) {
            return Err(AppError::config(format!(
                "Timezone offset must be between -12 and 14 hours, got: {offset}"
            )));
        }

        if self.defaults.step_minutes > 1440 {
            return Err(AppError::config(
                "Transit step cannot exceed 1440 minutes (1 day)",
            ));
        }

        Ok(())
    }

    fn validate_string_values(&self) -> crate::Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(AppError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            )));
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(AppError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            )));
        }

        let valid_languages = ["en", "it"];
        if !valid_languages.contains(&self.defaults.language.as_str()) {
            return Err(AppError::config(format!(
                "Invalid language '{}'. Must be one of: {}",
                self.defaults.language,
                valid_languages.join(", ")
            )));
        }

        if !is_http_url(&self.geocoding.base_url) {
            return Err(AppError::config(
                "Geocoding base URL must be a valid HTTP or HTTPS URL",
            ));
        }

        for (name, url) in self.api.endpoints() {
            if !url.is_empty() && !is_http_url(url) {
                return Err(AppError::config(format!(
                    "{name} endpoint must be a valid HTTP or HTTPS URL"
                )));
            }
        }

        Ok(())
    }
}

impl ApiConfig {
    /// Configured endpoints with a readable name, for validation and logging
    #[must_use]
    pub fn endpoints(&self) -> [(&'static str, &str); 5] {
        [
            ("Position", self.position_url.as_str()),
            ("Aspects", self.aspects_url.as_str()),
            ("Phase", self.phase_url.as_str()),
            ("Transit", self.transit_url.as_str()),
            ("Month phase", self.month_phase_url.as_str()),
        ]
    }
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

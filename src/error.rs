//! Error types and handling for the `AstroCalc` application
//!
//! Every failure, whether a rejected form, a geocoding miss or a failed
//! calculation call, is converted into one uniform [`AppError`] carrying a
//! string code, a message and the instant it was raised.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Classification of an [`AppError`], serialized as its wire string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    HttpError,
    ApiError,
    CityNotFound,
    GeocodingError,
    GeocodingApiError,
    HoroscopeApiError,
    AspectsApiError,
    MoonPhaseApiError,
    TransitApiError,
    MonthMoonPhasesApiError,
    ValidationError,
    ConfigError,
    NetworkError,
    UnknownError,
}

impl ErrorCode {
    /// The code as it appears in serialized errors and on screen
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::HttpError => "HTTP_ERROR",
            ErrorCode::ApiError => "API_ERROR",
            ErrorCode::CityNotFound => "CITY_NOT_FOUND",
            ErrorCode::GeocodingError => "GEOCODING_ERROR",
            ErrorCode::GeocodingApiError => "GEOCODING_API_ERROR",
            ErrorCode::HoroscopeApiError => "HOROSCOPE_API_ERROR",
            ErrorCode::AspectsApiError => "ASPECTS_API_ERROR",
            ErrorCode::MoonPhaseApiError => "MOON_PHASE_API_ERROR",
            ErrorCode::TransitApiError => "TRANSIT_API_ERROR",
            ErrorCode::MonthMoonPhasesApiError => "MONTH_MOON_PHASES_API_ERROR",
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::ConfigError => "CONFIG_ERROR",
            ErrorCode::NetworkError => "NETWORK_ERROR",
            ErrorCode::UnknownError => "UNKNOWN_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Uniform application error shown to the user verbatim
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[error("[{code}] {message}")]
pub struct AppError {
    /// Error classification
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Optional key/value context (status code, endpoint, ...)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub details: BTreeMap<String, String>,
    /// When the error was raised
    pub timestamp: DateTime<Utc>,
}

impl AppError {
    /// Create a new error with an explicit code
    pub fn new<S: Into<String>>(code: ErrorCode, message: S) -> Self {
        Self {
            code,
            message: message.into(),
            details: BTreeMap::new(),
            timestamp: Utc::now(),
        }
    }

    /// Create a new HTTP status error
    pub fn http<S: Into<String>>(message: S) -> Self {
        Self::new(ErrorCode::HttpError, message)
    }

    /// Create a new API error for a `success: false` payload
    pub fn api<S: Into<String>>(message: S) -> Self {
        Self::new(ErrorCode::ApiError, message)
    }

    /// Create a new city-not-found error
    pub fn city_not_found() -> Self {
        Self::new(ErrorCode::CityNotFound, "City not found")
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::new(ErrorCode::ValidationError, message)
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    /// Create a new network error
    pub fn network<S: Into<String>>(message: S) -> Self {
        Self::new(ErrorCode::NetworkError, message)
    }

    /// Attach a context entry
    pub fn with_detail<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }

    /// Timestamp in the RFC 3339 form used on the wire
    #[must_use]
    pub fn timestamp_rfc3339(&self) -> String {
        self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        self.message.clone()
    }

    /// Whether this error stopped a submission before any network call
    #[must_use]
    pub fn is_validation(&self) -> bool {
        self.code == ErrorCode::ValidationError
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let http_err = AppError::http("Failed to calculate horoscope: 500");
        assert_eq!(http_err.code, ErrorCode::HttpError);

        let not_found = AppError::city_not_found();
        assert_eq!(not_found.code, ErrorCode::CityNotFound);
        assert_eq!(not_found.message, "City not found");

        let validation_err = AppError::validation("Date is required");
        assert!(validation_err.is_validation());
    }

    #[test]
    fn test_display_includes_code_and_message() {
        let err = AppError::api("API returned unsuccessful response");
        assert_eq!(err.to_string(), "[API_ERROR] API returned unsuccessful response");
        assert_eq!(err.user_message(), "API returned unsuccessful response");
    }

    #[test]
    fn test_serialized_shape() {
        let err = AppError::new(ErrorCode::MonthMoonPhasesApiError, "boom");
        let value = serde_json::to_value(&err).unwrap();

        assert_eq!(value["code"], "MONTH_MOON_PHASES_API_ERROR");
        assert_eq!(value["message"], "boom");
        assert!(value["timestamp"].is_string());
        assert!(value.get("details").is_none());
    }

    #[test]
    fn test_details_are_serialized_when_present() {
        let err = AppError::http("HTTP error! status: 503").with_detail("status_code", "503");
        let value = serde_json::to_value(&err).unwrap();
        assert_eq!(value["details"]["status_code"], "503");
    }

    #[test]
    fn test_code_strings_match_serde() {
        for code in [
            ErrorCode::HttpError,
            ErrorCode::CityNotFound,
            ErrorCode::GeocodingApiError,
            ErrorCode::ValidationError,
        ] {
            let json = serde_json::to_string(&code).unwrap();
            assert_eq!(json, format!("\"{}\"", code.as_str()));
        }
    }
}

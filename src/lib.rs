//! `AstroCalc` - horoscope, aspect, moon phase and transit calculations
//!
//! This library provides the form handling, validation and HTTP clients
//! around an external astrological calculation service and a geocoding
//! service, plus the text rendering of their results.

pub mod api;
pub mod config;
pub mod display;
pub mod error;
pub mod geocoding;
pub mod i18n;
pub mod models;
pub mod service;
pub mod validation;

// Re-export core types for public API
pub use api::{AstroApi, AstroApiClient};
pub use config::AstroCalcConfig;
pub use error::{AppError, ErrorCode};
pub use geocoding::{Geocoder, GeocodingClient};
pub use i18n::Language;
pub use models::{FormData, InputMode, LocationForm, MonthMoonPhasesFormData, TransitFormData};
pub use service::{
    CalculationKind, CalculationResult, HoroscopeService, MonthMoonPhasesService, TransitService,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, AppError>;

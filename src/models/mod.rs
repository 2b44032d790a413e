//! Data models for the AstroCalc application
//!
//! This module contains the view-models and wire types organized by concern:
//! - Location: Resolved coordinates and geocoding results
//! - Form: Free-text form state and the location input mode
//! - Request: Payloads sent to the calculation API
//! - Response: Payloads returned by the calculation API

pub mod form;
pub mod location;
pub mod request;
pub mod response;

// Re-export all public types for convenient access
pub use form::{
    FormData, InputMode, LocationFields, LocationForm, MonthMoonPhasesFormData, TransitFormData,
};
pub use location::{GeocodingResult, Location};
pub use request::{CalculationRequest, MonthPhasesRequest, TransitRequest};
pub use response::{
    AspectData, AspectsResponse, BirthData, HoroscopeData, HoroscopeResponse, LenormandCard,
    MonthMoonPhaseEntry, MonthMoonPhasesResponse, MoonPhaseData, MoonPhaseResponse, MoonPosition,
    PositionData, ReferencePoints, TransitData, TransitParameters, TransitResponse,
};

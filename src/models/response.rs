//! Response payloads returned by the calculation API
//!
//! These mirror the service JSON and are held only while a result is shown.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Sign and degree of a planet or house cusp
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionData {
    pub sign: String,
    pub degree_in_sign: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BirthDate {
    pub day: u32,
    pub month: u32,
    pub year: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BirthTime {
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BirthLocation {
    pub latitude: f64,
    pub longitude: f64,
}

/// Echo of the birth data the horoscope was computed for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BirthData {
    pub date: BirthDate,
    pub time: BirthTime,
    pub location: BirthLocation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoroscopeData {
    /// Planets in the order the service lists them
    pub planets: IndexMap<String, PositionData>,
    pub houses: IndexMap<String, PositionData>,
}

/// Lenormand card mapped from the moon position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LenormandCard {
    pub card: String,
    pub moon_sign: String,
    pub moon_decan: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoroscopeResponse {
    #[serde(default)]
    pub success: bool,
    pub birth_data: BirthData,
    pub horoscope: HoroscopeData,
    #[serde(default)]
    pub lenormand_card: Option<LenormandCard>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AspectData {
    pub planet1: String,
    pub planet2: String,
    pub aspect: String,
    pub degrees: f64,
    pub orb: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AspectsResponse {
    #[serde(default)]
    pub success: bool,
    pub aspect_count: u32,
    pub orb_used: f64,
    pub aspects: Vec<AspectData>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoonPhaseData {
    pub phase_name: String,
    pub age_days: f64,
    pub fraction_of_cycle: f64,
    pub illuminated_fraction: f64,
    pub julian_date: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoonPosition {
    pub sign: String,
    pub decan: String,
    pub degree_in_sign: f64,
    pub absolute_longitude: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferencePoints {
    pub ascendant_longitude: f64,
    pub descendant_longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoonPhaseRequestData {
    pub date: BirthDate,
    pub time: BirthTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoonPhaseResponse {
    #[serde(default)]
    pub success: bool,
    pub moon_phase: MoonPhaseData,
    #[serde(default)]
    pub request_data: Option<MoonPhaseRequestData>,
    #[serde(default)]
    pub moon_position: Option<MoonPosition>,
    #[serde(default)]
    pub reference_points: Option<ReferencePoints>,
}

/// One angle crossing of the requested planet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitData {
    pub planet: String,
    /// Ascendant, Descendant, Midheaven or Imum Coeli
    pub angle: String,
    /// Local time without offset, e.g. `2025-03-04T06:12:00`
    pub datetime_local: String,
    pub longitude: f64,
    pub sign: String,
    pub degree_in_sign: f64,
    pub decan: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransitLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub timezone_offset_hours: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitParameters {
    pub year: i32,
    pub month: u32,
    pub location: TransitLocation,
    pub planet: String,
    pub step_minutes: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitResponse {
    #[serde(default)]
    pub success: bool,
    pub transits: Vec<TransitData>,
    pub parameters: TransitParameters,
    pub total_transits: u32,
}

/// Moon phase of a single day of the month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthMoonPhaseEntry {
    /// `YYYY-MM-DD`
    pub date: String,
    pub phase_name: String,
    pub age_days: f64,
    pub illuminated_fraction: f64,
    #[serde(default)]
    pub fraction_of_cycle: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthRequestData {
    pub year: i32,
    pub month: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthMoonPhasesResponse {
    #[serde(default)]
    pub success: bool,
    pub month_moon_phases: Vec<MonthMoonPhaseEntry>,
    pub request_data: MonthRequestData,
}

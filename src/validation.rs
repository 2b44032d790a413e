//! Form validation
//!
//! Turns the free-text form state into typed values. Every check here runs
//! before any network call; failures are `VALIDATION_ERROR`s.

use crate::models::{
    FormData, InputMode, Location, LocationFields, MonthMoonPhasesFormData, MonthPhasesRequest,
    TransitFormData,
};
use crate::{AppError, Result};
use chrono::{NaiveDate, NaiveTime};

/// Years accepted by the transit and month-phase forms
pub const YEAR_RANGE: std::ops::RangeInclusive<i32> = 1900..=2100;

/// Planets the transit endpoint understands
pub const PLANETS: [&str; 10] = [
    "Sun", "Moon", "Mercury", "Venus", "Mars", "Jupiter", "Saturn", "Uranus", "Neptune", "Pluto",
];

/// Where a submission should be calculated for
#[derive(Debug, Clone, PartialEq)]
pub enum LocationSpec {
    /// Coordinates typed in or filled by an earlier city search
    Coordinates(Location),
    /// City name that still has to be geocoded
    City(String),
}

/// A birth form that passed validation
#[derive(Debug, Clone, PartialEq)]
pub struct BirthInput {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub location: LocationSpec,
}

/// A transit form that passed validation
#[derive(Debug, Clone, PartialEq)]
pub struct TransitInput {
    pub year: i32,
    pub month: u32,
    pub planet: String,
    pub location: LocationSpec,
}

/// Validate the birth data form
pub fn validate_birth_form(data: &FormData, mode: InputMode) -> Result<BirthInput> {
    if data.date.trim().is_empty() {
        return Err(AppError::validation("Date is required"));
    }
    if data.time.trim().is_empty() {
        return Err(AppError::validation("Time is required"));
    }

    let location = validate_location(data, mode)?;
    let date = parse_date(&data.date)?;
    let time = parse_time(&data.time)?;

    Ok(BirthInput {
        date,
        time,
        location,
    })
}

/// Validate the transit form
pub fn validate_transit_form(data: &TransitFormData, mode: InputMode) -> Result<TransitInput> {
    let year = parse_year(&data.year)?;
    let month = parse_month(&data.month)?;
    let planet = parse_planet(&data.planet)?;
    let location = validate_location(data, mode)?;

    Ok(TransitInput {
        year,
        month,
        planet,
        location,
    })
}

/// Validate the month moon-phases form
pub fn validate_month_form(data: &MonthMoonPhasesFormData) -> Result<MonthPhasesRequest> {
    Ok(MonthPhasesRequest {
        year: parse_year(&data.year)?,
        month: parse_month(&data.month)?,
    })
}

/// Pick the location source of a form.
///
/// Filled coordinates win in either mode, so a city that was already
/// searched is not geocoded a second time.
pub fn validate_location<F: LocationFields>(fields: &F, mode: InputMode) -> Result<LocationSpec> {
    if fields.has_coordinates() {
        let location = parse_coordinates(fields.latitude(), fields.longitude())?;
        return Ok(LocationSpec::Coordinates(location));
    }

    let city = fields.city().trim();
    if mode == InputMode::City && !city.is_empty() {
        return Ok(LocationSpec::City(city.to_string()));
    }

    Err(AppError::validation(
        "Either city name or coordinates must be provided",
    ))
}

/// Parse and range-check a latitude/longitude pair
pub fn parse_coordinates(latitude: &str, longitude: &str) -> Result<Location> {
    let lat = parse_number(latitude, "Latitude")?;
    let lon = parse_number(longitude, "Longitude")?;

    if !(-90.0..=90.0).contains(&lat) {
        return Err(AppError::validation("Latitude must be between -90 and 90"));
    }
    if !(-180.0..=180.0).contains(&lon) {
        return Err(AppError::validation(
            "Longitude must be between -180 and 180",
        ));
    }

    Ok(Location::new(lat, lon))
}

fn parse_number(value: &str, name: &str) -> Result<f64> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::validation(format!("{name} is required")));
    }
    value
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| AppError::validation(format!("{name} must be a number, got: {value}")))
}

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid date '{value}', expected YYYY-MM-DD")))
}

/// Parse an `HH:MM` time; optional seconds are checked, then dropped
pub fn parse_time(value: &str) -> Result<NaiveTime> {
    let invalid = || AppError::validation(format!("Invalid time '{value}', expected HH:MM"));

    let parts: Vec<&str> = value.trim().split(':').map(str::trim).collect();
    let (hours, minutes, seconds) = match parts.as_slice() {
        [h, m] => (*h, *m, None),
        [h, m, s] => (*h, *m, Some(*s)),
        _ => return Err(invalid()),
    };
    let hours: u32 = hours.parse().map_err(|_| invalid())?;
    let minutes: u32 = minutes.parse().map_err(|_| invalid())?;

    if hours > 23 {
        return Err(AppError::validation("Hours must be between 0 and 23"));
    }
    if minutes > 59 {
        return Err(AppError::validation("Minutes must be between 0 and 59"));
    }
    if let Some(seconds) = seconds
        && !matches!(seconds.parse::<u32>(), Ok(0..=59))
    {
        return Err(AppError::validation("Seconds must be between 0 and 59"));
    }

    NaiveTime::from_hms_opt(hours, minutes, 0).ok_or_else(invalid)
}

pub fn parse_year(value: &str) -> Result<i32> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::validation("Year is required"));
    }
    match value.parse::<i32>() {
        Ok(year) if YEAR_RANGE.contains(&year) => Ok(year),
        _ => Err(AppError::validation("Year must be between 1900 and 2100")),
    }
}

pub fn parse_month(value: &str) -> Result<u32> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::validation("Month is required"));
    }
    match value.parse::<u32>() {
        Ok(month) if (1..=12).contains(&month) => Ok(month),
        _ => Err(AppError::validation("Month must be between 1 and 12")),
    }
}

/// Match a planet name case-insensitively, returning its canonical spelling
pub fn parse_planet(value: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::validation("Planet is required"));
    }
    PLANETS
        .iter()
        .find(|planet| planet.eq_ignore_ascii_case(value))
        .map(|planet| (*planet).to_string())
        .ok_or_else(|| {
            AppError::validation(format!(
                "Unknown planet '{value}'. Must be one of: {}",
                PLANETS.join(", ")
            ))
        })
}

//! Form state for the birth-data, transit and month-phase inputs
//!
//! All fields are kept as the free text the user typed; parsing happens in
//! [`crate::validation`] when a form is submitted.

use crate::{AppError, Result};
use chrono::{Datelike, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the location of a form is entered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    #[default]
    City,
    Coordinates,
}

impl fmt::Display for InputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputMode::City => f.write_str("city"),
            InputMode::Coordinates => f.write_str("coordinates"),
        }
    }
}

impl FromStr for InputMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "city" => Ok(InputMode::City),
            "coordinates" | "coords" => Ok(InputMode::Coordinates),
            other => Err(AppError::validation(format!("Unknown input mode: {other}"))),
        }
    }
}

/// Birth data form: date, time and location
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormData {
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:MM`
    pub time: String,
    pub latitude: String,
    pub longitude: String,
    pub city: String,
}

/// Transit search form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitFormData {
    pub year: String,
    pub month: String,
    pub planet: String,
    pub latitude: String,
    pub longitude: String,
    pub city: String,
}

/// Month moon-phases form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthMoonPhasesFormData {
    pub year: String,
    pub month: String,
}

/// Shared access to the location part of a form
pub trait LocationFields {
    fn city(&self) -> &str;
    fn latitude(&self) -> &str;
    fn longitude(&self) -> &str;
    fn clear_city(&mut self);
    fn set_coordinates(&mut self, latitude: String, longitude: String);

    /// Update a field by its form name
    fn set_field(&mut self, name: &str, value: String) -> Result<()>;

    /// Fill the time fields from the given instant
    fn fill_current(&mut self, now: NaiveDateTime);

    fn clear_coordinates(&mut self) {
        self.set_coordinates(String::new(), String::new());
    }

    /// Both coordinate fields hold text
    fn has_coordinates(&self) -> bool {
        !self.latitude().trim().is_empty() && !self.longitude().trim().is_empty()
    }
}

fn unknown_field(name: &str) -> AppError {
    AppError::validation(format!("Unknown form field: {name}"))
}

impl LocationFields for FormData {
    fn city(&self) -> &str {
        &self.city
    }

    fn latitude(&self) -> &str {
        &self.latitude
    }

    fn longitude(&self) -> &str {
        &self.longitude
    }

    fn clear_city(&mut self) {
        self.city.clear();
    }

    fn set_coordinates(&mut self, latitude: String, longitude: String) {
        self.latitude = latitude;
        self.longitude = longitude;
    }

    fn set_field(&mut self, name: &str, value: String) -> Result<()> {
        match name {
            "date" => self.date = value,
            "time" => self.time = value,
            "latitude" => self.latitude = value,
            "longitude" => self.longitude = value,
            "city" => self.city = value,
            _ => return Err(unknown_field(name)),
        }
        Ok(())
    }

    fn fill_current(&mut self, now: NaiveDateTime) {
        self.date = now.format("%Y-%m-%d").to_string();
        self.time = now.format("%H:%M").to_string();
    }
}

impl LocationFields for TransitFormData {
    fn city(&self) -> &str {
        &self.city
    }

    fn latitude(&self) -> &str {
        &self.latitude
    }

    fn longitude(&self) -> &str {
        &self.longitude
    }

    fn clear_city(&mut self) {
        self.city.clear();
    }

    fn set_coordinates(&mut self, latitude: String, longitude: String) {
        self.latitude = latitude;
        self.longitude = longitude;
    }

    fn set_field(&mut self, name: &str, value: String) -> Result<()> {
        match name {
            "year" => self.year = value,
            "month" => self.month = value,
            "planet" => self.planet = value,
            "latitude" => self.latitude = value,
            "longitude" => self.longitude = value,
            "city" => self.city = value,
            _ => return Err(unknown_field(name)),
        }
        Ok(())
    }

    fn fill_current(&mut self, now: NaiveDateTime) {
        self.year = now.year().to_string();
        self.month = now.month().to_string();
    }
}

impl MonthMoonPhasesFormData {
    /// Update a field by its form name
    pub fn set_field(&mut self, name: &str, value: impl Into<String>) -> Result<()> {
        match name {
            "year" => self.year = value.into(),
            "month" => self.month = value.into(),
            _ => return Err(unknown_field(name)),
        }
        Ok(())
    }

    pub fn fill_current(&mut self, now: NaiveDateTime) {
        self.year = now.year().to_string();
        self.month = now.month().to_string();
    }
}

/// A form with a city/coordinates location switch
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocationForm<F> {
    pub data: F,
    pub input_mode: InputMode,
}

impl<F: LocationFields + Default> LocationForm<F> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap existing form data
    pub fn with_data(data: F, input_mode: InputMode) -> Self {
        Self { data, input_mode }
    }

    pub fn set_field(&mut self, name: &str, value: impl Into<String>) -> Result<()> {
        self.data.set_field(name, value.into())
    }

    /// Change the location mode, clearing the fields of the other mode
    pub fn switch_input_mode(&mut self, mode: InputMode) {
        self.input_mode = mode;
        match mode {
            InputMode::Coordinates => self.data.clear_city(),
            InputMode::City => self.data.clear_coordinates(),
        }
    }

    /// Store coordinates found by a city search
    pub fn update_coordinates(
        &mut self,
        latitude: impl Into<String>,
        longitude: impl Into<String>,
    ) {
        self.data.set_coordinates(latitude.into(), longitude.into());
    }

    pub fn fill_current_date_time(&mut self, now: NaiveDateTime) {
        self.data.fill_current(now);
    }

    /// Back to empty fields in city mode
    pub fn reset(&mut self) {
        self.data = F::default();
        self.input_mode = InputMode::City;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample_now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(9, 7, 42)
            .unwrap()
    }

    #[test]
    fn test_switch_to_coordinates_clears_city() {
        let mut form: LocationForm<FormData> = LocationForm::new();
        form.set_field("city", "Milano").unwrap();
        form.update_coordinates("45.46", "9.19");

        form.switch_input_mode(InputMode::Coordinates);

        assert_eq!(form.input_mode, InputMode::Coordinates);
        assert!(form.data.city.is_empty());
        assert_eq!(form.data.latitude, "45.46");
    }

    #[test]
    fn test_switch_to_city_clears_coordinates() {
        let mut form: LocationForm<TransitFormData> = LocationForm::new();
        form.switch_input_mode(InputMode::Coordinates);
        form.set_field("latitude", "41.9").unwrap();
        form.set_field("longitude", "12.5").unwrap();
        form.set_field("city", "Roma").unwrap();

        form.switch_input_mode(InputMode::City);

        assert_eq!(form.input_mode, InputMode::City);
        assert!(form.data.latitude.is_empty());
        assert!(form.data.longitude.is_empty());
        assert_eq!(form.data.city, "Roma");
    }

    #[test]
    fn test_switch_to_same_mode_still_clears() {
        let mut form: LocationForm<FormData> = LocationForm::new();
        form.update_coordinates("1", "2");
        form.switch_input_mode(InputMode::City);
        assert!(!form.data.has_coordinates());
    }

    #[test]
    fn test_fill_current_date_time() {
        let mut form: LocationForm<FormData> = LocationForm::new();
        form.fill_current_date_time(sample_now());
        assert_eq!(form.data.date, "2024-05-01");
        assert_eq!(form.data.time, "09:07");

        let mut transit: LocationForm<TransitFormData> = LocationForm::new();
        transit.fill_current_date_time(sample_now());
        assert_eq!(transit.data.year, "2024");
        assert_eq!(transit.data.month, "5");
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let mut form: LocationForm<FormData> = LocationForm::new();
        assert!(form.set_field("planet", "Mars").is_err());

        let mut month = MonthMoonPhasesFormData::default();
        assert!(month.set_field("city", "Roma").is_err());
        month.set_field("year", "2030").unwrap();
        month.set_field("month", String::from("7")).unwrap();
        assert_eq!(month.year, "2030");
        assert_eq!(month.month, "7");
    }

    #[test]
    fn test_reset() {
        let mut form: LocationForm<FormData> = LocationForm::new();
        form.set_field("date", "2024-05-01").unwrap();
        form.switch_input_mode(InputMode::Coordinates);
        form.reset();
        assert_eq!(form, LocationForm::new());
    }

    #[test]
    fn test_input_mode_parsing() {
        assert_eq!("City".parse::<InputMode>().unwrap(), InputMode::City);
        assert_eq!("coordinates".parse::<InputMode>().unwrap(), InputMode::Coordinates);
        assert!("map".parse::<InputMode>().is_err());
    }
}
